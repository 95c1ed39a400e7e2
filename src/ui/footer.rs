use crate::constants::EXAMPLE_KEY_COUNT;
use crate::App;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Draws the footer with dynamic instructions
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App) {
    let footer = Paragraph::new(instructions(app))
        .style(Style::default().fg(Color::LightCyan))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(footer, area);
}

fn instructions(app: &App) -> String {
    if !app.send_enabled {
        return "Waiting for the assistant... Esc to quit.".to_string();
    }

    let examples = match app.example_queries.len().min(EXAMPLE_KEY_COUNT) {
        0 => String::new(),
        1 => "F1 for an example, ".to_string(),
        n => format!("F1-F{} for examples, ", n),
    };
    format!("Enter to send, {}PgUp/PgDn to scroll, Esc to quit.", examples)
}
