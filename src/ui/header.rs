use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::constants::APP_TITLE;
use crate::App;

pub fn draw_header(f: &mut Frame<'_>, area: Rect, app: &App) {
    let lines = vec![
        Line::from(Span::styled(
            APP_TITLE,
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.endpoint.as_str(),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
