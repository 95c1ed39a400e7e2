use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::constants::{EXAMPLE_KEY_COUNT, INPUT_PROMPT};
use crate::App;
use unicode_width::UnicodeWidthStr;

/// Message history, or the example questions while it is still empty.
pub fn draw_messages(f: &mut Frame<'_>, area: Rect, app: &mut App) {
    if app.messages.is_empty() {
        draw_welcome(f, area, app);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    for message in &app.messages {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(message.render(area.width));
    }

    let total_lines = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    app.update_scroll_bounds(total_lines, area.height);

    f.render_widget(Paragraph::new(lines).scroll((app.chat_scroll, 0)), area);
}

fn draw_welcome(f: &mut Frame<'_>, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Ask anything about courses, majors and requirements.",
            Style::default()
                .fg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if !app.example_queries.is_empty() {
        lines.push(Line::from(Span::styled(
            "Try one of these:",
            Style::default().fg(Color::Gray),
        )));
        for (i, query) in app.example_queries.iter().enumerate().take(EXAMPLE_KEY_COUNT) {
            lines.push(Line::from(vec![
                Span::styled(format!("  F{}  ", i + 1), Style::default().fg(Color::Magenta)),
                Span::raw(query.clone()),
            ]));
        }
    }

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

pub fn draw_input(f: &mut Frame<'_>, area: Rect, app: &App) {
    let border_color = if app.send_enabled {
        Color::LightYellow
    } else {
        Color::DarkGray
    };
    let title = if app.send_enabled { "Ask" } else { "Ask (waiting for answer)" };

    let input = Line::from(vec![
        Span::styled(INPUT_PROMPT, Style::default().fg(Color::DarkGray)),
        Span::styled(app.input.as_str(), Style::default().fg(Color::White)),
    ]);

    // Widths saturate at u16::MAX; a pasted input can be wider than that.
    let inner_width = area.width.saturating_sub(2);
    let prompt_width = column_width(INPUT_PROMPT);
    let typed_width = prompt_width.saturating_add(column_width(&app.input));
    let scroll_offset = typed_width.saturating_sub(inner_width.saturating_sub(1));

    f.render_widget(
        Paragraph::new(input)
            .scroll((0, scroll_offset))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color))
                    .title(title),
            ),
        area,
    );

    if app.input_focused {
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(typed_width - scroll_offset);
        f.set_cursor_position((x, area.y.saturating_add(1)));
    }
}

fn column_width(text: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(text)).unwrap_or(u16::MAX)
}
