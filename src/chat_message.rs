use crate::{
    constants::{BOX_BOTTOM, BOX_SIDE, BOX_TOP},
    markup::{self, MarkupLine, Segment, SegmentStyle},
    models::Message,
};
use chrono::{DateTime, Local};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::UnicodeWidthStr;

/// A message as displayed in the terminal: the message itself plus its
/// parsed display markup.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    message: Message,
    lines: Vec<MarkupLine>,
    timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(message: Message, markup: &str) -> Self {
        Self {
            message,
            lines: markup::parse(markup),
            timestamp: Local::now(),
        }
    }

    pub fn render(&self, width: u16) -> Vec<Line<'static>> {
        let base_style = self.base_style();
        let indent = if self.message.is_user() { "  " } else { "" };
        let content_width =
            (width as usize).saturating_sub(indent.len() + UnicodeWidthStr::width(BOX_SIDE));

        let mut lines = vec![self.header(indent, base_style)];

        for line in &self.lines {
            for wrapped in markup::wrap_line(line, content_width) {
                let mut spans = vec![
                    Span::styled(indent.to_string(), base_style),
                    Span::styled(BOX_SIDE.to_string(), base_style),
                ];
                spans.extend(wrapped.iter().map(|segment| styled(segment, base_style)));
                lines.push(Line::from(spans));
            }
        }

        lines.push(Line::from(vec![
            Span::styled(indent.to_string(), base_style),
            Span::styled(BOX_BOTTOM.to_string(), base_style),
        ]));
        lines
    }

    fn header(&self, indent: &str, style: Style) -> Line<'static> {
        let author = if self.message.is_user() { "You" } else { "Assistant" };
        Line::from(vec![
            Span::styled(indent.to_string(), style),
            Span::styled(BOX_TOP.to_string(), style),
            Span::styled(format!(" {} ", author), style.add_modifier(Modifier::BOLD)),
            Span::styled(
                self.timestamp.format("%H:%M").to_string(),
                style.add_modifier(Modifier::DIM),
            ),
        ])
    }

    fn base_style(&self) -> Style {
        Style::default().fg(if self.message.is_user() {
            Color::Rgb(255, 223, 128)
        } else {
            Color::Rgb(144, 238, 144)
        })
    }
}

fn styled(segment: &Segment, base: Style) -> Span<'static> {
    Span::styled(segment.text.clone(), segment_style(segment.style, base))
}

fn segment_style(style: SegmentStyle, base: Style) -> Style {
    let mut out = base;
    if style.bold {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.italic {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.link {
        out = out.fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
    }
    if style.dim {
        out = out.fg(Color::DarkGray);
    }
    out
}
