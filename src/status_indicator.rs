use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Busy indicator shown while a query is in flight.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    loading: bool,
    status_text: String,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if !loading {
            self.spinner_idx = 0;
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_text = status.into();
    }

    pub fn clear_status(&mut self) {
        self.status_text.clear();
    }

    pub fn tick(&mut self) {
        if self.loading {
            self.spinner_idx = self.spinner_idx.wrapping_add(1);
        }
    }

    pub fn line(&self) -> Line<'static> {
        let spinner = if self.loading {
            SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
        } else {
            " "
        };

        let (text, color) = if self.loading {
            ("Searching the catalog...".to_string(), Color::DarkGray)
        } else if !self.status_text.is_empty() {
            (self.status_text.clone(), Color::Yellow)
        } else {
            (String::new(), Color::DarkGray)
        };

        Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(text, Style::default().fg(color)),
        ])
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Paragraph::new(self.line()), area);
    }
}
