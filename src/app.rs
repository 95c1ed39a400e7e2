use crate::chat_message::ChatMessage;
use crate::controller::ChatSurface;
use crate::models::Message;
use crate::status_indicator::StatusIndicator;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Everything the terminal window shows.
#[derive(Debug)]
pub struct App {
    pub messages: Vec<ChatMessage>,
    pub input: String,
    pub input_focused: bool,
    pub send_enabled: bool,
    pub status_indicator: StatusIndicator,
    pub example_queries: Vec<String>,
    pub endpoint: String,
    pub chat_scroll: u16,
    pub follow_tail: bool,
    pub max_scroll: u16,
    pub page_height: u16,
}

impl App {
    pub fn new(example_queries: Vec<String>, endpoint: impl Into<String>) -> App {
        App {
            messages: Vec::new(),
            input: String::new(),
            input_focused: false,
            send_enabled: true,
            status_indicator: StatusIndicator::new(),
            example_queries,
            endpoint: endpoint.into(),
            chat_scroll: 0,
            follow_tail: true,
            max_scroll: 0,
            page_height: 10,
        }
    }

    pub fn scroll_up(&mut self) {
        if self.follow_tail {
            self.chat_scroll = self.max_scroll;
            self.follow_tail = false;
        }
        self.chat_scroll = self.chat_scroll.saturating_sub(self.page_height.max(1));
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self
            .chat_scroll
            .saturating_add(self.page_height.max(1))
            .min(self.max_scroll);
        if self.chat_scroll >= self.max_scroll {
            self.follow_tail = true;
        }
    }

    /// Called by the renderer once the message height is known.
    pub fn update_scroll_bounds(&mut self, total_lines: u16, visible: u16) {
        self.max_scroll = total_lines.saturating_sub(visible);
        self.page_height = visible;
        if self.follow_tail || self.chat_scroll > self.max_scroll {
            self.chat_scroll = self.max_scroll;
        }
    }
}

pub type SharedApp = Arc<Mutex<App>>;

/// Locks the app state. A panic while drawing does not poison the chat.
pub fn lock(app: &SharedApp) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(PoisonError::into_inner)
}

/// `ChatSurface` backed by the terminal window state.
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    app: SharedApp,
}

impl TerminalSurface {
    pub fn new(app: SharedApp) -> Self {
        Self { app }
    }
}

impl ChatSurface for TerminalSurface {
    fn append_message(&mut self, message: &Message, markup: &str) {
        let mut app = lock(&self.app);
        app.messages.push(ChatMessage::new(message.clone(), markup));
        app.follow_tail = true;
    }

    fn set_loading(&mut self, loading: bool) {
        let mut app = lock(&self.app);
        app.send_enabled = !loading;
        app.status_indicator.set_loading(loading);
        if loading {
            app.input_focused = false;
        }
    }

    fn set_input(&mut self, text: &str) {
        lock(&self.app).input = text.to_string();
    }

    fn clear_input(&mut self) {
        lock(&self.app).input.clear();
    }

    fn focus_input(&mut self) {
        lock(&self.app).input_focused = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared() -> SharedApp {
        Arc::new(Mutex::new(App::new(vec![], "http://127.0.0.1:5001")))
    }

    #[test]
    fn test_loading_disables_send_and_drops_focus() {
        let app = shared();
        let mut surface = TerminalSurface::new(app.clone());
        surface.focus_input();

        surface.set_loading(true);
        {
            let guard = lock(&app);
            assert!(!guard.send_enabled);
            assert!(!guard.input_focused);
            assert!(guard.status_indicator.line().to_string().contains("Searching"));
        }

        surface.set_loading(false);
        surface.focus_input();
        let guard = lock(&app);
        assert!(guard.send_enabled);
        assert!(guard.input_focused);
    }

    #[test]
    fn test_append_follows_tail() {
        let app = shared();
        lock(&app).follow_tail = false;
        let mut surface = TerminalSurface::new(app.clone());

        surface.append_message(&Message::user("hi"), "hi");
        let guard = lock(&app);
        assert_eq!(guard.messages.len(), 1);
        assert!(guard.follow_tail);
    }

    #[test]
    fn test_scrolling_within_bounds() {
        let mut app = App::new(vec![], "");
        app.update_scroll_bounds(50, 10);
        assert_eq!(app.chat_scroll, 40);

        app.scroll_up();
        assert_eq!(app.chat_scroll, 30);
        assert!(!app.follow_tail);

        app.update_scroll_bounds(60, 10);
        assert_eq!(app.chat_scroll, 30);

        app.scroll_down();
        app.scroll_down();
        app.scroll_down();
        assert_eq!(app.chat_scroll, 50);
        assert!(app.follow_tail);
    }
}
