use crate::constants::EXAMPLE_KEY_COUNT;
use crate::App;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the runtime should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    None,
    Submit(String),
    Example(String),
    Quit,
}

pub fn handle_event(event: Event, app: &mut App) -> KeyAction {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_chat_input(key, app),
        Event::Paste(text) => {
            app.input.push_str(&text.replace(['\r', '\n'], " "));
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}

pub fn handle_chat_input(key: KeyEvent, app: &mut App) -> KeyAction {
    match key.code {
        KeyCode::Esc => KeyAction::Quit,
        KeyCode::Enter => {
            if !app.send_enabled {
                return KeyAction::None;
            }
            KeyAction::Submit(app.input.clone())
        }
        KeyCode::F(n) => {
            if !app.send_enabled {
                return KeyAction::None;
            }
            match app.example_queries.get(usize::from(n).saturating_sub(1)) {
                Some(query) if n > 0 && usize::from(n) <= EXAMPLE_KEY_COUNT => {
                    KeyAction::Example(query.clone())
                }
                _ => KeyAction::None,
            }
        }
        KeyCode::PageUp => {
            app.scroll_up();
            KeyAction::None
        }
        KeyCode::PageDown => {
            app.scroll_down();
            KeyAction::None
        }
        KeyCode::Backspace => {
            app.input.pop();
            KeyAction::None
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    'c' | 'd' => return KeyAction::Quit,
                    'u' => app.input.clear(),
                    _ => {}
                }
            } else {
                app.input.push(c);
            }
            KeyAction::None
        }
        _ => KeyAction::None,
    }
}
