// UI Constants
pub const APP_TITLE: &str = "Catalog Assistant";
pub const TICK_RATE_MS: u64 = 100;
pub const INPUT_PROMPT: &str = "→ ";
pub const SOURCE_BULLET: &str = "• ";

pub const BOX_TOP: &str = "┌─";
pub const BOX_SIDE: &str = "│ ";
pub const BOX_BOTTOM: &str = "╰─";

// Chat notices
pub const SERVER_ERROR_MESSAGE: &str = "Sorry, I encountered an error. Please try again.";
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Sorry, I encountered a connection error. Please try again.";

// API Constants
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5001";
pub const DEFAULT_CHAT_PATH: &str = "/chat";

/// Example questions beyond F12 are not offered.
pub const EXAMPLE_KEY_COUNT: usize = 12;

pub const DEFAULT_EXAMPLE_QUERIES: [&str; 4] = [
    "What are the requirements for the Computer Science major?",
    "Which courses satisfy the writing requirement?",
    "What are the prerequisites for Data Structures?",
    "How many credits do I need to graduate?",
];
