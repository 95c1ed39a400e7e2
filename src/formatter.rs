//! Markdown-lite to markup conversion for chat messages.
//!
//! `format` applies a fixed sequence of substitutions; each rule sees the
//! output of the previous one, so the order matters for inputs such as
//! `**a*b*c**`. `render_message` is the entry point for anything that came
//! over the wire: it escapes the text first so only the formatter's own tags
//! survive.

use crate::models::{Message, Role, Source};
use once_cell::sync::Lazy;
use regex::Regex;

// Markers pair up within a line. Carriage returns and the Unicode line and
// paragraph separators end a line too.
static BOLD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^\n\r\x{2028}\x{2029}]*?)\*\*").expect("bold pattern")
});
static ITALIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^\n\r\x{2028}\x{2029}]*?)\*").expect("italic pattern"));

// Two, three and three digits. Not HH:MM:SS; kept as the backend's answers
// are highlighted this way.
static NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{2}:[0-9]{3}:[0-9]{3})").expect("numeric pattern"));

const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Converts `text` to display markup and appends the sources list when
/// `sources` is non-empty.
pub fn format(text: &str, sources: &[Source]) -> String {
    let formatted = BOLD.replace_all(text, "<strong>${1}</strong>");
    let formatted = ITALIC.replace_all(&formatted, "<em>${1}</em>");
    let formatted = formatted.replace('\n', "<br>");
    let mut formatted = NUMERIC
        .replace_all(&formatted, "<strong>${1}</strong>")
        .into_owned();

    if !sources.is_empty() {
        formatted.push_str(&render_sources(sources));
    }

    formatted
}

/// Renders a message for display. Text, titles and links are escaped;
/// sources are only shown on bot messages.
pub fn render_message(message: &Message) -> String {
    let text = escape_html(message.text());
    match message.role() {
        Role::Bot => format(&text, message.sources()),
        Role::User => format(&text, &[]),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_sources(sources: &[Source]) -> String {
    let mut out = String::from("<br><br><strong>Sources:</strong><ul>");
    for source in sources {
        out.push_str(&format!(
            "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a></li>",
            escape_html(&safe_link(&source.link)),
            escape_html(&source.title)
        ));
    }
    out.push_str("</ul>");
    out
}

fn safe_link(link: &str) -> String {
    let trimmed = link.trim();
    let normalized: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if UNSAFE_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
    {
        "#".to_string()
    } else {
        trimmed.to_string()
    }
}
