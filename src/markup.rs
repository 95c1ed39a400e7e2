//! Turns formatter markup back into styled text runs for the terminal.
//!
//! Only the tags the formatter emits are understood (`strong`, `em`, `br`,
//! `ul`, `li`, `a`). Anything else between `<` and `>` is shown as text.

use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentStyle {
    pub bold: bool,
    pub italic: bool,
    pub link: bool,
    pub dim: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
}

pub type MarkupLine = Vec<Segment>;

#[derive(Debug, Default)]
struct LineBuilder {
    lines: Vec<MarkupLine>,
    current: MarkupLine,
    bold: usize,
    italic: usize,
    href: Option<String>,
}

impl LineBuilder {
    fn style(&self) -> SegmentStyle {
        SegmentStyle {
            bold: self.bold > 0,
            italic: self.italic > 0,
            link: self.href.is_some(),
            dim: false,
        }
    }

    fn push_text(&mut self, text: &str, style: SegmentStyle) {
        if text.is_empty() {
            return;
        }
        push_segment(&mut self.current, text, style);
    }

    fn break_line(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
    }

    fn end_block(&mut self) {
        if !self.current.is_empty() {
            self.break_line();
        }
    }

    fn tag(&mut self, raw: &str) -> bool {
        let name = raw
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match name.as_str() {
            "strong" => self.bold += 1,
            "/strong" => self.bold = self.bold.saturating_sub(1),
            "em" => self.italic += 1,
            "/em" => self.italic = self.italic.saturating_sub(1),
            "br" | "br/" => self.break_line(),
            "ul" | "/ul" => self.end_block(),
            "li" => {
                self.end_block();
                self.push_text(crate::constants::SOURCE_BULLET, SegmentStyle::default());
            }
            "/li" => self.end_block(),
            "a" => self.href = Some(unescape(&attribute(raw, "href").unwrap_or_default())),
            "/a" => {
                if let Some(href) = self.href.take() {
                    let style = SegmentStyle {
                        dim: true,
                        ..SegmentStyle::default()
                    };
                    self.push_text(&format!(" ({})", href), style);
                }
            }
            _ => return false,
        }
        true
    }

    fn finish(mut self) -> Vec<MarkupLine> {
        if !self.current.is_empty() || self.lines.is_empty() {
            self.break_line();
        }
        self.lines
    }
}

/// Parses formatter markup into lines of styled segments.
pub fn parse(markup: &str) -> Vec<MarkupLine> {
    let mut builder = LineBuilder::default();
    let mut rest = markup;

    while let Some(open) = rest.find('<') {
        let style = builder.style();
        builder.push_text(&unescape(&rest[..open]), style);

        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) if builder.tag(&after[..close]) => {
                rest = &after[close + 1..];
            }
            _ => {
                let style = builder.style();
                builder.push_text("<", style);
                rest = after;
            }
        }
    }
    let style = builder.style();
    builder.push_text(&unescape(rest), style);

    builder.finish()
}

/// Word-wraps one line to `width` columns, keeping styles.
pub fn wrap_line(line: &[Segment], width: usize) -> Vec<MarkupLine> {
    let width = width.max(1);
    let mut wrapped: Vec<MarkupLine> = Vec::new();
    let mut current: MarkupLine = Vec::new();
    let mut used = 0;

    for segment in line {
        for word in segment.text.split_inclusive(' ') {
            let visible = word.trim_end_matches(' ');
            let visible_width = UnicodeWidthStr::width(visible);

            if used > 0 && used + visible_width > width {
                wrapped.push(std::mem::take(&mut current));
                used = 0;
            }

            let word = if used == 0 { word.trim_start_matches(' ') } else { word };
            if word.is_empty() {
                continue;
            }

            if UnicodeWidthStr::width(word.trim_end_matches(' ')) > width {
                for piece in split_to_width(word, width) {
                    if used > 0 {
                        wrapped.push(std::mem::take(&mut current));
                    }
                    used = UnicodeWidthStr::width(piece.as_str());
                    push_segment(&mut current, &piece, segment.style);
                }
                continue;
            }

            used += UnicodeWidthStr::width(word);
            push_segment(&mut current, word, segment.style);
        }
    }

    if !current.is_empty() || wrapped.is_empty() {
        wrapped.push(current);
    }
    wrapped
}

fn split_to_width(word: &str, width: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut used = 0;
    for c in word.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            used = 0;
        }
        piece.push(c);
        used += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

fn push_segment(line: &mut MarkupLine, text: &str, style: SegmentStyle) {
    match line.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => line.push(Segment {
            text: text.to_string(),
            style,
        }),
    }
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let needle = format!("{}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(tag[start..start + len].to_string())
}

fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::format;
    use crate::models::Source;

    fn texts(lines: &[MarkupLine]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.iter().map(|s| s.text.as_str()).collect())
            .collect()
    }

    fn plain_text(markup: &str) -> String {
        texts(&parse(markup)).join("\n")
    }

    #[test]
    fn test_bold_and_italic_runs() {
        let lines = parse("a <strong>b</strong> <em>c</em>");
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert_eq!(line[0].text, "a ");
        assert!(line[1].style.bold);
        assert_eq!(line[1].text, "b");
        assert!(line[3].style.italic);
    }

    #[test]
    fn test_nested_styles() {
        let lines = parse(&format("**a*b*c**", &[]));
        let b = lines[0].iter().find(|s| s.text == "b").unwrap();
        assert!(b.style.bold && b.style.italic);
    }

    #[test]
    fn test_breaks_and_blank_lines() {
        assert_eq!(texts(&parse("a<br><br>b")), vec!["a", "", "b"]);
    }

    #[test]
    fn test_sources_become_bullets() {
        let markup = format("ok", &[Source::new("Doc & Notes", "https://e.x")]);
        assert_eq!(
            texts(&parse(&markup)),
            vec!["ok", "", "Sources:", "• Doc & Notes (https://e.x)"]
        );
    }

    #[test]
    fn test_link_styles() {
        let markup = format("ok", &[Source::new("Doc", "https://e.x")]);
        let lines = parse(&markup);
        let item = lines.last().unwrap();
        assert!(item.iter().any(|s| s.text == "Doc" && s.style.link));
        assert!(item.iter().any(|s| s.style.dim));
    }

    #[test]
    fn test_entities_unescaped() {
        assert_eq!(plain_text("&lt;b&gt; &amp;lt;"), "<b> &lt;");
    }

    #[test]
    fn test_unknown_tag_is_text() {
        assert_eq!(plain_text("1 <x> 2"), "1 <x> 2");
        assert_eq!(plain_text("a < b"), "a < b");
    }

    #[test]
    fn test_empty_markup_gives_one_line() {
        assert_eq!(parse("").len(), 1);
    }

    #[test]
    fn test_wrap_keeps_styles() {
        let line = parse("one <strong>two three</strong> four").remove(0);
        let wrapped = wrap_line(&line, 9);
        assert_eq!(texts(&wrapped), vec!["one two ", "three ", "four"]);
        assert!(wrapped[1][0].style.bold);
        assert!(!wrapped[2][0].style.bold);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let line = parse("abcdefghij").remove(0);
        assert_eq!(texts(&wrap_line(&line, 4)), vec!["abcd", "efgh", "ij"]);
    }
}
