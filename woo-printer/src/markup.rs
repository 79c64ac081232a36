//! Receipt markup
//!
//! Receipts are rendered as vendor-neutral markup and encoded for a
//! printer vendor at print time:
//!
//! ```text
//! [C]<b><w>ORDER #1024</w></b>
//! [L]2x Dumplings                  $12.00
//! [R]<u>Total: $12.00</u>
//! ```
//!
//! Each line starts with an alignment prefix (`[L]`, `[C]`, `[R]`). Inline
//! tags `<b>` bold, `<u>` underline, `<w>` double width and `<h>` double
//! height apply until closed or until the end of the line.

use crate::layout;

/// Line alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    fn prefix(self) -> &'static str {
        match self {
            Align::Left => "[L]",
            Align::Center => "[C]",
            Align::Right => "[R]",
        }
    }
}

/// Inline text style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub underline: bool,
    pub double_width: bool,
    pub double_height: bool,
}

impl TextStyle {
    pub const BOLD: TextStyle = TextStyle {
        bold: true,
        underline: false,
        double_width: false,
        double_height: false,
    };

    /// Bold, double width and double height
    pub const BIG: TextStyle = TextStyle {
        bold: true,
        underline: false,
        double_width: true,
        double_height: true,
    };

    pub fn is_plain(&self) -> bool {
        *self == TextStyle::default()
    }

    /// Wrap `text` in the tags for this style
    pub fn wrap(&self, text: &str) -> String {
        let mut open = String::new();
        let mut close = String::new();
        for (on, tag) in [
            (self.bold, 'b'),
            (self.underline, 'u'),
            (self.double_width, 'w'),
            (self.double_height, 'h'),
        ] {
            if on {
                open.push_str(&format!("<{}>", tag));
                close.insert_str(0, &format!("</{}>", tag));
            }
        }
        format!("{}{}{}", open, text, close)
    }
}

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: TextStyle,
}

/// One parsed markup line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkupLine {
    pub align: Align,
    pub spans: Vec<Span>,
}

impl MarkupLine {
    /// Text without styling
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

const TAGS: [char; 4] = ['b', 'u', 'w', 'h'];

fn split_prefix(line: &str) -> (Option<Align>, &str) {
    let align = match line.get(..3) {
        Some(p) if p.eq_ignore_ascii_case("[L]") => Align::Left,
        Some(p) if p.eq_ignore_ascii_case("[C]") => Align::Center,
        Some(p) if p.eq_ignore_ascii_case("[R]") => Align::Right,
        _ => return (None, line),
    };
    (Some(align), &line[3..])
}

/// Recognize `<x>` / `</x>` at the start of `s`; returns (tag, closing, len)
fn match_tag(s: &str) -> Option<(char, bool, usize)> {
    let bytes = s.as_bytes();
    let (closing, start) = match bytes.get(1) {
        Some(b'/') => (true, 2),
        _ => (false, 1),
    };
    let tag = (*bytes.get(start)? as char).to_ascii_lowercase();
    if bytes.first() != Some(&b'<') || bytes.get(start + 1) != Some(&b'>') || !TAGS.contains(&tag) {
        return None;
    }
    Some((tag, closing, start + 2))
}

fn apply_tag(style: &mut TextStyle, tag: char, on: bool) {
    match tag {
        'b' => style.bold = on,
        'u' => style.underline = on,
        'w' => style.double_width = on,
        'h' => style.double_height = on,
        _ => {}
    }
}

/// Parse markup into lines. Lines without a prefix are left-aligned;
/// unknown tags are kept as literal text.
pub fn parse_markup(src: &str) -> Vec<MarkupLine> {
    src.lines().map(parse_line).collect()
}

fn parse_line(line: &str) -> MarkupLine {
    let (align, mut rest) = split_prefix(line.trim_end_matches('\r'));
    let mut spans: Vec<Span> = Vec::new();
    let mut style = TextStyle::default();
    let mut text = String::new();

    while !rest.is_empty() {
        if let Some((tag, closing, len)) = match_tag(rest) {
            if !text.is_empty() {
                spans.push(Span {
                    text: std::mem::take(&mut text),
                    style,
                });
            }
            apply_tag(&mut style, tag, !closing);
            rest = &rest[len..];
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            text.push(c);
        }
        rest = chars.as_str();
    }
    if !text.is_empty() {
        spans.push(Span { text, style });
    }

    MarkupLine {
        align: align.unwrap_or_default(),
        spans,
    }
}

/// Repair hand-written or template markup before printing:
///
/// - blank lines become `[L] ` so they still feed paper
/// - lines without an alignment prefix get `[L]`
/// - stray closing tags are dropped and unclosed tags are closed
pub fn sanitize_markup(src: &str) -> String {
    src.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.trim().is_empty() {
                return "[L] ".to_string();
            }
            let (align, body) = split_prefix(line);
            format!("{}{}", align.unwrap_or_default().prefix(), balance_tags(body))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn balance_tags(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut open: Vec<char> = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        if let Some((tag, closing, len)) = match_tag(rest) {
            let keep = if closing {
                match open.iter().rposition(|t| *t == tag) {
                    Some(pos) => {
                        open.remove(pos);
                        true
                    }
                    None => false,
                }
            } else {
                open.push(tag);
                true
            };
            if keep {
                out.push_str(&rest[..len]);
            }
            rest = &rest[len..];
            continue;
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    for tag in open.iter().rev() {
        out.push_str(&format!("</{}>", tag));
    }
    out
}

/// String builder for receipt markup
///
/// Knows the paper width in columns and lays out left/right pairs,
/// separators and wrapped text.
pub struct MarkupBuilder {
    buf: String,
    width: usize,
}

impl MarkupBuilder {
    pub fn new(width: usize) -> Self {
        Self {
            buf: String::new(),
            width,
        }
    }

    /// Line width in columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Write one line
    pub fn line(&mut self, align: Align, text: &str) -> &mut Self {
        self.buf.push_str(align.prefix());
        self.buf.push_str(text);
        self.buf.push('\n');
        self
    }

    /// Write one line in a style
    pub fn styled(&mut self, align: Align, style: TextStyle, text: &str) -> &mut Self {
        if text.is_empty() || style.is_plain() {
            return self.line(align, text);
        }
        self.line(align, &style.wrap(text))
    }

    pub fn left(&mut self, text: &str) -> &mut Self {
        self.line(Align::Left, text)
    }

    pub fn center(&mut self, text: &str) -> &mut Self {
        self.line(Align::Center, text)
    }

    /// Left-aligned text wrapped to the line width
    pub fn wrapped(&mut self, text: &str) -> &mut Self {
        for part in layout::wrap_columns(text, self.width) {
            self.left(&part);
        }
        self
    }

    /// `label ........ value`, falling back to two lines on overflow
    pub fn left_right(&mut self, left: &str, right: &str) -> &mut Self {
        self.left_right_styled(left, right, TextStyle::default())
    }

    /// Same as [`left_right`](Self::left_right) in a style. Double-width
    /// styles halve the available columns.
    pub fn left_right_styled(&mut self, left: &str, right: &str, style: TextStyle) -> &mut Self {
        let width = if style.double_width {
            self.width / 2
        } else {
            self.width
        };
        for part in layout::left_right(left, right, width) {
            self.styled(Align::Left, style, &part);
        }
        self
    }

    /// Empty line
    pub fn blank(&mut self) -> &mut Self {
        self.line(Align::Left, " ")
    }

    /// Line of `=`
    pub fn sep_double(&mut self) -> &mut Self {
        let sep = "=".repeat(self.width);
        self.left(&sep)
    }

    /// Line of `-`
    pub fn sep_single(&mut self) -> &mut Self {
        let sep = "-".repeat(self.width);
        self.left(&sep)
    }

    pub fn build(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix_and_tags() {
        let lines = parse_markup("[C]<b>Hello</b> world\nplain");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].align, Align::Center);
        assert_eq!(lines[0].spans.len(), 2);
        assert!(lines[0].spans[0].style.bold);
        assert_eq!(lines[0].spans[1].text, " world");
        assert!(!lines[0].spans[1].style.bold);
        assert_eq!(lines[1].align, Align::Left);
        assert_eq!(lines[1].plain_text(), "plain");
    }

    #[test]
    fn test_style_does_not_leak_across_lines() {
        let lines = parse_markup("[L]<b>open\n[L]next");
        assert!(lines[0].spans[0].style.bold);
        assert!(!lines[1].spans[0].style.bold);
    }

    #[test]
    fn test_unknown_tags_are_literal() {
        let lines = parse_markup("[L]a <i>b</i> <3");
        assert_eq!(lines[0].plain_text(), "a <i>b</i> <3");
    }

    #[test]
    fn test_nested_size_tags() {
        let lines = parse_markup("[R]<w><h>BIG</h></w>");
        let style = lines[0].spans[0].style;
        assert!(style.double_width && style.double_height);
        assert_eq!(lines[0].align, Align::Right);
    }

    #[test]
    fn test_sanitize_markup() {
        let fixed = sanitize_markup("Title\n\n[C]<b>Bold\n[R]stray</u> end");
        assert_eq!(fixed, "[L]Title\n[L] \n[C]<b>Bold</b>\n[R]stray end");
    }

    #[test]
    fn test_style_wrap() {
        assert_eq!(TextStyle::BIG.wrap("X"), "<b><w><h>X</h></w></b>");
        assert_eq!(TextStyle::default().wrap("X"), "X");
    }

    #[test]
    fn test_builder() {
        let mut b = MarkupBuilder::new(16);
        b.center("Shop")
            .left_right("Total", "$5.00")
            .styled(Align::Left, TextStyle::BOLD, "Note")
            .sep_single();
        let out = b.build();
        assert_eq!(
            out,
            "[C]Shop\n[L]Total      $5.00\n[L]<b>Note</b>\n[L]----------------\n"
        );
    }
}
