//! Display components.
//!
//! Each component is a pure function from props to [`Line`]s. Nothing here
//! touches the terminal; [`terminal`] turns lines into styled output.

pub mod badges;
pub mod diff;
pub mod event;
pub mod feed;
pub mod filters;
pub mod history;
pub mod palette;
pub mod stats;
pub mod terminal;

pub use palette::Tone;

/// A run of text with one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
    pub bold: bool,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self { text: text.into(), tone, bold: false }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// One output row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub indent: usize,
    pub spans: Vec<Span>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indented(indent: usize) -> Self {
        Self { indent, spans: Vec::new() }
    }

    pub fn text(text: impl Into<String>, tone: Tone) -> Self {
        Self::new().push(text, tone)
    }

    pub fn push(mut self, text: impl Into<String>, tone: Tone) -> Self {
        self.spans.push(Span::new(text, tone));
        self
    }

    pub fn span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn extend(mut self, spans: impl IntoIterator<Item = Span>) -> Self {
        self.spans.extend(spans);
        self
    }

    /// Bold every span.
    pub fn into_bold(mut self) -> Self {
        for span in &mut self.spans {
            span.bold = true;
        }
        self
    }

    /// Unstyled text, indent included.
    pub fn plain_text(&self) -> String {
        let mut out = " ".repeat(self.indent);
        for span in &self.spans {
            out.push_str(&span.text);
        }
        out
    }
}

/// All lines as unstyled text, newline-joined.
pub fn plain_text(lines: &[Line]) -> String {
    lines.iter().map(Line::plain_text).collect::<Vec<_>>().join("\n")
}

/// Shift every line right by `by` columns.
pub fn indent(lines: Vec<Line>, by: usize) -> Vec<Line> {
    lines
        .into_iter()
        .map(|mut line| {
            line.indent += by;
            line
        })
        .collect()
}

/// Cut `text` to `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}
