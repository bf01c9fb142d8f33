//! Styled text lines: the only output the core produces.

use std::fmt::{Display, Formatter};

use crate::theme::{ColorDefinition, TextStyle};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Span {
    pub text: String,
    pub foreground: Option<ColorDefinition>,
    pub background: Option<ColorDefinition>,
    pub style: TextStyle,
    pub inverse: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn colored(text: impl Into<String>, color: &ColorDefinition) -> Self {
        Self::plain(text).fg(color)
    }

    #[must_use]
    pub fn fg(mut self, color: &ColorDefinition) -> Self {
        self.foreground = Some(color.clone());
        self
    }

    #[must_use]
    pub fn bg(mut self, color: &ColorDefinition) -> Self {
        self.background = Some(color.clone());
        self
    }

    #[must_use]
    pub fn styled(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn bold(mut self) -> Self {
        self.style.bold = true;
        self
    }

    #[must_use]
    pub fn dim(mut self) -> Self {
        self.style.dim = true;
        self
    }

    #[must_use]
    pub fn inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub spans: Vec<Span>,
}

impl Line {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::plain(text)],
        }
    }

    #[must_use]
    pub fn span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }

    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    pub fn extend(&mut self, other: Line) {
        self.spans.extend(other.spans);
    }

    /// The text of the line without any styling.
    #[must_use]
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }
}

impl From<Span> for Line {
    fn from(span: Span) -> Self {
        Self { spans: vec![span] }
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.plain())
    }
}

/// Joins the plain text of `lines` with newlines.
pub fn plain_text(lines: &[Line]) -> String {
    lines
        .iter()
        .map(Line::plain)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_and_width() {
        let line = Line::new()
            .span(Span::plain("❯ "))
            .span(Span::plain("alpha").bold());
        assert_eq!(line.plain(), "❯ alpha");
        assert_eq!(line.width(), 7);
        assert!(line.spans[1].style.bold);
    }

    #[test]
    fn test_plain_text_joins_lines() {
        let lines = vec![Line::raw("a"), Line::raw("b")];
        assert_eq!(plain_text(&lines), "a\nb");
    }
}
