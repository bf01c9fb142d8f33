use std::convert::Infallible;

use crate::key::{Key, KeyCode};
use crate::style::{Line, Span};

use super::{Context, KeyOutcome, RenderContext, Variant};

/// A single-line text field with a movable cursor.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    chars: Vec<char>,
    cursor: usize,
    placeholder: String,
    mask: Option<String>,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `value` entered and the cursor at its end.
    #[must_use]
    pub fn initial(mut self, value: &str) -> Self {
        self.chars = value.chars().collect();
        self.cursor = self.chars.len();
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Displays every character as `mask`.
    #[must_use]
    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.mask = Some(mask.into());
        self
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub(crate) fn edit(&mut self, key: &Key) -> KeyOutcome {
        let len = self.chars.len();
        match key.code {
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                self.chars.remove(self.cursor);
                KeyOutcome::Changed
            }
            KeyCode::Delete if self.cursor < len => {
                self.chars.remove(self.cursor);
                KeyOutcome::Changed
            }
            KeyCode::Left if self.cursor > 0 => {
                self.cursor -= 1;
                KeyOutcome::Handled
            }
            KeyCode::Right if self.cursor < len => {
                self.cursor += 1;
                KeyOutcome::Handled
            }
            KeyCode::Home if self.cursor > 0 => {
                self.cursor = 0;
                KeyOutcome::Handled
            }
            KeyCode::End if self.cursor < len => {
                self.cursor = len;
                KeyOutcome::Handled
            }
            _ => match key.printable() {
                Some(c) => {
                    self.chars.insert(self.cursor, c);
                    self.cursor += 1;
                    KeyOutcome::Changed
                }
                None => KeyOutcome::Ignored,
            },
        }
    }

    fn displayed(&self) -> Vec<String> {
        match &self.mask {
            Some(mask) => vec![mask.clone(); self.chars.len()],
            None => self.chars.iter().map(char::to_string).collect(),
        }
    }

    pub(crate) fn render_field(&self, ctx: &RenderContext<'_>) -> Line {
        let colors = &ctx.theme.colors;
        let shown = self.displayed();
        let mut line = Line::new();

        if !ctx.focused {
            if shown.is_empty() {
                line.push(Span::colored(self.placeholder.clone(), &colors.muted));
            } else {
                line.push(Span::colored(shown.concat(), &colors.text.primary));
            }
            return line;
        }

        let before = shown[..self.cursor].concat();
        let under = shown.get(self.cursor).cloned().unwrap_or_else(|| " ".to_string());
        let after = shown
            .get(self.cursor + 1..)
            .map(|rest| rest.concat())
            .unwrap_or_default();

        if !before.is_empty() {
            line.push(Span::colored(before, &colors.text.primary));
        }
        line.push(Span::colored(under, &colors.text.primary).inverse(true));
        if !after.is_empty() {
            line.push(Span::colored(after, &colors.text.primary));
        }
        if shown.is_empty() && !self.placeholder.is_empty() {
            line.push(Span::colored(self.placeholder.clone(), &colors.muted));
        }

        line
    }
}

impl Variant for TextInput {
    type Value = String;
    type Message = Infallible;

    fn handle_key(&mut self, key: &Key, _ctx: &mut Context<Self::Message>) -> KeyOutcome {
        self.edit(key)
    }

    fn value(&self) -> Option<String> {
        Some(self.text())
    }

    fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line> {
        vec![self.render_field(ctx)]
    }
}
