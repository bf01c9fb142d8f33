use std::convert::Infallible;

use crate::key::{Key, KeyCode};
use crate::style::{Line, Span};

use super::{Context, KeyOutcome, RenderContext, Variant};

/// A yes/no question.
#[derive(Debug, Clone, Default)]
pub struct Confirm {
    value: bool,
}

impl Confirm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial(mut self, value: bool) -> Self {
        self.value = value;
        self
    }

    fn set(&mut self, value: bool) -> KeyOutcome {
        if self.value == value {
            return KeyOutcome::Ignored;
        }
        self.value = value;
        KeyOutcome::Changed
    }
}

impl Variant for Confirm {
    type Value = bool;
    type Message = Infallible;

    fn handle_key(&mut self, key: &Key, _ctx: &mut Context<Self::Message>) -> KeyOutcome {
        match key.code {
            KeyCode::Char('y' | 'Y') => self.set(true),
            KeyCode::Char('n' | 'N') => self.set(false),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Space => self.set(!self.value),
            _ => KeyOutcome::Ignored,
        }
    }

    fn value(&self) -> Option<bool> {
        Some(self.value)
    }

    fn message(&self, message: &str) -> String {
        let suffix = if self.value { "(Y/n)" } else { "(y/N)" };
        format!("{message} {suffix}")
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line> {
        let colors = &ctx.theme.colors;
        let yes = if self.value { &colors.success } else { &colors.muted };
        let no = if self.value { &colors.muted } else { &colors.error };

        vec![Line::new()
            .span(Span::colored("Yes", yes).inverse(ctx.focused && self.value))
            .span(Span::plain(" / "))
            .span(Span::colored("No", no).inverse(ctx.focused && !self.value))]
    }
}
