use std::convert::Infallible;

use crate::key::{Key, KeyCode};
use crate::style::{Line, Span};

use super::{Context, KeyOutcome, RenderContext, Variant};

const HINT: &str = "←/→ or Space to toggle, Enter to confirm";

/// An on/off switch with custom labels.
#[derive(Debug, Clone)]
pub struct Toggle {
    value: bool,
    active: String,
    inactive: String,
}

impl Default for Toggle {
    fn default() -> Self {
        Self {
            value: false,
            active: "Yes".to_string(),
            inactive: "No".to_string(),
        }
    }
}

impl Toggle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn initial(mut self, value: bool) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn labels(mut self, active: impl Into<String>, inactive: impl Into<String>) -> Self {
        self.active = active.into();
        self.inactive = inactive.into();
        self
    }

    #[must_use]
    pub fn label(&self) -> &str {
        if self.value {
            &self.active
        } else {
            &self.inactive
        }
    }
}

impl Variant for Toggle {
    type Value = bool;
    type Message = Infallible;

    fn handle_key(&mut self, key: &Key, _ctx: &mut Context<Self::Message>) -> KeyOutcome {
        match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Space => {
                self.value = !self.value;
                KeyOutcome::Changed
            }
            _ => KeyOutcome::Ignored,
        }
    }

    fn value(&self) -> Option<bool> {
        Some(self.value)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line> {
        let colors = &ctx.theme.colors;
        let color = if self.value {
            &colors.success
        } else {
            &colors.text.secondary
        };

        let mut label = Span::colored(format!("[ {} ]", self.label()), color);
        label.style.bold = ctx.focused;

        let mut line = Line::from(label);
        if ctx.focused {
            line.push(Span::colored(format!("  {HINT}"), &colors.text.secondary));
        }
        vec![line]
    }
}
