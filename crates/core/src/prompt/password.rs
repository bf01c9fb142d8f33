use std::convert::Infallible;

use log::debug;

use crate::key::Key;
use crate::style::Line;

use super::text::TextInput;
use super::{Context, KeyOutcome, RenderContext, Variant};

const DEFAULT_MASK: &str = "•";
const CONFIRM_MESSAGE: &str = "Confirm password";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Entry,
    Confirmation,
}

/// A masked text field, optionally asking for the value twice.
///
/// With confirmation enabled, a valid first entry switches the prompt to a
/// second field. The submitted value is the first entry once both match.
/// The custom validator only applies to the first entry.
#[derive(Debug, Clone)]
pub struct Password {
    input: TextInput,
    confirm: bool,
    stage: Stage,
    first: String,
}

impl Default for Password {
    fn default() -> Self {
        Self {
            input: TextInput::new().mask(DEFAULT_MASK),
            confirm: false,
            stage: Stage::Entry,
            first: String::new(),
        }
    }
}

impl Password {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mask(mut self, mask: impl Into<String>) -> Self {
        self.input = self.input.mask(mask);
        self
    }

    #[must_use]
    pub fn confirm(mut self, confirm: bool) -> Self {
        self.confirm = confirm;
        self
    }

    #[must_use]
    pub fn is_confirming(&self) -> bool {
        self.stage == Stage::Confirmation
    }
}

impl Variant for Password {
    type Value = String;
    type Message = Infallible;

    fn handle_key(&mut self, key: &Key, _ctx: &mut Context<Self::Message>) -> KeyOutcome {
        self.input.edit(key)
    }

    fn value(&self) -> Option<String> {
        match self.stage {
            Stage::Entry => Some(self.input.text()),
            Stage::Confirmation => Some(self.first.clone()),
        }
    }

    fn is_empty(&self) -> bool {
        // An empty confirmation is reported as a mismatch instead.
        self.stage == Stage::Entry && self.input.is_empty()
    }

    fn check(&self) -> Result<(), String> {
        if self.stage == Stage::Confirmation && self.input.text() != self.first {
            return Err("Passwords do not match".to_string());
        }
        Ok(())
    }

    fn required_message(&self) -> String {
        "Password is required".to_string()
    }

    fn required_by_default(&self) -> bool {
        true
    }

    fn uses_validator(&self) -> bool {
        self.stage == Stage::Entry
    }

    fn advance(&mut self, value: &String) -> bool {
        if !self.confirm || self.stage == Stage::Confirmation {
            return false;
        }

        debug!("password accepted; asking for confirmation");
        self.first = value.clone();
        self.stage = Stage::Confirmation;
        self.input.clear();
        true
    }

    fn message(&self, message: &str) -> String {
        match self.stage {
            Stage::Entry => message.to_string(),
            Stage::Confirmation => CONFIRM_MESSAGE.to_string(),
        }
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line> {
        vec![self.input.render_field(ctx)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::test_support::{enter, press, type_text};
    use crate::prompt::{Prompt, PromptStatus, Step};
    use crate::key::KeyCode;

    #[test]
    fn test_required_by_default() {
        let mut prompt = Prompt::new("Password", Password::new());
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("Password is required"));
    }

    #[test]
    fn test_masked_rendering() {
        let mut prompt = Prompt::new("Password", Password::new());
        type_text(&mut prompt, "abc");
        prompt.set_focused(false);
        assert_eq!(prompt.render()[1].plain(), "│ •••");
    }

    #[test]
    fn test_confirmation_flow() {
        let mut prompt = Prompt::new("Password", Password::new().confirm(true))
            .validate(|v: &String| {
                if v.len() < 4 {
                    Err("too weak".to_string())
                } else {
                    Ok(())
                }
            });

        type_text(&mut prompt, "abc");
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("too weak"));

        type_text(&mut prompt, "d");
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert!(prompt.variant().is_confirming());
        assert_eq!(prompt.status(), PromptStatus::Editing);
        assert_eq!(prompt.render()[0].plain(), "Confirm password*");

        type_text(&mut prompt, "abce");
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("Passwords do not match"));

        press(&mut prompt, KeyCode::Backspace);
        type_text(&mut prompt, "d");
        assert_eq!(enter(&mut prompt), Step::Submitted("abcd".to_string()));
    }

    #[test]
    fn test_empty_confirmation_is_a_mismatch() {
        let mut prompt = Prompt::new("Password", Password::new().confirm(true));
        type_text(&mut prompt, "secret");
        enter(&mut prompt);
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("Passwords do not match"));
    }

    #[test]
    fn test_validator_skipped_on_confirmation() {
        let mut prompt = Prompt::new("Password", Password::new().confirm(true))
            .validate(|v: &String| if v == "x" { Ok(()) } else { Err("nope".into()) });
        type_text(&mut prompt, "x");
        enter(&mut prompt);
        type_text(&mut prompt, "x");
        // The submitted value is the first entry, so the validator would pass
        // either way; what matters is that no job is queued.
        assert_eq!(press(&mut prompt, KeyCode::Return), Step::Submitted("x".to_string()));
    }
}
