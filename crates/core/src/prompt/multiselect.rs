use std::convert::Infallible;

use indexmap::IndexSet;
use itertools::Itertools;

use crate::key::{Key, KeyCode};
use crate::navigation::{ListNavigator, Movement};
use crate::style::{Line, Span};

use super::select::{enabled, option_line, SelectOption, DEFAULT_LIMIT};
use super::{Context, KeyOutcome, RenderContext, Variant};

const TOGGLE_HINT: &str = "Space/←/→ to toggle, Enter to submit, Esc to cancel";
const REQUIRED_MESSAGE: &str = "At least one option must be selected";

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

/// Picks any number of values from a list.
///
/// The submitted values are in the order they were selected. Selecting past
/// `max_selected` is a no-op.
#[derive(Debug, Clone)]
pub struct MultiSelect<T> {
    options: Vec<SelectOption<T>>,
    navigator: ListNavigator,
    selected: IndexSet<usize>,
    min_selected: Option<usize>,
    max_selected: Option<usize>,
}

impl<T: Clone + PartialEq + Send + 'static> MultiSelect<T> {
    pub fn new(options: Vec<SelectOption<T>>) -> Self {
        let options = enabled(options);
        let navigator = ListNavigator::new(options.len(), DEFAULT_LIMIT);
        Self {
            options,
            navigator,
            selected: IndexSet::new(),
            min_selected: None,
            max_selected: None,
        }
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.navigator = ListNavigator::new(self.options.len(), limit);
        self
    }

    /// Pre-selects the options holding any of `values`.
    #[must_use]
    pub fn selected(mut self, values: &[T]) -> Self {
        for value in values {
            if let Some(index) = self.options.iter().position(|o| &o.value == value) {
                self.selected.insert(index);
            }
        }
        self
    }

    #[must_use]
    pub fn min_selected(mut self, min: usize) -> Self {
        self.min_selected = Some(min);
        self
    }

    #[must_use]
    pub fn max_selected(mut self, max: usize) -> Self {
        self.max_selected = Some(max);
        self
    }

    #[must_use]
    pub fn selected_values(&self) -> Vec<T> {
        self.selected
            .iter()
            .map(|&i| self.options[i].value.clone())
            .collect()
    }

    fn toggle_highlighted(&mut self) -> KeyOutcome {
        let Some(index) = self.navigator.index() else {
            return KeyOutcome::Ignored;
        };

        if self.selected.shift_remove(&index) {
            return KeyOutcome::Changed;
        }
        if self
            .max_selected
            .is_some_and(|max| self.selected.len() >= max)
        {
            return KeyOutcome::Ignored;
        }
        self.selected.insert(index);
        KeyOutcome::Changed
    }

    fn bounds_error(&self) -> Option<String> {
        let count = self.selected.len();
        if let Some(min) = self.min_selected.filter(|&min| count < min) {
            return Some(format!("Select at least {min} option{}", plural(min)));
        }
        if let Some(max) = self.max_selected.filter(|&max| count > max) {
            return Some(format!("Select at most {max} option{}", plural(max)));
        }
        None
    }

    /// The message shown under the list while editing.
    fn live_error(&self, required: bool) -> Option<String> {
        if required && self.selected.is_empty() {
            return Some(REQUIRED_MESSAGE.to_string());
        }
        self.bounds_error()
    }
}

impl<T: Clone + PartialEq + Send + 'static> Variant for MultiSelect<T> {
    type Value = Vec<T>;
    type Message = Infallible;

    fn handle_key(&mut self, key: &Key, _ctx: &mut Context<Self::Message>) -> KeyOutcome {
        match key.code {
            KeyCode::Space | KeyCode::Left | KeyCode::Right => self.toggle_highlighted(),
            code => match Movement::from_key(code) {
                Some(movement) if self.navigator.apply(movement) => KeyOutcome::Handled,
                _ => KeyOutcome::Ignored,
            },
        }
    }

    fn value(&self) -> Option<Vec<T>> {
        Some(self.selected_values())
    }

    fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    fn required_message(&self) -> String {
        REQUIRED_MESSAGE.to_string()
    }

    fn check(&self) -> Result<(), String> {
        self.bounds_error().map_or(Ok(()), Err)
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line> {
        let theme = ctx.theme;
        let colors = &theme.colors;
        let highlighted = self.navigator.index();

        let mut lines: Vec<Line> = self
            .navigator
            .visible_range()
            .map(|i| {
                let marker = if self.selected.contains(&i) {
                    theme.symbols.checked.as_str()
                } else {
                    theme.symbols.unchecked.as_str()
                };
                option_line(
                    &self.options[i],
                    marker,
                    Some(i) == highlighted,
                    ctx.focused,
                    theme,
                )
            })
            .collect();

        let mut hint = String::new();
        if self.navigator.has_overflow() {
            hint.push_str("↑/↓ to navigate, ");
        }
        hint.push_str(TOGGLE_HINT);
        let mut footer = Line::from(Span::colored(hint, &colors.text.secondary));
        if let Some(error) = self.live_error(ctx.required) {
            footer.push(Span::colored(format!(" ({error})"), &colors.error));
        }
        lines.push(footer);

        if !self.selected.is_empty() {
            let labels = self
                .selected
                .iter()
                .map(|&i| self.options[i].label.as_str())
                .join(", ");
            lines.push(Line::raw(format!("Selected: {labels}")));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::test_support::{enter, press};
    use crate::prompt::{Prompt, Step};
    use crate::style::plain_text;

    fn colors() -> Vec<SelectOption<&'static str>> {
        ["red", "green", "blue", "black"]
            .into_iter()
            .map(|c| SelectOption::new(c, c.to_uppercase()))
            .collect()
    }

    #[test]
    fn test_values_in_selection_order() {
        let mut prompt = Prompt::new("Colours", MultiSelect::new(colors()));
        press(&mut prompt, KeyCode::Down);
        press(&mut prompt, KeyCode::Down);
        press(&mut prompt, KeyCode::Space);
        press(&mut prompt, KeyCode::Home);
        press(&mut prompt, KeyCode::Right);
        assert_eq!(enter(&mut prompt), Step::Submitted(vec!["blue", "red"]));
    }

    #[test]
    fn test_max_selected_rejects_additions() {
        let mut prompt = Prompt::new("Colours", MultiSelect::new(colors()).max_selected(1));
        press(&mut prompt, KeyCode::Space);
        press(&mut prompt, KeyCode::Down);
        assert_eq!(press(&mut prompt, KeyCode::Space), Step::Pending);
        assert_eq!(prompt.variant().selected_values(), vec!["red"]);

        // Deselecting still works at the bound.
        press(&mut prompt, KeyCode::Up);
        press(&mut prompt, KeyCode::Space);
        assert!(prompt.variant().selected_values().is_empty());
    }

    #[test]
    fn test_min_selected_rejects_submit() {
        let mut prompt = Prompt::new("Colours", MultiSelect::new(colors()).min_selected(2));
        press(&mut prompt, KeyCode::Space);
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("Select at least 2 options"));

        press(&mut prompt, KeyCode::Down);
        press(&mut prompt, KeyCode::Space);
        assert_eq!(enter(&mut prompt), Step::Submitted(vec!["red", "green"]));
    }

    #[test]
    fn test_required_message() {
        let mut prompt = Prompt::new("Colours", MultiSelect::new(colors())).required(true);
        assert!(plain_text(&prompt.render()).contains("(At least one option must be selected)"));
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_preselected_over_max_is_reported() {
        let select = MultiSelect::new(colors())
            .selected(&["red", "blue"])
            .max_selected(1);
        let mut prompt = Prompt::new("Colours", select);
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("Select at most 1 option"));
    }

    #[test]
    fn test_render_markers_and_selected_line() {
        let mut prompt = Prompt::new("Colours", MultiSelect::new(colors()).limit(3));
        press(&mut prompt, KeyCode::Down);
        press(&mut prompt, KeyCode::Space);
        let text = plain_text(&prompt.render());
        assert!(text.contains("◯ RED"));
        assert!(text.contains("◉ GREEN"));
        assert!(text.contains("↑/↓ to navigate, Space/←/→ to toggle"));
        assert!(text.contains("│ Selected: GREEN"));
    }
}
