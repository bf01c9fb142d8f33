use std::convert::Infallible;

use crate::key::Key;
use crate::navigation::{ListNavigator, Movement};
use crate::style::{Line, Span};
use crate::theme::Theme;

use super::{Context, KeyOutcome, RenderContext, Variant};

pub(crate) const DEFAULT_LIMIT: usize = 5;
const NAVIGATION_HINT: &str = "Use arrow keys to navigate, Enter to select";

#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption<T> {
    pub value: T,
    pub label: String,
    pub hint: Option<String>,
    pub disabled: bool,
}

impl<T> SelectOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            hint: None,
            disabled: false,
        }
    }

    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Drops disabled options; they are neither shown nor navigable.
pub(crate) fn enabled<T>(options: Vec<SelectOption<T>>) -> Vec<SelectOption<T>> {
    options.into_iter().filter(|o| !o.disabled).collect()
}

/// One option row: `marker label (hint)`, inverted when highlighted.
pub(crate) fn option_line<T>(
    option: &SelectOption<T>,
    marker: &str,
    highlighted: bool,
    focused: bool,
    theme: &Theme,
) -> Line {
    let colors = &theme.colors;
    let mut label = Span::plain(format!("{marker} {}", option.label));
    if highlighted && focused {
        label = label.fg(&colors.text.inverted).bg(&colors.primary);
    } else {
        label = label.fg(&colors.text.primary);
    }

    let mut line = Line::from(label);
    if let Some(hint) = &option.hint {
        line.push(Span::colored(format!(" ({hint})"), &colors.text.secondary));
    }
    line
}

/// Picks one value from a list.
#[derive(Debug, Clone)]
pub struct Select<T> {
    options: Vec<SelectOption<T>>,
    navigator: ListNavigator,
}

impl<T: Clone + Send + 'static> Select<T> {
    pub fn new(options: Vec<SelectOption<T>>) -> Self {
        let options = enabled(options);
        let navigator = ListNavigator::new(options.len(), DEFAULT_LIMIT);
        Self { options, navigator }
    }

    /// Page size.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        let index = self.navigator.index().unwrap_or(0);
        self.navigator = ListNavigator::new(self.options.len(), limit);
        self.navigator.select(index);
        self
    }

    /// Highlights the first enabled option holding `value`.
    #[must_use]
    pub fn initial_value(mut self, value: &T) -> Self
    where
        T: PartialEq,
    {
        let index = self
            .options
            .iter()
            .position(|o| &o.value == value)
            .unwrap_or(0);
        self.navigator.select(index);
        self
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<&SelectOption<T>> {
        self.navigator.index().and_then(|i| self.options.get(i))
    }

    #[must_use]
    pub fn navigator(&self) -> &ListNavigator {
        &self.navigator
    }
}

impl<T: Clone + Send + 'static> Variant for Select<T> {
    type Value = T;
    type Message = Infallible;

    fn handle_key(&mut self, key: &Key, _ctx: &mut Context<Self::Message>) -> KeyOutcome {
        match Movement::from_key(key.code) {
            // The highlighted option is the value.
            Some(movement) if self.navigator.apply(movement) => KeyOutcome::Changed,
            _ => KeyOutcome::Ignored,
        }
    }

    fn value(&self) -> Option<T> {
        self.highlighted().map(|o| o.value.clone())
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line> {
        let theme = ctx.theme;
        let highlighted = self.navigator.index();

        let mut lines: Vec<Line> = self
            .navigator
            .visible_range()
            .map(|i| {
                let is_highlighted = Some(i) == highlighted;
                let marker = if is_highlighted {
                    theme.symbols.pointer.as_str()
                } else {
                    " "
                };
                option_line(&self.options[i], marker, is_highlighted, ctx.focused, theme)
            })
            .collect();

        if self.navigator.has_overflow() {
            lines.push(Line::from(Span::colored(
                NAVIGATION_HINT,
                &theme.colors.text.secondary,
            )));
        }

        lines
    }
}
