use std::collections::HashMap;

use leon::Template;

use crate::error::Result;
use crate::style::{Line, Span};
use crate::theme::{Theme, ThemeOverride};

pub const DEFAULT_WIDTH: usize = 50;

/// Stands in for the bar while a layout template is rendered, so the bar
/// can be spliced back in with its colours.
const BAR_MARKER: char = '\u{0}';

/// A horizontal bar showing a percentage.
#[derive(Debug, Clone)]
pub struct ProgressBar {
    percent: f64,
    width: usize,
    filled: String,
    empty: String,
    show_percentage: bool,
    show_value: bool,
    total: u64,
    value: Option<u64>,
    prefix: String,
    suffix: String,
    template: Option<String>,
    theme: Theme,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self {
            percent: 0.0,
            width: DEFAULT_WIDTH,
            filled: "█".to_string(),
            empty: " ".to_string(),
            show_percentage: true,
            show_value: false,
            total: 100,
            value: None,
            prefix: String::new(),
            suffix: String::new(),
            template: None,
            theme: Theme::default(),
        }
    }
}

impl ProgressBar {
    #[must_use]
    pub fn new(percent: f64) -> Self {
        Self {
            percent,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn characters(mut self, filled: impl Into<String>, empty: impl Into<String>) -> Self {
        self.filled = filled.into();
        self.empty = empty.into();
        self
    }

    #[must_use]
    pub fn show_percentage(mut self, show: bool) -> Self {
        self.show_percentage = show;
        self
    }

    #[must_use]
    pub fn show_value(mut self, show: bool) -> Self {
        self.show_value = show;
        self
    }

    #[must_use]
    pub fn total(mut self, total: u64) -> Self {
        self.total = total;
        self
    }

    #[must_use]
    pub fn value(mut self, value: u64) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Lays the bar out with a template instead of the default layout.
    /// Known keys: `prefix`, `bar`, `percent`, `value`, `total`, `suffix`.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn theme_override(mut self, overrides: &ThemeOverride) -> Self {
        self.theme = self.theme.merged(overrides);
        self
    }

    pub fn set_percent(&mut self, percent: f64) {
        self.percent = percent;
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Number of filled cells: `width × clamp(percent, 0, 100) / 100`,
    /// rounded.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        let ratio = self.percent.clamp(0.0, 100.0) / 100.0;
        // The product is within [0, width], so the cast cannot truncate.
        ((ratio * self.width as f64).round() as usize).min(self.width)
    }

    /// The value shown with `show_value`, derived from the percentage when
    /// not set explicitly.
    #[must_use]
    pub fn current_value(&self) -> u64 {
        self.value
            .unwrap_or_else(|| (self.percent / 100.0 * self.total as f64).round().max(0.0) as u64)
    }

    fn bar_spans(&self) -> [Span; 2] {
        let filled = self.filled_count();
        let colors = &self.theme.colors;
        [
            Span::colored(self.filled.repeat(filled), &colors.success),
            Span::colored(self.empty.repeat(self.width - filled), &colors.muted),
        ]
    }

    pub fn render(&self) -> Result<Line> {
        match &self.template {
            Some(template) => self.render_template(template),
            None => Ok(self.render_default()),
        }
    }

    pub(crate) fn render_default(&self) -> Line {
        let mut line = Line::new();
        if !self.prefix.is_empty() {
            line.push(Span::plain(format!("{} ", self.prefix)));
        }
        for span in self.bar_spans() {
            line.push(span);
        }
        if self.show_percentage {
            line.push(Span::plain(format!(" {}%", self.percent.round())));
        }
        if self.show_value {
            line.push(Span::plain(format!(
                " {}/{}",
                self.current_value(),
                self.total
            )));
        }
        if !self.suffix.is_empty() {
            line.push(Span::plain(format!(" {}", self.suffix)));
        }
        line
    }

    fn render_template(&self, source: &str) -> Result<Line> {
        let template = Template::parse(source)?;

        let mut values: HashMap<String, String> = HashMap::new();
        values.insert("prefix".to_string(), self.prefix.clone());
        values.insert("bar".to_string(), BAR_MARKER.to_string());
        values.insert("percent".to_string(), self.percent.round().to_string());
        values.insert("value".to_string(), self.current_value().to_string());
        values.insert("total".to_string(), self.total.to_string());
        values.insert("suffix".to_string(), self.suffix.clone());

        let rendered = template.render(&values)?;

        let mut line = Line::new();
        for (i, part) in rendered.split(BAR_MARKER).enumerate() {
            if i > 0 {
                for span in self.bar_spans() {
                    line.push(span);
                }
            }
            if !part.is_empty() {
                line.push(Span::plain(part));
            }
        }
        Ok(line)
    }
}
