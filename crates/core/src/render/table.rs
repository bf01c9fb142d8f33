//! Bordered grid of text cells.
//!
//! The table is `min(max_width, 80)` cells wide. Column `i` gets an inner
//! width of `max(1 + 2·padding, floor(weight_i · width) − 2)`; weights
//! default to an even split. Cell text that does not fit is cut short and
//! ends in `...`.

use log::warn;

use crate::style::{Line, Span};
use crate::theme::{Theme, ThemeOverride};

pub const TERMINAL_WIDTH: usize = 80;

const HORIZONTAL: &str = "─";
const VERTICAL: &str = "│";

#[derive(Clone, Copy)]
enum Rule {
    Top,
    Middle,
    Bottom,
}

impl Rule {
    fn corners(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Rule::Top => ("┌", "┬", "┐"),
            Rule::Middle => ("├", "┼", "┤"),
            Rule::Bottom => ("└", "┴", "┘"),
        }
    }
}

/// Shortens `text` to at most `width` characters, ending in `...` when cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }
    let kept: String = text.chars().take(width - 3).collect();
    format!("{kept}...")
}

#[derive(Debug, Clone)]
pub struct Table {
    rows: Vec<Vec<String>>,
    header: bool,
    border: bool,
    padding: usize,
    padding_y: usize,
    weights: Option<Vec<f64>>,
    max_width: Option<usize>,
    theme: Theme,
}

impl Table {
    pub fn new<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
            header: true,
            border: true,
            padding: 1,
            padding_y: 0,
            weights: None,
            max_width: None,
            theme: Theme::default(),
        }
    }

    /// Whether the first row is a header.
    #[must_use]
    pub fn header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    #[must_use]
    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    /// Horizontal cell padding.
    #[must_use]
    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Blank lines above and below each row's text.
    #[must_use]
    pub fn padding_y(mut self, padding: usize) -> Self {
        self.padding_y = padding;
        self
    }

    /// Column widths as fractions of the table width.
    #[must_use]
    pub fn column_weights(mut self, weights: Vec<f64>) -> Self {
        self.weights = Some(weights);
        self
    }

    #[must_use]
    pub fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
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

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn table_width(&self) -> usize {
        self.max_width
            .map_or(TERMINAL_WIDTH, |max| max.min(TERMINAL_WIDTH))
    }

    fn weights(&self) -> Vec<f64> {
        let columns = self.column_count();
        match &self.weights {
            Some(weights) if weights.len() == columns => weights.clone(),
            Some(weights) => {
                warn!(
                    "{} column weights given for {columns} columns; splitting evenly",
                    weights.len()
                );
                vec![1.0 / columns as f64; columns]
            }
            None => vec![1.0 / columns as f64; columns],
        }
    }

    /// Inner width of each column, padding included.
    #[must_use]
    pub fn column_widths(&self) -> Vec<usize> {
        let width = self.table_width() as f64;
        let minimum = 1 + 2 * self.padding;
        self.weights()
            .into_iter()
            .map(|weight| {
                let share = (weight.max(0.0) * width).floor() as usize;
                share.saturating_sub(2).max(minimum)
            })
            .collect()
    }

    fn rule(&self, rule: Rule, widths: &[usize]) -> Line {
        let (left, cross, right) = rule.corners();
        let inner = widths
            .iter()
            .map(|w| HORIZONTAL.repeat(*w))
            .collect::<Vec<_>>()
            .join(cross);
        Line::from(Span::colored(
            format!("{left}{inner}{right}"),
            &self.theme.colors.border.default,
        ))
    }

    fn row(&self, cells: &[&str], widths: &[usize], is_header: bool) -> Line {
        let colors = &self.theme.colors;
        let pad = " ".repeat(self.padding);
        let separator = || Span::colored(VERTICAL, &colors.border.default);

        let mut line = Line::new();
        if self.border {
            line.push(separator());
        }
        for (i, width) in widths.iter().enumerate() {
            let content_width = width - 2 * self.padding;
            let text = truncate(cells.get(i).copied().unwrap_or(""), content_width);
            let fill = " ".repeat(content_width - text.chars().count());

            let mut span = Span::plain(format!("{pad}{text}{fill}{pad}"));
            if is_header {
                span = span.fg(&colors.primary).bold();
            }
            line.push(span);
            if self.border {
                line.push(separator());
            }
        }
        line
    }

    fn push_row(&self, lines: &mut Vec<Line>, cells: &[String], widths: &[usize], is_header: bool) {
        let blank = vec![""; widths.len()];
        for _ in 0..self.padding_y {
            lines.push(self.row(&blank, widths, false));
        }
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        lines.push(self.row(&cells, widths, is_header));
        for _ in 0..self.padding_y {
            lines.push(self.row(&blank, widths, false));
        }
    }

    pub fn render(&self) -> Vec<Line> {
        let Some((first, rest)) = self.rows.split_first() else {
            return Vec::new();
        };

        let widths = self.column_widths();
        let mut lines = Vec::new();

        if self.border {
            lines.push(self.rule(Rule::Top, &widths));
        }
        if self.header {
            self.push_row(&mut lines, first, &widths, true);
            if self.border {
                lines.push(self.rule(Rule::Middle, &widths));
            }
        } else {
            self.push_row(&mut lines, first, &widths, false);
        }
        for row in rest {
            self.push_row(&mut lines, row, &widths, false);
        }
        if self.border {
            lines.push(self.rule(Rule::Bottom, &widths));
        }

        lines
    }
}
