//! Free-text search over options produced by a [`Source`].
//!
//! Every edit of the query re-arms a debounce timer. When the debounced
//! query changes, a fetch job is queued; only the most recently *started*
//! fetch may update the option list, so a slow response for `"ab"` arriving
//! after the response for `"abc"` is dropped.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::{debug, warn};

use crate::cancel::CancellationToken;
use crate::debounce::Debouncer;
use crate::key::{Key, KeyCode};
use crate::navigation::{ListNavigator, Movement};
use crate::style::{Line, Span};

use super::text::TextInput;
use super::{panic_message, Context, Job, KeyOutcome, RenderContext, Variant};

const DEFAULT_LIMIT: usize = 10;
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
const DEFAULT_EMPTY_TEXT: &str = "No matches found";
const SEARCH_PLACEHOLDER: &str = "Type to search...";
const NAVIGATION_HINT: &str = "↑/↓ to navigate, Enter to select, Esc to cancel";

#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteOption<T> {
    pub value: T,
    pub label: String,
    pub hint: Option<String>,
}

impl<T> AutocompleteOption<T> {
    pub fn new(value: T, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            hint: None,
        }
    }

    #[must_use]
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// What an autocomplete prompt submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
    /// One of the offered options.
    Option(T),
    /// The typed query, when no option was available.
    FreeText(String),
}

/// Produces options for a query. Runs on whatever thread the driver picks,
/// and may block.
pub trait Source<T>: Send + Sync {
    fn search(
        &self,
        query: &str,
        token: &CancellationToken,
    ) -> Result<Vec<AutocompleteOption<T>>, String>;
}

impl<T, F> Source<T> for F
where
    F: Fn(&str) -> Result<Vec<AutocompleteOption<T>>, String> + Send + Sync,
{
    fn search(
        &self,
        query: &str,
        _token: &CancellationToken,
    ) -> Result<Vec<AutocompleteOption<T>>, String> {
        self(query)
    }
}

/// Ranks a fixed option list against the query by fuzzy label match. An
/// empty query returns every option in its original order.
#[derive(Debug, Clone)]
pub struct FuzzySource<T> {
    options: Vec<AutocompleteOption<T>>,
}

impl<T> FuzzySource<T> {
    pub fn new(options: Vec<AutocompleteOption<T>>) -> Self {
        Self { options }
    }
}

impl<T: Clone + Send + Sync> Source<T> for FuzzySource<T> {
    fn search(
        &self,
        query: &str,
        _token: &CancellationToken,
    ) -> Result<Vec<AutocompleteOption<T>>, String> {
        if query.is_empty() {
            return Ok(self.options.clone());
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &AutocompleteOption<T>)> = self
            .options
            .iter()
            .filter_map(|option| {
                matcher
                    .fuzzy_match(&option.label, query)
                    .map(|score| (score, option))
            })
            .collect();

        scored.sort_by(|(a, _), (b, _)| b.cmp(a));

        Ok(scored.into_iter().map(|(_, o)| o.clone()).collect())
    }
}

/// Result of a fetch job.
pub struct Fetched<T> {
    id: u64,
    result: Result<Vec<AutocompleteOption<T>>, String>,
}

pub struct Autocomplete<T> {
    source: Arc<dyn Source<T>>,
    input: TextInput,
    query: Debouncer<String>,
    limit: usize,
    min_query_length: usize,
    empty_text: String,
    options: Vec<AutocompleteOption<T>>,
    navigator: ListNavigator,
    open: bool,
    loading: bool,
    errors: Vec<String>,
    last_request: u64,
    last_query: Option<String>,
    in_flight: Option<CancellationToken>,
}

impl<T: Clone + Send + Sync + 'static> Autocomplete<T> {
    pub fn new(source: impl Source<T> + 'static) -> Self {
        Self {
            source: Arc::new(source),
            input: TextInput::new().placeholder(SEARCH_PLACEHOLDER),
            query: Debouncer::new(String::new(), DEFAULT_DEBOUNCE),
            limit: DEFAULT_LIMIT,
            min_query_length: 0,
            empty_text: DEFAULT_EMPTY_TEXT.to_string(),
            options: Vec::new(),
            navigator: ListNavigator::new(0, DEFAULT_LIMIT),
            open: false,
            loading: false,
            errors: Vec::new(),
            last_request: 0,
            last_query: None,
            in_flight: None,
        }
    }

    /// Searches `options` with [`FuzzySource`].
    pub fn from_options(options: Vec<AutocompleteOption<T>>) -> Self {
        Self::new(FuzzySource::new(options))
    }

    /// Maximum number of options shown.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self.navigator = ListNavigator::new(0, self.limit);
        self
    }

    #[must_use]
    pub fn min_query_length(mut self, length: usize) -> Self {
        self.min_query_length = length;
        self
    }

    #[must_use]
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.query = Debouncer::new(String::new(), delay);
        self
    }

    #[must_use]
    pub fn empty_text(mut self, text: impl Into<String>) -> Self {
        self.empty_text = text.into();
        self
    }

    #[must_use]
    pub fn query(&self) -> String {
        self.input.text()
    }

    #[must_use]
    pub fn options(&self) -> &[AutocompleteOption<T>] {
        &self.options
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<&AutocompleteOption<T>> {
        self.navigator.index().and_then(|i| self.options.get(i))
    }

    fn long_enough(&self, query: &str) -> bool {
        query.chars().count() >= self.min_query_length
    }

    fn query_changed(&mut self, now: Instant) {
        let query = self.input.text();
        self.errors.clear();
        if !self.long_enough(&query) {
            self.open = false;
        }
        self.query.set(query, now);
    }

    fn fetch(&mut self, query: String, ctx: &mut Context<Fetched<T>>) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.last_query = Some(query.clone());

        if !self.long_enough(&query) {
            self.options.clear();
            self.navigator.reset(0);
            self.open = false;
            self.loading = false;
            return;
        }

        self.last_request += 1;
        let id = self.last_request;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.loading = true;
        debug!("autocomplete fetch {id} for {query:?}");

        let source = Arc::clone(&self.source);
        let limit = self.limit;
        let job_token = token.clone();
        ctx.spawn(Job::new(token, move || {
            let result = catch_unwind(AssertUnwindSafe(|| source.search(&query, &job_token)))
                .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())))
                .map(|mut options| {
                    options.truncate(limit);
                    options
                });
            Fetched { id, result }
        }));
    }
}

impl<T: Clone + Send + Sync + 'static> Variant for Autocomplete<T> {
    type Value = Completion<T>;
    type Message = Fetched<T>;

    fn handle_key(&mut self, key: &Key, ctx: &mut Context<Self::Message>) -> KeyOutcome {
        match key.code {
            // Moving the highlight changes which option would be submitted.
            KeyCode::Up => {
                if self.navigator.apply(Movement::Up) {
                    KeyOutcome::Changed
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Down => {
                if !self.open && self.long_enough(&self.input.text()) {
                    self.open = true;
                    KeyOutcome::Handled
                } else if self.navigator.apply(Movement::Down) {
                    KeyOutcome::Changed
                } else {
                    KeyOutcome::Ignored
                }
            }
            KeyCode::Tab => {
                let Some(label) = self
                    .highlighted()
                    .filter(|_| self.open)
                    .map(|o| o.label.clone())
                else {
                    return KeyOutcome::Ignored;
                };
                self.input = TextInput::new()
                    .placeholder(SEARCH_PLACEHOLDER)
                    .initial(&label);
                self.open = false;
                self.query_changed(ctx.now);
                KeyOutcome::Changed
            }
            _ => {
                let outcome = self.input.edit(key);
                if outcome == KeyOutcome::Changed {
                    self.query_changed(ctx.now);
                }
                outcome
            }
        }
    }

    fn value(&self) -> Option<Completion<T>> {
        if let Some(option) = self.highlighted() {
            return Some(Completion::Option(option.value.clone()));
        }
        let query = self.input.text();
        (!query.is_empty()).then_some(Completion::FreeText(query))
    }

    fn tick(&mut self, ctx: &mut Context<Self::Message>) -> bool {
        self.query.poll(ctx.now);
        let query = self.query.get();
        if self.last_query.as_ref() == Some(&query) {
            return false;
        }
        self.fetch(query, ctx);
        true
    }

    fn deliver(&mut self, message: Fetched<T>) -> bool {
        if message.id != self.last_request || self.in_flight.is_none() {
            warn!("discarding stale autocomplete response {}", message.id);
            return false;
        }

        self.in_flight = None;
        self.loading = false;
        match message.result {
            Ok(options) => {
                debug!("autocomplete fetch {} returned {} options", message.id, options.len());
                self.navigator.reset(options.len());
                self.options = options;
                self.open = true;
                self.errors.clear();
            }
            Err(error) => {
                self.errors = vec![error];
                self.options.clear();
                self.navigator.reset(0);
                self.open = false;
            }
        }
        true
    }

    fn deadline(&self) -> Option<Instant> {
        self.query.deadline()
    }

    fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.query.cancel();
        self.loading = false;
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line> {
        let colors = &ctx.theme.colors;
        let mut search = Line::raw("🔍 ");
        search.extend(self.input.render_field(ctx));
        let mut lines = vec![search];

        if self.loading {
            lines.push(Line::from(Span::colored("Loading...", &colors.text.secondary)));
        }
        if let Some(error) = self.errors.first() {
            lines.push(Line::from(Span::colored(error.clone(), &colors.error)));
        }
        if self.open && self.options.is_empty() && !self.loading {
            lines.push(Line::from(Span::colored(
                self.empty_text.clone(),
                &colors.text.secondary,
            )));
        }
        if self.open {
            let highlighted = self.navigator.index();
            for (i, option) in self.options.iter().enumerate() {
                let selected = Some(i) == highlighted;
                let color = if selected {
                    &colors.primary
                } else {
                    &colors.text.primary
                };
                let mut line = Line::from(
                    Span::colored(format!(" {}", option.label), color).inverse(selected),
                );
                if let Some(hint) = &option.hint {
                    let hint_color = if selected {
                        &colors.text.inverted
                    } else {
                        &colors.text.secondary
                    };
                    line.push(Span::colored(format!(" ({hint})"), hint_color));
                }
                lines.push(line);
            }
        }
        if ctx.focused {
            lines.push(Line::from(Span::colored(
                NAVIGATION_HINT,
                &colors.text.secondary,
            )));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::keys_for;
    use crate::prompt::{Prompt, Step};
    use crate::style::plain_text;

    fn languages() -> Vec<AutocompleteOption<&'static str>> {
        ["rust", "ruby", "python", "go"]
            .into_iter()
            .map(|l| AutocompleteOption::new(l, l))
            .collect()
    }

    fn type_at<T: Clone + Send + Sync + 'static>(
        prompt: &mut Prompt<Autocomplete<T>>,
        text: &str,
        now: Instant,
    ) {
        for key in keys_for(text) {
            prompt.handle_key(key, now);
        }
    }

    #[test]
    fn test_fuzzy_source_ranks_matches() {
        let source = FuzzySource::new(languages());
        let token = CancellationToken::new();
        let found = source.search("ru", &token).unwrap();
        let labels: Vec<_> = found.iter().map(|o| o.label.as_str()).collect();
        assert!(labels.contains(&"rust"));
        assert!(labels.contains(&"ruby"));
        assert!(!labels.contains(&"go"));
        assert_eq!(source.search("", &token).unwrap().len(), 4);
    }

    #[test]
    fn test_debounced_fetch_and_submit() {
        let t0 = Instant::now();
        let mut prompt = Prompt::new("Language", Autocomplete::from_options(languages()));

        prompt.tick(t0);
        prompt.run_jobs_inline();
        assert_eq!(prompt.variant().options().len(), 4);

        type_at(&mut prompt, "pyt", t0);
        prompt.tick(t0 + Duration::from_millis(100));
        assert!(!prompt.has_jobs());
        assert_eq!(
            prompt.next_deadline(),
            Some(t0 + Duration::from_millis(300))
        );

        prompt.tick(t0 + Duration::from_millis(300));
        assert!(prompt.variant().is_loading());
        assert!(plain_text(&prompt.render()).contains("Loading..."));
        prompt.run_jobs_inline();

        assert_eq!(prompt.variant().options().len(), 1);
        assert_eq!(
            prompt.handle_key(KeyCode::Return.into(), t0),
            Step::Submitted(Completion::Option("python"))
        );
    }

    #[test]
    fn test_late_response_for_older_query_is_discarded() {
        let t0 = Instant::now();
        let source = |query: &str| -> Result<Vec<AutocompleteOption<String>>, String> {
            Ok(vec![AutocompleteOption::new(
                query.to_string(),
                format!("result for {query}"),
            )])
        };
        let mut prompt = Prompt::new("Search", Autocomplete::new(source).limit(5));
        prompt.tick(t0);
        prompt.run_jobs_inline();

        type_at(&mut prompt, "ab", t0);
        prompt.tick(t0 + Duration::from_millis(300));
        let older = prompt.take_jobs().pop().unwrap();

        type_at(&mut prompt, "c", t0 + Duration::from_millis(300));
        prompt.tick(t0 + Duration::from_millis(600));
        let newer = prompt.take_jobs().pop().unwrap();
        assert!(older.is_cancelled());

        // The newer request finishes first; the older one resolves later.
        prompt.deliver(newer.run());
        prompt.deliver(older.run());

        let labels: Vec<_> = prompt
            .variant()
            .options()
            .iter()
            .map(|o| o.label.clone())
            .collect();
        assert_eq!(labels, vec!["result for abc".to_string()]);
    }

    #[test]
    fn test_free_text_fallback() {
        let t0 = Instant::now();
        let source = |_: &str| -> Result<Vec<AutocompleteOption<u32>>, String> { Ok(Vec::new()) };
        let mut prompt = Prompt::new("Search", Autocomplete::new(source));
        type_at(&mut prompt, "zig", t0);
        prompt.tick(t0 + Duration::from_millis(300));
        prompt.run_jobs_inline();

        assert!(plain_text(&prompt.render()).contains(DEFAULT_EMPTY_TEXT));
        assert_eq!(
            prompt.handle_key(KeyCode::Return.into(), t0),
            Step::Submitted(Completion::FreeText("zig".to_string()))
        );
    }

    #[test]
    fn test_tab_fills_label_and_closes() {
        let t0 = Instant::now();
        let mut prompt = Prompt::new("Language", Autocomplete::from_options(languages()));
        type_at(&mut prompt, "rb", t0);
        prompt.tick(t0 + Duration::from_millis(300));
        prompt.run_jobs_inline();
        assert!(prompt.variant().is_open());

        prompt.handle_key(KeyCode::Tab.into(), t0);
        assert_eq!(prompt.variant().query(), "ruby");
        assert!(!prompt.variant().is_open());
        assert_eq!(
            prompt.handle_key(KeyCode::Return.into(), t0),
            Step::Submitted(Completion::Option("ruby"))
        );
    }

    #[test]
    fn test_min_query_length_keeps_dropdown_closed() {
        let t0 = Instant::now();
        let mut prompt = Prompt::new(
            "Language",
            Autocomplete::from_options(languages()).min_query_length(2),
        );
        prompt.tick(t0);
        assert!(!prompt.has_jobs());

        type_at(&mut prompt, "r", t0);
        prompt.tick(t0 + Duration::from_millis(300));
        assert!(!prompt.has_jobs());
        prompt.handle_key(KeyCode::Down.into(), t0);
        assert!(!prompt.variant().is_open());
    }

    #[test]
    fn test_source_error_shown_and_cleared() {
        let t0 = Instant::now();
        let source =
            |_: &str| -> Result<Vec<AutocompleteOption<u32>>, String> { Err("offline".to_string()) };
        let mut prompt = Prompt::new("Search", Autocomplete::new(source));
        prompt.tick(t0);
        prompt.run_jobs_inline();
        assert_eq!(prompt.variant().errors().to_vec(), vec!["offline".to_string()]);
        assert!(plain_text(&prompt.render()).contains("offline"));

        type_at(&mut prompt, "x", t0);
        assert!(prompt.variant().errors().is_empty());
    }

    #[test]
    fn test_dropdown_navigation_clears_error_and_pending_check() {
        let t0 = Instant::now();
        let mut prompt = Prompt::new("Language", Autocomplete::from_options(languages()))
            .validate(|value: &Completion<&'static str>| match value {
                Completion::Option("rust") => Err("Pick another".to_string()),
                _ => Ok(()),
            });
        prompt.tick(t0);
        prompt.run_jobs_inline();
        assert_eq!(prompt.variant().highlighted().map(|o| o.value), Some("rust"));

        prompt.handle_key(KeyCode::Return.into(), t0);
        assert_eq!(prompt.run_jobs_inline(), Step::Pending);
        assert_eq!(prompt.error(), Some("Pick another"));

        prompt.handle_key(KeyCode::Down.into(), t0);
        assert_eq!(prompt.error(), None);
        assert_eq!(prompt.variant().highlighted().map(|o| o.value), Some("ruby"));

        prompt.handle_key(KeyCode::Return.into(), t0);
        let stale = prompt.take_jobs().pop().unwrap();
        prompt.handle_key(KeyCode::Up.into(), t0);
        assert!(stale.is_cancelled());
        assert_eq!(prompt.deliver(stale.run()), Step::Pending);
        assert_eq!(prompt.variant().highlighted().map(|o| o.value), Some("rust"));

        prompt.handle_key(KeyCode::Down.into(), t0);
        prompt.handle_key(KeyCode::Return.into(), t0);
        assert_eq!(
            prompt.run_jobs_inline(),
            Step::Submitted(Completion::Option("ruby"))
        );
    }

    #[test]
    fn test_cancel_abandons_fetch() {
        let t0 = Instant::now();
        let mut prompt = Prompt::new("Language", Autocomplete::from_options(languages()));
        prompt.tick(t0);
        let job = prompt.take_jobs().pop().unwrap();

        assert_eq!(prompt.handle_key(KeyCode::Escape.into(), t0), Step::Cancelled);
        assert!(job.is_cancelled());
        assert_eq!(prompt.deliver(job.run()), Step::Pending);
        assert_eq!(prompt.next_deadline(), None);
        assert!(!prompt.has_jobs());
    }
}
