//! The base prompt engine and its variants.
//!
//! A [`Prompt`] owns the lifecycle shared by every prompt kind: the
//! message/required/validate contract, submit and cancel handling, inline
//! error display and the footer hint. What a key press *means* and how the
//! value is drawn is delegated to a [`Variant`].
//!
//! # Lifecycle
//!
//! ```text
//! Idle --edit--> Editing --Enter--> Validating --ok--> Submitted
//!   \               ^                   |
//!    \              +------ error ------+
//!     +--Esc / Ctrl+C (from any live state)--> Cancelled
//! ```
//!
//! The engine never blocks. Work that may take time (a custom validator, an
//! autocomplete lookup) is queued as a [`Job`]; the driver runs it wherever
//! it likes and hands the result back through [`Prompt::deliver`]. Every job
//! carries a [`CancellationToken`], and results whose token was cancelled or
//! that belong to a superseded request are dropped.

pub mod autocomplete;
pub mod confirm;
pub mod multiselect;
pub mod password;
pub mod select;
pub mod text;
pub mod toggle;

use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::event_emitter::Unsubscribe;
use crate::key::{Key, KeyCode};
use crate::state::State;
use crate::style::{Line, Span};
use crate::theme::{Theme, ThemeOverride};

pub use autocomplete::{Autocomplete, AutocompleteOption, Completion, FuzzySource, Source};
pub use confirm::Confirm;
pub use multiselect::MultiSelect;
pub use password::Password;
pub use select::{Select, SelectOption};
pub use text::TextInput;
pub use toggle::Toggle;

/// Custom validation hook. `Err` carries the message shown to the user.
pub type Validator<T> = Arc<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

const FOOTER: &str = "Press Enter to submit, Esc to cancel";
const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Final result of a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer<T> {
    Submitted(T),
    Cancelled,
}

impl<T> Answer<T> {
    pub fn submitted(self) -> Option<T> {
        match self {
            Answer::Submitted(value) => Some(value),
            Answer::Cancelled => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Answer::Cancelled)
    }
}

pub type TextResult = Answer<String>;
pub type PasswordResult = Answer<String>;
pub type ConfirmResult = Answer<bool>;
pub type ToggleResult = Answer<bool>;
pub type SelectResult<T> = Answer<T>;
pub type MultiSelectResult<T> = Answer<Vec<T>>;
pub type AutocompleteResult<T> = Answer<Completion<T>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptStatus {
    Idle,
    Editing,
    Validating,
    Submitted,
    Cancelled,
}

impl PromptStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, PromptStatus::Submitted | PromptStatus::Cancelled)
    }
}

/// What the driver should do after feeding the prompt an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<T> {
    Pending,
    Submitted(T),
    Cancelled,
}

impl<T> Step<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Step::Pending)
    }

    /// Converts a finished step into an [`Answer`].
    pub fn into_answer(self) -> Option<Answer<T>> {
        match self {
            Step::Pending => None,
            Step::Submitted(value) => Some(Answer::Submitted(value)),
            Step::Cancelled => Some(Answer::Cancelled),
        }
    }
}

/// How a variant reacted to a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The value changed. Clears any displayed error.
    Changed,
    /// Something visible changed, but not the value.
    Handled,
    Ignored,
}

/// A unit of possibly-slow work started by a prompt.
pub struct Job<M> {
    token: CancellationToken,
    work: Box<dyn FnOnce() -> M + Send>,
}

impl<M: 'static> Job<M> {
    pub fn new(token: CancellationToken, work: impl FnOnce() -> M + Send + 'static) -> Self {
        Self {
            token,
            work: Box::new(work),
        }
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn run(self) -> M {
        (self.work)()
    }

    pub fn map<N: 'static>(self, f: impl FnOnce(M) -> N + Send + 'static) -> Job<N> {
        let work = self.work;
        Job {
            token: self.token,
            work: Box::new(move || f(work())),
        }
    }
}

impl<M> Debug for Job<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Job")
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Result of a [`Job`], routed back to the prompt that queued it.
pub enum Message<M> {
    Validated {
        id: u64,
        result: Result<(), String>,
    },
    Variant(M),
}

/// Passed to variants while they handle input or time.
pub struct Context<M> {
    pub now: Instant,
    jobs: Vec<Job<M>>,
}

impl<M: 'static> Context<M> {
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            now,
            jobs: Vec::new(),
        }
    }

    pub fn spawn(&mut self, job: Job<M>) {
        self.jobs.push(job);
    }

    pub fn into_jobs(self) -> Vec<Job<M>> {
        self.jobs
    }
}

/// What a variant needs to draw itself.
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub focused: bool,
    pub required: bool,
    pub error: Option<&'a str>,
    pub status: PromptStatus,
}

/// Input interpretation and rendering for one kind of prompt.
pub trait Variant {
    type Value: Clone + Send + 'static;
    type Message: Send + 'static;

    fn handle_key(&mut self, key: &Key, ctx: &mut Context<Self::Message>) -> KeyOutcome;

    /// The value that would be submitted now. `None` means nothing has been
    /// entered and the prompt cannot submit.
    fn value(&self) -> Option<Self::Value>;

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Line>;

    fn is_empty(&self) -> bool {
        self.value().is_none()
    }

    /// Built-in submission rules, checked before the custom validator.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    fn required_message(&self) -> String {
        "This field is required".to_string()
    }

    fn required_by_default(&self) -> bool {
        false
    }

    fn uses_validator(&self) -> bool {
        true
    }

    /// Called with a fully validated value. Returning `true` keeps the
    /// prompt open for another round of input.
    fn advance(&mut self, _value: &Self::Value) -> bool {
        false
    }

    /// The message line, possibly decorated with the current value.
    fn message(&self, message: &str) -> String {
        message.to_string()
    }

    /// Advances time-driven state. Returns `true` if anything visible changed.
    fn tick(&mut self, _ctx: &mut Context<Self::Message>) -> bool {
        false
    }

    /// Applies the result of a job this variant queued. Returns `true` if
    /// anything visible changed.
    fn deliver(&mut self, _message: Self::Message) -> bool {
        false
    }

    fn deadline(&self) -> Option<Instant> {
        None
    }

    /// Abandons outstanding work and timers.
    fn cancel(&mut self) {}
}

/// The options every prompt shares. Fields left `None` keep the variant's
/// defaults.
pub struct PromptConfig<T> {
    pub message: String,
    pub required: Option<bool>,
    pub validate: Option<Validator<T>>,
    pub theme: ThemeOverride,
}

impl<T> PromptConfig<T> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            required: None,
            validate: None,
            theme: ThemeOverride::default(),
        }
    }
}

struct PendingValidation<T> {
    id: u64,
    token: CancellationToken,
    value: T,
}

pub struct Prompt<V: Variant> {
    message: String,
    required: bool,
    validator: Option<Validator<V::Value>>,
    theme: Theme,
    variant: V,
    status: State<PromptStatus>,
    revision: State<u64>,
    error: Option<String>,
    focused: bool,
    jobs: Vec<Job<Message<V::Message>>>,
    validation: Option<PendingValidation<V::Value>>,
    next_validation_id: u64,
}

impl<V: Variant> Prompt<V> {
    pub fn new(message: impl Into<String>, variant: V) -> Self {
        let required = variant.required_by_default();
        Self {
            message: message.into(),
            required,
            validator: None,
            theme: Theme::default(),
            variant,
            status: State::new(PromptStatus::Idle),
            revision: State::new(0),
            error: None,
            focused: true,
            jobs: Vec::new(),
            validation: None,
            next_validation_id: 0,
        }
    }

    pub fn from_config(config: PromptConfig<V::Value>, variant: V) -> Self {
        let mut prompt = Self::new(config.message, variant).theme_override(&config.theme);
        if let Some(required) = config.required {
            prompt.required = required;
        }
        prompt.validator = config.validate;
        prompt
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn validate<F>(mut self, validator: F) -> Self
    where
        F: Fn(&V::Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
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
    pub fn status(&self) -> PromptStatus {
        self.status.get()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn variant(&self) -> &V {
        &self.variant
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        if self.focused != focused {
            self.focused = focused;
            self.touch();
        }
    }

    /// Observes status transitions. The handler is called immediately with
    /// the current status.
    pub fn subscribe_status(&self, handler: impl Fn(&PromptStatus) + 'static) -> Unsubscribe {
        self.status.subscribe(handler)
    }

    /// Calls `handler` whenever anything visible changes, so a driver can
    /// redraw.
    pub fn on_change(&self, handler: impl Fn() + 'static) -> Unsubscribe {
        self.revision.subscribe(move |_| handler())
    }

    fn touch(&self) {
        self.revision.update(|r| r.wrapping_add(1));
    }

    fn set_status(&self, status: PromptStatus) {
        if self.status.get() != status {
            debug!("prompt `{}`: {:?} -> {:?}", self.message, self.status.get(), status);
        }
        self.status.set(status);
    }

    fn absorb(&mut self, ctx: Context<V::Message>) {
        self.jobs
            .extend(ctx.into_jobs().into_iter().map(|job| job.map(Message::Variant)));
    }

    /// Feeds one key press.
    pub fn handle_key(&mut self, key: Key, now: Instant) -> Step<V::Value> {
        if self.status().is_terminal() {
            return Step::Pending;
        }

        if key.is_interrupt() || key.code == KeyCode::Escape {
            return self.cancel();
        }

        if key.code == KeyCode::Return {
            return self.submit();
        }

        let mut ctx = Context::new(now);
        let outcome = self.variant.handle_key(&key, &mut ctx);
        self.absorb(ctx);

        match outcome {
            KeyOutcome::Changed => {
                self.error = None;
                if let Some(pending) = self.validation.take() {
                    debug!("value edited during validation; abandoning check {}", pending.id);
                    pending.token.cancel();
                }
                self.set_status(PromptStatus::Editing);
                self.touch();
            }
            KeyOutcome::Handled => self.touch(),
            KeyOutcome::Ignored => {}
        }

        Step::Pending
    }

    /// Attempts to submit the current value (the `Enter` key).
    pub fn submit(&mut self) -> Step<V::Value> {
        let status = self.status();
        if status.is_terminal() || status == PromptStatus::Validating {
            return Step::Pending;
        }
        self.set_status(PromptStatus::Validating);

        if self.required && self.variant.is_empty() {
            return self.reject(self.variant.required_message());
        }

        if let Err(message) = self.variant.check() {
            return self.reject(message);
        }

        let Some(value) = self.variant.value() else {
            self.set_status(PromptStatus::Editing);
            self.touch();
            return Step::Pending;
        };

        let validator = self
            .validator
            .clone()
            .filter(|_| self.variant.uses_validator());

        match validator {
            Some(validator) => {
                let id = self.next_validation_id;
                self.next_validation_id += 1;
                let token = CancellationToken::new();
                let candidate = value.clone();

                self.jobs.push(Job::new(token.clone(), move || Message::Validated {
                    id,
                    result: run_validator(&validator, &candidate),
                }));
                self.validation = Some(PendingValidation { id, token, value });
                self.touch();
                Step::Pending
            }
            None => self.accept(value),
        }
    }

    fn reject(&mut self, message: String) -> Step<V::Value> {
        debug!("prompt `{}` rejected: {message}", self.message);
        self.error = Some(message);
        self.set_status(PromptStatus::Editing);
        self.touch();
        Step::Pending
    }

    fn accept(&mut self, value: V::Value) -> Step<V::Value> {
        if self.variant.advance(&value) {
            self.error = None;
            self.set_status(PromptStatus::Editing);
            self.touch();
            return Step::Pending;
        }

        info!("prompt `{}` submitted", self.message);
        self.variant.cancel();
        self.set_status(PromptStatus::Submitted);
        self.touch();
        Step::Submitted(value)
    }

    /// Cancels the prompt (the `Escape` key). In-flight work is abandoned.
    pub fn cancel(&mut self) -> Step<V::Value> {
        if self.status().is_terminal() {
            return Step::Pending;
        }

        if let Some(pending) = self.validation.take() {
            pending.token.cancel();
        }
        for job in &self.jobs {
            job.token().cancel();
        }
        self.jobs.clear();
        self.variant.cancel();

        info!("prompt `{}` cancelled", self.message);
        self.set_status(PromptStatus::Cancelled);
        self.touch();
        Step::Cancelled
    }

    /// Advances timers (debounce) and may queue jobs.
    pub fn tick(&mut self, now: Instant) {
        if self.status().is_terminal() {
            return;
        }

        let mut ctx = Context::new(now);
        let changed = self.variant.tick(&mut ctx);
        self.absorb(ctx);
        if changed {
            self.touch();
        }
    }

    /// Jobs queued since the last call. The driver runs them and feeds each
    /// result to [`Prompt::deliver`].
    pub fn take_jobs(&mut self) -> Vec<Job<Message<V::Message>>> {
        std::mem::take(&mut self.jobs)
    }

    #[must_use]
    pub fn has_jobs(&self) -> bool {
        !self.jobs.is_empty()
    }

    /// Applies the result of a job, ignoring it if it is stale.
    pub fn deliver(&mut self, message: Message<V::Message>) -> Step<V::Value> {
        if self.status().is_terminal() {
            debug!("prompt `{}` finished; dropping late result", self.message);
            return Step::Pending;
        }

        match message {
            Message::Validated { id, result } => {
                let current = match &self.validation {
                    Some(pending) if pending.id == id && !pending.token.is_cancelled() => {
                        self.validation.take()
                    }
                    _ => None,
                };
                let Some(pending) = current else {
                    warn!("discarding stale validation result {id}");
                    return Step::Pending;
                };

                match result {
                    Ok(()) => self.accept(pending.value),
                    Err(message) => self.reject(message),
                }
            }
            Message::Variant(message) => {
                if self.variant.deliver(message) {
                    self.touch();
                }
                Step::Pending
            }
        }
    }

    /// Runs every queued job on the current thread until none remain.
    pub fn run_jobs_inline(&mut self) -> Step<V::Value> {
        loop {
            let jobs = self.take_jobs();
            if jobs.is_empty() {
                return Step::Pending;
            }
            for job in jobs {
                if job.is_cancelled() {
                    continue;
                }
                let step = self.deliver(job.run());
                if !step.is_pending() {
                    return step;
                }
            }
        }
    }

    /// When the prompt next needs a [`Prompt::tick`], if ever.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.status().is_terminal() {
            return None;
        }
        self.variant.deadline()
    }

    pub fn render(&self) -> Vec<Line> {
        let theme = &self.theme;
        let colors = &theme.colors;
        let status = self.status();

        let mut header = Line::new().span(
            Span::plain(self.variant.message(&self.message)).styled(theme.typography.message),
        );
        if self.required {
            header.push(Span::colored(theme.symbols.required.clone(), &colors.error));
        }
        if let Some(error) = &self.error {
            header.push(Span::colored(format!(" ({error})"), &colors.error));
        }
        if status == PromptStatus::Validating {
            header.push(Span::colored(" validating…", &colors.muted).styled(theme.typography.hint));
        }

        let border = if self.error.is_some() {
            &colors.border.error
        } else if self.focused {
            &colors.border.focus
        } else {
            &colors.border.default
        };

        let ctx = RenderContext {
            theme,
            focused: self.focused,
            required: self.required,
            error: self.error.as_deref(),
            status,
        };

        let mut lines = vec![header];
        for content in self.variant.render(&ctx) {
            let mut line = Line::new().span(Span::colored(
                format!("{} ", theme.symbols.gutter),
                border,
            ));
            line.extend(content);
            lines.push(line);
        }
        lines.push(Line::from(
            Span::colored(FOOTER, &colors.text.secondary).styled(theme.typography.hint),
        ));

        lines
    }
}

fn run_validator<T>(validator: &Validator<T>, value: &T) -> Result<(), String> {
    match catch_unwind(AssertUnwindSafe(|| validator(value))) {
        Ok(result) => result,
        Err(payload) => Err(panic_message(payload.as_ref())),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        UNKNOWN_ERROR.to_string()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::time::Instant;

    use super::{Prompt, Step, Variant};
    use crate::key::{keys_for, Key, KeyCode};

    /// Types `text` then returns the step produced by the last key.
    pub fn type_text<V: Variant>(prompt: &mut Prompt<V>, text: &str) -> Step<V::Value> {
        let now = Instant::now();
        let mut step = Step::Pending;
        for key in keys_for(text) {
            step = prompt.handle_key(key, now);
        }
        step
    }

    pub fn press<V: Variant>(prompt: &mut Prompt<V>, code: KeyCode) -> Step<V::Value> {
        prompt.handle_key(Key::from(code), Instant::now())
    }

    /// Presses Enter and runs any validation inline.
    pub fn enter<V: Variant>(prompt: &mut Prompt<V>) -> Step<V::Value> {
        let step = press(prompt, KeyCode::Return);
        if step.is_pending() {
            return prompt.run_jobs_inline();
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{enter, press, type_text};
    use super::*;
    use crate::style::plain_text;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn min_length(min: usize) -> impl Fn(&String) -> Result<(), String> + Send + Sync {
        move |v: &String| {
            if v.chars().count() < min {
                Err("too short".to_string())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_required_text_with_validator_end_to_end() {
        let mut prompt = Prompt::new("Name", TextInput::new())
            .required(true)
            .validate(min_length(3));

        type_text(&mut prompt, "ab");
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("too short"));
        assert_eq!(prompt.status(), PromptStatus::Editing);
        assert!(plain_text(&prompt.render()).contains("(too short)"));

        type_text(&mut prompt, "c");
        assert_eq!(prompt.error(), None);
        assert_eq!(enter(&mut prompt), Step::Submitted("abc".to_string()));
        assert_eq!(prompt.status(), PromptStatus::Submitted);
    }

    #[test]
    fn test_required_empty_value_is_rejected() {
        let mut prompt = Prompt::new("Name", TextInput::new()).required(true);
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("This field is required"));
    }

    #[test]
    fn test_optional_empty_text_submits_empty_string() {
        let mut prompt = Prompt::new("Nickname", TextInput::new());
        assert_eq!(enter(&mut prompt), Step::Submitted(String::new()));
    }

    #[test]
    fn test_escape_cancels_without_validation() {
        let calls = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut prompt = Prompt::new("Name", TextInput::new()).validate(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        });

        type_text(&mut prompt, "abc");
        assert_eq!(press(&mut prompt, KeyCode::Escape), Step::Cancelled);
        assert_eq!(prompt.status(), PromptStatus::Cancelled);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);

        // Keys after cancellation are ignored.
        assert_eq!(type_text(&mut prompt, "x"), Step::Pending);
        assert_eq!(prompt.variant().text(), "abc");
    }

    #[test]
    fn test_ctrl_c_cancels() {
        let mut prompt = Prompt::new("Name", TextInput::new());
        assert_eq!(
            prompt.handle_key(Key::ctrl('c'), Instant::now()),
            Step::Cancelled
        );
    }

    #[test]
    fn test_enter_while_validating_is_ignored() {
        let mut prompt = Prompt::new("Name", TextInput::new()).validate(min_length(1));
        type_text(&mut prompt, "a");

        assert_eq!(press(&mut prompt, KeyCode::Return), Step::Pending);
        assert_eq!(prompt.status(), PromptStatus::Validating);
        assert_eq!(press(&mut prompt, KeyCode::Return), Step::Pending);

        let jobs = prompt.take_jobs();
        assert_eq!(jobs.len(), 1);
        let result = jobs.into_iter().next().unwrap().run();
        assert_eq!(prompt.deliver(result), Step::Submitted("a".to_string()));
    }

    #[test]
    fn test_validation_result_after_cancel_is_discarded() {
        let mut prompt = Prompt::new("Name", TextInput::new()).validate(min_length(1));
        type_text(&mut prompt, "a");
        press(&mut prompt, KeyCode::Return);

        let job = prompt.take_jobs().pop().unwrap();
        assert_eq!(press(&mut prompt, KeyCode::Escape), Step::Cancelled);
        assert!(job.is_cancelled());

        let late = job.run();
        assert_eq!(prompt.deliver(late), Step::Pending);
        assert_eq!(prompt.status(), PromptStatus::Cancelled);
    }

    #[test]
    fn test_editing_during_validation_supersedes_check() {
        let mut prompt = Prompt::new("Name", TextInput::new()).validate(min_length(1));
        type_text(&mut prompt, "a");
        press(&mut prompt, KeyCode::Return);
        let stale = prompt.take_jobs().pop().unwrap();

        type_text(&mut prompt, "b");
        assert!(stale.is_cancelled());
        assert_eq!(prompt.deliver(stale.run()), Step::Pending);
        assert_eq!(prompt.status(), PromptStatus::Editing);

        assert_eq!(enter(&mut prompt), Step::Submitted("ab".to_string()));
    }

    #[test]
    fn test_panicking_validator_reports_message() {
        let mut prompt =
            Prompt::new("Name", TextInput::new()).validate(|_| panic!("validator exploded"));
        type_text(&mut prompt, "a");
        assert_eq!(enter(&mut prompt), Step::Pending);
        assert_eq!(prompt.error(), Some("validator exploded"));
    }

    #[test]
    fn test_status_transitions_are_observable() {
        let mut prompt = Prompt::new("Name", TextInput::new())
            .required(true)
            .validate(min_length(2));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = prompt.subscribe_status(move |s| sink.borrow_mut().push(*s));

        type_text(&mut prompt, "a");
        enter(&mut prompt);
        type_text(&mut prompt, "b");
        enter(&mut prompt);

        assert_eq!(
            *seen.borrow(),
            vec![
                PromptStatus::Idle,
                PromptStatus::Editing,
                PromptStatus::Validating,
                PromptStatus::Editing,
                PromptStatus::Validating,
                PromptStatus::Submitted,
            ]
        );
    }

    #[test]
    fn test_on_change_fires_for_visible_updates() {
        let mut prompt = Prompt::new("Name", TextInput::new());
        let redraws = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&redraws);
        let _sub = prompt.on_change(move || *counter.borrow_mut() += 1);
        assert_eq!(*redraws.borrow(), 1);

        type_text(&mut prompt, "ab");
        assert_eq!(*redraws.borrow(), 3);
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let mut config = PromptConfig::new("Secret");
        config.required = Some(false);
        let mut prompt = Prompt::from_config(config, Password::new());
        assert_eq!(enter(&mut prompt), Step::Submitted(String::new()));
    }

    #[test]
    fn test_render_layout() {
        let prompt = Prompt::new("Project name", TextInput::new().placeholder("my-app"))
            .required(true);
        let lines = prompt.render();
        assert_eq!(lines[0].plain(), "Project name*");
        assert_eq!(lines.last().unwrap().plain(), FOOTER);
        assert!(lines[1].plain().starts_with("│ "));
    }
}
