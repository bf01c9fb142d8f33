//! Runs a list of fallible jobs, sequentially or concurrently, and renders
//! their progress.
//!
//! Workers run on scoped threads and only ever talk to the caller's thread
//! through a channel of [`TaskEvent`]s. The caller's thread owns every
//! [`TaskState`], so observers always see a consistent snapshot.

use std::fmt::{self, Display};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

use crate::cancel::CancellationToken;
use crate::prompt::panic_message;
use crate::render::progress::ProgressBar;
use crate::render::spinner::{self, Spinner};
use crate::style::{Line, Span};
use crate::theme::{ColorDefinition, Theme, ThemeOverride};

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const SUMMARY_BAR_WIDTH: usize = 30;
const FALLBACK_ERROR: &str = "An error occurred";

type Work = Arc<dyn Fn(&CancellationToken) -> Result<(), String> + Send + Sync>;
type SkipPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
enum Skip {
    Never,
    Always,
    When(SkipPredicate),
}

/// A titled unit of work.
#[derive(Clone)]
pub struct Task {
    title: String,
    work: Work,
    skip: Skip,
    retry: u32,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("title", &self.title)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Task {
    pub fn new<F, E>(title: impl Into<String>, work: F) -> Self
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: Display,
    {
        Self::with_token(title, move |_| work())
    }

    /// Like [`Task::new`], but the work receives the list's cancellation
    /// token so long-running work can stop early.
    pub fn with_token<F, E>(title: impl Into<String>, work: F) -> Self
    where
        F: Fn(&CancellationToken) -> Result<(), E> + Send + Sync + 'static,
        E: Display,
    {
        Self {
            title: title.into(),
            work: Arc::new(move |token| work(token).map_err(|e| e.to_string())),
            skip: Skip::Never,
            retry: 0,
        }
    }

    #[must_use]
    pub fn skip(mut self, skip: bool) -> Self {
        self.skip = if skip { Skip::Always } else { Skip::Never };
        self
    }

    /// Skips the task when `predicate` returns true at the moment the task
    /// would start.
    #[must_use]
    pub fn skip_if<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.skip = Skip::When(Arc::new(predicate));
        self
    }

    /// Extra attempts after the first failure.
    #[must_use]
    pub fn retry(mut self, retries: u32) -> Self {
        self.retry = retries;
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    fn should_skip(&self) -> bool {
        match &self.skip {
            Skip::Never => false,
            Skip::Always => true,
            Skip::When(predicate) => {
                panic::catch_unwind(AssertUnwindSafe(|| predicate())).unwrap_or_else(|payload| {
                    warn!(
                        "Skip check for task \"{}\" panicked: {}",
                        self.title,
                        panic_message(payload.as_ref())
                    );
                    false
                })
            }
        }
    }

    fn attempt(&self, token: &CancellationToken) -> Result<(), String> {
        panic::catch_unwind(AssertUnwindSafe(|| (self.work)(token)))
            .unwrap_or_else(|payload| Err(panic_message(payload.as_ref())))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{title}: {message}")]
pub struct TaskError {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    Running,
    Success,
    Error,
    Skipped,
}

impl TaskStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Skipped)
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Pending => " ",
            Self::Running => "↻",
            Self::Success => "✓",
            Self::Error => "✗",
            Self::Skipped => "↓",
        }
    }

    fn color(self, theme: &Theme) -> &ColorDefinition {
        let colors = &theme.colors;
        match self {
            Self::Pending => &colors.muted,
            Self::Running => &colors.primary,
            Self::Success => &colors.success,
            Self::Error => &colors.error,
            Self::Skipped => &colors.warning,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskState {
    pub status: TaskStatus,
    pub error: Option<TaskError>,
    pub started: Option<Instant>,
    pub finished: Option<Instant>,
    pub retry_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub success: bool,
    pub errors: Vec<TaskError>,
}

/// Counts per status, as shown in the summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub pending: usize,
    pub running: usize,
}

#[derive(Debug)]
enum TaskEvent {
    Skipped(usize),
    Started(usize, Instant),
    Retrying(usize, u32),
    Finished(usize, Instant, Result<(), String>),
}

/// Formats a duration as `123ms` below one second and `1.23s` above.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

type CompletionHook = Box<dyn FnOnce(&RunReport)>;

pub struct TaskList {
    tasks: Vec<Task>,
    states: Vec<TaskState>,
    concurrent: bool,
    exit_on_error: bool,
    show_timer: bool,
    show_summary: bool,
    retry_delay: Duration,
    on_complete: Option<CompletionHook>,
    token: CancellationToken,
    spinner: Spinner,
    theme: Theme,
    started: Option<Instant>,
    finished: Option<Instant>,
}

impl fmt::Debug for TaskList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskList")
            .field("tasks", &self.tasks)
            .field("states", &self.states)
            .field("concurrent", &self.concurrent)
            .field("exit_on_error", &self.exit_on_error)
            .finish_non_exhaustive()
    }
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        let states = vec![TaskState::default(); tasks.len()];
        Self {
            tasks,
            states,
            concurrent: false,
            exit_on_error: true,
            show_timer: true,
            show_summary: true,
            retry_delay: DEFAULT_RETRY_DELAY,
            on_complete: None,
            token: CancellationToken::new(),
            spinner: Spinner::default(),
            theme: Theme::default(),
            started: None,
            finished: None,
        }
    }

    #[must_use]
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Stops starting new tasks after the first failure. Sequential runs
    /// only.
    #[must_use]
    pub fn exit_on_error(mut self, exit: bool) -> Self {
        self.exit_on_error = exit;
        self
    }

    #[must_use]
    pub fn show_timer(mut self, show: bool) -> Self {
        self.show_timer = show;
        self
    }

    #[must_use]
    pub fn show_summary(mut self, show: bool) -> Self {
        self.show_summary = show;
        self
    }

    /// Pause between a failed attempt and its retry.
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    #[must_use]
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&RunReport) + 'static,
    {
        self.on_complete = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.spinner = self.spinner.theme(theme.clone());
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn theme_override(self, overrides: &ThemeOverride) -> Self {
        let theme = self.theme.merged(overrides);
        self.theme(theme)
    }

    /// Uses `token` instead of the list's own cancellation token.
    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// A handle that stops the run: no further task or retry starts once it
    /// is cancelled, and token-aware work can bail out early.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn states(&self) -> &[TaskState] {
        &self.states
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.states.iter().all(|s| s.status.is_terminal())
    }

    #[must_use]
    pub fn summary(&self) -> TaskSummary {
        let mut summary = TaskSummary {
            total: self.states.len(),
            ..TaskSummary::default()
        };
        for state in &self.states {
            match state.status {
                TaskStatus::Pending => summary.pending += 1,
                TaskStatus::Running => summary.running += 1,
                TaskStatus::Success => summary.passed += 1,
                TaskStatus::Error => summary.failed += 1,
                TaskStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    #[must_use]
    pub fn report(&self) -> RunReport {
        let errors: Vec<TaskError> = self
            .states
            .iter()
            .filter_map(|s| s.error.clone())
            .collect();
        RunReport {
            success: errors.is_empty(),
            errors,
        }
    }

    pub fn run(&mut self) -> RunReport {
        self.run_with(|_| {})
    }

    /// Runs every task, calling `observer` after each state change and on
    /// every spinner frame while tasks are running.
    pub fn run_with<F>(&mut self, mut observer: F) -> RunReport
    where
        F: FnMut(&TaskList),
    {
        self.states = vec![TaskState::default(); self.tasks.len()];
        self.started = Some(Instant::now());
        self.finished = None;
        info!(
            "Running {} task(s) {}",
            self.tasks.len(),
            if self.concurrent { "concurrently" } else { "sequentially" }
        );

        let tasks = self.tasks.clone();
        let (sender, receiver) = mpsc::channel();
        let runner = Runner {
            retry_delay: self.retry_delay,
            token: self.token.clone(),
        };

        thread::scope(|scope| {
            if self.concurrent {
                for (index, task) in tasks.iter().enumerate() {
                    let sender = sender.clone();
                    let runner = &runner;
                    scope.spawn(move || runner.run(index, task, &sender));
                }
            } else {
                let exit_on_error = self.exit_on_error;
                let sender = sender.clone();
                let runner = &runner;
                let tasks = &tasks;
                scope.spawn(move || {
                    for (index, task) in tasks.iter().enumerate() {
                        if runner.token.is_cancelled() {
                            debug!("Run cancelled before task {index}");
                            break;
                        }
                        if !runner.run(index, task, &sender) && exit_on_error {
                            debug!("Stopping after failed task {index}");
                            break;
                        }
                    }
                });
            }
            drop(sender);

            observer(self);
            loop {
                let timeout = self
                    .spinner
                    .next_deadline()
                    .map_or(spinner::DEFAULT_INTERVAL, |deadline| {
                        deadline.saturating_duration_since(Instant::now())
                    });
                match receiver.recv_timeout(timeout) {
                    Ok(event) => {
                        apply(&mut self.states, &self.tasks, event);
                        observer(self);
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        if self.spinner.tick(Instant::now()) {
                            observer(self);
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        });

        self.finished = Some(Instant::now());
        let report = self.report();
        info!(
            "Task run finished: {} error(s) in {}",
            report.errors.len(),
            format_duration(self.elapsed(Instant::now()))
        );
        if let Some(hook) = self.on_complete.take() {
            hook(&report);
        }
        observer(self);
        report
    }

    fn elapsed(&self, now: Instant) -> Duration {
        match (self.started, self.finished) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => now.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }

    fn task_lines(&self, task: &Task, state: &TaskState, now: Instant) -> Vec<Line> {
        let colors = &self.theme.colors;
        let color = state.status.color(&self.theme);

        let mut row = Line::from(Span::colored(
            format!("{} {}", state.status.symbol(), task.title),
            color,
        ));
        if state.retry_count > 0 {
            row.push(
                Span::colored(
                    format!(" (retry {}/{})", state.retry_count, task.retry),
                    &colors.warning,
                )
                .dim(),
            );
        }
        if self.show_timer {
            if let Some(started) = state.started {
                let end = state.finished.unwrap_or(now);
                row.push(
                    Span::colored(
                        format!(" ({})", format_duration(end.saturating_duration_since(started))),
                        &colors.muted,
                    )
                    .dim(),
                );
            }
        }
        if state.status == TaskStatus::Running {
            row.push(Span::colored(
                format!(" {}", self.spinner.glyph()),
                &colors.primary,
            ));
        }

        let mut lines = vec![row];
        match state.status {
            TaskStatus::Error => {
                let message = state
                    .error
                    .as_ref()
                    .map_or(FALLBACK_ERROR, |e| e.message.as_str());
                lines.push(Line::from(Span::colored(
                    format!("  {message}"),
                    &colors.error,
                )));
            }
            TaskStatus::Skipped => {
                lines.push(Line::from(
                    Span::colored("  Skipped", &colors.warning).dim(),
                ));
            }
            _ => {}
        }
        lines
    }

    fn summary_lines(&self, now: Instant) -> Vec<Line> {
        let summary = self.summary();
        let mut text = format!("Summary: {} passed", summary.passed);
        for (count, label) in [
            (summary.failed, "failed"),
            (summary.skipped, "skipped"),
            (summary.pending, "pending"),
            (summary.running, "running"),
        ] {
            if count > 0 {
                text.push_str(&format!(", {count} {label}"));
            }
        }
        text.push_str(&format!(
            " ({} total) in {}",
            summary.total,
            format_duration(self.elapsed(now))
        ));

        let percent = if summary.total == 0 {
            0.0
        } else {
            summary.passed as f64 / summary.total as f64 * 100.0
        };
        let bar = ProgressBar::new(percent)
            .width(SUMMARY_BAR_WIDTH)
            .show_percentage(false)
            .theme(self.theme.clone());

        vec![
            Line::from(Span::plain(text).bold()),
            bar.render_default(),
        ]
    }

    /// One row per task plus, when enabled and there is something to report,
    /// the summary.
    #[must_use]
    pub fn render(&self, now: Instant) -> Vec<Line> {
        let mut lines: Vec<Line> = self
            .tasks
            .iter()
            .zip(&self.states)
            .flat_map(|(task, state)| self.task_lines(task, state, now))
            .collect();

        let running = self
            .states
            .iter()
            .any(|s| s.status == TaskStatus::Running);
        if self.show_summary && (self.is_complete() || running) {
            lines.extend(self.summary_lines(now));
        }
        lines
    }
}

/// The part of a run that executes on worker threads.
struct Runner {
    retry_delay: Duration,
    token: CancellationToken,
}

impl Runner {
    /// Runs one task to completion, retrying as configured. Returns whether
    /// the task did not fail.
    fn run(&self, index: usize, task: &Task, events: &Sender<TaskEvent>) -> bool {
        if self.token.is_cancelled() {
            debug!("Run cancelled; not starting task {index}");
            return false;
        }

        // Send errors mean the receiving thread is gone; nothing is left to
        // report to.
        if task.should_skip() {
            let _ = events.send(TaskEvent::Skipped(index));
            return true;
        }

        let _ = events.send(TaskEvent::Started(index, Instant::now()));
        let mut retries = 0;
        loop {
            let result = task.attempt(&self.token);
            match result {
                Err(_) if retries < task.retry && !self.token.is_cancelled() => {
                    retries += 1;
                    let _ = events.send(TaskEvent::Retrying(index, retries));
                    thread::sleep(self.retry_delay);
                }
                result => {
                    let ok = result.is_ok();
                    let _ = events.send(TaskEvent::Finished(index, Instant::now(), result));
                    return ok;
                }
            }
        }
    }
}

fn apply(states: &mut [TaskState], tasks: &[Task], event: TaskEvent) {
    match event {
        TaskEvent::Skipped(index) => {
            debug!("Task \"{}\" skipped", tasks[index].title);
            states[index].status = TaskStatus::Skipped;
        }
        TaskEvent::Started(index, at) => {
            debug!("Task \"{}\" started", tasks[index].title);
            let state = &mut states[index];
            state.status = TaskStatus::Running;
            state.started = Some(at);
        }
        TaskEvent::Retrying(index, count) => {
            debug!("Task \"{}\" retry {count}", tasks[index].title);
            states[index].retry_count = count;
        }
        TaskEvent::Finished(index, at, result) => {
            let title = &tasks[index].title;
            let state = &mut states[index];
            state.finished = Some(at);
            match result {
                Ok(()) => {
                    debug!("Task \"{title}\" succeeded");
                    state.status = TaskStatus::Success;
                }
                Err(message) => {
                    warn!("Task \"{title}\" failed: {message}");
                    state.status = TaskStatus::Error;
                    state.error = Some(TaskError {
                        title: title.clone(),
                        message,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::plain_text;

    fn state(status: TaskStatus) -> TaskState {
        TaskState {
            status,
            ..TaskState::default()
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(0)), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
        assert_eq!(format_duration(Duration::from_millis(1234)), "1.23s");
    }

    #[test]
    fn test_defaults() {
        let list = TaskList::new(vec![Task::new("A", || Ok::<_, String>(()))]);
        assert!(list.show_timer);
        assert!(list.show_summary);
        assert!(list.exit_on_error);
        assert!(!list.concurrent);
        assert_eq!(list.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_timer_and_summary_shown_by_default() {
        let mut list = TaskList::new(vec![Task::new("Build", || Ok::<_, String>(()))]);
        let now = Instant::now();
        list.states[0] = TaskState {
            status: TaskStatus::Success,
            started: Some(now),
            finished: Some(now + Duration::from_millis(40)),
            ..TaskState::default()
        };

        let lines = list.render(now);
        assert_eq!(lines[0].plain(), "✓ Build (40ms)");
        assert!(lines[1].plain().starts_with("Summary: 1 passed (1 total) in "));

        let quiet = plain_text(&list.show_timer(false).show_summary(false).render(now));
        assert_eq!(quiet, "✓ Build");
    }

    #[test]
    fn test_render_rows() {
        let mut list = TaskList::new(vec![
            Task::new("Build", || Ok::<_, String>(())),
            Task::new("Test", || Ok::<_, String>(())).retry(3),
            Task::new("Lint", || Ok::<_, String>(())),
            Task::new("Deploy", || Ok::<_, String>(())),
        ]);
        list.states[0] = state(TaskStatus::Success);
        list.states[1] = TaskState {
            status: TaskStatus::Error,
            error: Some(TaskError {
                title: "Test".into(),
                message: "2 failures".into(),
            }),
            retry_count: 3,
            ..TaskState::default()
        };
        list.states[2] = state(TaskStatus::Skipped);

        let text = plain_text(&list.render(Instant::now()));
        assert_eq!(
            text,
            [
                "✓ Build",
                "✗ Test (retry 3/3)",
                "  2 failures",
                "↓ Lint",
                "  Skipped",
                "  Deploy",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_error_without_message_uses_fallback() {
        let mut list = TaskList::new(vec![Task::new("Fetch", || Ok::<_, String>(()))]);
        list.states[0] = state(TaskStatus::Error);
        let text = plain_text(&list.render(Instant::now()));
        assert!(text.contains("  An error occurred"));
    }

    #[test]
    fn test_running_row_has_timer_and_spinner() {
        let mut list =
            TaskList::new(vec![Task::new("Fetch", || Ok::<_, String>(()))]).show_timer(true);
        let now = Instant::now();
        list.states[0] = TaskState {
            status: TaskStatus::Running,
            started: Some(now),
            ..TaskState::default()
        };
        let text = plain_text(&list.render(now + Duration::from_millis(250)));
        assert_eq!(text, "↻ Fetch (250ms) ⠋");
    }

    #[test]
    fn test_summary_only_when_active_or_done() {
        let mut list = TaskList::new(vec![
            Task::new("A", || Ok::<_, String>(())),
            Task::new("B", || Ok::<_, String>(())),
        ])
        .show_summary(true);
        assert_eq!(list.render(Instant::now()).len(), 2);

        list.states[0] = state(TaskStatus::Success);
        list.states[1] = state(TaskStatus::Running);
        let lines = list.render(Instant::now());
        assert!(lines[2]
            .plain()
            .starts_with("Summary: 1 passed, 1 running (2 total) in "));
        assert_eq!(lines[3].width(), SUMMARY_BAR_WIDTH);
        assert_eq!(lines[3].plain().chars().filter(|c| *c == '█').count(), 15);
    }

    #[test]
    fn test_summary_counts() {
        let mut list = TaskList::new(vec![
            Task::new("A", || Ok::<_, String>(())),
            Task::new("B", || Ok::<_, String>(())),
            Task::new("C", || Ok::<_, String>(())),
        ]);
        list.states[0] = state(TaskStatus::Success);
        list.states[1] = state(TaskStatus::Error);
        assert_eq!(
            list.summary(),
            TaskSummary {
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 0,
                pending: 1,
                running: 0,
            }
        );
        assert!(!list.is_complete());
    }
}
