//! Event loops that put core components on a real terminal.

use std::cell::Cell;
use std::io::stdout;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use log::debug;
use promptkit_core::error::Result;
use promptkit_core::event_emitter::Unsubscribe;
use promptkit_core::prompt::{Answer, Message, Prompt, Step, Variant};
use promptkit_core::render::{ProgressBar, Spinner};
use promptkit_core::tasks::{RunReport, TaskList};

use crate::terminal::{to_key, Painter, RawModeGuard};

/// Longest wait for a key before checking on background work.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Runs each queued job on its own thread; results come back on `sender`.
fn spawn_jobs<V: Variant>(prompt: &mut Prompt<V>, sender: &Sender<Message<V::Message>>) {
    for job in prompt.take_jobs() {
        let sender = sender.clone();
        thread::spawn(move || {
            if job.is_cancelled() {
                return;
            }
            let _ = sender.send(job.run());
        });
    }
}

fn deliver_ready<V: Variant>(
    prompt: &mut Prompt<V>,
    receiver: &Receiver<Message<V::Message>>,
) -> Step<V::Value> {
    while let Ok(message) = receiver.try_recv() {
        let step = prompt.deliver(message);
        if !step.is_pending() {
            return step;
        }
    }
    Step::Pending
}

fn poll_timeout(deadline: Option<Instant>) -> Duration {
    deadline.map_or(IDLE_POLL, |deadline| {
        deadline
            .saturating_duration_since(Instant::now())
            .min(IDLE_POLL)
    })
}

/// Tracks whether the prompt changed since the last paint.
struct Redraw {
    dirty: Rc<Cell<bool>>,
    _subscription: Unsubscribe,
}

impl Redraw {
    fn watch<V: Variant>(prompt: &Prompt<V>) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = prompt.on_change(move || flag.set(true));
        Self {
            dirty,
            _subscription: subscription,
        }
    }

    fn request(&self) {
        self.dirty.set(true);
    }

    /// Returns whether a paint is due, clearing the flag.
    fn take(&self) -> bool {
        self.dirty.replace(false)
    }
}

/// Shows `prompt` until it is submitted or cancelled.
///
/// Raw mode is held only while the prompt is active; the final frame stays
/// on screen.
pub fn run_prompt<V: Variant>(mut prompt: Prompt<V>) -> Result<Answer<V::Value>> {
    let (sender, receiver) = mpsc::channel();
    let mut painter = Painter::for_terminal(stdout())?;
    let _raw_mode_guard = RawModeGuard::new()?; // When this goes out of scope, raw mode is disabled
    let redraw = Redraw::watch(&prompt);

    prompt.set_focused(true);
    prompt.tick(Instant::now());

    let answer = loop {
        spawn_jobs(&mut prompt, &sender);
        if redraw.take() {
            painter.paint(&prompt.render())?;
        }

        if let Some(answer) = deliver_ready(&mut prompt, &receiver).into_answer() {
            break answer;
        }

        if event::poll(poll_timeout(prompt.next_deadline()))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if let Some(key) = to_key(&key_event) {
                        if let Some(answer) =
                            prompt.handle_key(key, Instant::now()).into_answer()
                        {
                            break answer;
                        }
                    }
                }
                Event::Resize(width, height) => {
                    debug!("Terminal resized to {width}x{height}");
                    painter.set_columns(width);
                    redraw.request();
                }
                _ => {}
            }
        }

        prompt.tick(Instant::now());
    };

    prompt.set_focused(false);
    painter.paint(&prompt.render())?;
    painter.finish()?;
    Ok(answer)
}

/// Paints `list` live while it runs.
pub fn run_tasks(list: &mut TaskList) -> Result<RunReport> {
    let mut painter = Painter::for_terminal(stdout())?;
    let mut paint_error = None;

    let report = list.run_with(|snapshot| {
        if paint_error.is_none() {
            paint_error = painter.paint(&snapshot.render(Instant::now())).err();
        }
    });

    if let Some(error) = paint_error {
        return Err(error);
    }
    painter.finish()?;
    Ok(report)
}

/// Animates `spinner` for `duration`.
pub fn run_spinner(mut spinner: Spinner, duration: Duration) -> Result<()> {
    let mut painter = Painter::for_terminal(stdout())?;
    let start = Instant::now();
    spinner.tick(start);

    while start.elapsed() < duration {
        painter.paint(&[spinner.render()])?;
        let wait = poll_timeout(spinner.next_deadline());
        thread::sleep(wait.min(duration.saturating_sub(start.elapsed())));
        spinner.tick(Instant::now());
    }

    painter.paint(&[])?;
    Ok(())
}

/// Fills `bar` from 0 to 100% over `duration`.
pub fn run_progress(mut bar: ProgressBar, duration: Duration) -> Result<()> {
    const STEP: Duration = Duration::from_millis(40);

    let mut painter = Painter::for_terminal(stdout())?;
    let start = Instant::now();
    loop {
        let elapsed = start.elapsed();
        let percent = if duration.is_zero() {
            100.0
        } else {
            (elapsed.as_secs_f64() / duration.as_secs_f64() * 100.0).min(100.0)
        };
        bar.set_percent(percent);
        painter.paint(&[bar.render()?])?;

        if elapsed >= duration {
            break;
        }
        thread::sleep(STEP);
    }
    painter.finish()?;
    Ok(())
}
