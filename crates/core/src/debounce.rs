//! Debounced value propagation.
//!
//! [`Debouncer::set`] arms (or re-arms) a deadline; the value reaches the
//! inner [`State`] only when [`Debouncer::poll`] is called at or after that
//! deadline. The owner of the event loop drives `poll` and uses
//! [`Debouncer::deadline`] to size its wait, so there are no timer threads to
//! leak when a prompt goes away.

use std::time::{Duration, Instant};

use crate::event_emitter::Unsubscribe;
use crate::state::State;

pub struct Debouncer<T> {
    state: State<T>,
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T: Clone + PartialEq + 'static> Debouncer<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            state: State::new(initial),
            delay,
            pending: None,
        }
    }

    /// Schedules `value` to be propagated `delay` after `now`, replacing any
    /// pending value.
    pub fn set(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Flushes the pending value if its deadline has passed. Returns `true`
    /// when a value was propagated.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some((_, due)) if *due <= now => {}
            _ => return false,
        }

        if let Some((value, _)) = self.pending.take() {
            self.state.set(value);
            return true;
        }
        false
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value without propagating it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// The last propagated value.
    #[must_use]
    pub fn get(&self) -> T {
        self.state.get()
    }

    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Unsubscribe {
        self.state.subscribe(handler)
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_value_propagates_only_after_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);

        debouncer.set("a".to_string(), start);
        assert!(!debouncer.poll(start + Duration::from_millis(299)));
        assert_eq!(debouncer.get(), "");

        assert!(debouncer.poll(start + DELAY));
        assert_eq!(debouncer.get(), "a");
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_set_resets_pending_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(String::new(), DELAY);

        debouncer.set("a".to_string(), start);
        debouncer.set("ab".to_string(), start + Duration::from_millis(200));

        assert!(!debouncer.poll(start + Duration::from_millis(350)));
        assert_eq!(
            debouncer.deadline(),
            Some(start + Duration::from_millis(500))
        );
        assert!(debouncer.poll(start + Duration::from_millis(500)));
        assert_eq!(debouncer.get(), "ab");
    }

    #[test]
    fn test_subscribe_forwards_replay_and_changes() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(0, DELAY);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = debouncer.subscribe(move |v| sink.borrow_mut().push(*v));

        debouncer.set(1, start);
        debouncer.set(2, start);
        debouncer.poll(start + DELAY);

        assert_eq!(*seen.borrow(), vec![0, 2]);
    }

    #[test]
    fn test_cancel_discards_pending_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(0, DELAY);
        debouncer.set(5, start);
        debouncer.cancel();

        assert!(!debouncer.poll(start + DELAY * 2));
        assert_eq!(debouncer.get(), 0);
        assert_eq!(debouncer.deadline(), None);
    }
}
