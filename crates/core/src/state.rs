//! Observable state cell.
//!
//! A [`State`] holds one value and notifies its subscribers synchronously,
//! in subscription order, whenever the value changes. Subscribing replays
//! the current value to the new handler immediately.
//!
//! Handlers run on the caller of [`State::set`]. A panicking handler is not
//! isolated: the panic unwinds through `set`, the new value stays stored and
//! the remaining handlers are not notified for that change.

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use crate::event_emitter::{EventEmitter, Unsubscribe};

const CHANGE: &str = "change";

/// Shared, single-threaded observable value. Clones share the same value and
/// subscriber list.
pub struct State<T> {
    value: Rc<RefCell<T>>,
    emitter: Rc<EventEmitter<T>>,
}

impl<T> Clone for State<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            emitter: Rc::clone(&self.emitter),
        }
    }
}

impl<T: Clone + PartialEq + 'static> State<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(initial)),
            emitter: Rc::new(EventEmitter::new()),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Reads the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Stores `value` and notifies subscribers, unless it equals the current
    /// value.
    pub fn set(&self, value: T) {
        self.update(move |_| value);
    }

    /// Computes the next value from the previous one, then behaves like
    /// [`State::set`].
    pub fn update(&self, updater: impl FnOnce(&T) -> T) {
        let next = {
            let current = self.value.borrow();
            let next = updater(&current);
            if *current == next {
                return;
            }
            next
        };

        *self.value.borrow_mut() = next.clone();
        self.emitter.emit(CHANGE, &next);
    }

    /// Registers `handler`, invoking it once with the current value before
    /// returning.
    pub fn subscribe(&self, handler: impl Fn(&T) + 'static) -> Unsubscribe {
        let current = self.get();
        handler(&current);
        self.emitter.on(CHANGE, handler)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.emitter.listener_count(CHANGE)
    }
}

impl<T: Debug> Debug for State<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("value", &self.value.borrow())
            .finish_non_exhaustive()
    }
}
