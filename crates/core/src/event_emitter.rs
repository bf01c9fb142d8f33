//! Named-event publish/subscribe.
//!
//! The emitter is single-threaded: handlers are plain `Fn(&P)` closures held
//! behind `Rc` and run synchronously, in registration order, on the thread
//! that calls [`EventEmitter::emit`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

type Handler<P> = Rc<dyn Fn(&P)>;

/// Identifies one registered handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registry<P> {
    next_id: u64,
    events: HashMap<String, Vec<(HandlerId, Handler<P>)>>,
}

impl<P> Registry<P> {
    fn remove(&mut self, event: &str, id: HandlerId) {
        if let Some(handlers) = self.events.get_mut(event) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                self.events.remove(event);
            }
        }
    }
}

/// Handle returned by every subscription.
///
/// Calling [`Unsubscribe::unsubscribe`] removes exactly the handler it was
/// created for. Subsequent calls do nothing. Dropping the handle does *not*
/// unsubscribe.
pub struct Unsubscribe {
    id: HandlerId,
    action: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl Unsubscribe {
    fn new(id: HandlerId, action: impl FnOnce() + 'static) -> Self {
        Self {
            id,
            action: RefCell::new(Some(Box::new(action))),
        }
    }

    #[must_use]
    pub fn id(&self) -> HandlerId {
        self.id
    }

    pub fn unsubscribe(&self) {
        let action = self.action.borrow_mut().take();
        if let Some(action) = action {
            action();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.action.borrow().is_some()
    }
}

impl Debug for Unsubscribe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

pub struct EventEmitter<P> {
    registry: Rc<RefCell<Registry<P>>>,
}

impl<P: 'static> EventEmitter<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                events: HashMap::new(),
            })),
        }
    }

    /// Registers `handler` for `event`.
    pub fn on<F>(&self, event: &str, handler: F) -> Unsubscribe
    where
        F: Fn(&P) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = HandlerId(registry.next_id);
            registry.next_id += 1;
            registry
                .events
                .entry(event.to_string())
                .or_default()
                .push((id, Rc::new(handler)));
            id
        };

        let registry: Weak<RefCell<Registry<P>>> = Rc::downgrade(&self.registry);
        let event = event.to_string();
        Unsubscribe::new(id, move || {
            if let Some(registry) = registry.upgrade() {
                registry.borrow_mut().remove(&event, id);
            }
        })
    }

    pub fn off(&self, event: &str, id: HandlerId) {
        self.registry.borrow_mut().remove(event, id);
    }

    /// Invokes every handler registered for `event` with `payload`.
    ///
    /// The handler list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while being notified; such changes apply from the next
    /// emit on.
    pub fn emit(&self, event: &str, payload: &P) {
        let handlers: Vec<Handler<P>> = match self.registry.borrow().events.get(event) {
            Some(handlers) => handlers.iter().map(|(_, h)| Rc::clone(h)).collect(),
            None => return,
        };

        for handler in handlers {
            handler(payload);
        }
    }

    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry
            .borrow()
            .events
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl<P: 'static> Default for EventEmitter<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_runs_handlers_in_registration_order() {
        let emitter = EventEmitter::<i32>::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        let _a = emitter.on("change", move |v| first.borrow_mut().push(format!("a{v}")));
        let second = Rc::clone(&seen);
        let _b = emitter.on("change", move |v| second.borrow_mut().push(format!("b{v}")));

        emitter.emit("change", &1);
        assert_eq!(*seen.borrow(), vec!["a1", "b1"]);
    }

    #[test]
    fn test_emit_only_reaches_named_event() {
        let emitter = EventEmitter::<()>::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let _sub = emitter.on("submit", move |()| *c.borrow_mut() += 1);

        emitter.emit("cancel", &());
        emitter.emit("nothing-registered", &());
        assert_eq!(*count.borrow(), 0);

        emitter.emit("submit", &());
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let emitter = EventEmitter::<i32>::new();
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        let sub = emitter.on("change", move |_| *c.borrow_mut() += 1);
        let other_count = Rc::new(RefCell::new(0));
        let o = Rc::clone(&other_count);
        let _other = emitter.on("change", move |_| *o.borrow_mut() += 1);

        sub.unsubscribe();
        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(emitter.listener_count("change"), 1);

        emitter.emit("change", &5);
        assert_eq!(*count.borrow(), 0);
        assert_eq!(*other_count.borrow(), 1);
    }

    #[test]
    fn test_off_by_id() {
        let emitter = EventEmitter::<i32>::new();
        let sub = emitter.on("change", |_| {});
        emitter.off("change", sub.id());
        assert_eq!(emitter.listener_count("change"), 0);
    }

    #[test]
    fn test_unsubscribe_after_emitter_dropped() {
        let emitter = EventEmitter::<i32>::new();
        let sub = emitter.on("change", |_| {});
        drop(emitter);
        sub.unsubscribe();
        assert!(!sub.is_active());
    }
}
