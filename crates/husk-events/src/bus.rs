//! Custom event bus
//!
//! Named events with JSON details, dispatched synchronously or after a
//! delay via the timer queue.

use crate::timers::{TimerId, TimerQueue};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Handle to a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&Value)>;

/// Event bus
///
/// Listeners for a name fire in registration order. Delayed emissions are
/// queued and delivered by [`EventBus::poll`]; a pending emission can be
/// cancelled until it fires.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<String, Vec<(ListenerId, Callback)>>,
    next_listener: u64,
    queue: TimerQueue,
    delayed: HashMap<TimerId, (String, Value)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for an event name
    pub fn on<F>(&mut self, name: &str, callback: F) -> ListenerId
    where
        F: FnMut(&Value) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;

        self.listeners
            .entry(name.to_string())
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a listener; returns false if the handle is unknown
    pub fn off(&mut self, id: ListenerId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Dispatch an event to all listeners registered for its name
    pub fn emit(&mut self, name: &str, detail: &Value) {
        let Some(mut list) = self.listeners.remove(name) else {
            return;
        };

        for (_, callback) in list.iter_mut() {
            callback(detail);
        }

        // Listeners registered during dispatch land in a fresh bucket;
        // merge them behind the in-flight set.
        if let Some(mut added) = self.listeners.remove(name) {
            list.append(&mut added);
        }
        self.listeners.insert(name.to_string(), list);
    }

    /// Schedule an event for dispatch after a delay
    pub fn emit_after(&mut self, name: &str, detail: Value, delay: Duration) -> TimerId {
        let id = self.queue.schedule(delay);
        tracing::debug!("scheduled {} for dispatch in {:?}", name, delay);
        self.delayed.insert(id, (name.to_string(), detail));
        id
    }

    /// Cancel a delayed emission; returns false if it already fired
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.queue.cancel(id);
        self.delayed.remove(&id).is_some()
    }

    /// Dispatch all delayed events whose deadline has passed;
    /// returns how many fired
    pub fn poll(&mut self) -> usize {
        let ready = self.queue.drain_ready();
        let mut fired = 0;

        for id in ready {
            if let Some((name, detail)) = self.delayed.remove(&id) {
                self.emit(&name, &detail);
                fired += 1;
            }
        }

        fired
    }

    /// Check whether delayed emissions are pending
    pub fn has_pending(&self) -> bool {
        !self.delayed.is_empty()
    }

    /// Count listeners registered for a name
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map(|l| l.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_emit_in_registration_order() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        bus.on("change", move |_| s.borrow_mut().push("first"));
        let s = seen.clone();
        bus.on("change", move |_| s.borrow_mut().push("second"));

        bus.emit("change", &json!({"field": "title"}));
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_off_unsubscribes() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        let id = bus.on("tick", move |_| *c.borrow_mut() += 1);

        bus.emit("tick", &Value::Null);
        assert!(bus.off(id));
        bus.emit("tick", &Value::Null);

        assert_eq!(*count.borrow(), 1);
        assert!(!bus.off(id));
    }

    #[test]
    fn test_emit_without_listeners() {
        let mut bus = EventBus::new();
        bus.emit("nobody-home", &Value::Null);
        assert_eq!(bus.listener_count("nobody-home"), 0);
    }

    #[test]
    fn test_delayed_emit_fires_on_poll() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        bus.on("saved", move |detail| {
            s.borrow_mut().push(detail.clone());
        });

        bus.emit_after("saved", json!({"key": "draft"}), Duration::from_millis(2));
        assert_eq!(bus.poll(), 0);
        assert!(seen.borrow().is_empty());

        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(bus.poll(), 1);
        assert_eq!(*seen.borrow(), vec![json!({"key": "draft"})]);
        assert!(!bus.has_pending());
    }

    #[test]
    fn test_cancel_suppresses_delayed_emit() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));

        let c = count.clone();
        bus.on("saved", move |_| *c.borrow_mut() += 1);

        let id = bus.emit_after("saved", Value::Null, Duration::ZERO);
        assert!(bus.cancel(id));

        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(bus.poll(), 0);
        assert_eq!(*count.borrow(), 0);
    }
}
