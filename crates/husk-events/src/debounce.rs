//! Debounce helper
//!
//! Trailing-edge debounce: a burst of calls delivers only the last value,
//! once the quiet period has elapsed.

use std::time::{Duration, Instant};

/// Debounced callback
pub struct Debouncer<T> {
    delay: Duration,
    callback: Box<dyn FnMut(T)>,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with a quiet period
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: FnMut(T) + 'static,
    {
        Self {
            delay,
            callback: Box::new(callback),
            pending: None,
        }
    }

    /// Record a call; re-arms the quiet-period deadline
    pub fn call(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    /// Fire the callback if the quiet period has elapsed;
    /// returns true if it fired
    pub fn poll(&mut self) -> bool {
        let due = matches!(&self.pending, Some((_, deadline)) if *deadline <= Instant::now());
        if !due {
            return false;
        }
        self.flush()
    }

    /// Fire immediately if a call is pending
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some((value, _)) => {
                (self.callback)(value);
                true
            }
            None => false,
        }
    }

    /// Drop any pending call without firing
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Check whether a call is waiting out the quiet period
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }
}
