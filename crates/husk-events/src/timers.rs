//! Timer queue
//!
//! One-shot timer bookkeeping on the monotonic clock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct TimerEntry {
    deadline: Instant,
}

/// Timer queue
#[derive(Debug, Default)]
pub struct TimerQueue {
    timers: HashMap<u64, TimerEntry>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer
    pub fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;

        self.timers.insert(
            id,
            TimerEntry {
                deadline: Instant::now() + delay,
            },
        );
        TimerId(id)
    }

    /// Cancel a timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id.0).is_some()
    }

    /// Remove and return all timers whose deadline has passed,
    /// ordered by deadline
    pub fn drain_ready(&mut self) -> Vec<TimerId> {
        let now = Instant::now();
        let mut ready: Vec<(u64, Instant)> = self
            .timers
            .iter()
            .filter(|(_, entry)| entry.deadline <= now)
            .map(|(&id, entry)| (id, entry.deadline))
            .collect();

        ready.sort_by_key(|&(_, deadline)| deadline);

        for (id, _) in &ready {
            self.timers.remove(id);
        }

        ready.into_iter().map(|(id, _)| TimerId(id)).collect()
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Get time until the next timer fires
    pub fn time_until_next(&self) -> Option<Duration> {
        let now = Instant::now();

        self.timers
            .values()
            .map(|entry| entry.deadline.saturating_duration_since(now))
            .min()
    }
}
