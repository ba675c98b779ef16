//! husk events
//!
//! Custom event dispatch with optional delayed delivery, plus a
//! trailing-edge debounce helper.
//!
//! Nothing here blocks: delayed work is recorded on a timer queue and takes
//! effect when the caller next polls.

mod bus;
mod debounce;
mod timers;

pub use bus::{EventBus, ListenerId};
pub use debounce::Debouncer;
pub use timers::{TimerId, TimerQueue};
