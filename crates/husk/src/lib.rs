//! husk
//!
//! Thin, typed convenience wrappers over browser-style platform
//! primitives: storage areas, a cookie jar, tiered persistence with
//! expiration, custom events with delayed dispatch, debouncing, and URL
//! query extraction.
//!
//! Call [`init`] once at startup to wire up logging; every other entry
//! point is plain data in, plain data out.

mod init;
mod query;

pub use init::{init, is_initialized};
pub use query::{query_param, query_params};

pub use husk_events::{Debouncer, EventBus, ListenerId, TimerId, TimerQueue};
pub use husk_persist::{Expiration, OpLog, PersistenceStore, StoredRecord, TierKind, DEFAULT_TTL};
pub use husk_storage::{Cookie, CookieJar, StorageArea, StorageError};
