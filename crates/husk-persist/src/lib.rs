//! husk persistence
//!
//! A best-effort keyed store over three backends in priority order: the
//! session area, the durable area, and the cookie jar. Values are JSON
//! blobs of the form `{"data": <value>, "expiration": <number|"session">}`.
//!
//! Writes go to exactly one backend chosen by expiration policy; reads
//! scan every tier. Expired records are deleted the first time a read
//! finds them. No operation ever returns an error to the caller: failures
//! are logged and degrade to a no-op or "not found".

mod oplog;
mod record;
mod store;

pub use oplog::OpLog;
pub use record::{Expiration, StoredRecord, DEFAULT_TTL};
pub use store::{PersistenceStore, TierKind};
