//! Storage errors

use thiserror::Error;

/// Errors surfaced by storage area writes
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage area is disabled")]
    Disabled,

    #[error("quota exceeded: {needed} bytes needed, {available} available")]
    QuotaExceeded { needed: usize, available: usize },
}
