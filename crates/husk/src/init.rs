//! One-time setup
//!
//! Process-wide initialization behind an explicit guard, instead of
//! relying on ambient load order. Teardown is process exit: a global
//! tracing subscriber cannot be uninstalled, so repeated calls no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Install the tracing subscriber and mark the process ready.
///
/// Idempotent: returns true only on the call that performed the setup.
/// Respects `RUST_LOG`, defaulting to `info`.
pub fn init() -> bool {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return false;
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .try_init();

    tracing::debug!("husk initialized");
    true
}

/// Check the initialization guard
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_runs_exactly_once() {
        assert!(init());
        assert!(is_initialized());
        assert!(!init());
        assert!(is_initialized());
    }
}
