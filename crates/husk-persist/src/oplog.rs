//! Operation log
//!
//! The persistence layer's only observable failure channel. Entries are
//! forwarded to `tracing` at debug level, but only while the injected
//! predicate holds; the default sink is a no-op.

type Predicate = Box<dyn Fn() -> bool + Send + Sync>;

/// Predicate-gated log sink for persistence operations
pub struct OpLog {
    enabled: Option<Predicate>,
}

impl OpLog {
    /// A sink that never emits
    pub fn off() -> Self {
        Self { enabled: None }
    }

    /// A sink that always emits
    pub fn on() -> Self {
        Self::with_predicate(|| true)
    }

    /// A sink gated by a caller-supplied predicate, checked per entry
    pub fn with_predicate<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            enabled: Some(Box::new(predicate)),
        }
    }

    /// Check the gate
    pub fn is_enabled(&self) -> bool {
        self.enabled.as_ref().map(|p| p()).unwrap_or(false)
    }

    /// Emit an entry for an operation on a key
    pub fn emit(&self, op: &str, key: &str, message: &str) {
        if self.is_enabled() {
            tracing::debug!(target: "husk_persist", op, key, "{}", message);
        }
    }
}

impl Default for OpLog {
    fn default() -> Self {
        Self::off()
    }
}

impl std::fmt::Debug for OpLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpLog")
            .field("gated", &self.enabled.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_default_is_off() {
        assert!(!OpLog::default().is_enabled());
    }

    #[test]
    fn test_predicate_gates_per_entry() {
        let flag = Arc::new(AtomicBool::new(false));
        let f = flag.clone();
        let log = OpLog::with_predicate(move || f.load(Ordering::Relaxed));

        assert!(!log.is_enabled());
        flag.store(true, Ordering::Relaxed);
        assert!(log.is_enabled());
    }

    #[test]
    fn test_emit_does_not_panic_when_off() {
        OpLog::off().emit("store", "k", "dropped");
    }
}
