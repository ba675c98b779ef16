//! Storage areas
//!
//! Session-scoped and durable string-keyed storage.

use crate::StorageError;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// A string-keyed storage area.
///
/// Session areas live in memory and die with the value. Durable areas are
/// backed by a file: contents are loaded at open and rewritten on every
/// mutation. Keys and values must not contain tab or newline characters;
/// JSON-serialized values never do.
#[derive(Debug, Default)]
pub struct StorageArea {
    data: HashMap<String, String>,
    persistent: bool,
    path: Option<PathBuf>,
    disabled: bool,
    quota: Option<usize>,
    used: usize,
}

impl StorageArea {
    /// Create an in-memory session area
    pub fn session() -> Self {
        Self {
            data: HashMap::new(),
            persistent: false,
            path: None,
            disabled: false,
            quota: None,
            used: 0,
        }
    }

    /// Create a durable area backed by a file
    pub fn local(path: PathBuf) -> Self {
        let mut area = Self {
            data: HashMap::new(),
            persistent: true,
            path: Some(path.clone()),
            disabled: false,
            quota: None,
            used: 0,
        };

        // Load existing data
        if path.exists() {
            if let Ok(contents) = fs::read_to_string(&path) {
                for line in contents.lines() {
                    if let Some((key, value)) = line.split_once('\t') {
                        area.used += key.len() + value.len();
                        area.data.insert(key.to_string(), value.to_string());
                    }
                }
            }
        }

        area
    }

    /// Set a byte quota for this area
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota = Some(bytes);
        self
    }

    /// Whether this area survives the session
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Whether the area accepts reads and writes
    pub fn is_available(&self) -> bool {
        !self.disabled
    }

    /// Disable or re-enable the area
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Get item
    pub fn get_item(&self, key: &str) -> Option<&str> {
        if self.disabled {
            return None;
        }
        self.data.get(key).map(|s| s.as_str())
    }

    /// Set item
    pub fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.disabled {
            return Err(StorageError::Disabled);
        }

        let cost = key.len() + value.len();
        let freed = self.data.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
        if let Some(quota) = self.quota {
            let needed = self.used - freed + cost;
            if needed > quota {
                return Err(StorageError::QuotaExceeded {
                    needed,
                    available: quota.saturating_sub(self.used - freed),
                });
            }
        }

        self.used = self.used - freed + cost;
        self.data.insert(key.to_string(), value.to_string());
        self.persist();
        Ok(())
    }

    /// Remove item
    pub fn remove_item(&mut self, key: &str) {
        if self.disabled {
            return;
        }
        if let Some(value) = self.data.remove(key) {
            self.used -= key.len() + value.len();
            self.persist();
        }
    }

    /// Clear all items
    pub fn clear(&mut self) {
        if self.disabled {
            return;
        }
        self.data.clear();
        self.used = 0;
        self.persist();
    }

    /// Get key at index
    pub fn key(&self, index: usize) -> Option<&str> {
        self.data.keys().nth(index).map(|s| s.as_str())
    }

    /// Get number of items
    pub fn length(&self) -> usize {
        self.data.len()
    }

    /// Check whether a key is present
    pub fn contains(&self, key: &str) -> bool {
        !self.disabled && self.data.contains_key(key)
    }

    /// Persist to disk if durable
    fn persist(&self) {
        if self.persistent {
            if let Some(path) = &self.path {
                let contents: String = self
                    .data
                    .iter()
                    .map(|(k, v)| format!("{}\t{}", k, v))
                    .collect::<Vec<_>>()
                    .join("\n");
                if let Err(e) = fs::write(path, contents) {
                    tracing::warn!("failed to persist storage area to {:?}: {}", path, e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_area() {
        let mut area = StorageArea::session();

        area.set_item("key1", "value1").unwrap();
        assert_eq!(area.get_item("key1"), Some("value1"));

        area.set_item("key2", "value2").unwrap();
        assert_eq!(area.length(), 2);

        area.remove_item("key1");
        assert_eq!(area.get_item("key1"), None);

        area.clear();
        assert_eq!(area.length(), 0);
    }

    #[test]
    fn test_area_key() {
        let mut area = StorageArea::session();
        area.set_item("a", "1").unwrap();
        area.set_item("b", "2").unwrap();

        // Keys may be in any order
        assert!(area.key(0).is_some());
        assert!(area.key(1).is_some());
        assert!(area.key(2).is_none());
    }

    #[test]
    fn test_disabled_area() {
        let mut area = StorageArea::session();
        area.set_item("k", "v").unwrap();
        area.set_disabled(true);

        assert!(!area.is_available());
        assert_eq!(area.get_item("k"), None);
        assert!(matches!(
            area.set_item("k", "v2"),
            Err(StorageError::Disabled)
        ));

        area.set_disabled(false);
        assert_eq!(area.get_item("k"), Some("v"));
    }

    #[test]
    fn test_quota() {
        let mut area = StorageArea::session().with_quota(10);
        area.set_item("abc", "def").unwrap();

        assert!(matches!(
            area.set_item("long", "payload"),
            Err(StorageError::QuotaExceeded { .. })
        ));

        // Overwrites are charged by delta, not by sum
        area.set_item("abc", "xyzw").unwrap();
        assert_eq!(area.get_item("abc"), Some("xyzw"));
    }

    #[test]
    fn test_durable_round_trip() {
        let path = std::env::temp_dir().join("husk-area-test.tsv");
        let _ = std::fs::remove_file(&path);

        {
            let mut area = StorageArea::local(path.clone());
            area.set_item("saved", "across sessions").unwrap();
        }

        let area = StorageArea::local(path.clone());
        assert_eq!(area.get_item("saved"), Some("across sessions"));
        assert!(area.is_persistent());

        let _ = std::fs::remove_file(&path);
    }
}
