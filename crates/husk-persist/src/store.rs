//! Tiered persistence store
//!
//! Writes pick exactly one backend by expiration policy (session area for
//! session records, durable area otherwise, cookie jar when the chosen
//! area refuses). Reads scan the tiers in priority order and delete
//! expired records on sight.

use crate::oplog::OpLog;
use crate::record::{now_millis, Expiration, StoredRecord, DEFAULT_TTL};
use husk_storage::{CookieJar, StorageArea, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Which backend a record sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    Session,
    Durable,
    Cookie,
}

/// Uniform capability over the three backends
trait Tier {
    fn is_available(&self) -> bool;
    fn read(&mut self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, raw: &str, expiration: &Expiration)
        -> Result<(), StorageError>;
    fn delete(&mut self, key: &str);
}

impl Tier for StorageArea {
    fn is_available(&self) -> bool {
        StorageArea::is_available(self)
    }

    fn read(&mut self, key: &str) -> Option<String> {
        self.get_item(key).map(|s| s.to_string())
    }

    fn write(
        &mut self,
        key: &str,
        raw: &str,
        _expiration: &Expiration,
    ) -> Result<(), StorageError> {
        self.set_item(key, raw)
    }

    fn delete(&mut self, key: &str) {
        self.remove_item(key);
    }
}

impl Tier for CookieJar {
    fn is_available(&self) -> bool {
        true // last-resort tier
    }

    fn read(&mut self, key: &str) -> Option<String> {
        self.value(key)
    }

    fn write(
        &mut self,
        key: &str,
        raw: &str,
        expiration: &Expiration,
    ) -> Result<(), StorageError> {
        let expires = match expiration {
            Expiration::At(instant) => Some(*instant),
            Expiration::Session => None,
        };
        self.set_value(key, raw, expires);
        Ok(())
    }

    fn delete(&mut self, key: &str) {
        // Neutralize with an immediately-expired cookie
        self.remove(key);
    }
}

/// Keyed, optionally-expiring persistence across three backends
///
/// All operations are best-effort: invalid keys, refused backends and
/// unparseable records are logged through the [`OpLog`] and degrade to a
/// no-op or `None`. Nothing is ever returned as an error.
#[derive(Debug)]
pub struct PersistenceStore {
    session: StorageArea,
    durable: StorageArea,
    cookies: CookieJar,
    log: OpLog,
}

impl PersistenceStore {
    /// Create a store with in-memory areas
    ///
    /// The durable tier keeps its priority position but only outlives the
    /// value when the store is created with [`PersistenceStore::open`].
    pub fn new() -> Self {
        Self {
            session: StorageArea::session(),
            durable: StorageArea::session(),
            cookies: CookieJar::new(),
            log: OpLog::off(),
        }
    }

    /// Create a store whose durable area is backed by a file
    pub fn open(path: PathBuf) -> Self {
        Self {
            durable: StorageArea::local(path),
            ..Self::new()
        }
    }

    /// Create a store from explicit backends
    pub fn with_areas(session: StorageArea, durable: StorageArea, cookies: CookieJar) -> Self {
        Self {
            session,
            durable,
            cookies,
            log: OpLog::off(),
        }
    }

    /// Attach an operation log
    pub fn with_log(mut self, log: OpLog) -> Self {
        self.log = log;
        self
    }

    pub fn session_area(&self) -> &StorageArea {
        &self.session
    }

    pub fn session_area_mut(&mut self) -> &mut StorageArea {
        &mut self.session
    }

    pub fn durable_area(&self) -> &StorageArea {
        &self.durable
    }

    pub fn durable_area_mut(&mut self) -> &mut StorageArea {
        &mut self.durable
    }

    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookies
    }

    pub fn cookie_jar_mut(&mut self) -> &mut CookieJar {
        &mut self.cookies
    }

    /// Store a value with the default 7-day time-to-live
    pub fn store<T: Serialize>(&mut self, key: &str, data: &T) {
        self.store_record(key, data, Expiration::after(DEFAULT_TTL));
    }

    /// Store a value expiring a duration from now
    pub fn store_for<T: Serialize>(&mut self, key: &str, data: &T, ttl: Duration) {
        self.store_record(key, data, Expiration::after(ttl));
    }

    /// Store a value for the lifetime of the session
    pub fn store_session<T: Serialize>(&mut self, key: &str, data: &T) {
        self.store_record(key, data, Expiration::Session);
    }

    fn store_record<T: Serialize>(&mut self, key: &str, data: &T, expiration: Expiration) {
        if key.is_empty() {
            self.log.emit("store", key, "empty key, dropping write");
            return;
        }

        let data = match serde_json::to_value(data) {
            Ok(value) => value,
            Err(e) => {
                self.log
                    .emit("store", key, &format!("unserializable value: {}", e));
                return;
            }
        };
        let record = StoredRecord::new(data, expiration);
        let raw = match serde_json::to_string(&record) {
            Ok(raw) => raw,
            Err(e) => {
                self.log
                    .emit("store", key, &format!("unserializable record: {}", e));
                return;
            }
        };

        // Exactly one backend gets the write; stale copies elsewhere are
        // left alone and shadowed by read priority.
        let use_session = record.expiration == Expiration::Session;
        let chosen: &mut dyn Tier = if use_session {
            &mut self.session
        } else {
            &mut self.durable
        };

        let result = if chosen.is_available() {
            chosen.write(key, &raw, &record.expiration)
        } else {
            Err(StorageError::Disabled)
        };

        match result {
            Ok(()) => self.log.emit("store", key, "stored"),
            Err(e) => {
                self.log.emit(
                    "store",
                    key,
                    &format!("backend refused ({}), falling back to cookie", e),
                );
                if Tier::write(&mut self.cookies, key, &raw, &record.expiration).is_err() {
                    self.log.emit("store", key, "cookie fallback refused");
                }
            }
        }
    }

    /// Read a value back, `None` when no live record exists
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        if key.is_empty() {
            self.log.emit("get", key, "empty key");
            return None;
        }

        let mut candidate = None;
        {
            let (tiers, log) = self.split();
            for (kind, tier) in tiers {
                if !tier.is_available() {
                    continue;
                }
                let Some(raw) = tier.read(key) else {
                    continue;
                };
                let record: StoredRecord = match serde_json::from_str(&raw) {
                    Ok(record) => record,
                    Err(e) => {
                        log.emit("get", key, &format!("unparseable record ({:?}): {}", kind, e));
                        continue;
                    }
                };
                if kind == TierKind::Session && record.expiration != Expiration::Session {
                    // Foreign record in the session tier; keep scanning
                    log.emit("get", key, "session tier holds a non-session record");
                    continue;
                }
                candidate = Some(record);
                break;
            }
        }

        let record = candidate?;
        if record.expiration.is_past(now_millis()) {
            self.log.emit("get", key, "record expired, removing");
            self.remove(key);
            return None;
        }

        match serde_json::from_value(record.data) {
            Ok(value) => Some(value),
            Err(e) => {
                self.log
                    .emit("get", key, &format!("payload does not deserialize: {}", e));
                None
            }
        }
    }

    /// Delete a key from every tier; removing an absent key is a no-op
    pub fn remove(&mut self, key: &str) {
        if key.is_empty() {
            self.log.emit("remove", key, "empty key");
            return;
        }

        let (tiers, _) = self.split();
        for (_, tier) in tiers {
            tier.delete(key);
        }
        self.log.emit("remove", key, "removed");
    }

    /// Report which tier currently holds a live record for a key
    pub fn tier_of(&mut self, key: &str) -> Option<TierKind> {
        if key.is_empty() {
            return None;
        }

        let now = now_millis();
        let (tiers, _) = self.split();
        for (kind, tier) in tiers {
            if !tier.is_available() {
                continue;
            }
            let Some(raw) = tier.read(key) else {
                continue;
            };
            if let Ok(record) = serde_json::from_str::<StoredRecord>(&raw) {
                if !record.expiration.is_past(now) {
                    return Some(kind);
                }
            }
        }
        None
    }

    /// Split into the ordered tier list and the log so a scan can borrow both
    fn split(&mut self) -> ([(TierKind, &mut dyn Tier); 3], &OpLog) {
        (
            [
                (TierKind::Session, &mut self.session as &mut dyn Tier),
                (TierKind::Durable, &mut self.durable as &mut dyn Tier),
                (TierKind::Cookie, &mut self.cookies as &mut dyn Tier),
            ],
            &self.log,
        )
    }
}

impl Default for PersistenceStore {
    fn default() -> Self {
        Self::new()
    }
}
