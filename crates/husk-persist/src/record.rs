//! Stored records
//!
//! The wire format is a single JSON object per key:
//! `{"data": <value>, "expiration": <number|"session">}`.
//! The number is an absolute unix-epoch instant in milliseconds; the
//! string `"session"` is the marker for session-lifetime records.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Default time-to-live when none is given: 7 days
pub const DEFAULT_TTL: Duration = Duration::from_millis(604_800_000);

/// Current wall-clock time in unix-epoch milliseconds
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// When a record stops being valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    /// Absolute unix-epoch instant in milliseconds
    At(u64),
    /// Valid until the session ends
    Session,
}

impl Expiration {
    /// Absolute expiry a duration from now
    pub fn after(ttl: Duration) -> Self {
        Expiration::At(now_millis() + ttl.as_millis() as u64)
    }

    /// Check against the wall clock; session records never expire
    pub fn is_past(&self, now: u64) -> bool {
        match self {
            Expiration::At(instant) => *instant < now,
            Expiration::Session => false,
        }
    }
}

impl Serialize for Expiration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Expiration::At(instant) => serializer.serialize_u64(*instant),
            Expiration::Session => serializer.serialize_str("session"),
        }
    }
}

struct ExpirationVisitor;

impl<'de> Visitor<'de> for ExpirationVisitor {
    type Value = Expiration;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a unix-millisecond instant or the string \"session\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Expiration, E> {
        Ok(Expiration::At(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Expiration, E> {
        if v < 0 {
            return Err(E::custom("negative expiration instant"));
        }
        Ok(Expiration::At(v as u64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Expiration, E> {
        if v == "session" {
            Ok(Expiration::Session)
        } else {
            Err(E::custom(format!("unknown expiration marker: {:?}", v)))
        }
    }
}

impl<'de> Deserialize<'de> for Expiration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExpirationVisitor)
    }
}

/// One keyed record as it sits in a backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRecord {
    pub data: serde_json::Value,
    pub expiration: Expiration,
}

impl StoredRecord {
    pub fn new(data: serde_json::Value, expiration: Expiration) -> Self {
        Self { data, expiration }
    }
}
