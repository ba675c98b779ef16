//! Cookie jar
//!
//! A document-scoped cookie store addressed as a semicolon-separated
//! `name=value` list with `expires` and `path` attributes.

use crate::encode::{percent_decode, percent_encode};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in unix-epoch milliseconds
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// A cookie
///
/// `value` holds the decoded text; percent encoding is applied when the
/// cookie is rendered into a header line and undone when one is parsed.
#[derive(Debug, Clone)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    /// Unix-epoch milliseconds; `None` means session cookie
    pub expires: Option<u64>,
}

impl Cookie {
    /// Create a new session cookie
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            path: "/".to_string(),
            expires: None,
        }
    }

    /// Create a cookie expiring at an absolute instant
    pub fn expiring_at(name: &str, value: &str, expires: u64) -> Self {
        let mut cookie = Self::new(name, value);
        cookie.expires = Some(expires);
        cookie
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires) = self.expires {
            expires < now_millis()
        } else {
            false // Session cookies don't expire
        }
    }

    /// Parse a `name=value; attr=value` cookie line
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        if name.trim().is_empty() {
            return None;
        }
        let mut cookie = Cookie::new(name.trim(), &percent_decode(value.trim()));

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                match attr.trim().to_lowercase().as_str() {
                    "path" => cookie.path = val.trim().to_string(),
                    "expires" => {
                        if let Ok(ms) = val.trim().parse::<u64>() {
                            cookie.expires = Some(ms);
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.trim().parse::<u64>() {
                            cookie.expires = Some(now_millis() + secs * 1000);
                        }
                    }
                    _ => {}
                }
            }
        }

        Some(cookie)
    }

    /// Render as a `name=value` pair
    pub fn to_pair(&self) -> String {
        format!("{}={}", self.name, percent_encode(&self.value))
    }

    /// Render as a full cookie line with attributes
    pub fn to_line(&self) -> String {
        let mut line = self.to_pair();
        if let Some(expires) = self.expires {
            line.push_str(&format!("; expires={}", expires));
        }
        line.push_str(&format!("; path={}", self.path));
        line
    }
}

/// Cookie jar - stores and manages cookies for one document
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: HashMap<String, Cookie>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie
    ///
    /// Adding an already-expired cookie deletes any live copy under the
    /// same name instead of storing it.
    pub fn set(&mut self, cookie: Cookie) {
        if cookie.is_expired() {
            self.cookies.remove(&cookie.name);
            return;
        }
        self.cookies.insert(cookie.name.clone(), cookie);
    }

    /// Store a value under a name, with optional absolute expiry
    pub fn set_value(&mut self, name: &str, value: &str, expires: Option<u64>) {
        let mut cookie = Cookie::new(name, value);
        cookie.expires = expires;
        self.set(cookie);
    }

    /// Get a cookie by name, dropping it if it has expired
    pub fn get(&mut self, name: &str) -> Option<&Cookie> {
        if self.cookies.get(name).is_some_and(|c| c.is_expired()) {
            self.cookies.remove(name);
            return None;
        }
        self.cookies.get(name)
    }

    /// Get a cookie value by name
    pub fn value(&mut self, name: &str) -> Option<String> {
        self.get(name).map(|c| c.value.clone())
    }

    /// Neutralize a cookie by writing an immediately-expired one
    pub fn remove(&mut self, name: &str) {
        self.set(Cookie::expiring_at(name, "", 0));
    }

    /// Build the `name=value; name=value` header line
    pub fn header(&self) -> String {
        self.cookies
            .values()
            .filter(|c| !c.is_expired())
            .map(|c| c.to_pair())
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Parse a cookie line and add the result to the jar
    pub fn parse_set(&mut self, line: &str) -> bool {
        match Cookie::parse(line) {
            Some(cookie) => {
                self.set(cookie);
                true
            }
            None => {
                tracing::debug!("ignoring malformed cookie line: {}", line);
                false
            }
        }
    }

    /// Clear expired cookies
    pub fn clear_expired(&mut self) {
        self.cookies.retain(|_, c| !c.is_expired());
    }

    /// Clear all cookies
    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    /// Count live cookies
    pub fn len(&self) -> usize {
        self.cookies.values().filter(|c| !c.is_expired()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
