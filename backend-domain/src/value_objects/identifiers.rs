// Identifier value objects

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical player identifier: 36-char hyphenated hex, 8-4-4-4-12.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Wraps an identifier that already came from a trusted place
    /// (the caller's identifier-shaped input or the history table).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Converts a directory id (32 hex digits, no hyphens) into canonical form.
    pub fn from_compact(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.len() != 32 || !raw.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        let id = Uuid::parse_str(raw).ok()?;
        Some(Self(id.hyphenated().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Loose shape check: 32 to 36 chars of hex digits and hyphens.
pub fn looks_like_identifier(value: &str) -> bool {
    (32..=36).contains(&value.len()) && value.chars().all(|ch| ch.is_ascii_hexdigit() || ch == '-')
}
