// src/ignore_case.rs

//! Case-insensitive names
//!
//! Property names, item types, metadata names and evaluated includes coming
//! out of the build system are compared without regard to ASCII case. Item
//! includes additionally treat `/` and `\` as the same separator.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A string compared, ordered and hashed without regard to ASCII case
///
/// The original spelling is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IgnoreCase(String);

impl IgnoreCase {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    fn folded(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.bytes().map(|b| b.to_ascii_lowercase())
    }
}

impl PartialEq for IgnoreCase {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for IgnoreCase {}

impl PartialEq<str> for IgnoreCase {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl PartialEq<&str> for IgnoreCase {
    fn eq(&self, other: &&str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl Hash for IgnoreCase {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.folded() {
            state.write_u8(b);
        }
        state.write_u8(0xff);
    }
}

impl Ord for IgnoreCase {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded().cmp(other.folded())
    }
}

impl PartialOrd for IgnoreCase {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IgnoreCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IgnoreCase {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for IgnoreCase {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Normalize an item include for comparison: backslashes become forward
/// slashes, a leading `./` is dropped, and case is folded.
pub fn normalize_include(include: &str) -> String {
    let unified = include.trim().replace('\\', "/");
    let trimmed = unified.strip_prefix("./").unwrap_or(&unified);
    trimmed.to_ascii_lowercase()
}

/// Compare two item includes the way the build system does
pub fn same_include(a: &str, b: &str) -> bool {
    normalize_include(a) == normalize_include(b)
}
