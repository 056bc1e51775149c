use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::group::Color;

/// One group as written to storage. Tab and window ids are not kept; the
/// host assigns fresh ones on restoration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default)]
    pub tab_urls: Vec<Option<String>>,
}

/// Ordered groups of one window (or of every open window, for the live key).
pub type WindowSnapshot = Vec<PersistedGroup>;

/// Storage key a snapshot lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StorageKey {
    /// The live layout of all open windows, rewritten after every change.
    Current,
    /// The layout of one closed window. Numbers only ever increase.
    Closed(u64),
}

pub const CURRENT_KEY: &str = "current";

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKey::Current => f.write_str(CURRENT_KEY),
            StorageKey::Closed(seq) => write!(f, "{}", seq),
        }
    }
}

impl FromStr for StorageKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == CURRENT_KEY {
            return Ok(StorageKey::Current);
        }
        // Only plain decimal digits; "+1" or " 1" are not keys we wrote.
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("not a snapshot key: {:?}", s));
        }
        s.parse::<u64>()
            .map(StorageKey::Closed)
            .map_err(|e| format!("not a snapshot key: {:?} ({})", s, e))
    }
}
