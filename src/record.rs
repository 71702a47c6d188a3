//! Record types.
//!
//! A [`Record`] is the unit every backend stores. Its [`RecordId`] is issued
//! by the backend that holds it:
//!
//! ```text
//!   insert("Jane") ──→ 0      remove(0) ──→ Ok(Jane)
//!   insert("John") ──→ 1      remove(0) ──→ Err(NotFound(0))
//! ```
//!
//! **Invariants:**
//! - Ids are non-negative integers.
//! - A backend never reissues an id, so a removed id stays not-found.
//! - Equality is field-based: two records are equal iff their ids and names
//!   are equal, regardless of which backend produced them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Identifier of a record within one backend.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl RecordId {
    /// Create a new record ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for RecordId {
    type Err = StoreError;

    /// Parse a record id from user text.
    ///
    /// Fails with [`StoreError::InvalidInput`] on anything that is not a
    /// non-negative integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed.parse::<u64>().map(Self).map_err(|_| {
            StoreError::InvalidInput(format!(
                "record id must be a non-negative integer, got {trimmed:?}"
            ))
        })
    }
}

/// A stored record.
///
/// `Clone` is a full copy: a record owns all of its data, so a clone never
/// aliases the original.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Backend-issued identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
}

impl Record {
    /// Create a new record.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.id, self.name)
    }
}
