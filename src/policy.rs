//! Name validation policy.

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Rules a record name must satisfy before it reaches a backend.
///
/// Held by value in the consumers that need it rather than baked into any
/// backend, so every backend sees the same normalised input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamePolicy {
    /// Maximum name length in characters, after trimming.
    pub max_len: usize,
    /// Strip leading and trailing whitespace.
    pub trim: bool,
}

impl Default for NamePolicy {
    fn default() -> Self {
        Self {
            max_len: 64,
            trim: true,
        }
    }
}

impl NamePolicy {
    /// Validate `raw` and return the name to store.
    pub fn normalize(&self, raw: &str) -> StoreResult<String> {
        let name = if self.trim { raw.trim() } else { raw };

        if name.is_empty() {
            return Err(StoreError::InvalidInput("name must not be empty".into()));
        }
        let len = name.chars().count();
        if len > self.max_len {
            return Err(StoreError::InvalidInput(format!(
                "name is {len} characters, at most {} allowed",
                self.max_len
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(StoreError::InvalidInput(
                "name must not contain control characters".into(),
            ));
        }
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims() {
        let policy = NamePolicy::default();
        assert_eq!(policy.normalize("  Goku ").unwrap(), "Goku");
    }

    #[test]
    fn test_normalize_rejects() {
        let policy = NamePolicy {
            max_len: 4,
            trim: true,
        };
        for bad in ["", "   ", "Vegeta", "Go\nku"] {
            assert!(
                matches!(policy.normalize(bad), Err(StoreError::InvalidInput(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn test_untrimmed_policy_counts_whitespace() {
        let policy = NamePolicy {
            max_len: 4,
            trim: false,
        };
        assert!(policy.normalize("Jane").is_ok());
        assert!(policy.normalize(" Jane").is_err());
    }
}
