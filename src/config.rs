//! Store configuration.
//!
//! The composition root can be driven by a TOML file:
//!
//! ```toml
//! backend = "memory"          # memory | indexed | fixed
//! records = ["Jane", "John", "Goku", "Vegeta"]
//! timeout_ms = 250            # optional per-call deadline
//!
//! [policy]
//! max_len = 64
//! ```
//!
//! Every field is optional. Read and parse failures are reported as
//! [`StoreError::Configuration`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::policy::NamePolicy;

/// Which concrete backend the composition root builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// [`MemoryStore`](crate::MemoryStore)
    #[default]
    Memory,
    /// [`IndexedStore`](crate::IndexedStore)
    Indexed,
    /// [`FixedCatalog`](crate::FixedCatalog)
    Fixed,
}

impl BackendKind {
    /// Get the backend name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Indexed => "indexed",
            BackendKind::Fixed => "fixed",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "indexed" => Ok(BackendKind::Indexed),
            "fixed" => Ok(BackendKind::Fixed),
            _ => Err(StoreError::Configuration(format!(
                "unknown backend '{s}' (expected memory, indexed or fixed)"
            ))),
        }
    }
}

/// Configuration for [`Wiring::from_config`](crate::Wiring::from_config).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Backend to build.
    pub backend: BackendKind,
    /// Initial records, stored at ids `0..n`.
    pub records: Vec<String>,
    /// Per-call deadline in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Name policy for enrollment.
    pub policy: NamePolicy,
}

impl StoreConfig {
    /// Create a config for `backend` with defaults elsewhere.
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            ..Self::default()
        }
    }

    /// Set the initial records.
    pub fn with_records<I, S>(mut self, records: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.records = records.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-call deadline, rounded up to whole milliseconds.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let ms = timeout.as_micros().div_ceil(1000);
        self.timeout_ms = Some(u64::try_from(ms).unwrap_or(u64::MAX));
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> StoreResult<Self> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| StoreError::Configuration(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> StoreResult<()> {
        if self.timeout_ms == Some(0) {
            return Err(StoreError::Configuration(
                "timeout_ms must be greater than zero".into(),
            ));
        }
        if self.policy.max_len == 0 {
            return Err(StoreError::Configuration(
                "policy.max_len must be greater than zero".into(),
            ));
        }
        if let Some(pos) = self.records.iter().position(|r| r.trim().is_empty()) {
            return Err(StoreError::Configuration(format!(
                "records[{pos}] is empty"
            )));
        }
        Ok(())
    }

    /// Per-call deadline, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
