//! Consumers.
//!
//! Each consumer holds one `Arc<dyn Contract>` field per contract it needs,
//! set once in `new()`. A consumer never learns which backend it was given:
//! it forwards to the contract, adds logging and validation around the call,
//! and returns the backend's result or failure unchanged.
//!
//! | Consumer | Contracts |
//! |----------|-----------|
//! | [`Catalog`] | read |
//! | [`Directory`] | read, remove |
//! | [`Enrollment`] | write |

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{RecordReader, RecordRemover, RecordWriter};
use crate::error::{StoreError, StoreResult};
use crate::policy::NamePolicy;
use crate::record::{Record, RecordId};

/// Read-only view over a backend.
#[derive(Clone)]
pub struct Catalog {
    reader: Arc<dyn RecordReader>,
}

impl Catalog {
    /// Create a catalog over any readable backend.
    pub fn new(reader: Arc<dyn RecordReader>) -> Self {
        Self { reader }
    }

    /// All records, in id order.
    pub async fn list(&self) -> StoreResult<Vec<Record>> {
        debug!(backend = self.reader.name(), "list");
        self.reader.list().await
    }

    /// All record names, in id order.
    pub async fn names(&self) -> StoreResult<Vec<String>> {
        Ok(self.list().await?.into_iter().map(|r| r.name).collect())
    }

    /// Look up one record.
    pub async fn find(&self, id: RecordId) -> StoreResult<Record> {
        debug!(backend = self.reader.name(), %id, "get");
        self.reader.get(id).await
    }

    /// First record with exactly this name.
    pub async fn find_by_name(&self, name: &str) -> StoreResult<Option<Record>> {
        Ok(self.list().await?.into_iter().find(|r| r.name == name))
    }

    /// Number of records.
    pub async fn count(&self) -> StoreResult<usize> {
        self.reader.count().await
    }
}

/// Listing and removal.
#[derive(Clone)]
pub struct Directory {
    reader: Arc<dyn RecordReader>,
    remover: Arc<dyn RecordRemover>,
}

impl Directory {
    /// Create a directory.
    ///
    /// `reader` and `remover` are usually the same backend handed over as
    /// two contracts.
    pub fn new(reader: Arc<dyn RecordReader>, remover: Arc<dyn RecordRemover>) -> Self {
        Self { reader, remover }
    }

    /// All records, in id order.
    pub async fn list(&self) -> StoreResult<Vec<Record>> {
        debug!(backend = self.reader.name(), "list");
        self.reader.list().await
    }

    /// Whether a record with this id exists.
    pub async fn contains(&self, id: RecordId) -> StoreResult<bool> {
        match self.reader.get(id).await {
            Ok(_) => Ok(true),
            Err(StoreError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Remove a record.
    pub async fn remove(&self, id: RecordId) -> StoreResult<Record> {
        match self.remover.remove(id).await {
            Ok(record) => {
                info!(backend = self.remover.name(), %id, name = %record.name, "record removed");
                Ok(record)
            }
            Err(err) => {
                warn!(backend = self.remover.name(), %id, error = %err, "remove failed");
                Err(err)
            }
        }
    }

    /// Remove a record by an id given as text.
    ///
    /// Fails with [`StoreError::InvalidInput`] before touching the backend
    /// unless `raw` is a non-negative integer.
    pub async fn remove_raw(&self, raw: &str) -> StoreResult<Record> {
        let id = raw.parse::<RecordId>().inspect_err(|err| {
            warn!(input = raw, error = %err, "rejected record id");
        })?;
        self.remove(id).await
    }
}

/// Validated insertion.
#[derive(Clone)]
pub struct Enrollment {
    writer: Arc<dyn RecordWriter>,
    policy: NamePolicy,
}

impl Enrollment {
    /// Create an enrollment with the default [`NamePolicy`].
    pub fn new(writer: Arc<dyn RecordWriter>) -> Self {
        Self::with_policy(writer, NamePolicy::default())
    }

    /// Create an enrollment with an explicit policy.
    pub fn with_policy(writer: Arc<dyn RecordWriter>, policy: NamePolicy) -> Self {
        Self { writer, policy }
    }

    /// The policy names are checked against.
    pub fn policy(&self) -> &NamePolicy {
        &self.policy
    }

    /// Add a record after normalising its name.
    pub async fn enroll(&self, name: &str) -> StoreResult<RecordId> {
        let name = self.policy.normalize(name).inspect_err(|err| {
            warn!(error = %err, "rejected name");
        })?;
        let id = self.writer.insert(&name).await?;
        info!(backend = self.writer.name(), %id, %name, "record enrolled");
        Ok(id)
    }
}
