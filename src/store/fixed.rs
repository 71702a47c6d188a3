//! Read-only backend.

use async_trait::async_trait;

use crate::backend::{Backend, RecordReader};
use crate::capability::Capabilities;
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordId};

/// A catalog fixed at construction.
///
/// Implements only the `read` contract. It can be handed to any consumer
/// that reads, and cannot be handed to one that removes or inserts.
pub struct FixedCatalog {
    capabilities: Capabilities,
    records: Vec<Record>,
}

impl FixedCatalog {
    /// Create a catalog holding `names` at ids `0..n`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let records = names
            .into_iter()
            .zip(0u64..)
            .map(|(name, id)| Record::new(id, name))
            .collect();
        Self {
            capabilities: Capabilities::read_only("fixed"),
            records,
        }
    }
}

impl Backend for FixedCatalog {
    fn name(&self) -> &str {
        "fixed"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

#[async_trait]
impl RecordReader for FixedCatalog {
    async fn list(&self) -> StoreResult<Vec<Record>> {
        Ok(self.records.clone())
    }

    async fn get(&self, id: RecordId) -> StoreResult<Record> {
        self.records
            .binary_search_by_key(&id, |record| record.id)
            .map(|pos| self.records[pos].clone())
            .map_err(|_| StoreError::NotFound(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.records.len())
    }
}
