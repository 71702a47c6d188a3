//! Ordered in-memory backend.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use super::lock;
use crate::backend::{Backend, RecordReader, RecordRemover, RecordWriter, validate_name};
use crate::capability::Capabilities;
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordId};

/// In-memory backend keyed by id.
///
/// Ids are issued in ascending order starting at 0, so iteration order of
/// the map is insertion order.
pub struct MemoryStore {
    capabilities: Capabilities,
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    records: BTreeMap<RecordId, String>,
    next_id: RecordId,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::full("memory").with_feature("ordered"),
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Create a store seeded with `names` at ids `0..n`.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        {
            let mut state = lock(&store.state);
            for name in names {
                let id = state.next_id;
                state.records.insert(id, name.into());
                state.next_id = id.next();
            }
        }
        store
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

#[async_trait]
impl RecordReader for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Record>> {
        let state = lock(&self.state);
        Ok(state
            .records
            .iter()
            .map(|(id, name)| Record::new(*id, name.clone()))
            .collect())
    }

    async fn get(&self, id: RecordId) -> StoreResult<Record> {
        lock(&self.state)
            .records
            .get(&id)
            .map(|name| Record::new(id, name.clone()))
            .ok_or(StoreError::NotFound(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(lock(&self.state).records.len())
    }
}

#[async_trait]
impl RecordRemover for MemoryStore {
    async fn remove(&self, id: RecordId) -> StoreResult<Record> {
        let name = lock(&self.state)
            .records
            .remove(&id)
            .ok_or(StoreError::NotFound(id))?;
        debug!(backend = "memory", %id, "removed record");
        Ok(Record::new(id, name))
    }
}

#[async_trait]
impl RecordWriter for MemoryStore {
    async fn insert(&self, name: &str) -> StoreResult<RecordId> {
        validate_name(name)?;
        let mut state = lock(&self.state);
        let id = state.next_id;
        state.records.insert(id, name.to_string());
        state.next_id = id.next();
        debug!(backend = "memory", %id, "inserted record");
        Ok(id)
    }
}
