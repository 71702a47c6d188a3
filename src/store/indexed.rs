//! Vector-backed backend with a hash index.

use std::sync::Mutex;

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::lock;
use crate::backend::{Backend, RecordReader, RecordRemover, RecordWriter, validate_name};
use crate::capability::Capabilities;
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordId};

/// In-memory backend storing records contiguously.
///
/// `positions` maps every held id to its slot in `records`. Lookups are
/// constant time; removal shifts the tail and re-indexes it.
pub struct IndexedStore {
    capabilities: Capabilities,
    state: Mutex<IndexedState>,
}

#[derive(Default)]
struct IndexedState {
    records: Vec<Record>,
    positions: FxHashMap<RecordId, usize>,
    next_id: RecordId,
}

impl IndexedState {
    fn push(&mut self, name: String) -> RecordId {
        let id = self.next_id;
        self.positions.insert(id, self.records.len());
        self.records.push(Record::new(id, name));
        self.next_id = id.next();
        id
    }
}

impl IndexedStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            capabilities: Capabilities::full("indexed").with_feature("indexed-lookup"),
            state: Mutex::new(IndexedState::default()),
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
                state.push(name.into());
            }
        }
        store
    }
}

impl Default for IndexedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for IndexedStore {
    fn name(&self) -> &str {
        "indexed"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

#[async_trait]
impl RecordReader for IndexedStore {
    async fn list(&self) -> StoreResult<Vec<Record>> {
        Ok(lock(&self.state).records.clone())
    }

    async fn get(&self, id: RecordId) -> StoreResult<Record> {
        let state = lock(&self.state);
        state
            .positions
            .get(&id)
            .map(|&pos| state.records[pos].clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(lock(&self.state).records.len())
    }
}

#[async_trait]
impl RecordRemover for IndexedStore {
    async fn remove(&self, id: RecordId) -> StoreResult<Record> {
        let record = {
            let mut state = lock(&self.state);
            let pos = state.positions.remove(&id).ok_or(StoreError::NotFound(id))?;
            let record = state.records.remove(pos);
            let IndexedState {
                records, positions, ..
            } = &mut *state;
            for (slot, shifted) in records.iter().enumerate().skip(pos) {
                positions.insert(shifted.id, slot);
            }
            record
        };
        debug!(backend = "indexed", %id, "removed record");
        Ok(record)
    }
}

#[async_trait]
impl RecordWriter for IndexedStore {
    async fn insert(&self, name: &str) -> StoreResult<RecordId> {
        validate_name(name)?;
        let id = lock(&self.state).push(name.to_string());
        debug!(backend = "indexed", %id, "inserted record");
        Ok(id)
    }
}
