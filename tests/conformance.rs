//! Contract conformance across every backend.
//!
//! These tests run the public conformance checks against the bundled
//! backends, and show that backends breaking a contract's semantics are
//! rejected even though they type-check.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use record_contract::conformance::{
    SEED, check_reader, check_remover, check_store, check_substitutable, check_writer,
};
use record_contract::{
    Backend, BackendKind, Capabilities, DeadlineStore, FixedCatalog, IndexedStore, MemoryStore,
    Record, RecordId, RecordReader, RecordRemover, RecordWriter, StoreConfig, StoreError,
    StoreResult, Wiring,
};

fn deadline_memory(names: Vec<String>) -> DeadlineStore<MemoryStore> {
    DeadlineStore::new(MemoryStore::from_names(names), Duration::from_secs(1))
}

fn deadline_indexed(names: Vec<String>) -> DeadlineStore<IndexedStore> {
    DeadlineStore::new(IndexedStore::from_names(names), Duration::from_secs(1))
}

// ============================================================================
// Bundled backends
// ============================================================================

#[tokio::test]
async fn test_memory_store_conforms() {
    check_store(MemoryStore::from_names).await.unwrap();
}

#[tokio::test]
async fn test_indexed_store_conforms() {
    check_store(IndexedStore::from_names).await.unwrap();
}

#[tokio::test]
async fn test_deadline_wrappers_conform() {
    check_store(deadline_memory).await.unwrap();
    check_store(deadline_indexed).await.unwrap();
    check_reader(|names| DeadlineStore::new(FixedCatalog::new(names), Duration::from_secs(1)))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fixed_catalog_conforms_to_read() {
    check_reader(FixedCatalog::new).await.unwrap();
}

#[tokio::test]
async fn test_backends_are_substitutable() {
    check_substitutable(MemoryStore::from_names, IndexedStore::from_names)
        .await
        .unwrap();
    check_substitutable(IndexedStore::from_names, deadline_memory)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_not_found_leaves_count_unchanged_for_every_backend() {
    let memory = MemoryStore::from_names(SEED);
    let indexed = IndexedStore::from_names(SEED);
    let removers: [&dyn RecordRemoverReader; 2] = [&memory, &indexed];

    for backend in removers {
        for id in (SEED.len() as u64..64).step_by(7) {
            let err = backend.remove(RecordId(id)).await.unwrap_err();
            assert!(err.is_not_found(), "{}: remove({id}) gave {err}", backend.name());
            assert_eq!(backend.count().await.unwrap(), SEED.len());
        }
    }
}

/// Local union so the test can hold both backends as one trait object.
trait RecordRemoverReader: RecordReader + RecordRemover {}

impl<T: RecordReader + RecordRemover> RecordRemoverReader for T {}

#[tokio::test]
async fn test_consumers_agree_across_configured_backends() {
    let mut listings = Vec::new();
    for kind in [BackendKind::Memory, BackendKind::Indexed] {
        let config = StoreConfig::new(kind).with_records(SEED);
        let wiring = Wiring::from_config(&config).unwrap();
        let directory = wiring.directory().unwrap();
        let enrollment = wiring.enrollment().unwrap();

        directory.remove(RecordId(2)).await.unwrap();
        assert!(directory.remove(RecordId(2)).await.unwrap_err().is_not_found());
        let id = enrollment.enroll("Bulma").await.unwrap();
        listings.push((id, wiring.catalog().list().await.unwrap()));
    }
    assert_eq!(listings[0], listings[1]);
    assert_eq!(
        listings[0].1.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        ["Jane", "John", "Vegeta", "Bulma"]
    );
}

// ============================================================================
// Backends that type-check but break the contract
// ============================================================================

/// Treats removal of a missing id as success.
struct SilentRemover {
    capabilities: Capabilities,
    inner: MemoryStore,
}

impl SilentRemover {
    fn from_names(names: Vec<String>) -> Self {
        Self {
            capabilities: Capabilities::full("silent"),
            inner: MemoryStore::from_names(names),
        }
    }
}

impl Backend for SilentRemover {
    fn name(&self) -> &str {
        "silent"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

#[async_trait]
impl RecordReader for SilentRemover {
    async fn list(&self) -> StoreResult<Vec<Record>> {
        self.inner.list().await
    }
}

#[async_trait]
impl RecordRemover for SilentRemover {
    async fn remove(&self, id: RecordId) -> StoreResult<Record> {
        match self.inner.remove(id).await {
            Err(StoreError::NotFound(id)) => Ok(Record::new(id, "")),
            other => other,
        }
    }
}

#[tokio::test]
async fn test_silent_remove_is_rejected() {
    let err = check_remover(SilentRemover::from_names).await.unwrap_err();
    assert!(matches!(err, StoreError::CapabilityViolation(_)));
    assert!(err.to_string().contains("second remove(2)"), "{err}");

    let err = check_substitutable(MemoryStore::from_names, SilentRemover::from_names)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("memory vs silent"), "{err}");
}

/// Hands out ids from the current length, reusing removed ones.
struct ReusingWriter {
    capabilities: Capabilities,
    records: Mutex<Vec<Record>>,
}

impl ReusingWriter {
    fn from_names(names: Vec<String>) -> Self {
        let records = names
            .into_iter()
            .zip(0u64..)
            .map(|(name, id)| Record::new(id, name))
            .collect();
        Self {
            capabilities: Capabilities::full("reusing"),
            records: Mutex::new(records),
        }
    }
}

impl Backend for ReusingWriter {
    fn name(&self) -> &str {
        "reusing"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

#[async_trait]
impl RecordReader for ReusingWriter {
    async fn list(&self) -> StoreResult<Vec<Record>> {
        Ok(self.records.lock().unwrap().clone())
    }
}

#[async_trait]
impl RecordRemover for ReusingWriter {
    async fn remove(&self, id: RecordId) -> StoreResult<Record> {
        let mut records = self.records.lock().unwrap();
        let pos = records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;
        Ok(records.remove(pos))
    }
}

#[async_trait]
impl RecordWriter for ReusingWriter {
    async fn insert(&self, name: &str) -> StoreResult<RecordId> {
        if name.is_empty() {
            return Err(StoreError::InvalidInput("empty".into()));
        }
        let mut records = self.records.lock().unwrap();
        let id = RecordId(records.len() as u64);
        records.push(Record::new(id, name));
        Ok(id)
    }
}

#[tokio::test]
async fn test_id_reuse_is_rejected() {
    check_reader(ReusingWriter::from_names).await.unwrap();
    check_remover(ReusingWriter::from_names).await.unwrap();
    check_writer(ReusingWriter::from_names).await.unwrap();

    let err = check_store(ReusingWriter::from_names).await.unwrap_err();
    assert!(err.to_string().contains("reused id 3"), "{err}");
}

#[tokio::test]
async fn test_unclaimed_contract_is_rejected() {
    let err = check_remover(|names| SilentRemover {
        capabilities: Capabilities::read_only("silent"),
        inner: MemoryStore::from_names(names),
    })
    .await
    .unwrap_err();
    assert!(err.to_string().contains("does not claim"), "{err}");
}
