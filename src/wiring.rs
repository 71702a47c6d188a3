//! Composition root.
//!
//! [`Wiring`] is the one place that names concrete backends. It builds a
//! backend, checks the backend's declared [`Capabilities`] against the
//! contracts it is being wired as, erases it into contract trait objects,
//! and hands out consumers:
//!
//! ```text
//!   StoreConfig ──→ Wiring::from_config ──┬──→ catalog()     read
//!   backend     ──→ Wiring::full / ...  ──┼──→ directory()   read + remove
//!                                          └──→ enrollment()  write
//! ```
//!
//! Asking for a consumer whose contracts the backend does not implement is
//! a [`StoreError::CapabilityViolation`], reported before any call is made.

use std::sync::Arc;

use tracing::{info, warn};

use crate::backend::{RecordReader, RecordRemover, RecordStore, RecordWriter};
use crate::capability::Capabilities;
use crate::config::{BackendKind, StoreConfig};
use crate::consumer::{Catalog, Directory, Enrollment};
use crate::contract::Contract;
use crate::error::{StoreError, StoreResult};
use crate::policy::NamePolicy;
use crate::store::{DeadlineStore, FixedCatalog, IndexedStore, MemoryStore};

/// A wired backend, held as one handle per contract.
pub struct Wiring {
    capabilities: Capabilities,
    reader: Arc<dyn RecordReader>,
    remover: Option<Arc<dyn RecordRemover>>,
    writer: Option<Arc<dyn RecordWriter>>,
    policy: NamePolicy,
}

impl Wiring {
    /// Build the backend a configuration selects.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let records = config.records.iter().map(String::as_str);

        let wiring = match (config.backend, config.timeout()) {
            (BackendKind::Memory, None) => Self::full(MemoryStore::from_names(records)),
            (BackendKind::Memory, Some(timeout)) => Self::full(DeadlineStore::new(
                MemoryStore::from_names(records),
                timeout,
            )),
            (BackendKind::Indexed, None) => Self::full(IndexedStore::from_names(records)),
            (BackendKind::Indexed, Some(timeout)) => Self::full(DeadlineStore::new(
                IndexedStore::from_names(records),
                timeout,
            )),
            (BackendKind::Fixed, None) => Self::read_only(FixedCatalog::new(records)),
            (BackendKind::Fixed, Some(timeout)) => {
                Self::read_only(DeadlineStore::new(FixedCatalog::new(records), timeout))
            }
        }?;

        Ok(wiring.with_policy(config.policy.clone()))
    }

    /// Wire a backend implementing every contract.
    pub fn full<B>(backend: B) -> StoreResult<Self>
    where
        B: RecordStore + 'static,
    {
        let backend = Arc::new(backend);
        Self::assemble(
            backend.capabilities().clone(),
            backend.clone(),
            Some(backend.clone()),
            Some(backend),
        )
    }

    /// Wire a backend that can be read and removed from, but not written.
    pub fn read_remove<B>(backend: B) -> StoreResult<Self>
    where
        B: RecordReader + RecordRemover + 'static,
    {
        let backend = Arc::new(backend);
        Self::assemble(
            backend.capabilities().clone(),
            backend.clone(),
            Some(backend),
            None,
        )
    }

    /// Wire a backend that can only be read.
    pub fn read_only<B>(backend: B) -> StoreResult<Self>
    where
        B: RecordReader + 'static,
    {
        let backend = Arc::new(backend);
        Self::assemble(backend.capabilities().clone(), backend, None, None)
    }

    fn assemble(
        capabilities: Capabilities,
        reader: Arc<dyn RecordReader>,
        remover: Option<Arc<dyn RecordRemover>>,
        writer: Option<Arc<dyn RecordWriter>>,
    ) -> StoreResult<Self> {
        let wiring = Self {
            capabilities,
            reader,
            remover,
            writer,
            policy: NamePolicy::default(),
        };

        for contract in wiring.contracts() {
            if let Err(err) = wiring.capabilities.ensure(contract) {
                warn!(backend = %wiring.capabilities.name, %contract, "backend claims disagree with its implementation");
                return Err(err);
            }
        }

        info!(
            backend = %wiring.capabilities.name,
            contracts = ?wiring.contracts(),
            "backend wired"
        );
        Ok(wiring)
    }

    /// Replace the name policy handed to [`Enrollment`].
    pub fn with_policy(mut self, policy: NamePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Capabilities of the wired backend.
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Contracts the backend was wired as.
    pub fn contracts(&self) -> Vec<Contract> {
        let mut contracts = vec![Contract::Read];
        if self.remover.is_some() {
            contracts.push(Contract::Remove);
        }
        if self.writer.is_some() {
            contracts.push(Contract::Write);
        }
        contracts
    }

    /// A read-only consumer. Every backend supports this.
    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.reader.clone())
    }

    /// A consumer that lists and removes.
    pub fn directory(&self) -> StoreResult<Directory> {
        let remover = self
            .remover
            .clone()
            .ok_or_else(|| self.unsupported("Directory", Contract::Remove))?;
        Ok(Directory::new(self.reader.clone(), remover))
    }

    /// A consumer that inserts through the configured name policy.
    pub fn enrollment(&self) -> StoreResult<Enrollment> {
        let writer = self
            .writer
            .clone()
            .ok_or_else(|| self.unsupported("Enrollment", Contract::Write))?;
        Ok(Enrollment::with_policy(writer, self.policy.clone()))
    }

    fn unsupported(&self, consumer: &str, contract: Contract) -> StoreError {
        warn!(backend = %self.capabilities.name, consumer, %contract, "consumer requires a missing contract");
        StoreError::CapabilityViolation(format!(
            "{consumer} requires the '{contract}' contract, which backend '{}' does not implement",
            self.capabilities.name
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::backend::Backend;
    use crate::record::{Record, RecordId};

    #[tokio::test]
    async fn test_memory_config_wires_every_consumer() {
        let config = StoreConfig::new(BackendKind::Memory).with_records(["Jane", "John"]);
        let wiring = Wiring::from_config(&config).unwrap();
        assert_eq!(wiring.contracts(), Contract::ALL);

        wiring.enrollment().unwrap().enroll("Goku").await.unwrap();
        wiring.directory().unwrap().remove(RecordId(0)).await.unwrap();
        assert_eq!(wiring.catalog().names().await.unwrap(), ["John", "Goku"]);
    }

    #[test]
    fn test_fixed_config_rejects_mutating_consumers() {
        let config = StoreConfig::new(BackendKind::Fixed).with_records(["Jane"]);
        let wiring = Wiring::from_config(&config).unwrap();
        assert_eq!(wiring.contracts(), [Contract::Read]);

        let err = wiring.directory().err().unwrap();
        assert!(matches!(err, StoreError::CapabilityViolation(_)));
        assert_eq!(
            err.to_string(),
            "Capability violation: Directory requires the 'remove' contract, \
             which backend 'fixed' does not implement"
        );
        assert!(matches!(
            wiring.enrollment().err().unwrap(),
            StoreError::CapabilityViolation(_)
        ));
    }

    #[test]
    fn test_timeout_config_wraps_backend() {
        let config = StoreConfig::new(BackendKind::Indexed).with_timeout(Duration::from_millis(50));
        let wiring = Wiring::from_config(&config).unwrap();
        assert_eq!(wiring.capabilities().name, "indexed");
        assert!(wiring.capabilities().features.iter().any(|f| f == "deadline"));
    }

    #[tokio::test]
    async fn test_config_policy_reaches_enrollment() {
        let mut config = StoreConfig::default();
        config.policy.max_len = 3;
        let wiring = Wiring::from_config(&config).unwrap();
        let enrollment = wiring.enrollment().unwrap();
        assert_eq!(enrollment.policy().max_len, 3);
        assert!(enrollment.enroll("Vegeta").await.is_err());
    }

    /// Implements every contract but only claims `read`.
    struct Understated {
        capabilities: Capabilities,
    }

    impl Backend for Understated {
        fn name(&self) -> &str {
            "understated"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.capabilities
        }
    }

    #[async_trait]
    impl RecordReader for Understated {
        async fn list(&self) -> StoreResult<Vec<Record>> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl RecordRemover for Understated {
        async fn remove(&self, id: RecordId) -> StoreResult<Record> {
            Err(StoreError::NotFound(id))
        }
    }

    #[async_trait]
    impl RecordWriter for Understated {
        async fn insert(&self, _name: &str) -> StoreResult<RecordId> {
            Err(StoreError::Unavailable("closed".into()))
        }
    }

    #[test]
    fn test_claims_checked_at_composition() {
        let understated = || Understated {
            capabilities: Capabilities::read_only("understated"),
        };

        assert!(Wiring::read_only(understated()).is_ok());
        let err = Wiring::full(understated()).err().unwrap();
        assert!(matches!(err, StoreError::CapabilityViolation(_)));
        assert!(Wiring::read_remove(understated()).is_err());
    }

    #[test]
    fn test_read_remove_wiring() {
        let store = MemoryStore::from_names(["Jane"]);
        let wiring = Wiring::read_remove(store).unwrap();
        assert_eq!(wiring.contracts(), [Contract::Read, Contract::Remove]);
        assert!(wiring.directory().is_ok());
        assert!(wiring.enrollment().is_err());
    }
}
