//! Capability contract traits.
//!
//! The data-access surface is split into narrow contracts so a backend only
//! implements what its medium can really do:
//!
//! ```text
//!                    Backend  (name, capabilities)
//!            ┌──────────┼──────────┐
//!      RecordReader  RecordRemover  RecordWriter
//!            └──────────┼──────────┘
//!                  RecordStore  (blanket union)
//! ```
//!
//! ## Design principles
//!
//! - **Segregated**: callers that only read never see `remove` or `insert`.
//!   A read-only backend implements [`RecordReader`] and nothing else; it
//!   never stubs out a write with a failing body.
//! - **Async**: operations are async so a backend over a suspendable medium
//!   fits the same contract as an in-memory one.
//! - **Thread-safe**: `Send + Sync` bound enables sharing one backend between
//!   several consumers through `Arc`.
//! - **Infallible introspection**: `name()` and `capabilities()` are
//!   synchronous and cached at construction time.
//!
//! ## Method table
//!
//! | Trait | Method | Kind | Required | Returns |
//! |-------|--------|------|----------|---------|
//! | `Backend` | `name()` | sync | yes | `&str` |
//! | `Backend` | `capabilities()` | sync | yes | `&Capabilities` |
//! | `RecordReader` | `list()` | async | yes | `StoreResult<Vec<Record>>` |
//! | `RecordReader` | `get()` | async | provided | `StoreResult<Record>` |
//! | `RecordReader` | `count()` | async | provided | `StoreResult<usize>` |
//! | `RecordRemover` | `remove()` | async | yes | `StoreResult<Record>` |
//! | `RecordWriter` | `insert()` | async | yes | `StoreResult<RecordId>` |
//!
//! ## Segregation at compile time
//!
//! A read-only backend is accepted wherever only reading is required:
//!
//! ```
//! use std::sync::Arc;
//! use record_contract::{Catalog, FixedCatalog};
//!
//! let fixed = Arc::new(FixedCatalog::new(["Jane", "John"]));
//! let _catalog = Catalog::new(fixed);
//! ```
//!
//! and rejected by the compiler wherever removal is required:
//!
//! ```compile_fail
//! use std::sync::Arc;
//! use record_contract::{Directory, FixedCatalog};
//!
//! let fixed = Arc::new(FixedCatalog::new(["Jane", "John"]));
//! let _directory = Directory::new(fixed.clone(), fixed);
//! ```

use async_trait::async_trait;

use crate::capability::Capabilities;
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordId};

/// Identity and introspection shared by every contract.
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    ///
    /// Implementations MUST cache capabilities at construction time and
    /// claim exactly the contracts they implement.
    fn capabilities(&self) -> &Capabilities;
}

/// The `read` contract.
///
/// # Contract
///
/// - `list()` returns every record currently held, in ascending id order,
///   with no side effects.
/// - `get()` fails with [`StoreError::NotFound`] for an absent id.
/// - `get()` and `count()` have default implementations in terms of
///   `list()`; backends with an index SHOULD override them.
#[async_trait]
pub trait RecordReader: Backend {
    /// List all records in ascending id order.
    async fn list(&self) -> StoreResult<Vec<Record>>;

    /// Get a single record.
    async fn get(&self, id: RecordId) -> StoreResult<Record> {
        self.list()
            .await?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of records currently held.
    async fn count(&self) -> StoreResult<usize> {
        Ok(self.list().await?.len())
    }
}

/// The `remove` contract.
///
/// # Contract
///
/// - On success exactly one record is removed and returned.
/// - An absent id MUST fail with [`StoreError::NotFound`] and leave the
///   backend unchanged. Removing the same id twice therefore fails the
///   second time; a silent no-op is a capability violation.
#[async_trait]
pub trait RecordRemover: Backend {
    /// Remove a record by id and return it.
    async fn remove(&self, id: RecordId) -> StoreResult<Record>;
}

/// The `write` contract.
///
/// # Contract
///
/// - An empty name MUST fail with [`StoreError::InvalidInput`].
/// - The returned id is greater than every id this backend has issued
///   before, including ids of records since removed.
#[async_trait]
pub trait RecordWriter: Backend {
    /// Append a record and return its id.
    async fn insert(&self, name: &str) -> StoreResult<RecordId>;
}

/// Union of every contract.
pub trait RecordStore: RecordReader + RecordRemover + RecordWriter {}

impl<T> RecordStore for T where T: RecordReader + RecordRemover + RecordWriter + ?Sized {}

/// Reject names the `write` contract does not accept.
pub(crate) fn validate_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidInput("record name must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Implements only `list()` so the provided methods are exercised.
    struct ListOnly {
        capabilities: Capabilities,
        records: Vec<Record>,
    }

    impl Backend for ListOnly {
        fn name(&self) -> &str {
            "list-only"
        }

        fn capabilities(&self) -> &Capabilities {
            &self.capabilities
        }
    }

    #[async_trait]
    impl RecordReader for ListOnly {
        async fn list(&self) -> StoreResult<Vec<Record>> {
            Ok(self.records.clone())
        }
    }

    fn list_only() -> ListOnly {
        ListOnly {
            capabilities: Capabilities::read_only("list-only"),
            records: vec![Record::new(0, "Jane"), Record::new(5, "John")],
        }
    }

    #[tokio::test]
    async fn test_provided_get() {
        let backend = list_only();
        assert_eq!(backend.get(RecordId(5)).await.unwrap().name, "John");
        let err = backend.get(RecordId(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(RecordId(1))));
    }

    #[tokio::test]
    async fn test_provided_count() {
        assert_eq!(list_only().count().await.unwrap(), 2);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Goku").is_ok());
        assert!(matches!(
            validate_name("   "),
            Err(StoreError::InvalidInput(_))
        ));
    }
}
