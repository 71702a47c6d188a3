//! Record Contract — segregated capability contracts for pluggable record stores
//!
//! This crate provides a small data-access layer in which consumers depend
//! only on narrow capability contracts, and concrete backends are chosen in
//! exactly one place. Any backend (in-memory, indexed, read-only or one
//! wrapping a slow medium) implements the contracts it really supports and
//! can be swapped for another without touching a call site.
//!
//! # Overview
//!
//! The crate defines:
//! - [`RecordReader`], [`RecordRemover`], [`RecordWriter`]: the contracts,
//!   with [`RecordStore`] as their union
//! - [`Contract`] / [`ContractDescriptor`] describing those contracts as data
//! - [`Capabilities`] for what a backend claims to implement
//! - [`MemoryStore`], [`IndexedStore`], [`FixedCatalog`], [`DeadlineStore`]
//! - [`Catalog`], [`Directory`], [`Enrollment`]: the consumers
//! - [`Wiring`], the composition root, driven by [`StoreConfig`]
//! - [`StoreError`] with categorized variants
//! - [`conformance`] checks any backend can run against its contracts
//!
//! # Wiring
//!
//! ```
//! use record_contract::{BackendKind, RecordId, StoreConfig, Wiring};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let config = StoreConfig::new(BackendKind::Memory)
//!     .with_records(["Jane", "John", "Goku", "Vegeta"]);
//! let wiring = Wiring::from_config(&config)?;
//!
//! let directory = wiring.directory()?;
//! assert_eq!(directory.remove(RecordId::new(2)).await?.name, "Goku");
//! assert!(directory.remove(RecordId::new(2)).await.is_err());
//!
//! let names = wiring.catalog().names().await?;
//! assert_eq!(names, ["Jane", "John", "Vegeta"]);
//! # Ok::<(), record_contract::StoreError>(())
//! # }).unwrap();
//! ```
//!
//! # Lifecycle
//!
//! ```text
//!   construct backend ──→ Wiring (claims checked) ──→ consumers ──→ calls
//!      (once)               (once)                     (shared)      (many)
//! ```

pub mod backend;
pub mod capability;
pub mod config;
pub mod conformance;
pub mod consumer;
pub mod contract;
pub mod error;
pub mod policy;
pub mod record;
pub mod store;
pub mod wiring;

pub use backend::{Backend, RecordReader, RecordRemover, RecordStore, RecordWriter};
pub use capability::Capabilities;
pub use config::{BackendKind, StoreConfig};
pub use consumer::{Catalog, Directory, Enrollment};
pub use contract::{Contract, ContractDescriptor, FailureKind, OperationSignature, Parameter};
pub use error::{ErrorCategory, StoreError, StoreResult};
pub use policy::NamePolicy;
pub use record::{Record, RecordId};
pub use store::{DeadlineStore, FixedCatalog, IndexedStore, MemoryStore};
pub use wiring::Wiring;
