//! Concrete backends.
//!
//! | Backend | Contracts | Medium |
//! |---------|-----------|--------|
//! | [`MemoryStore`] | read, remove, write | ordered map behind a mutex |
//! | [`IndexedStore`] | read, remove, write | vector plus hash index behind a mutex |
//! | [`FixedCatalog`] | read | immutable vector |
//! | [`DeadlineStore`] | whatever it wraps | another backend, bounded by a timeout |
//!
//! Only the composition root ([`crate::wiring`]) and tests name these types.
//! Consumers see them as contract trait objects.

mod deadline;
mod fixed;
mod indexed;
mod memory;

use std::sync::{Mutex, MutexGuard, PoisonError};

pub use deadline::DeadlineStore;
pub use fixed::FixedCatalog;
pub use indexed::IndexedStore;
pub use memory::MemoryStore;

/// Lock a backend's private state.
///
/// State is only ever mutated by single non-panicking steps, so a poisoned
/// guard still protects consistent data.
fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
