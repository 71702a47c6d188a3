//! Timeout-bounded wrapper backend.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::backend::{Backend, RecordReader, RecordRemover, RecordWriter};
use crate::capability::Capabilities;
use crate::error::{StoreError, StoreResult};
use crate::record::{Record, RecordId};

/// Bounds every call into `B` by a deadline.
///
/// Implements exactly the contracts `B` implements. An elapsed deadline is
/// reported as [`StoreError::Timeout`]; the inner call is dropped.
pub struct DeadlineStore<B> {
    inner: B,
    timeout: Duration,
    capabilities: Capabilities,
}

impl<B: Backend> DeadlineStore<B> {
    /// Wrap `inner`, allowing each call at most `timeout`.
    pub fn new(inner: B, timeout: Duration) -> Self {
        let capabilities = inner.capabilities().clone().with_feature("deadline");
        Self {
            inner,
            timeout,
            capabilities,
        }
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &B {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    backend = self.inner.name(),
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "deadline elapsed"
                );
                Err(StoreError::Timeout(format!(
                    "{operation} on '{}' after {:?}",
                    self.inner.name(),
                    self.timeout
                )))
            }
        }
    }
}

impl<B: Backend> Backend for DeadlineStore<B> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

#[async_trait]
impl<B: RecordReader> RecordReader for DeadlineStore<B> {
    async fn list(&self) -> StoreResult<Vec<Record>> {
        self.bounded("list", self.inner.list()).await
    }

    async fn get(&self, id: RecordId) -> StoreResult<Record> {
        self.bounded("get", self.inner.get(id)).await
    }

    async fn count(&self) -> StoreResult<usize> {
        self.bounded("count", self.inner.count()).await
    }
}

#[async_trait]
impl<B: RecordRemover> RecordRemover for DeadlineStore<B> {
    async fn remove(&self, id: RecordId) -> StoreResult<Record> {
        self.bounded("remove", self.inner.remove(id)).await
    }
}

#[async_trait]
impl<B: RecordWriter> RecordWriter for DeadlineStore<B> {
    async fn insert(&self, name: &str) -> StoreResult<RecordId> {
        self.bounded("insert", self.inner.insert(name)).await
    }
}
