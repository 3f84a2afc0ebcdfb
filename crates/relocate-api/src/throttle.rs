//! Bounded in-flight requests
//!
//! A batch of N repositories can burst to `4 + 5·N` concurrent calls. The
//! wrapper caps that with a shared semaphore; every clone shares the same
//! permits.

use crate::client::ResourceApi;
use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};

/// [`ResourceApi`] wrapper that holds a permit for the duration of each call
#[derive(Debug, Clone)]
pub struct ThrottledApi<A> {
    inner: A,
    permits: Arc<Semaphore>,
    limit: usize,
}

impl<A: ResourceApi> ThrottledApi<A> {
    /// Allow at most `limit` concurrent calls (minimum 1)
    pub fn new(inner: A, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            inner,
            permits: Arc::new(Semaphore::new(limit)),
            limit,
        }
    }

    /// Configured limit
    #[inline]
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Permits currently free
    #[inline]
    #[must_use]
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    async fn permit(&self) -> Result<SemaphorePermit<'_>, ApiError> {
        self.permits.acquire().await.map_err(|_| ApiError::Closed)
    }
}

#[async_trait]
impl<A: ResourceApi> ResourceApi for ThrottledApi<A> {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        let _permit = self.permit().await?;
        self.inner.get(path).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let _permit = self.permit().await?;
        self.inner.post(path, body).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let _permit = self.permit().await?;
        self.inner.put(path, body).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        let _permit = self.permit().await?;
        self.inner.patch(path, body).await
    }
}
