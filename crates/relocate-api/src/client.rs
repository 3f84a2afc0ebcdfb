//! The resource API capability set

use crate::error::ApiError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Minimal capability set consumed by the scanner and the batch cache.
///
/// Paths are relative, e.g. `orgs/acme/teams`. Implementations report 404
/// as [`ApiError::NotFound`] and 401/403 as [`ApiError::Forbidden`]; callers
/// treat both as "feature absent".
#[async_trait]
pub trait ResourceApi: Send + Sync + std::fmt::Debug {
    /// GET a resource
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// POST a body
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    /// PUT a body
    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    /// PATCH a body
    async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError>;
}

#[async_trait]
impl<T: ResourceApi + ?Sized> ResourceApi for Arc<T> {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        (**self).get(path).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        (**self).post(path, body).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        (**self).put(path, body).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        (**self).patch(path, body).await
    }
}

/// GET `path` and decode it into a named schema type.
///
/// # Errors
///
/// Propagates the call error, or [`ApiError::Decode`] when the body does not
/// match `T`.
pub async fn fetch<T, A>(api: &A, path: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned,
    A: ResourceApi + ?Sized,
{
    let value = api.get(path).await?;
    serde_json::from_value(value).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Like [`fetch`], but an absent resource decodes to `T::default()`.
///
/// # Errors
///
/// Any error other than not-found/forbidden.
pub async fn fetch_or_default<T, A>(api: &A, path: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
    A: ResourceApi + ?Sized,
{
    match fetch(api, path).await {
        Err(err) if err.is_absent() => Ok(T::default()),
        other => other,
    }
}
