//! Testing utilities for the relocate workspace
//!
//! Shared in-memory resource API and fixtures.

#![allow(missing_docs)]

pub mod fixtures;

use async_trait::async_trait;
use parking_lot::Mutex;
use relocate_api::{ApiError, ResourceApi};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

/// Canned failure for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    NotFound,
    Forbidden,
    Status(u16),
    Transport,
}

#[derive(Debug, Clone)]
enum Route {
    Json(Value),
    Fail(Fault),
}

/// One recorded write call
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCall {
    pub method: &'static str,
    pub path: String,
    pub body: Value,
}

/// In-memory [`ResourceApi`].
///
/// Routes are exact paths (query string included). Unrouted paths answer
/// 404. Every call is counted per path; delays can be attached to path
/// prefixes to shuffle completion order.
#[derive(Debug, Default)]
pub struct FakeApi {
    routes: Mutex<HashMap<String, Route>>,
    delays: Mutex<Vec<(String, Duration)>>,
    hits: Mutex<HashMap<String, usize>>,
    writes: Mutex<Vec<WriteCall>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `path` with `body`
    #[must_use]
    pub fn with_json(self, path: &str, body: Value) -> Self {
        self.set_json(path, body);
        self
    }

    /// Answer `path` with a failure
    #[must_use]
    pub fn with_fault(self, path: &str, fault: Fault) -> Self {
        self.set_fault(path, fault);
        self
    }

    /// Delay every call whose path starts with `prefix`
    #[must_use]
    pub fn with_delay(self, prefix: &str, delay: Duration) -> Self {
        self.delays.lock().push((prefix.to_string(), delay));
        self
    }

    pub fn set_json(&self, path: &str, body: Value) {
        self.routes.lock().insert(path.to_string(), Route::Json(body));
    }

    pub fn set_fault(&self, path: &str, fault: Fault) {
        self.routes.lock().insert(path.to_string(), Route::Fail(fault));
    }

    /// Calls made to exactly `path`
    pub fn hits(&self, path: &str) -> usize {
        self.hits.lock().get(path).copied().unwrap_or(0)
    }

    /// Calls made to any path starting with `prefix`
    pub fn hits_with_prefix(&self, prefix: &str) -> usize {
        self.hits
            .lock()
            .iter()
            .filter(|(path, _)| path.starts_with(prefix))
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn total_hits(&self) -> usize {
        self.hits.lock().values().sum()
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.writes.lock().clone()
    }

    fn delay_for(&self, path: &str) -> Option<Duration> {
        self.delays
            .lock()
            .iter()
            .filter(|(prefix, _)| path.starts_with(prefix.as_str()))
            .map(|(_, delay)| *delay)
            .max()
    }

    async fn answer(&self, path: &str) -> Result<Value, ApiError> {
        *self.hits.lock().entry(path.to_string()).or_insert(0) += 1;
        if let Some(delay) = self.delay_for(path) {
            tokio::time::sleep(delay).await;
        }
        let route = self.routes.lock().get(path).cloned();
        match route {
            Some(Route::Json(body)) => Ok(body),
            Some(Route::Fail(fault)) => Err(fault_error(path, fault)),
            None => Err(ApiError::NotFound {
                path: path.to_string(),
            }),
        }
    }

    async fn record(&self, method: &'static str, path: &str, body: Value) -> Result<Value, ApiError> {
        self.writes.lock().push(WriteCall {
            method,
            path: path.to_string(),
            body,
        });
        self.answer(path).await
    }
}

fn fault_error(path: &str, fault: Fault) -> ApiError {
    match fault {
        Fault::NotFound => ApiError::from_status(path, 404, "Not Found"),
        Fault::Forbidden => ApiError::from_status(path, 403, "Forbidden"),
        Fault::Status(code) => ApiError::from_status(path, code, "injected failure"),
        Fault::Transport => ApiError::Transport {
            path: path.to_string(),
            message: "connection reset".to_string(),
        },
    }
}

#[async_trait]
impl ResourceApi for FakeApi {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.answer(path).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.record("POST", path, body).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.record("PUT", path, body).await
    }

    async fn patch(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.record("PATCH", path, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn unrouted_paths_are_not_found() {
        let api = FakeApi::new();
        let err = api.get("orgs/none").await.unwrap_err();
        assert!(err.is_absent());
        assert_eq!(api.hits("orgs/none"), 1);
    }

    #[tokio::test]
    async fn routes_and_faults() {
        let api = FakeApi::new()
            .with_json("orgs/acme", json!({"login": "acme"}))
            .with_fault("orgs/acme/teams", Fault::Status(500));

        assert_eq!(api.get("orgs/acme").await.unwrap()["login"], "acme");
        let err = api.get("orgs/acme/teams").await.unwrap_err();
        assert!(!err.is_absent());
        assert_eq!(api.hits_with_prefix("orgs/acme"), 2);
    }

    #[tokio::test]
    async fn writes_are_recorded() {
        let api = FakeApi::new().with_json("repos/acme/api/transfer", json!({}));
        api.post("repos/acme/api/transfer", json!({"new_owner": "beta"}))
            .await
            .unwrap();
        let writes = api.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].method, "POST");
        assert_eq!(writes[0].body["new_owner"], "beta");
    }
}
