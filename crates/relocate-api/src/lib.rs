//! Relocate API - the resource API collaborator
//!
//! Provides:
//! - [`ResourceApi`], the minimal `get`/`post`/`put`/`patch` capability set
//! - [`ApiError`], where not-found and forbidden mean "feature absent"
//! - Named response schemas decoded once per resource kind
//! - [`RestClient`], a reqwest-backed implementation
//! - [`ThrottledApi`], a bound on concurrent in-flight calls
//!
//! # Example
//!
//! ```rust,ignore
//! use relocate_api::{fetch, schema::TeamSummary, ApiConfig, RestClient};
//!
//! # async fn example() -> Result<(), relocate_api::ApiError> {
//! let api = RestClient::new(&ApiConfig::default())?;
//! let teams: Vec<TeamSummary> = fetch(&api, "orgs/acme/teams").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod rest;
pub mod schema;
pub mod throttle;

pub use client::{fetch, fetch_or_default, ResourceApi};
pub use config::ApiConfig;
pub use error::ApiError;
pub use rest::RestClient;
pub use throttle::ThrottledApi;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
