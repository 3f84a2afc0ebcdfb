//! Relocate Batch - organization context cache and batched analysis
//!
//! Two strict phases per batch:
//! 1. Four loaders fill an organization context concurrently. The builder
//!    is consumed by the join and hands back an [`OrgSnapshot`] with read
//!    accessors only.
//! 2. One task per repository copies what it needs from the snapshot, runs
//!    the five [`CategoryAnalyzer`]s concurrently into its own
//!    [`relocate_types::DiscoveredFacts`], and keeps the cached organization
//!    policies whose ruleset targeting covers the repository.
//!
//! Results come back in input order regardless of completion order.
//!
//! # Example
//!
//! ```rust,ignore
//! use relocate_batch::{BatchAnalyzer, BatchOptions};
//!
//! # async fn example(api: std::sync::Arc<dyn relocate_api::ResourceApi>) {
//! let batch = BatchAnalyzer::new(api, BatchOptions::default());
//! let results = batch.analyze_many(&["acme/api", "acme/web"]).await;
//! assert_eq!(results[0].repository, "acme/api");
//! # }
//! ```

pub mod analyzers;
pub mod batch;
pub mod context;
pub mod error;
pub mod loaders;

pub use analyzers::{default_analyzers, AnalysisScope, CategoryAnalyzer, CategoryFacts};
pub use batch::{BatchAnalyzer, BatchOptions, BatchResult};
pub use context::{CampaignRef, OrgContextBuilder, OrgSnapshot, OrgView};
pub use error::{AnalyzerError, BatchError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
