//! Relocate Types - shared data model
//!
//! Everything the scanner, classifier and batch cache exchange:
//! - Readiness statuses and per-dependency validation results
//! - Discovered facts, grouped into six categories
//! - Target capabilities and member privilege settings
//! - Policies with structured ruleset targeting conditions
//! - Repository references and structured diagnostics
//!
//! The types here carry no behavior beyond construction, parsing and
//! aggregation; classification lives in `relocate-validation`.

pub mod capabilities;
pub mod diagnostic;
pub mod error;
pub mod facts;
pub mod policy;
pub mod repo;
pub mod status;
pub mod validation;

pub use capabilities::{MemberPrivileges, TargetCapabilities};
pub use diagnostic::{DegradedCategory, Diagnostic, DiagnosticKind};
pub use error::RepoRefError;
pub use facts::{
    AccessFacts, Category, CiFacts, CodeFacts, DiscoveredFacts, GovernanceFacts,
    IntegrationFacts, SecurityFacts,
};
pub use policy::{Policy, RulesetConditions};
pub use repo::RepoRef;
pub use status::ReadinessStatus;
pub use validation::{MigrationValidation, ValidationResult, ValidationSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
