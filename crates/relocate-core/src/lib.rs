//! Relocate Core - repository relocation readiness
//!
//! The facade over the workspace:
//! - Loads one immutable [`RelocateConfig`] (TOML)
//! - Installs tracing output ([`init_tracing`])
//! - Scans a target organization, analyzes source repositories in batches
//!   and classifies every dependency ([`Relocator`])
//! - Admits or refuses a relocation ([`TransferGate`])
//!
//! # Example
//!
//! ```rust,ignore
//! use relocate_core::prelude::*;
//!
//! # async fn example() -> Result<(), RelocateError> {
//! let config = RelocateConfig::from_file("relocate.toml")?;
//! init_tracing(config.verbose, false);
//!
//! let relocator = Relocator::from_config(config)?;
//! let assessment = relocator.assess(&["acme/api", "acme/web"], "beta").await;
//! for validation in assessment.validations() {
//!     let decision = TransferGate::evaluate(validation, false);
//!     println!("{}: {:?}", validation.repository, decision);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod relocator;
pub mod telemetry;

pub use config::RelocateConfig;
pub use error::{ConfigError, GateError, RelocateError};
pub use gate::{GateDecision, TransferGate};
pub use relocator::{Assessment, RepositoryAssessment, Relocator};
pub use telemetry::init_tracing;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Relocate
    pub use crate::{
        init_tracing, Assessment, ConfigError, GateDecision, GateError, RelocateConfig,
        RelocateError, Relocator, RepositoryAssessment, TransferGate,
    };
    pub use relocate_api::{ApiConfig, ApiError, ResourceApi};
    pub use relocate_batch::{BatchError, BatchResult};
    pub use relocate_types::{
        DiscoveredFacts, MigrationValidation, ReadinessStatus, TargetCapabilities,
        ValidationResult,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
