//! Error types for the relocate facade

use relocate_api::ApiError;
use relocate_types::ValidationResult;
use std::path::PathBuf;

/// Configuration could not be loaded
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Config file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Not valid TOML for [`crate::RelocateConfig`]
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Parsed, but a value is out of range
    #[error("invalid configuration value: {0}")]
    Invalid(String),
}

/// The relocation gate refused a repository
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// Unresolved blockers and no override
    #[error("relocation blocked by {} unresolved blocker(s)", .blockers.len())]
    Blocked {
        /// Every blocker result, across categories
        blockers: Vec<ValidationResult>,
    },
}

/// Facade errors
#[derive(Debug, thiserror::Error)]
pub enum RelocateError {
    /// Configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// API client could not be built
    #[error("api client: {0}")]
    Api(#[from] ApiError),
}
