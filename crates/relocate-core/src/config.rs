//! Relocate configuration
//!
//! One immutable value, loaded once and handed to every component.

use crate::error::ConfigError;
use relocate_api::ApiConfig;
use relocate_batch::BatchOptions;
use relocate_validation::ScanOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelocateConfig {
    /// Surface skipped lookups and degraded categories at warn level
    pub verbose: bool,
    /// Forwarded to the classifier; currently changes no classification
    pub assign_teams: bool,
    /// Concurrent API calls; 0 means no bound
    pub max_in_flight_requests: usize,
    /// Repositories analyzed at once per owner; 0 means no bound
    pub max_parallel_repositories: usize,
    /// Connection settings
    pub api: ApiConfig,
}

impl RelocateConfig {
    /// Defaults
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TOML text
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed TOML, [`ConfigError::Invalid`]
    /// for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// With verbose diagnostics
    #[inline]
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// With team assignment requested
    #[inline]
    #[must_use]
    pub fn with_assign_teams(mut self, assign_teams: bool) -> Self {
        self.assign_teams = assign_teams;
        self
    }

    /// With a bound on concurrent API calls
    #[inline]
    #[must_use]
    pub fn with_max_in_flight_requests(mut self, limit: usize) -> Self {
        self.max_in_flight_requests = limit;
        self
    }

    /// With a bound on repositories analyzed at once
    #[inline]
    #[must_use]
    pub fn with_max_parallel_repositories(mut self, limit: usize) -> Self {
        self.max_parallel_repositories = limit;
        self
    }

    /// With connection settings
    #[inline]
    #[must_use]
    pub fn with_api(mut self, api: ApiConfig) -> Self {
        self.api = api;
        self
    }

    /// Scanner options derived from this configuration
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::default().with_verbose(self.verbose)
    }

    /// Batch options derived from this configuration
    #[must_use]
    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions::default()
            .with_verbose(self.verbose)
            .with_max_parallel_repositories(self.max_parallel_repositories)
    }
}
