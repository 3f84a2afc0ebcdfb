//! Error types for batched analysis

use relocate_api::ApiError;
use relocate_types::{Category, RepoRefError};

/// A category analyzer could not complete
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// A lookup failed with something other than not-found/forbidden
    #[error("{category} analyzer: {source}")]
    Api {
        /// Analyzer category
        category: Category,
        /// Failed call
        #[source]
        source: ApiError,
    },

    /// Required organization data was not loaded
    #[error("{category} analyzer: {message}")]
    Unavailable {
        /// Analyzer category
        category: Category,
        /// What is missing
        message: String,
    },
}

impl AnalyzerError {
    /// Wrap an API failure
    #[inline]
    pub fn api(category: Category, source: ApiError) -> Self {
        Self::Api { category, source }
    }

    /// Category of the failed analyzer
    #[inline]
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Api { category, .. } | Self::Unavailable { category, .. } => *category,
        }
    }
}

/// Why a repository slot carries no facts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    /// Identifier is not `owner/name`
    #[error(transparent)]
    MalformedRepository(#[from] RepoRefError),

    /// The repository's task panicked or was aborted
    #[error("analysis task for {repository} did not complete")]
    TaskAborted {
        /// Repository identifier
        repository: String,
    },
}
