//! Error types for the data model

/// A repository identifier that is not in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoRefError {
    /// Wrong number of `/`-separated segments
    #[error("repository '{input}' must be in format 'owner/repo'")]
    Malformed {
        /// The rejected identifier
        input: String,
    },

    /// One of the two segments is empty
    #[error("repository '{input}' has an empty owner or name")]
    EmptySegment {
        /// The rejected identifier
        input: String,
    },
}

impl RepoRefError {
    /// The identifier that failed to parse
    #[inline]
    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            Self::Malformed { input } | Self::EmptySegment { input } => input,
        }
    }
}
