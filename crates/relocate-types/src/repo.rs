//! Repository references

use crate::error::RepoRefError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A repository identified by owning organization and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    /// Owning organization (the source domain)
    pub owner: String,
    /// Repository name within the owner
    pub name: String,
}

impl RepoRef {
    /// Create from parts
    #[inline]
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`. Exactly one `/` is accepted and neither side may
    /// be empty.
    ///
    /// # Errors
    ///
    /// Returns [`RepoRefError`] when the identifier is not in `owner/name` form.
    pub fn parse(input: &str) -> Result<Self, RepoRefError> {
        let parts: Vec<&str> = input.split('/').collect();
        if parts.len() != 2 {
            return Err(RepoRefError::Malformed {
                input: input.to_string(),
            });
        }
        if parts[0].is_empty() || parts[1].is_empty() {
            return Err(RepoRefError::EmptySegment {
                input: input.to_string(),
            });
        }
        Ok(Self::new(parts[0], parts[1]))
    }
}

impl FromStr for RepoRef {
    type Err = RepoRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
