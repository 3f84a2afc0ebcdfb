//! Readiness taxonomy

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification outcome for one discovered dependency relative to a target
/// organization.
///
/// Serialized as the lowercase tokens `ready`, `setup_needed`, `blocker`,
/// `warning`, `review` and `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    /// Already satisfied by the target
    Ready,
    /// Can be satisfied with configuration in the target
    SetupNeeded,
    /// Must be resolved before relocation
    Blocker,
    /// Needs attention but does not block
    Warning,
    /// Needs a human decision
    Review,
    /// Could not be determined
    Unknown,
}

impl ReadinessStatus {
    /// All statuses in summary order
    pub const ALL: [Self; 6] = [
        Self::Ready,
        Self::SetupNeeded,
        Self::Blocker,
        Self::Warning,
        Self::Review,
        Self::Unknown,
    ];

    /// Wire token for this status
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::SetupNeeded => "setup_needed",
            Self::Blocker => "blocker",
            Self::Warning => "warning",
            Self::Review => "review",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ReadinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tokens_match_display() {
        for status in ReadinessStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn setup_needed_uses_underscore() {
        let parsed: ReadinessStatus = serde_json::from_str("\"setup_needed\"").unwrap();
        assert_eq!(parsed, ReadinessStatus::SetupNeeded);
    }
}
