//! Structured diagnostics
//!
//! Sub-queries and analyzers that are skipped or fail leave their fields
//! empty; these records say *what* was skipped so callers can tell
//! "found none" apart from "could not look".

use crate::facts::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a lookup produced no data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Not found or forbidden; the feature is treated as absent
    Absent,
    /// Any other failure (transport, server error, undecodable body)
    Failed,
}

/// One skipped lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// What was being looked up, e.g. `teams` or `rulesets`
    pub subject: String,
    /// Absent or failed
    pub kind: DiagnosticKind,
    /// Underlying error text
    pub message: String,
}

impl Diagnostic {
    /// Lookup found nothing (404/403)
    #[inline]
    pub fn absent(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: DiagnosticKind::Absent,
            message: message.into(),
        }
    }

    /// Lookup failed
    #[inline]
    pub fn failed(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            kind: DiagnosticKind::Failed,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiagnosticKind::Absent => "absent",
            DiagnosticKind::Failed => "failed",
        };
        write!(f, "{} ({kind}): {}", self.subject, self.message)
    }
}

/// A discovered-facts category whose analyzer failed and was left empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegradedCategory {
    /// The category left empty
    pub category: Category,
    /// Analyzer error text
    pub message: String,
}
