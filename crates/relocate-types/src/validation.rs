//! Validation results, summary and overall verdict

use crate::facts::Category;
use crate::status::ReadinessStatus;
use serde::{Deserialize, Serialize};

/// Classification of one discovered dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// The dependency as discovered
    pub item: String,
    /// Readiness
    pub status: ReadinessStatus,
    /// What was found
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    /// What to do about it
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub recommendation: String,
}

impl ValidationResult {
    /// Result without a recommendation
    #[inline]
    pub fn new(item: impl Into<String>, status: ReadinessStatus, message: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            status,
            message: message.into(),
            recommendation: String::new(),
        }
    }

    /// Attach a recommendation
    #[inline]
    #[must_use]
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }
}

/// Per-status counters.
///
/// `total` always equals the sum of the six counters; the only way to change
/// the counters is [`ValidationSummary::record`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    /// Ready count
    pub ready: usize,
    /// Setup-needed count
    pub setup_needed: usize,
    /// Blocker count
    pub blockers: usize,
    /// Warning count
    pub warnings: usize,
    /// Review count
    pub review: usize,
    /// Unknown count
    pub unknown: usize,
    /// Sum of all counters
    pub total: usize,
}

impl ValidationSummary {
    /// Count every result
    pub fn from_results<'a, I>(results: I) -> Self
    where
        I: IntoIterator<Item = &'a ValidationResult>,
    {
        let mut summary = Self::default();
        for result in results {
            summary.record(result.status);
        }
        summary
    }

    /// Count one status
    pub fn record(&mut self, status: ReadinessStatus) {
        match status {
            ReadinessStatus::Ready => self.ready += 1,
            ReadinessStatus::SetupNeeded => self.setup_needed += 1,
            ReadinessStatus::Blocker => self.blockers += 1,
            ReadinessStatus::Warning => self.warnings += 1,
            ReadinessStatus::Review => self.review += 1,
            ReadinessStatus::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }

    /// Counter for one status
    #[must_use]
    pub const fn count(&self, status: ReadinessStatus) -> usize {
        match status {
            ReadinessStatus::Ready => self.ready,
            ReadinessStatus::SetupNeeded => self.setup_needed,
            ReadinessStatus::Blocker => self.blockers,
            ReadinessStatus::Warning => self.warnings,
            ReadinessStatus::Review => self.review,
            ReadinessStatus::Unknown => self.unknown,
        }
    }

    /// Overall verdict, first match wins:
    /// blockers, then setup or review, then warnings, then all-ready,
    /// otherwise unknown.
    #[must_use]
    pub const fn overall(&self) -> ReadinessStatus {
        if self.blockers > 0 {
            ReadinessStatus::Blocker
        } else if self.setup_needed > 0 || self.review > 0 {
            ReadinessStatus::SetupNeeded
        } else if self.warnings > 0 {
            ReadinessStatus::Warning
        } else if self.ready == self.total {
            ReadinessStatus::Ready
        } else {
            ReadinessStatus::Unknown
        }
    }
}

/// Full classification of one repository against one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationValidation {
    /// `owner/name` of the analyzed repository
    pub repository: String,
    /// Target organization
    pub target_organization: String,
    /// Verdict derived from `summary`
    pub overall_readiness: ReadinessStatus,
    /// Counters over every result below
    pub summary: ValidationSummary,
    /// Submodules
    pub code_dependencies: Vec<ValidationResult>,
    /// Secrets, variables, runners, required workflows
    pub ci_dependencies: Vec<ValidationResult>,
    /// Teams, collaborators, CODEOWNERS
    pub access_permissions: Vec<ValidationResult>,
    /// Security campaigns
    pub security_compliance: Vec<ValidationResult>,
    /// Apps
    pub apps_integrations: Vec<ValidationResult>,
    /// Policies and templates
    pub governance: Vec<ValidationResult>,
}

impl MigrationValidation {
    /// Results for one category
    #[must_use]
    pub fn category(&self, category: Category) -> &[ValidationResult] {
        match category {
            Category::Code => &self.code_dependencies,
            Category::Ci => &self.ci_dependencies,
            Category::Access => &self.access_permissions,
            Category::Security => &self.security_compliance,
            Category::Integrations => &self.apps_integrations,
            Category::Governance => &self.governance,
        }
    }

    /// Every result, category by category
    pub fn results(&self) -> impl Iterator<Item = &ValidationResult> {
        Category::ALL
            .into_iter()
            .flat_map(move |category| self.category(category).iter())
    }

    /// Every blocker result
    #[must_use]
    pub fn blockers(&self) -> Vec<&ValidationResult> {
        self.results()
            .filter(|r| r.status == ReadinessStatus::Blocker)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_of(statuses: &[ReadinessStatus]) -> ValidationSummary {
        let mut summary = ValidationSummary::default();
        for status in statuses {
            summary.record(*status);
        }
        summary
    }

    #[test]
    fn empty_summary_is_ready() {
        assert_eq!(ValidationSummary::default().overall(), ReadinessStatus::Ready);
    }

    #[test]
    fn review_counts_as_setup_needed() {
        let summary = summary_of(&[ReadinessStatus::Ready, ReadinessStatus::Review]);
        assert_eq!(summary.overall(), ReadinessStatus::SetupNeeded);
    }

    #[test]
    fn blocker_wins_over_everything() {
        let summary = summary_of(&[
            ReadinessStatus::Warning,
            ReadinessStatus::SetupNeeded,
            ReadinessStatus::Blocker,
        ]);
        assert_eq!(summary.overall(), ReadinessStatus::Blocker);
    }

    #[test]
    fn unknown_alone_is_unknown() {
        let summary = summary_of(&[ReadinessStatus::Ready, ReadinessStatus::Unknown]);
        assert_eq!(summary.overall(), ReadinessStatus::Unknown);
    }

    #[test]
    fn result_serialization_skips_empty_recommendation() {
        let result = ValidationResult::new("ci-bot", ReadinessStatus::Ready, "ok");
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("recommendation").is_none());
        assert_eq!(json["status"], "ready");
    }
}
