//! Discovered facts
//!
//! One [`DiscoveredFacts`] record per repository per analysis run. Items are
//! free text with an optional parenthesized suffix, e.g. `"frontend (write)"`.
//! A record is owned by the task that builds it and is not modified once
//! handed back to the caller.

use crate::diagnostic::DegradedCategory;
use crate::policy::Policy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The six dependency categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Source-level dependencies (submodules)
    Code,
    /// Actions secrets, variables, runners, required workflows
    Ci,
    /// Teams, collaborators, CODEOWNERS
    Access,
    /// Security campaigns
    Security,
    /// Installed apps
    Integrations,
    /// Policies and templates
    Governance,
}

impl Category {
    /// All categories
    pub const ALL: [Self; 6] = [
        Self::Code,
        Self::Ci,
        Self::Access,
        Self::Security,
        Self::Integrations,
        Self::Governance,
    ];

    /// Short lowercase name
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Ci => "ci",
            Self::Access => "access",
            Self::Security => "security",
            Self::Integrations => "integrations",
            Self::Governance => "governance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeFacts {
    /// `"<url> (same organization)"` or `"<url> (external dependency)"`
    #[serde(default)]
    pub submodules: Vec<String>,
}

/// Actions and CI dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiFacts {
    /// Organization secrets the repository can read
    #[serde(default)]
    pub secrets: Vec<String>,
    /// Organization variables the repository can read
    #[serde(default)]
    pub variables: Vec<String>,
    /// Self-hosted runners
    #[serde(default)]
    pub runners: Vec<String>,
    /// Required workflows enforced through rulesets
    #[serde(default)]
    pub required_workflows: Vec<String>,
    /// Deployment environments; informational only
    #[serde(default)]
    pub environments: Vec<String>,
}

/// Access dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessFacts {
    /// `"<team> (<permission>)"`
    #[serde(default)]
    pub teams: Vec<String>,
    /// Direct collaborator logins
    #[serde(default)]
    pub collaborators: Vec<String>,
    /// `"Team: @org/name"` or `"User: @login"`
    #[serde(default)]
    pub codeowners: Vec<String>,
}

/// Security dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityFacts {
    /// `"Security campaign: <name> (<status>)"`
    #[serde(default)]
    pub campaigns: Vec<String>,
}

/// App integrations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationFacts {
    /// `"<app> (org-wide installation)"`
    #[serde(default)]
    pub apps: Vec<String>,
}

/// Governance dependencies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceFacts {
    /// Organization policies that apply to the repository
    #[serde(default)]
    pub policies: Vec<Policy>,
    /// Issue templates, organization or repository level
    #[serde(default)]
    pub issue_templates: Vec<String>,
    /// Pull request templates, organization or repository level
    #[serde(default)]
    pub pr_templates: Vec<String>,
}

/// Everything found to depend on the source organization for one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredFacts {
    /// `owner/name`
    pub repository: String,
    /// Code
    #[serde(default)]
    pub code: CodeFacts,
    /// CI
    #[serde(default)]
    pub ci: CiFacts,
    /// Access
    #[serde(default)]
    pub access: AccessFacts,
    /// Security
    #[serde(default)]
    pub security: SecurityFacts,
    /// Integrations
    #[serde(default)]
    pub integrations: IntegrationFacts,
    /// Governance
    #[serde(default)]
    pub governance: GovernanceFacts,
    /// Categories whose analyzer failed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<DegradedCategory>,
}

impl DiscoveredFacts {
    /// Empty record for a repository
    #[inline]
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            ..Self::default()
        }
    }

    /// Whether an analyzer for `category` failed
    #[must_use]
    pub fn is_degraded(&self, category: Category) -> bool {
        self.degraded.iter().any(|d| d.category == category)
    }

    /// Total number of discovered items across all categories
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.code.submodules.len()
            + self.ci.secrets.len()
            + self.ci.variables.len()
            + self.ci.runners.len()
            + self.ci.required_workflows.len()
            + self.ci.environments.len()
            + self.access.teams.len()
            + self.access.collaborators.len()
            + self.access.codeowners.len()
            + self.security.campaigns.len()
            + self.integrations.apps.len()
            + self.governance.policies.len()
            + self.governance.issue_templates.len()
            + self.governance.pr_templates.len()
    }
}
