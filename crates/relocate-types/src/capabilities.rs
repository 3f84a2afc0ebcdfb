//! Target organization capabilities

use crate::diagnostic::Diagnostic;
use crate::policy::Policy;
use serde::{Deserialize, Serialize};

/// Organization-wide member settings of the target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberPrivileges {
    /// Members may create repositories
    pub can_create_repos: bool,
    /// Members may fork private repositories
    pub can_fork_private_repos: bool,
    /// Two-factor authentication is required
    pub two_factor_required: bool,
    /// Web commit signoff is required
    pub web_commit_signoff_required: bool,
    /// Base permission granted to members
    #[serde(default)]
    pub default_permission: String,
    /// Human-readable list of the restrictions currently in force
    #[serde(default)]
    pub restrictions_active: Vec<String>,
}

impl MemberPrivileges {
    /// Derive `restrictions_active` from the four flags.
    #[must_use]
    pub fn with_active_restrictions(mut self) -> Self {
        let mut active = Vec::new();
        if !self.can_create_repos {
            active.push("repository creation restricted".to_string());
        }
        if !self.can_fork_private_repos {
            active.push("private repository forking restricted".to_string());
        }
        if self.two_factor_required {
            active.push("two-factor authentication required".to_string());
        }
        if self.web_commit_signoff_required {
            active.push("web commit signoff required".to_string());
        }
        self.restrictions_active = active;
        self
    }
}

/// What already exists in the target organization.
///
/// Built once per validation run. Lists are empty when the corresponding
/// lookup was absent or failed; [`TargetCapabilities::diagnostics`] says which.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetCapabilities {
    /// Target organization login
    pub organization: String,
    /// Installed app names
    #[serde(default)]
    pub apps: Vec<String>,
    /// Team names
    #[serde(default)]
    pub teams: Vec<String>,
    /// Actions secret names
    #[serde(default)]
    pub secrets: Vec<String>,
    /// Actions variable names
    #[serde(default)]
    pub variables: Vec<String>,
    /// Online self-hosted runner names
    #[serde(default)]
    pub runners: Vec<String>,
    /// Repository policies, merged from every source; duplicates kept
    #[serde(default)]
    pub repository_policies: Vec<Policy>,
    /// Member-wide settings
    #[serde(default)]
    pub member_privileges: MemberPrivileges,
    /// Skipped sub-queries
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl TargetCapabilities {
    /// Empty capabilities for an organization
    #[inline]
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            ..Self::default()
        }
    }

    /// Set the app list
    #[inline]
    #[must_use]
    pub fn with_apps(mut self, apps: Vec<String>) -> Self {
        self.apps = apps;
        self
    }

    /// Set the team list
    #[inline]
    #[must_use]
    pub fn with_teams(mut self, teams: Vec<String>) -> Self {
        self.teams = teams;
        self
    }

    /// Set the secret list
    #[inline]
    #[must_use]
    pub fn with_secrets(mut self, secrets: Vec<String>) -> Self {
        self.secrets = secrets;
        self
    }

    /// Set the variable list
    #[inline]
    #[must_use]
    pub fn with_variables(mut self, variables: Vec<String>) -> Self {
        self.variables = variables;
        self
    }

    /// Set the runner list
    #[inline]
    #[must_use]
    pub fn with_runners(mut self, runners: Vec<String>) -> Self {
        self.runners = runners;
        self
    }

    /// Set the policy list
    #[inline]
    #[must_use]
    pub fn with_policies(mut self, policies: Vec<Policy>) -> Self {
        self.repository_policies = policies;
        self
    }

    /// Set member privileges
    #[inline]
    #[must_use]
    pub fn with_member_privileges(mut self, privileges: MemberPrivileges) -> Self {
        self.member_privileges = privileges;
        self
    }
}
