//! Policies and ruleset targeting conditions

use serde::{Deserialize, Serialize};

const TARGETS_PREFIX: &str = "Targets repos:";
const EXCLUDES_PREFIX: &str = "Excludes repos:";
const ALL_REPOSITORIES: &str = "All repositories";
const PROTECTED_MARKER: &str = "Applies to protected repositories";

/// Repository-name conditions of an organization ruleset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesetConditions {
    /// Repository names (or patterns) the ruleset targets; empty means all
    #[serde(default)]
    pub include_names: Vec<String>,
    /// Repository names (or patterns) the ruleset skips
    #[serde(default)]
    pub exclude_names: Vec<String>,
    /// Ruleset is limited to protected repositories
    #[serde(default)]
    pub protected_only: bool,
}

impl RulesetConditions {
    /// Conditions that target every repository
    #[inline]
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Set the include list
    #[inline]
    #[must_use]
    pub fn with_include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the exclude list
    #[inline]
    #[must_use]
    pub fn with_exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as protected-only
    #[inline]
    #[must_use]
    pub fn with_protected_only(mut self, protected_only: bool) -> Self {
        self.protected_only = protected_only;
        self
    }

    /// Rebuild conditions from descriptive restriction strings
    /// (`Targets repos: a, b`, `Excludes repos: c`,
    /// `Applies to protected repositories`).
    ///
    /// Restrictions without targeting text yield conditions that apply to
    /// every repository.
    #[must_use]
    pub fn from_restrictions<S: AsRef<str>>(restrictions: &[S]) -> Self {
        let mut conditions = Self::default();
        for restriction in restrictions {
            let restriction = restriction.as_ref();
            if let Some(list) = list_after(restriction, TARGETS_PREFIX) {
                if list != ALL_REPOSITORIES {
                    conditions.include_names.extend(split_list(list));
                }
            } else if let Some(list) = list_after(restriction, EXCLUDES_PREFIX) {
                conditions.exclude_names.extend(split_list(list));
            } else if restriction.contains(PROTECTED_MARKER) {
                conditions.protected_only = true;
            }
        }
        conditions
    }

    /// Descriptive restriction strings for these conditions.
    ///
    /// "Targets repos: All repositories" is only written when nothing narrows
    /// the ruleset.
    #[must_use]
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.include_names.is_empty() {
            lines.push(format!("{TARGETS_PREFIX} {}", self.include_names.join(", ")));
        } else if self.exclude_names.is_empty() && !self.protected_only {
            lines.push(format!("{TARGETS_PREFIX} {ALL_REPOSITORIES}"));
        }
        if !self.exclude_names.is_empty() {
            lines.push(format!("{EXCLUDES_PREFIX} {}", self.exclude_names.join(", ")));
        }
        if self.protected_only {
            lines.push(PROTECTED_MARKER.to_string());
        }
        lines
    }
}

fn list_after<'a>(restriction: &'a str, prefix: &str) -> Option<&'a str> {
    restriction
        .find(prefix)
        .map(|at| restriction[at + prefix.len()..].trim())
}

fn split_list(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// An organization policy.
///
/// Used both for policies discovered in the source organization and for
/// policies that already exist in the target. Rulesets keep their structured
/// [`RulesetConditions`]; other policies leave `conditions` unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Display name
    pub name: String,
    /// Status or enforcement level (`active`, `evaluate`, ...)
    #[serde(default)]
    pub status: String,
    /// Free-text restrictions, in discovery order
    #[serde(default)]
    pub restrictions: Vec<String>,
    /// Repository targeting, when the policy came from a ruleset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<RulesetConditions>,
}

impl Policy {
    /// Create a policy without restrictions
    #[inline]
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            restrictions: Vec::new(),
            conditions: None,
        }
    }

    /// Append a restriction
    #[inline]
    #[must_use]
    pub fn with_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.restrictions.push(restriction.into());
        self
    }

    /// Replace all restrictions
    #[inline]
    #[must_use]
    pub fn with_restrictions(mut self, restrictions: Vec<String>) -> Self {
        self.restrictions = restrictions;
        self
    }

    /// Attach structured targeting
    #[inline]
    #[must_use]
    pub fn with_conditions(mut self, conditions: RulesetConditions) -> Self {
        self.conditions = Some(conditions);
        self
    }

    /// Structured targeting if present, otherwise targeting recovered from
    /// the restriction text.
    #[must_use]
    pub fn effective_conditions(&self) -> RulesetConditions {
        match &self.conditions {
            Some(conditions) => conditions.clone(),
            None => RulesetConditions::from_restrictions(&self.restrictions),
        }
    }

    /// Identifier used for validation results: `"<name> (status: <status>)"`
    #[must_use]
    pub fn display_item(&self) -> String {
        format!("{} (status: {})", self.name, self.status)
    }
}
