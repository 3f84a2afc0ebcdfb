//! Named response schemas
//!
//! One type per resource kind, decoded once and shared by every call site.
//! All fields default so that partial or older payloads still decode.

use serde::Deserialize;
use serde_json::Value;

/// `GET orgs/{org}/installations`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InstallationList {
    /// Installations
    pub installations: Vec<Installation>,
}

/// One app installation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Installation {
    /// Display name, when the API provides one
    pub app_name: Option<String>,
    /// URL slug
    pub app_slug: Option<String>,
    /// Embedded app record
    pub app: Option<AppRecord>,
}

/// App details embedded in an installation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppRecord {
    /// App name
    pub name: Option<String>,
}

impl Installation {
    /// Name, falling back to slug and then to the embedded app name
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        [
            self.app_name.as_deref(),
            self.app_slug.as_deref(),
            self.app.as_ref().and_then(|a| a.name.as_deref()),
        ]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
    }
}

/// `GET orgs/{org}/teams` and `GET repos/{owner}/{repo}/teams` items
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TeamSummary {
    /// Team name
    pub name: String,
    /// Team slug
    pub slug: String,
    /// Permission on the repository, for repository team listings
    pub permission: Option<String>,
}

/// `GET repos/{owner}/{repo}/collaborators` items
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Collaborator {
    /// User login
    pub login: String,
}

/// An item that only matters by name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamedEntry {
    /// Name
    pub name: String,
}

/// Actions secrets listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecretList {
    /// Secrets
    pub secrets: Vec<NamedEntry>,
}

/// Actions variables listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VariableList {
    /// Variables
    pub variables: Vec<NamedEntry>,
}

/// Self-hosted runner listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunnerList {
    /// Runners
    pub runners: Vec<Runner>,
}

/// One self-hosted runner
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Runner {
    /// Runner name
    pub name: String,
    /// `online` or `offline`
    pub status: String,
}

impl Runner {
    /// Reported status is `online`, any case
    #[inline]
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.status.eq_ignore_ascii_case("online")
    }
}

/// Deployment environments listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnvironmentList {
    /// Environments
    pub environments: Vec<NamedEntry>,
}

/// `GET orgs/{org}/policies` items
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrgPolicySummary {
    /// Policy name
    pub name: String,
    /// Description
    pub description: Option<String>,
    /// Status
    pub status: String,
    /// Policy type
    #[serde(rename = "type")]
    pub policy_type: Option<String>,
    /// Scope
    pub scope: Option<String>,
    /// Rules
    pub rules: Vec<PolicyRule>,
}

/// One rule inside an organization policy
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyRule {
    /// Rule name
    pub name: String,
}

/// `GET orgs/{org}/repository-policies` items
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepositoryPolicySummary {
    /// Policy name
    pub name: String,
    /// State
    pub state: String,
    /// Body text
    pub body: Option<String>,
}

/// Ruleset, as listed or as fetched by id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    /// Ruleset id
    pub id: u64,
    /// Name
    pub name: String,
    /// `active`, `evaluate` or `disabled`
    pub enforcement: String,
    /// `branch`, `tag`, `push` or `repository`
    pub target: Option<String>,
    /// Owner the ruleset is defined on
    pub source: Option<String>,
    /// Targeting; absent from some listings
    pub conditions: Option<RulesetConditionsSchema>,
    /// Rules; absent from some listings
    pub rules: Vec<RulesetRule>,
}

impl Ruleset {
    /// Ruleset targets repositories
    #[inline]
    #[must_use]
    pub fn targets_repositories(&self) -> bool {
        self.target.as_deref() == Some("repository")
    }
}

/// Ruleset conditions
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesetConditionsSchema {
    /// Branch or tag name patterns
    pub ref_name: Option<NamePatterns>,
    /// Repository name patterns
    pub repository_name: Option<RepositoryNamePatterns>,
}

/// Include/exclude patterns
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamePatterns {
    /// Included patterns
    pub include: Vec<String>,
    /// Excluded patterns
    pub exclude: Vec<String>,
}

/// Repository name patterns
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RepositoryNamePatterns {
    /// Included names
    pub include: Vec<String>,
    /// Excluded names
    pub exclude: Vec<String>,
    /// Protected repositories only
    pub protected: bool,
}

/// One ruleset rule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesetRule {
    /// Rule type, e.g. `pull_request`
    #[serde(rename = "type")]
    pub rule_type: String,
    /// Type-specific parameters
    pub parameters: Option<Value>,
}

impl RulesetRule {
    /// Decode parameters into a typed shape, `None` when missing or mismatched
    #[must_use]
    pub fn parameters_as<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.parameters
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

/// `pull_request` rule parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PullRequestParameters {
    /// Required approvals
    pub required_approving_review_count: u32,
    /// New pushes dismiss approvals
    pub dismiss_stale_reviews_on_push: bool,
    /// Code owners must approve
    pub require_code_owner_review: bool,
}

/// `update` rule parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateParameters {
    /// Fetch-and-merge updates allowed
    pub update_allows_fetch_and_merge: Option<bool>,
}

/// `required_status_checks` rule parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusCheckParameters {
    /// Checks
    pub required_status_checks: Vec<StatusCheck>,
}

/// One required status check
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusCheck {
    /// Check context
    pub context: String,
}

/// `workflows` rule parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowsParameters {
    /// Required workflows
    pub workflows: Vec<WorkflowReference>,
}

/// One required workflow
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkflowReference {
    /// Workflow file path
    pub path: String,
    /// Git ref
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Repository hosting the workflow
    pub repository_id: u64,
}

/// `GET orgs/{org}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OrgInfo {
    /// Login
    pub login: String,
    /// Members can create repositories
    pub members_can_create_repositories: bool,
    /// Members can fork private repositories
    pub members_can_fork_private_repositories: bool,
    /// Members can delete repositories
    pub members_can_delete_repositories: bool,
    /// Members can delete issues
    pub members_can_delete_issues: bool,
    /// Members can create teams
    pub members_can_create_teams: bool,
    /// 2FA required
    pub two_factor_requirement_enabled: bool,
    /// Web commit signoff required
    pub web_commit_signoff_required: bool,
    /// Base permission
    pub default_repository_permission: String,
}

/// `GET orgs/{org}/security/campaigns` items
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecurityCampaign {
    /// Campaign id
    pub id: u64,
    /// Name
    pub name: String,
    /// Status, when reported
    pub status: Option<String>,
}

/// `GET repos/{owner}/{repo}/git/trees/{sha}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GitTree {
    /// Entries
    pub tree: Vec<TreeEntry>,
    /// Listing was cut short
    pub truncated: bool,
}

/// One tree entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TreeEntry {
    /// Path relative to the root
    pub path: String,
    /// `blob`, `tree` or `commit` (submodule)
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl TreeEntry {
    /// Entry is a submodule pointer
    #[inline]
    #[must_use]
    pub fn is_submodule(&self) -> bool {
        self.entry_type == "commit"
    }
}

/// `GET repos/{owner}/{repo}/contents/{path}` for a single entry
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentEntry {
    /// Entry name
    pub name: String,
    /// `file`, `dir`, `symlink` or `submodule`
    #[serde(rename = "type")]
    pub entry_type: String,
    /// Clone URL, for submodules
    pub submodule_git_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn installation_name_falls_back() {
        let installation: Installation =
            serde_json::from_value(json!({"app_slug": "codecov", "app": {"name": "Codecov"}})).unwrap();
        assert_eq!(installation.display_name(), Some("codecov"));

        let installation: Installation =
            serde_json::from_value(json!({"app_name": "", "app": {"name": "Codecov"}})).unwrap();
        assert_eq!(installation.display_name(), Some("Codecov"));
    }

    #[test]
    fn ruleset_decodes_partial_listing() {
        let ruleset: Ruleset = serde_json::from_value(json!({
            "id": 7,
            "name": "Main policy",
            "enforcement": "active",
            "target": "repository"
        }))
        .unwrap();
        assert!(ruleset.targets_repositories());
        assert!(ruleset.conditions.is_none());
        assert!(ruleset.rules.is_empty());
    }

    #[test]
    fn typed_rule_parameters() {
        let rule: RulesetRule = serde_json::from_value(json!({
            "type": "pull_request",
            "parameters": {"required_approving_review_count": 2}
        }))
        .unwrap();
        let params: PullRequestParameters = rule.parameters_as().unwrap();
        assert_eq!(params.required_approving_review_count, 2);
    }

    #[test]
    fn runner_status_is_case_insensitive() {
        let runner = Runner {
            name: "build-1".into(),
            status: "ONLINE".into(),
        };
        assert!(runner.is_online());
    }
}
