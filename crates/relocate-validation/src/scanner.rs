//! Target capability scanning
//!
//! [`scan_target_capabilities`] never fails. Each sub-query runs
//! concurrently; a failed or absent lookup leaves its field empty and adds
//! one [`Diagnostic`] to the result. Diagnostics are also logged when
//! `verbose` is set.

use futures::future::join_all;
use relocate_api::schema::{
    InstallationList, OrgInfo, OrgPolicySummary, PullRequestParameters, RepositoryPolicySummary,
    Ruleset, RulesetRule, RunnerList, SecretList, StatusCheckParameters, TeamSummary,
    UpdateParameters, VariableList,
};
use relocate_api::{fetch, ApiError, ResourceApi};
use relocate_types::{Diagnostic, MemberPrivileges, Policy, RulesetConditions, TargetCapabilities};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Scanner settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Log skipped sub-queries at warn level
    pub verbose: bool,
}

impl ScanOptions {
    /// Set verbosity
    #[inline]
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Name of the organization-wide community health repository
pub const DOT_GITHUB_REPO: &str = ".github";

/// Enumerate what already exists in `organization`.
pub async fn scan_target_capabilities<A>(
    api: &A,
    organization: &str,
    options: &ScanOptions,
) -> TargetCapabilities
where
    A: ResourceApi + ?Sized,
{
    info!(organization, "scanning target organization");

    let (apps, teams, policies, privileges, secrets, variables, runners) = tokio::join!(
        scan_apps(api, organization),
        scan_teams(api, organization),
        scan_policies(api, organization),
        scan_member_privileges(api, organization),
        scan_secrets(api, organization),
        scan_variables(api, organization),
        scan_runners(api, organization),
    );

    let mut capabilities = TargetCapabilities::new(organization);
    let mut scan = Settle {
        organization,
        verbose: options.verbose,
        diagnostics: Vec::new(),
    };

    capabilities.apps = scan.take("apps", apps).unwrap_or_default();
    capabilities.teams = scan.take("teams", teams).unwrap_or_default();
    capabilities.repository_policies = policies.collect(&mut scan);
    capabilities.member_privileges = scan.take("member privileges", privileges).unwrap_or_default();
    capabilities.secrets = scan.take("secrets", secrets).unwrap_or_default();
    capabilities.variables = scan.take("variables", variables).unwrap_or_default();
    capabilities.runners = scan.take("runners", runners).unwrap_or_default();
    capabilities.diagnostics = scan.diagnostics;

    debug!(
        organization,
        apps = capabilities.apps.len(),
        teams = capabilities.teams.len(),
        policies = capabilities.repository_policies.len(),
        skipped = capabilities.diagnostics.len(),
        "target scan complete"
    );
    capabilities
}

/// Converts sub-query outcomes into values or diagnostics
struct Settle<'a> {
    organization: &'a str,
    verbose: bool,
    diagnostics: Vec<Diagnostic>,
}

impl Settle<'_> {
    fn take<T>(&mut self, subject: &str, outcome: Result<T, ApiError>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(err) => {
                if self.verbose {
                    warn!(organization = self.organization, subject, error = %err, "target lookup skipped");
                } else {
                    debug!(organization = self.organization, subject, error = %err, "target lookup skipped");
                }
                self.diagnostics.push(if err.is_absent() {
                    Diagnostic::absent(subject, err.to_string())
                } else {
                    Diagnostic::failed(subject, err.to_string())
                });
                None
            }
        }
    }
}

async fn scan_apps<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<String>, ApiError> {
    let list: InstallationList = fetch(api, &format!("orgs/{org}/installations")).await?;
    Ok(list
        .installations
        .iter()
        .filter_map(|i| i.display_name().map(ToString::to_string))
        .collect())
}

async fn scan_teams<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<String>, ApiError> {
    let teams: Vec<TeamSummary> = fetch(api, &format!("orgs/{org}/teams")).await?;
    Ok(teams.into_iter().map(|t| t.name).collect())
}

async fn scan_secrets<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<String>, ApiError> {
    let list: SecretList = fetch(api, &format!("orgs/{org}/actions/secrets")).await?;
    Ok(list.secrets.into_iter().map(|s| s.name).collect())
}

async fn scan_variables<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<String>, ApiError> {
    let list: VariableList = fetch(api, &format!("orgs/{org}/actions/variables")).await?;
    Ok(list.variables.into_iter().map(|v| v.name).collect())
}

async fn scan_runners<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<String>, ApiError> {
    let list: RunnerList = fetch(api, &format!("orgs/{org}/actions/runners")).await?;
    Ok(list
        .runners
        .into_iter()
        .filter(|r| r.is_online())
        .map(|r| r.name)
        .collect())
}

async fn scan_member_privileges<A: ResourceApi + ?Sized>(
    api: &A,
    org: &str,
) -> Result<MemberPrivileges, ApiError> {
    let info: OrgInfo = fetch(api, &format!("orgs/{org}")).await?;
    Ok(MemberPrivileges {
        can_create_repos: info.members_can_create_repositories,
        can_fork_private_repos: info.members_can_fork_private_repositories,
        two_factor_required: info.two_factor_requirement_enabled,
        web_commit_signoff_required: info.web_commit_signoff_required,
        default_permission: info.default_repository_permission,
        restrictions_active: Vec::new(),
    }
    .with_active_restrictions())
}

/// Outcomes of every policy source, kept apart so each failure is reported
/// under its own subject
struct PolicySources {
    direct: Result<Vec<Policy>, ApiError>,
    alternate: Result<Vec<Policy>, ApiError>,
    rulesets: Result<Vec<Policy>, ApiError>,
    dot_github: Vec<Policy>,
}

impl PolicySources {
    /// Additive merge in source order; duplicates are kept
    fn collect(self, scan: &mut Settle<'_>) -> Vec<Policy> {
        let mut policies = Vec::new();
        policies.extend(scan.take("policies", self.direct).unwrap_or_default());
        policies.extend(scan.take("repository policies", self.alternate).unwrap_or_default());
        policies.extend(scan.take("rulesets", self.rulesets).unwrap_or_default());
        policies.extend(self.dot_github);
        policies
    }
}

async fn scan_policies<A: ResourceApi + ?Sized>(api: &A, org: &str) -> PolicySources {
    let (direct, alternate, rulesets, dot_github) = tokio::join!(
        direct_policies(api, org),
        alternate_policies(api, org),
        ruleset_policies(api, org),
        dot_github_policies(api, org),
    );
    PolicySources {
        direct,
        alternate,
        rulesets,
        dot_github,
    }
}

async fn direct_policies<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<Policy>, ApiError> {
    let listed: Vec<OrgPolicySummary> = fetch(api, &format!("orgs/{org}/policies")).await?;
    Ok(listed
        .into_iter()
        .map(|p| {
            let mut restrictions: Vec<String> = p
                .description
                .filter(|d| !d.is_empty())
                .into_iter()
                .chain(p.rules.iter().map(|r| format!("Rule: {}", r.name)))
                .collect();
            if restrictions.is_empty() {
                restrictions.push(format!(
                    "Type: {}, Scope: {}",
                    p.policy_type.unwrap_or_default(),
                    p.scope.unwrap_or_default()
                ));
            }
            Policy::new(p.name, p.status).with_restrictions(restrictions)
        })
        .collect())
}

async fn alternate_policies<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<Policy>, ApiError> {
    let listed: Vec<RepositoryPolicySummary> =
        fetch(api, &format!("orgs/{org}/repository-policies")).await?;
    Ok(listed
        .into_iter()
        .map(|p| {
            let restrictions = p.body.filter(|b| !b.is_empty()).into_iter().collect();
            Policy::new(p.name, p.state).with_restrictions(restrictions)
        })
        .collect())
}

/// Organization rulesets targeting repositories whose name mentions "policy"
async fn ruleset_policies<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<Policy>, ApiError> {
    let listed: Vec<Ruleset> = fetch(api, &format!("orgs/{org}/rulesets")).await?;
    let candidates: Vec<Ruleset> = listed
        .into_iter()
        .filter(|r| r.targets_repositories() && r.name.to_lowercase().contains("policy"))
        .collect();

    let details = join_all(candidates.iter().map(|r| async move {
        let path = format!("orgs/{org}/rulesets/{}", r.id);
        fetch::<Ruleset, A>(api, &path).await
    }))
    .await;

    Ok(candidates
        .into_iter()
        .zip(details)
        .map(|(summary, detail)| ruleset_policy(summary, detail.ok()))
        .collect())
}

fn ruleset_policy(summary: Ruleset, detail: Option<Ruleset>) -> Policy {
    let mut restrictions = Vec::new();
    match &detail {
        Some(detail) => {
            for rule in &detail.rules {
                describe_rule(rule, &mut restrictions);
            }
            if let Some(branches) = detail
                .conditions
                .as_ref()
                .and_then(|c| c.ref_name.as_ref())
                .filter(|r| !r.include.is_empty())
            {
                restrictions.push(format!("Applies to branches: {}", branches.include.join(", ")));
            }
        }
        None => {
            restrictions.extend(summary.rules.iter().map(|r| format!("Rule: {}", r.rule_type)));
        }
    }
    if restrictions.is_empty() {
        restrictions.push(format!("Enforcement: {}", summary.enforcement));
    }

    let conditions = detail
        .as_ref()
        .and_then(|d| d.conditions.as_ref())
        .or(summary.conditions.as_ref())
        .and_then(|c| c.repository_name.as_ref())
        .map(|names| {
            RulesetConditions::all()
                .with_include(names.include.iter().cloned())
                .with_exclude(names.exclude.iter().cloned())
                .with_protected_only(names.protected)
        });

    let mut policy = Policy::new(summary.name, summary.enforcement).with_restrictions(restrictions);
    policy.conditions = conditions;
    policy
}

fn describe_rule(rule: &RulesetRule, out: &mut Vec<String>) {
    match rule.rule_type.as_str() {
        "pull_request" => {
            if let Some(params) = rule.parameters_as::<PullRequestParameters>() {
                out.push(format!(
                    "Requires {} approving reviews",
                    params.required_approving_review_count
                ));
                if params.dismiss_stale_reviews_on_push {
                    out.push("Dismiss stale reviews on push".to_string());
                }
                if params.require_code_owner_review {
                    out.push("Require code owner review".to_string());
                }
            }
        }
        "required_status_checks" => {
            if let Some(params) = rule.parameters_as::<StatusCheckParameters>() {
                out.extend(
                    params
                        .required_status_checks
                        .into_iter()
                        .map(|c| format!("Required status check: {}", c.context)),
                );
            }
        }
        "creation" => out.push("Creation restricted".to_string()),
        "deletion" => out.push("Deletion restricted".to_string()),
        "update" => {
            let disallowed = rule
                .parameters_as::<UpdateParameters>()
                .and_then(|p| p.update_allows_fetch_and_merge)
                == Some(false);
            if disallowed {
                out.push("Force push disabled".to_string());
            }
        }
        "force_push" | "non_fast_forward" => out.push("Force push disabled".to_string()),
        "required_linear_history" => out.push("Linear history required".to_string()),
        "required_signatures" => out.push("Signed commits required".to_string()),
        "branch_name_pattern" => out.push("Branch naming pattern enforced".to_string()),
        "commit_message_pattern" => out.push("Commit message pattern enforced".to_string()),
        "commit_author_email_pattern" => out.push("Commit author email pattern enforced".to_string()),
        "committer_email_pattern" => out.push("Committer email pattern enforced".to_string()),
        other => out.push(format!("Rule: {other}")),
    }
}

/// Policies implied by files in the organization's `.github` repository.
///
/// Presence checks only; a missing file, or any failed lookup, contributes
/// nothing.
pub async fn dot_github_policies<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Vec<Policy> {
    let security = format!("repos/{org}/{DOT_GITHUB_REPO}/contents/SECURITY.md");
    let dependabot = format!("repos/{org}/{DOT_GITHUB_REPO}/contents/.github/dependabot.yml");
    let (security, dependabot) = tokio::join!(api.get(&security), api.get(&dependabot));

    let mut policies = Vec::new();
    if security.is_ok() {
        policies.push(
            Policy::new("Organization Security Policy", "active")
                .with_restriction("SECURITY.md file present"),
        );
    }
    if dependabot.is_ok() {
        policies.push(
            Policy::new("Dependabot Configuration Policy", "active")
                .with_restriction("Automated dependency updates configured"),
        );
    }
    policies
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relocate_test_utils::{Fault, FakeApi};
    use relocate_types::DiagnosticKind;
    use serde_json::json;

    #[tokio::test]
    async fn unreachable_target_yields_empty_capabilities() {
        let api = FakeApi::new();
        let caps = scan_target_capabilities(&api, "beta", &ScanOptions::default()).await;

        assert_eq!(caps.organization, "beta");
        assert!(caps.apps.is_empty());
        assert!(caps.teams.is_empty());
        assert!(caps.repository_policies.is_empty());
        assert_eq!(caps.member_privileges, MemberPrivileges::default());
        assert!(caps
            .diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::Absent));
        assert_eq!(caps.diagnostics.len(), 9);
    }

    #[tokio::test]
    async fn server_errors_are_reported_as_failed() {
        let api = FakeApi::new()
            .with_fault("orgs/beta/teams", Fault::Status(502))
            .with_json("orgs/beta/actions/secrets", json!({"secrets": [{"name": "NPM_TOKEN"}]}));
        let caps = scan_target_capabilities(&api, "beta", &ScanOptions::default().with_verbose(true)).await;

        assert!(caps.teams.is_empty());
        assert_eq!(caps.secrets, vec!["NPM_TOKEN".to_string()]);
        let teams = caps.diagnostics.iter().find(|d| d.subject == "teams").unwrap();
        assert_eq!(teams.kind, DiagnosticKind::Failed);
    }

    #[tokio::test]
    async fn only_online_runners_are_kept() {
        let api = FakeApi::new().with_json(
            "orgs/beta/actions/runners",
            json!({"runners": [
                {"name": "linux-1", "status": "online"},
                {"name": "linux-2", "status": "offline"},
                {"name": "mac-1", "status": "Online"}
            ]}),
        );
        let caps = scan_target_capabilities(&api, "beta", &ScanOptions::default()).await;
        assert_eq!(caps.runners, vec!["linux-1".to_string(), "mac-1".to_string()]);
    }

    #[tokio::test]
    async fn member_privileges_from_org_info() {
        let api = FakeApi::new().with_json(
            "orgs/beta",
            json!({
                "login": "beta",
                "members_can_create_repositories": false,
                "members_can_fork_private_repositories": true,
                "two_factor_requirement_enabled": true,
                "web_commit_signoff_required": false,
                "default_repository_permission": "read"
            }),
        );
        let caps = scan_target_capabilities(&api, "beta", &ScanOptions::default()).await;
        let privileges = caps.member_privileges;
        assert!(!privileges.can_create_repos);
        assert!(privileges.can_fork_private_repos);
        assert!(privileges.two_factor_required);
        assert_eq!(privileges.default_permission, "read");
        assert_eq!(
            privileges.restrictions_active,
            vec![
                "repository creation restricted".to_string(),
                "two-factor authentication required".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn policies_merge_all_sources_without_dedup() {
        let api = FakeApi::new()
            .with_json(
                "orgs/beta/policies",
                json!([
                    {"name": "Branch policy", "status": "active", "description": "Protect main"},
                    {"name": "Bare policy", "status": "active", "type": "branch", "scope": "org"}
                ]),
            )
            .with_json(
                "orgs/beta/repository-policies",
                json!([{"name": "Branch policy", "state": "enabled", "body": "Protect main"}]),
            )
            .with_json(
                "orgs/beta/rulesets",
                json!([
                    {"id": 1, "name": "Review policy", "enforcement": "active", "target": "repository"},
                    {"id": 2, "name": "Tag rules", "enforcement": "active", "target": "repository"},
                    {"id": 3, "name": "Branch policy", "enforcement": "active", "target": "branch"}
                ]),
            )
            .with_json(
                "orgs/beta/rulesets/1",
                json!({
                    "id": 1,
                    "name": "Review policy",
                    "enforcement": "active",
                    "target": "repository",
                    "conditions": {
                        "ref_name": {"include": ["~DEFAULT_BRANCH"], "exclude": []},
                        "repository_name": {"include": ["api"], "exclude": [], "protected": false}
                    },
                    "rules": [
                        {"type": "pull_request", "parameters": {"required_approving_review_count": 2}},
                        {"type": "required_status_checks", "parameters": {"required_status_checks": [{"context": "ci"}]}},
                        {"type": "required_signatures"},
                        {"type": "merge_queue"}
                    ]
                }),
            )
            .with_json("repos/beta/.github/contents/SECURITY.md", json!({"name": "SECURITY.md"}));

        let caps = scan_target_capabilities(&api, "beta", &ScanOptions::default()).await;
        let names: Vec<_> = caps.repository_policies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Branch policy",
                "Bare policy",
                "Branch policy",
                "Review policy",
                "Organization Security Policy"
            ]
        );
        assert_eq!(caps.repository_policies[1].restrictions, vec!["Type: branch, Scope: org"]);
        assert_eq!(caps.repository_policies[2].status, "enabled");

        let review = &caps.repository_policies[3];
        assert_eq!(
            review.restrictions,
            vec![
                "Requires 2 approving reviews",
                "Required status check: ci",
                "Signed commits required",
                "Rule: merge_queue",
                "Applies to branches: ~DEFAULT_BRANCH",
            ]
        );
        assert_eq!(
            review.conditions.as_ref().map(|c| c.include_names.clone()),
            Some(vec!["api".to_string()])
        );
    }

    #[tokio::test]
    async fn ruleset_detail_failure_falls_back_to_summary() {
        let api = FakeApi::new()
            .with_json(
                "orgs/beta/rulesets",
                json!([
                    {"id": 4, "name": "Deploy policy", "enforcement": "evaluate", "target": "repository",
                     "rules": [{"type": "deletion"}]},
                    {"id": 5, "name": "Empty policy", "enforcement": "disabled", "target": "repository"}
                ]),
            )
            .with_fault("orgs/beta/rulesets/4", Fault::Status(500));

        let caps = scan_target_capabilities(&api, "beta", &ScanOptions::default()).await;
        assert_eq!(caps.repository_policies[0].restrictions, vec!["Rule: deletion"]);
        assert_eq!(caps.repository_policies[1].restrictions, vec!["Enforcement: disabled"]);
    }

    #[tokio::test]
    async fn apps_fall_back_to_slug() {
        let api = FakeApi::new().with_json(
            "orgs/beta/installations",
            json!({"installations": [{"app_name": "Codecov"}, {"app_slug": "renovate"}]}),
        );
        let caps = scan_target_capabilities(&api, "beta", &ScanOptions::default()).await;
        assert_eq!(caps.apps, vec!["Codecov".to_string(), "renovate".to_string()]);
    }
}
