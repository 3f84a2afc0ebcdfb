//! Phase-one loaders for organization-wide facts

use crate::context::{subjects, CampaignRef};
use futures::future::join_all;
use relocate_api::schema::{InstallationList, OrgInfo, Ruleset, SecurityCampaign};
use relocate_api::{fetch, ApiError, ResourceApi};
use relocate_types::{Diagnostic, GovernanceFacts, Policy, RulesetConditions};
use relocate_validation::scanner::{dot_github_policies, DOT_GITHUB_REPO};
use tracing::debug;

const ORG_ISSUE_TEMPLATE_LOCATIONS: [&str; 2] = [".github/ISSUE_TEMPLATE", "ISSUE_TEMPLATE"];
const ORG_PR_TEMPLATE_LOCATIONS: [&str; 2] = [".github/PULL_REQUEST_TEMPLATE", "PULL_REQUEST_TEMPLATE"];

/// Installed apps, as `"<name> (org-wide installation)"`
pub async fn load_apps<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<String>, ApiError> {
    let list: InstallationList = fetch(api, &format!("orgs/{org}/installations")).await?;
    Ok(list
        .installations
        .iter()
        .filter_map(|i| i.display_name())
        .map(|name| format!("{name} (org-wide installation)"))
        .collect())
}

/// Security campaigns
pub async fn load_campaigns<A: ResourceApi + ?Sized>(
    api: &A,
    org: &str,
) -> Result<Vec<CampaignRef>, ApiError> {
    let campaigns: Vec<SecurityCampaign> = fetch(api, &format!("orgs/{org}/security/campaigns")).await?;
    Ok(campaigns
        .into_iter()
        .map(|c| CampaignRef {
            name: c.name,
            status: c.status,
        })
        .collect())
}

/// Organization settings
pub async fn load_org_info<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<OrgInfo, ApiError> {
    fetch(api, &format!("orgs/{org}")).await
}

/// Repository rulesets, `.github` presence policies and organization
/// templates.
///
/// Each part fails independently; whatever loaded is returned together with
/// a diagnostic per failed part.
pub async fn load_governance<A: ResourceApi + ?Sized>(
    api: &A,
    org: &str,
) -> (GovernanceFacts, Vec<Diagnostic>) {
    let (rulesets, presence, templates) = tokio::join!(
        ruleset_policies(api, org),
        dot_github_policies(api, org),
        org_templates(api, org),
    );

    let mut governance = GovernanceFacts::default();
    let mut diagnostics = Vec::new();

    match rulesets {
        Ok(policies) => governance.policies = policies,
        Err(err) if err.is_absent() => diagnostics.push(Diagnostic::absent(subjects::RULESETS, err.to_string())),
        Err(err) => diagnostics.push(Diagnostic::failed(subjects::RULESETS, err.to_string())),
    }
    governance.policies.extend(presence);
    match templates {
        Ok((issue, pr)) => {
            governance.issue_templates = issue;
            governance.pr_templates = pr;
        }
        Err(err) => diagnostics.push(Diagnostic::failed(subjects::TEMPLATES, err.to_string())),
    }

    (governance, diagnostics)
}

/// One policy per ruleset that targets repositories, with structured
/// conditions whenever they are known
async fn ruleset_policies<A: ResourceApi + ?Sized>(api: &A, org: &str) -> Result<Vec<Policy>, ApiError> {
    let listed: Vec<Ruleset> = fetch(api, &format!("orgs/{org}/rulesets")).await?;
    let repository_rulesets: Vec<Ruleset> = listed
        .into_iter()
        .filter(Ruleset::targets_repositories)
        .collect();

    let completed = join_all(repository_rulesets.into_iter().map(|summary| async move {
        if summary.conditions.is_some() {
            return summary;
        }
        let path = format!("orgs/{org}/rulesets/{}", summary.id);
        match fetch::<Ruleset, A>(api, &path).await {
            Ok(detail) => detail,
            Err(err) => {
                debug!(organization = org, ruleset = summary.id, error = %err, "ruleset detail unavailable");
                summary
            }
        }
    }))
    .await;

    Ok(completed.into_iter().map(ruleset_policy).collect())
}

fn ruleset_policy(ruleset: Ruleset) -> Policy {
    let conditions = ruleset
        .conditions
        .as_ref()
        .and_then(|c| c.repository_name.as_ref())
        .map(|names| {
            RulesetConditions::all()
                .with_include(names.include.iter().cloned())
                .with_exclude(names.exclude.iter().cloned())
                .with_protected_only(names.protected)
        });

    let mut restrictions = vec![format!("Enforcement: {}", ruleset.enforcement)];
    if let Some(conditions) = &conditions {
        restrictions.extend(conditions.describe());
    }
    if !ruleset.rules.is_empty() {
        let types: Vec<&str> = ruleset.rules.iter().map(|r| r.rule_type.as_str()).collect();
        restrictions.push(format!("Rules: {}", types.join(", ")));
    }

    let mut policy = Policy::new(ruleset.name, ruleset.enforcement).with_restrictions(restrictions);
    policy.conditions = conditions;
    policy
}

async fn exists<A: ResourceApi + ?Sized>(api: &A, path: &str) -> Result<bool, ApiError> {
    match api.get(path).await {
        Ok(_) => Ok(true),
        Err(err) if err.is_absent() => Ok(false),
        Err(err) => Err(err),
    }
}

/// First template location of each kind in the organization's `.github`
/// repository, as `"<location> in <org>/.github"`
async fn org_templates<A: ResourceApi + ?Sized>(
    api: &A,
    org: &str,
) -> Result<(Vec<String>, Vec<String>), ApiError> {
    if !exists(api, &format!("repos/{org}/{DOT_GITHUB_REPO}")).await? {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut found = (Vec::new(), Vec::new());
    for (locations, out) in [
        (&ORG_ISSUE_TEMPLATE_LOCATIONS, &mut found.0),
        (&ORG_PR_TEMPLATE_LOCATIONS, &mut found.1),
    ] {
        for location in locations {
            let path = format!("repos/{org}/{DOT_GITHUB_REPO}/contents/{location}");
            if exists(api, &path).await? {
                out.push(format!("{location} in {org}/{DOT_GITHUB_REPO}"));
                break;
            }
        }
    }
    Ok(found)
}

/// Policies implied by organization member settings
#[must_use]
pub fn settings_policies(info: &OrgInfo) -> Vec<Policy> {
    let membership: Vec<&str> = [
        (!info.members_can_create_repositories, "Repository creation restricted"),
        (!info.members_can_fork_private_repositories, "Private repository forking restricted"),
        (!info.members_can_delete_repositories, "Repository deletion restricted"),
        (!info.members_can_delete_issues, "Issue deletion restricted"),
        (!info.members_can_create_teams, "Team creation restricted"),
    ]
    .into_iter()
    .filter_map(|(active, text)| active.then_some(text))
    .collect();

    let mut security: Vec<String> = [
        (info.two_factor_requirement_enabled, "Two-factor authentication required"),
        (info.web_commit_signoff_required, "Web commit signoff required"),
    ]
    .into_iter()
    .filter_map(|(active, text)| active.then(|| text.to_string()))
    .collect();
    let permission = info.default_repository_permission.as_str();
    if !permission.is_empty() && permission != "read" {
        security.push(format!("Default repository permission: {permission}"));
    }

    let mut policies = Vec::new();
    if !membership.is_empty() {
        policies.push(
            Policy::new("Member Management Policy", "active")
                .with_restrictions(membership.into_iter().map(String::from).collect()),
        );
    }
    if !security.is_empty() {
        policies.push(Policy::new("Security Policy", "active").with_restrictions(security));
    }
    policies
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relocate_test_utils::{Fault, FakeApi};
    use serde_json::json;

    #[tokio::test]
    async fn rulesets_keep_structured_conditions() {
        let api = FakeApi::new()
            .with_json(
                "orgs/acme/rulesets",
                json!([
                    {"id": 1, "name": "Core repos", "enforcement": "active", "target": "repository"},
                    {"id": 2, "name": "Branches", "enforcement": "active", "target": "branch"}
                ]),
            )
            .with_json(
                "orgs/acme/rulesets/1",
                json!({
                    "id": 1,
                    "name": "Core repos",
                    "enforcement": "active",
                    "target": "repository",
                    "conditions": {"repository_name": {"include": ["api", "web"], "exclude": ["web"], "protected": false}},
                    "rules": [{"type": "repository_delete"}, {"type": "repository_transfer"}]
                }),
            );

        let (governance, diagnostics) = load_governance(&api, "acme").await;
        assert!(diagnostics.is_empty());
        assert_eq!(governance.policies.len(), 1);

        let policy = &governance.policies[0];
        assert_eq!(
            policy.restrictions,
            vec![
                "Enforcement: active",
                "Targets repos: api, web",
                "Excludes repos: web",
                "Rules: repository_delete, repository_transfer",
            ]
        );
        let conditions = policy.conditions.as_ref().unwrap();
        assert_eq!(conditions.include_names, vec!["api", "web"]);
        assert_eq!(conditions.exclude_names, vec!["web"]);
    }

    #[tokio::test]
    async fn ruleset_without_detail_has_no_conditions() {
        let api = FakeApi::new()
            .with_json(
                "orgs/acme/rulesets",
                json!([{"id": 9, "name": "Everything", "enforcement": "evaluate", "target": "repository"}]),
            )
            .with_fault("orgs/acme/rulesets/9", Fault::Status(500));

        let (governance, _) = load_governance(&api, "acme").await;
        assert_eq!(governance.policies[0].conditions, None);
        assert_eq!(governance.policies[0].restrictions, vec!["Enforcement: evaluate"]);
    }

    #[tokio::test]
    async fn org_templates_take_first_location() {
        let api = FakeApi::new()
            .with_json("repos/acme/.github", json!({"name": ".github"}))
            .with_json("repos/acme/.github/contents/ISSUE_TEMPLATE", json!([]))
            .with_json("repos/acme/.github/contents/.github/PULL_REQUEST_TEMPLATE", json!([]))
            .with_json("repos/acme/.github/contents/PULL_REQUEST_TEMPLATE", json!([]));

        let (governance, diagnostics) = load_governance(&api, "acme").await;
        assert_eq!(governance.issue_templates, vec!["ISSUE_TEMPLATE in acme/.github"]);
        assert_eq!(
            governance.pr_templates,
            vec![".github/PULL_REQUEST_TEMPLATE in acme/.github"]
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].subject, subjects::RULESETS);
    }

    #[tokio::test]
    async fn template_failure_is_reported() {
        let api = FakeApi::new().with_fault("repos/acme/.github", Fault::Transport);
        let (governance, diagnostics) = load_governance(&api, "acme").await;
        assert!(governance.issue_templates.is_empty());
        assert!(diagnostics.iter().any(|d| d.subject == subjects::TEMPLATES));
    }

    #[test]
    fn settings_policies_follow_flags() {
        let info = OrgInfo {
            members_can_create_repositories: false,
            members_can_fork_private_repositories: true,
            members_can_delete_repositories: true,
            members_can_delete_issues: true,
            members_can_create_teams: true,
            web_commit_signoff_required: true,
            default_repository_permission: "write".into(),
            ..OrgInfo::default()
        };
        let policies = settings_policies(&info);
        assert_eq!(policies.len(), 2);
        assert_eq!(policies[0].restrictions, vec!["Repository creation restricted"]);
        assert_eq!(
            policies[1].restrictions,
            vec!["Web commit signoff required", "Default repository permission: write"]
        );
    }

    #[test]
    fn permissive_org_has_no_settings_policies() {
        let info = OrgInfo {
            members_can_create_repositories: true,
            members_can_fork_private_repositories: true,
            members_can_delete_repositories: true,
            members_can_delete_issues: true,
            members_can_create_teams: true,
            default_repository_permission: "read".into(),
            ..OrgInfo::default()
        };
        assert!(settings_policies(&info).is_empty());
    }
}
