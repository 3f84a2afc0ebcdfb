//! Canned organizations and records
//!
//! The `seed_*` helpers add routes to an existing [`FakeApi`] so a single
//! fake can serve a source organization, its repositories and a target.

use crate::FakeApi;
use relocate_types::{
    DiscoveredFacts, MemberPrivileges, Policy, RulesetConditions, TargetCapabilities,
};
use serde_json::json;

/// Source organization with two apps, two repository rulesets, settings
/// that restrict repository creation and require 2FA, one campaign, and a
/// `.github` repository with a security policy and an issue template.
///
/// Ruleset "Core protections" targets only `api`; "Legacy freeze" targets
/// everything except `api`.
pub fn seed_source_org(api: &FakeApi, org: &str) {
    api.set_json(
        &format!("orgs/{org}/installations"),
        json!({"installations": [
            {"app_slug": "codecov"},
            {"app_slug": "deploy-bot"}
        ]}),
    );
    api.set_json(
        &format!("orgs/{org}/rulesets"),
        json!([
            {"id": 11, "name": "Core protections", "enforcement": "active", "target": "repository"},
            {"id": 12, "name": "Legacy freeze", "enforcement": "evaluate", "target": "repository"},
            {"id": 13, "name": "Main branch", "enforcement": "active", "target": "branch"}
        ]),
    );
    api.set_json(
        &format!("orgs/{org}/rulesets/11"),
        json!({
            "id": 11, "name": "Core protections", "enforcement": "active", "target": "repository",
            "conditions": {"repository_name": {"include": ["api"], "exclude": [], "protected": false}},
            "rules": [{"type": "repository_delete"}]
        }),
    );
    api.set_json(
        &format!("orgs/{org}/rulesets/12"),
        json!({
            "id": 12, "name": "Legacy freeze", "enforcement": "evaluate", "target": "repository",
            "conditions": {"repository_name": {"include": [], "exclude": ["api"], "protected": false}},
            "rules": [{"type": "repository_transfer"}]
        }),
    );
    api.set_json(
        &format!("orgs/{org}"),
        json!({
            "login": org,
            "members_can_create_repositories": false,
            "members_can_fork_private_repositories": true,
            "members_can_delete_repositories": true,
            "members_can_delete_issues": true,
            "members_can_create_teams": true,
            "two_factor_requirement_enabled": true,
            "web_commit_signoff_required": false,
            "default_repository_permission": "read"
        }),
    );
    api.set_json(
        &format!("orgs/{org}/security/campaigns"),
        json!([{"id": 1, "name": "Leaked tokens", "status": "active"}]),
    );
    api.set_json(&format!("repos/{org}/.github"), json!({"name": ".github"}));
    api.set_json(
        &format!("repos/{org}/.github/contents/SECURITY.md"),
        json!({"name": "SECURITY.md", "type": "file"}),
    );
    api.set_json(
        &format!("repos/{org}/.github/contents/.github/ISSUE_TEMPLATE"),
        json!([{"name": "bug.md", "type": "file"}]),
    );
}

/// Repository with one team, one direct collaborator, one visible
/// organization secret and a production environment
pub fn seed_repository(api: &FakeApi, owner: &str, name: &str) {
    let base = format!("repos/{owner}/{name}");
    api.set_json(
        &format!("{base}/teams"),
        json!([{"name": "platform", "slug": "platform", "permission": "push"}]),
    );
    api.set_json(
        &format!("{base}/collaborators?affiliation=direct"),
        json!([{"login": "octocat"}]),
    );
    api.set_json(
        &format!("{base}/actions/organization-secrets"),
        json!({"secrets": [{"name": "NPM_TOKEN"}]}),
    );
    api.set_json(
        &format!("{base}/environments"),
        json!({"environments": [{"name": "production"}]}),
    );
}

/// Target organization that has the `platform` team, the `NPM_TOKEN`
/// secret, codecov installed and member settings that already restrict
/// repository creation and require 2FA
pub fn seed_target_org(api: &FakeApi, org: &str) {
    api.set_json(
        &format!("orgs/{org}/installations"),
        json!({"installations": [{"app_slug": "codecov"}]}),
    );
    api.set_json(
        &format!("orgs/{org}/teams"),
        json!([{"name": "platform", "slug": "platform"}]),
    );
    api.set_json(
        &format!("orgs/{org}/actions/secrets"),
        json!({"secrets": [{"name": "NPM_TOKEN"}]}),
    );
    api.set_json(
        &format!("orgs/{org}"),
        json!({
            "login": org,
            "members_can_create_repositories": false,
            "members_can_fork_private_repositories": false,
            "two_factor_requirement_enabled": true,
            "default_repository_permission": "read"
        }),
    );
}

/// A record with one item in most categories
pub fn sample_facts(repository: &str) -> DiscoveredFacts {
    let mut facts = DiscoveredFacts::new(repository);
    facts.code.submodules = vec!["https://github.com/acme/shared.git (same organization)".into()];
    facts.ci.secrets = vec!["NPM_TOKEN".into()];
    facts.ci.variables = vec!["REGION".into()];
    facts.access.teams = vec!["platform (push)".into()];
    facts.access.collaborators = vec!["octocat".into()];
    facts.security.campaigns = vec!["Security campaign: Leaked tokens (active)".into()];
    facts.integrations.apps = vec!["codecov (org-wide installation)".into()];
    facts.governance.policies = vec![
        Policy::new("Member Management Policy", "active")
            .with_restriction("Repository creation restricted"),
        Policy::new("Core protections", "active")
            .with_restriction("Enforcement: active")
            .with_conditions(RulesetConditions::all().with_include(["api"])),
    ];
    facts.governance.issue_templates = vec!["Issue template: .github/ISSUE_TEMPLATE".into()];
    facts
}

/// Capabilities matching [`seed_target_org`]
pub fn sample_capabilities(org: &str) -> TargetCapabilities {
    TargetCapabilities::new(org)
        .with_apps(vec!["codecov".into()])
        .with_teams(vec!["platform".into()])
        .with_secrets(vec!["NPM_TOKEN".into()])
        .with_member_privileges(
            MemberPrivileges {
                can_create_repos: false,
                can_fork_private_repos: false,
                two_factor_required: true,
                web_commit_signoff_required: false,
                default_permission: "read".into(),
                restrictions_active: Vec::new(),
            }
            .with_active_restrictions(),
        )
}
