//! Dependency classification
//!
//! [`validate`] is pure and total: identical inputs give identical output,
//! and every discovered item yields exactly one [`ValidationResult`].

use relocate_types::{
    AccessFacts, CiFacts, CodeFacts, DiscoveredFacts, GovernanceFacts, IntegrationFacts,
    MemberPrivileges, MigrationValidation, Policy, ReadinessStatus, SecurityFacts,
    TargetCapabilities, ValidationResult, ValidationSummary,
};

/// Apps that are publicly installable and never need a custom setup
const STANDARD_APPS: [&str; 4] = ["dependabot", "github-actions", "codecov", "sonarcloud"];

/// Keywords that mark a policy as a member-wide setting
const MEMBER_PRIVILEGE_KEYWORDS: [&str; 5] = [
    "member management",
    "repository creation",
    "private repository forking",
    "two-factor authentication",
    "web commit signoff",
];

const MEMBER_MANAGEMENT_POLICY: &str = "Member Management Policy";

const CODEOWNERS_TEAM_PREFIX: &str = "Team: @";
const CODEOWNERS_USER_PREFIX: &str = "User: @";

/// Classify `facts` against `capabilities`.
///
/// `assign_teams` is accepted for interface compatibility; no rule depends
/// on it.
#[must_use]
pub fn validate(
    facts: &DiscoveredFacts,
    capabilities: &TargetCapabilities,
    assign_teams: bool,
) -> MigrationValidation {
    let _ = assign_teams;

    let code_dependencies = classify_code(&facts.code);
    let ci_dependencies = classify_ci(&facts.ci, capabilities);
    let access_permissions = classify_access(&facts.access, capabilities);
    let security_compliance = classify_security(&facts.security);
    let apps_integrations = classify_apps(&facts.integrations, capabilities);
    let governance = classify_governance(&facts.governance, capabilities);

    let summary = ValidationSummary::from_results(
        code_dependencies
            .iter()
            .chain(&ci_dependencies)
            .chain(&access_permissions)
            .chain(&security_compliance)
            .chain(&apps_integrations)
            .chain(&governance),
    );

    MigrationValidation {
        repository: facts.repository.clone(),
        target_organization: capabilities.organization.clone(),
        overall_readiness: summary.overall(),
        summary,
        code_dependencies,
        ci_dependencies,
        access_permissions,
        security_compliance,
        apps_integrations,
        governance,
    }
}

/// Text before the first `" ("`, or the whole item
fn base_name(item: &str) -> &str {
    item.find(" (").map_or(item, |at| &item[..at])
}

fn contains_ignore_case(available: &[String], name: &str) -> bool {
    available.iter().any(|a| a.eq_ignore_ascii_case(name))
}

fn classify_apps(apps: &IntegrationFacts, capabilities: &TargetCapabilities) -> Vec<ValidationResult> {
    apps.apps
        .iter()
        .map(|item| {
            let name = base_name(item);
            let lower = name.to_lowercase();
            if contains_ignore_case(&capabilities.apps, name) {
                ValidationResult::new(item, ReadinessStatus::Ready, "App is available in target organization")
            } else if STANDARD_APPS.iter().any(|app| lower.contains(app)) {
                ValidationResult::new(item, ReadinessStatus::SetupNeeded, "Standard app, can be installed")
                    .with_recommendation(format!("Install {name} in target organization"))
            } else {
                ValidationResult::new(item, ReadinessStatus::Blocker, "Custom app, requires manual setup")
                    .with_recommendation("Review app requirements and setup in target org")
            }
        })
        .collect()
}

fn classify_access(access: &AccessFacts, capabilities: &TargetCapabilities) -> Vec<ValidationResult> {
    let mut results = Vec::with_capacity(
        access.teams.len() + access.collaborators.len() + access.codeowners.len(),
    );

    for item in &access.teams {
        let team = base_name(item);
        results.push(if contains_ignore_case(&capabilities.teams, team) {
            ValidationResult::new(item, ReadinessStatus::Ready, "Team exists in target organization")
        } else {
            ValidationResult::new(item, ReadinessStatus::Blocker, "Team does not exist in target organization")
                .with_recommendation(format!("Create team '{team}' in target organization"))
        });
    }

    for item in &access.collaborators {
        results.push(
            ValidationResult::new(
                item,
                ReadinessStatus::Warning,
                "Individual access requires manual setup in target organization",
            )
            .with_recommendation("Invite user to target organization and configure permissions"),
        );
    }

    for item in &access.codeowners {
        if let Some(reference) = item.strip_prefix(CODEOWNERS_TEAM_PREFIX) {
            let parts: Vec<&str> = reference.split('/').collect();
            let [_, team] = parts.as_slice() else {
                continue;
            };
            results.push(if contains_ignore_case(&capabilities.teams, team) {
                ValidationResult::new(
                    item,
                    ReadinessStatus::Ready,
                    "CODEOWNERS team exists in target organization",
                )
            } else {
                ValidationResult::new(
                    item,
                    ReadinessStatus::Blocker,
                    "CODEOWNERS team does not exist in target organization",
                )
                .with_recommendation(format!(
                    "Create team '{team}' in target organization or update CODEOWNERS"
                ))
            });
        } else if item.starts_with(CODEOWNERS_USER_PREFIX) {
            results.push(
                ValidationResult::new(
                    item,
                    ReadinessStatus::Warning,
                    "CODEOWNERS user requires manual setup in target organization",
                )
                .with_recommendation("Invite user to target organization or update CODEOWNERS"),
            );
        }
    }

    results
}

/// Secrets, variables and runners share one shape: ready when present,
/// otherwise setup needed.
struct NamedRequirement {
    kind: &'static str,
    present: &'static str,
    missing: &'static str,
    action: &'static str,
}

const SECRET: NamedRequirement = NamedRequirement {
    kind: "secret",
    present: "Secret exists in target organization",
    missing: "Secret needs to be created in target organization",
    action: "Create",
};

const VARIABLE: NamedRequirement = NamedRequirement {
    kind: "variable",
    present: "Variable exists in target organization",
    missing: "Variable needs to be created in target organization",
    action: "Create",
};

const RUNNER: NamedRequirement = NamedRequirement {
    kind: "runner",
    present: "Runner is available in target organization",
    missing: "Self-hosted runner needs to be set up",
    action: "Configure",
};

impl NamedRequirement {
    fn classify(&self, item: &str, available: &[String]) -> ValidationResult {
        if contains_ignore_case(available, item) {
            ValidationResult::new(item, ReadinessStatus::Ready, self.present)
        } else {
            ValidationResult::new(item, ReadinessStatus::SetupNeeded, self.missing).with_recommendation(
                format!("{} {} '{item}' in target organization", self.action, self.kind),
            )
        }
    }
}

fn classify_ci(ci: &CiFacts, capabilities: &TargetCapabilities) -> Vec<ValidationResult> {
    let secrets = ci.secrets.iter().map(|s| SECRET.classify(s, &capabilities.secrets));
    let variables = ci
        .variables
        .iter()
        .map(|v| VARIABLE.classify(v, &capabilities.variables));
    let runners = ci.runners.iter().map(|r| RUNNER.classify(r, &capabilities.runners));
    let workflows = ci.required_workflows.iter().map(|item| {
        ValidationResult::new(
            item,
            ReadinessStatus::Review,
            "Required workflow policy needs manual configuration",
        )
        .with_recommendation("Set up equivalent required workflow policy in target organization")
    });

    secrets.chain(variables).chain(runners).chain(workflows).collect()
}

/// Whether a policy describes member-wide settings rather than a
/// repository policy.
///
/// A name containing "policy" marks a repository policy, except for the
/// member management policy itself. Otherwise the name and restrictions are
/// searched for member-privilege keywords.
#[must_use]
pub fn is_member_privilege_policy(policy: &Policy) -> bool {
    let name = policy.name.to_lowercase();
    if name.contains("policy") && policy.name != MEMBER_MANAGEMENT_POLICY {
        return false;
    }
    let has_keyword = |text: &str| MEMBER_PRIVILEGE_KEYWORDS.iter().any(|k| text.contains(k));
    has_keyword(&name)
        || policy
            .restrictions
            .iter()
            .any(|r| has_keyword(&r.to_lowercase()))
}

/// Restriction still missing in the target, if the restriction names one of
/// the four checkable settings
fn missing_privilege(restriction: &str, target: &MemberPrivileges) -> Option<&'static str> {
    let restriction = restriction.to_lowercase();
    if restriction.contains("repository creation restricted") {
        target
            .can_create_repos
            .then_some("Repository creation needs to be restricted")
    } else if restriction.contains("private repository forking restricted") {
        target
            .can_fork_private_repos
            .then_some("Private repository forking needs to be restricted")
    } else if restriction.contains("two-factor authentication required") {
        (!target.two_factor_required).then_some("Two-factor authentication needs to be required")
    } else if restriction.contains("web commit signoff required") {
        (!target.web_commit_signoff_required).then_some("Web commit signoff needs to be required")
    } else {
        None
    }
}

fn classify_member_privileges(policy: &Policy, target: &MemberPrivileges) -> ValidationResult {
    let missing: Vec<&str> = policy
        .restrictions
        .iter()
        .filter_map(|r| missing_privilege(r, target))
        .collect();
    let item = policy.display_item();

    if missing.is_empty() {
        ValidationResult::new(
            item,
            ReadinessStatus::Ready,
            "Member privilege settings meet policy requirements",
        )
    } else if missing.len() < policy.restrictions.len() {
        ValidationResult::new(
            item,
            ReadinessStatus::SetupNeeded,
            format!("Some member privileges need adjustment ({} missing)", missing.len()),
        )
        .with_recommendation(format!("Configure missing restrictions: {}", missing.join(", ")))
    } else {
        ValidationResult::new(
            item,
            ReadinessStatus::SetupNeeded,
            "Member privileges need configuration to meet policy requirements",
        )
        .with_recommendation(format!("Configure required restrictions: {}", missing.join(", ")))
    }
}

fn classify_repository_policy(policy: &Policy, target: &[Policy]) -> ValidationResult {
    let item = policy.display_item();
    if target.iter().any(|t| t.name.eq_ignore_ascii_case(&policy.name)) {
        ValidationResult::new(
            item,
            ReadinessStatus::Review,
            "Similar repository policy found, requires verification",
        )
        .with_recommendation("Verify policy configuration matches requirements")
    } else {
        ValidationResult::new(item, ReadinessStatus::SetupNeeded, "Repository policy needs to be configured")
            .with_recommendation(format!(
                "Set up '{}' repository policy in target organization",
                policy.name
            ))
    }
}

fn classify_governance(
    governance: &GovernanceFacts,
    capabilities: &TargetCapabilities,
) -> Vec<ValidationResult> {
    let policies = governance.policies.iter().map(|policy| {
        if is_member_privilege_policy(policy) {
            classify_member_privileges(policy, &capabilities.member_privileges)
        } else {
            classify_repository_policy(policy, &capabilities.repository_policies)
        }
    });
    let issue_templates = governance.issue_templates.iter().map(|item| {
        ValidationResult::new(item, ReadinessStatus::Review, "Issue template requires manual setup")
            .with_recommendation("Copy template to target organization's .github repository")
    });
    let pr_templates = governance.pr_templates.iter().map(|item| {
        ValidationResult::new(item, ReadinessStatus::Review, "PR template requires manual setup")
            .with_recommendation("Copy template to target organization's .github repository")
    });

    policies.chain(issue_templates).chain(pr_templates).collect()
}

fn classify_code(code: &CodeFacts) -> Vec<ValidationResult> {
    code.submodules
        .iter()
        .map(|item| {
            if item.contains("external dependency") {
                ValidationResult::new(
                    item,
                    ReadinessStatus::Review,
                    "External repository access needs verification",
                )
                .with_recommendation("Verify target organization has access to this external repository")
            } else {
                ValidationResult::new(
                    item,
                    ReadinessStatus::Review,
                    "Internal submodule, may need access setup",
                )
                .with_recommendation("Ensure target org has access to submodule repository")
            }
        })
        .collect()
}

fn classify_security(security: &SecurityFacts) -> Vec<ValidationResult> {
    security
        .campaigns
        .iter()
        .map(|item| {
            ValidationResult::new(item, ReadinessStatus::Review, "Security campaign requires manual setup")
                .with_recommendation("Configure equivalent security measures in target organization")
        })
        .collect()
}
