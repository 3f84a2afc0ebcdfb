//! CI: organization secrets and variables, runners, environments and
//! required workflows

use super::{AnalysisScope, CategoryAnalyzer, CategoryFacts};
use crate::error::AnalyzerError;
use async_trait::async_trait;
use futures::future::join_all;
use relocate_api::schema::{
    EnvironmentList, RunnerList, Ruleset, SecretList, VariableList, WorkflowsParameters,
};
use relocate_api::{fetch, fetch_or_default, ApiError, ResourceApi};
use relocate_types::{Category, CiFacts};
use tracing::debug;

const WORKFLOWS_RULE: &str = "workflows";

/// Collects CI dependencies visible from the repository
#[derive(Debug, Clone, Copy, Default)]
pub struct CiAnalyzer;

#[async_trait]
impl CategoryAnalyzer for CiAnalyzer {
    fn category(&self) -> Category {
        Category::Ci
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<CategoryFacts, AnalyzerError> {
        let api = scope.api;
        let secrets_path = scope.repo_path("actions/organization-secrets");
        let variables_path = scope.repo_path("actions/organization-variables");
        let runners_path = scope.repo_path("actions/runners");
        let environments_path = scope.repo_path("environments");

        let (secrets, variables, runners, environments, workflows) = tokio::join!(
            fetch_or_default::<SecretList, dyn ResourceApi>(api, &secrets_path),
            fetch_or_default::<VariableList, dyn ResourceApi>(api, &variables_path),
            fetch_or_default::<RunnerList, dyn ResourceApi>(api, &runners_path),
            fetch_or_default::<EnvironmentList, dyn ResourceApi>(api, &environments_path),
            required_workflows(scope),
        );
        let fail = |err| AnalyzerError::api(Category::Ci, err);

        Ok(CategoryFacts::Ci(CiFacts {
            secrets: secrets.map_err(fail)?.secrets.into_iter().map(|s| s.name).collect(),
            variables: variables.map_err(fail)?.variables.into_iter().map(|v| v.name).collect(),
            runners: runners.map_err(fail)?.runners.into_iter().map(|r| r.name).collect(),
            required_workflows: workflows.map_err(fail)?,
            environments: environments
                .map_err(fail)?
                .environments
                .into_iter()
                .map(|e| format!("Environment: {}", e.name))
                .collect(),
        }))
    }
}

/// Workflows required by the repository's rulesets, as
/// `"<file> (ID: <repository_id>, repo: <source>/<repo>, ruleset: <name>)"`.
///
/// A ruleset whose detail cannot be read is skipped.
async fn required_workflows(scope: &AnalysisScope<'_>) -> Result<Vec<String>, ApiError> {
    let rulesets: Vec<Ruleset> = fetch_or_default(scope.api, &scope.repo_path("rulesets")).await?;

    let details = join_all(rulesets.iter().map(|summary| async move {
        let path = scope.repo_path(&format!("rulesets/{}", summary.id));
        match fetch::<Ruleset, dyn ResourceApi>(scope.api, &path).await {
            Ok(detail) => Some((summary, detail)),
            Err(err) => {
                debug!(repository = %scope.repository, ruleset = summary.id, error = %err, "skipping ruleset");
                None
            }
        }
    }))
    .await;

    let repo = scope.repository.name.as_str();
    let mut workflows = Vec::new();
    for (summary, detail) in details.into_iter().flatten() {
        let source = summary.source.as_deref().unwrap_or_default();
        for rule in detail.rules.iter().filter(|r| r.rule_type == WORKFLOWS_RULE) {
            let Some(parameters) = rule.parameters_as::<WorkflowsParameters>() else {
                continue;
            };
            for workflow in parameters.workflows {
                let file = workflow.path.rsplit('/').next().unwrap_or_default();
                workflows.push(format!(
                    "{file} (ID: {}, repo: {source}/{repo}, ruleset: {})",
                    workflow.repository_id, summary.name
                ));
            }
        }
    }
    Ok(workflows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OrgContextBuilder;
    use pretty_assertions::assert_eq;
    use relocate_test_utils::{Fault, FakeApi};
    use relocate_types::RepoRef;
    use serde_json::json;

    fn repo_api() -> FakeApi {
        FakeApi::new()
            .with_json(
                "repos/acme/api/actions/organization-secrets",
                json!({"total_count": 1, "secrets": [{"name": "NPM_TOKEN"}]}),
            )
            .with_json(
                "repos/acme/api/actions/organization-variables",
                json!({"variables": [{"name": "REGION"}]}),
            )
            .with_json(
                "repos/acme/api/environments",
                json!({"environments": [{"name": "production"}]}),
            )
            .with_json(
                "repos/acme/api/rulesets",
                json!([{"id": 7, "name": "CI gate", "source": "acme", "enforcement": "active"}]),
            )
            .with_json(
                "repos/acme/api/rulesets/7",
                json!({
                    "id": 7,
                    "name": "CI gate",
                    "rules": [
                        {"type": "deletion"},
                        {"type": "workflows", "parameters": {"workflows": [
                            {"path": ".github/workflows/compliance.yml", "ref": "main", "repository_id": 42}
                        ]}}
                    ]
                }),
            )
    }

    #[tokio::test]
    async fn collects_every_ci_dependency() {
        let api = repo_api();
        let snapshot = OrgContextBuilder::new("acme").build(&api, false).await;
        let repository = RepoRef::parse("acme/api").unwrap();
        let scope = AnalysisScope { api: &api, repository: &repository, snapshot: &snapshot };

        let CategoryFacts::Ci(ci) = CiAnalyzer.analyze(&scope).await.unwrap() else {
            panic!("wrong category");
        };
        assert_eq!(ci.secrets, vec!["NPM_TOKEN"]);
        assert_eq!(ci.variables, vec!["REGION"]);
        assert!(ci.runners.is_empty());
        assert_eq!(ci.environments, vec!["Environment: production"]);
        assert_eq!(
            ci.required_workflows,
            vec!["compliance.yml (ID: 42, repo: acme/api, ruleset: CI gate)"]
        );
    }

    #[tokio::test]
    async fn unreadable_ruleset_detail_is_skipped() {
        let api = repo_api().with_fault("repos/acme/api/rulesets/7", Fault::Status(500));
        let snapshot = OrgContextBuilder::new("acme").build(&api, false).await;
        let repository = RepoRef::parse("acme/api").unwrap();
        let scope = AnalysisScope { api: &api, repository: &repository, snapshot: &snapshot };

        let CategoryFacts::Ci(ci) = CiAnalyzer.analyze(&scope).await.unwrap() else {
            panic!("wrong category");
        };
        assert!(ci.required_workflows.is_empty());
        assert_eq!(ci.secrets, vec!["NPM_TOKEN"]);
    }

    #[tokio::test]
    async fn server_error_fails_the_category() {
        let api = repo_api().with_fault("repos/acme/api/actions/runners", Fault::Status(503));
        let snapshot = OrgContextBuilder::new("acme").build(&api, false).await;
        let repository = RepoRef::parse("acme/api").unwrap();
        let scope = AnalysisScope { api: &api, repository: &repository, snapshot: &snapshot };

        let err = CiAnalyzer.analyze(&scope).await.unwrap_err();
        assert_eq!(err.category(), Category::Ci);
    }
}
