//! Access: repository teams and direct collaborators

use super::{AnalysisScope, CategoryAnalyzer, CategoryFacts};
use crate::error::AnalyzerError;
use async_trait::async_trait;
use relocate_api::schema::{Collaborator, TeamSummary};
use relocate_api::{fetch_or_default, ResourceApi};
use relocate_types::{AccessFacts, Category};

/// Lists who can reach the repository
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessAnalyzer;

#[async_trait]
impl CategoryAnalyzer for AccessAnalyzer {
    fn category(&self) -> Category {
        Category::Access
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<CategoryFacts, AnalyzerError> {
        let teams_path = scope.repo_path("teams");
        let collaborators_path = scope.repo_path("collaborators?affiliation=direct");
        let (teams, collaborators) = tokio::join!(
            fetch_or_default::<Vec<TeamSummary>, dyn ResourceApi>(scope.api, &teams_path),
            fetch_or_default::<Vec<Collaborator>, dyn ResourceApi>(scope.api, &collaborators_path),
        );
        let fail = |err| AnalyzerError::api(Category::Access, err);

        let teams = teams
            .map_err(fail)?
            .into_iter()
            .map(|team| match team.permission.as_deref() {
                Some(permission) if !permission.is_empty() => format!("{} ({permission})", team.name),
                _ => team.name,
            })
            .collect();
        let collaborators = collaborators
            .map_err(fail)?
            .into_iter()
            .map(|c| c.login)
            .collect();

        // CODEOWNERS content is supplied by callers that parse it.
        Ok(CategoryFacts::Access(AccessFacts {
            teams,
            collaborators,
            codeowners: Vec::new(),
        }))
    }
}
