//! Code: git submodules

use super::{AnalysisScope, CategoryAnalyzer, CategoryFacts};
use crate::error::AnalyzerError;
use async_trait::async_trait;
use futures::future::try_join_all;
use relocate_api::schema::{ContentEntry, GitTree};
use relocate_api::{fetch_or_default, ResourceApi};
use relocate_types::{Category, CodeFacts};

/// Finds submodules in the default branch tree
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeAnalyzer;

#[async_trait]
impl CategoryAnalyzer for CodeAnalyzer {
    fn category(&self) -> Category {
        Category::Code
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<CategoryFacts, AnalyzerError> {
        let api = scope.api;
        let fail = |err| AnalyzerError::api(Category::Code, err);

        let tree: GitTree = fetch_or_default(api, &scope.repo_path("git/trees/HEAD?recursive=1"))
            .await
            .map_err(fail)?;

        let lookups = tree
            .tree
            .iter()
            .filter(|entry| entry.is_submodule())
            .map(|entry| async move {
                let path = scope.repo_path(&format!("contents/{}", entry.path));
                let content: ContentEntry = fetch_or_default::<ContentEntry, dyn ResourceApi>(api, &path).await?;
                Ok::<_, relocate_api::ApiError>(
                    content.submodule_git_url.unwrap_or_else(|| entry.path.clone()),
                )
            });
        let urls = try_join_all(lookups).await.map_err(fail)?;

        let owner = scope.repository.owner.as_str();
        let submodules = urls
            .into_iter()
            .map(|url| {
                if same_organization(&url, owner) {
                    format!("{url} (same organization)")
                } else {
                    format!("{url} (external dependency)")
                }
            })
            .collect();

        Ok(CategoryFacts::Code(CodeFacts { submodules }))
    }
}

/// `github.com/<owner>/...` or `git@github.com:<owner>/...`
fn same_organization(url: &str, owner: &str) -> bool {
    let Some(at) = url.find("github.com") else {
        return false;
    };
    let rest = &url[at + "github.com".len()..];
    let Some(rest) = rest.strip_prefix('/').or_else(|| rest.strip_prefix(':')) else {
        return false;
    };
    rest.split('/').next() == Some(owner)
}
