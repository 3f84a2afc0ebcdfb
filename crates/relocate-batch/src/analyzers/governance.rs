//! Governance: repository issue and PR templates

use super::{first_existing, AnalysisScope, CategoryAnalyzer, CategoryFacts};
use crate::error::AnalyzerError;
use async_trait::async_trait;
use relocate_types::{Category, GovernanceFacts};

const ISSUE_TEMPLATE_LOCATIONS: [&str; 3] =
    [".github/ISSUE_TEMPLATE", ".github/issue_template.md", "ISSUE_TEMPLATE.md"];
const PR_TEMPLATE_LOCATIONS: [&str; 4] = [
    ".github/pull_request_template.md",
    ".github/PULL_REQUEST_TEMPLATE.md",
    "pull_request_template.md",
    "PULL_REQUEST_TEMPLATE.md",
];

/// Finds the repository's own templates; organization policies are
/// attached by the batch from the snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct GovernanceAnalyzer;

#[async_trait]
impl CategoryAnalyzer for GovernanceAnalyzer {
    fn category(&self) -> Category {
        Category::Governance
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<CategoryFacts, AnalyzerError> {
        let (issue, pr) = tokio::join!(
            first_existing(scope, &ISSUE_TEMPLATE_LOCATIONS),
            first_existing(scope, &PR_TEMPLATE_LOCATIONS),
        );
        let fail = |err| AnalyzerError::api(Category::Governance, err);

        Ok(CategoryFacts::Governance(GovernanceFacts {
            policies: Vec::new(),
            issue_templates: issue
                .map_err(fail)?
                .map(|l| format!("Issue template: {l}"))
                .into_iter()
                .collect(),
            pr_templates: pr
                .map_err(fail)?
                .map(|l| format!("PR template: {l}"))
                .into_iter()
                .collect(),
        }))
    }
}
