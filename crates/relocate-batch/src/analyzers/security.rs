//! Security: campaigns cached in the organization snapshot

use super::{AnalysisScope, CategoryAnalyzer, CategoryFacts};
use crate::context::subjects;
use crate::error::AnalyzerError;
use async_trait::async_trait;
use relocate_types::{Category, SecurityFacts};

/// Reports the organization's security campaigns for every repository
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityAnalyzer;

#[async_trait]
impl CategoryAnalyzer for SecurityAnalyzer {
    fn category(&self) -> Category {
        Category::Security
    }

    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<CategoryFacts, AnalyzerError> {
        if scope.snapshot.failed(subjects::CAMPAIGNS) {
            return Err(AnalyzerError::Unavailable {
                category: Category::Security,
                message: format!("{} could not be loaded", subjects::CAMPAIGNS),
            });
        }

        let campaigns = scope
            .snapshot
            .campaigns()
            .into_iter()
            .map(|c| {
                let status = c.status.as_deref().unwrap_or("unknown");
                format!("Security campaign: {} ({status})", c.name)
            })
            .collect();
        Ok(CategoryFacts::Security(SecurityFacts { campaigns }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OrgContextBuilder;
    use pretty_assertions::assert_eq;
    use relocate_test_utils::{Fault, FakeApi};
    use relocate_types::RepoRef;
    use serde_json::json;

    #[tokio::test]
    async fn campaigns_come_from_the_snapshot() {
        let api = FakeApi::new().with_json(
            "orgs/acme/security/campaigns",
            json!([{"id": 1, "name": "Q3 secrets", "status": "active"}, {"id": 2, "name": "Legacy"}]),
        );
        let snapshot = OrgContextBuilder::new("acme").build(&api, false).await;
        let repository = RepoRef::parse("acme/api").unwrap();
        let scope = AnalysisScope { api: &api, repository: &repository, snapshot: &snapshot };

        let before = api.total_hits();
        let facts = SecurityAnalyzer.analyze(&scope).await.unwrap();
        assert_eq!(api.total_hits(), before);
        assert_eq!(
            facts,
            CategoryFacts::Security(SecurityFacts {
                campaigns: vec![
                    "Security campaign: Q3 secrets (active)".into(),
                    "Security campaign: Legacy (unknown)".into(),
                ],
            })
        );
    }

    #[tokio::test]
    async fn failed_campaign_load_is_unavailable() {
        let api = FakeApi::new().with_fault("orgs/acme/security/campaigns", Fault::Status(500));
        let snapshot = OrgContextBuilder::new("acme").build(&api, false).await;
        let repository = RepoRef::parse("acme/api").unwrap();
        let scope = AnalysisScope { api: &api, repository: &repository, snapshot: &snapshot };

        let err = SecurityAnalyzer.analyze(&scope).await.unwrap_err();
        assert!(matches!(err, AnalyzerError::Unavailable { category: Category::Security, .. }));
    }
}
