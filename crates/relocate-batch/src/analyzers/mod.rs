//! Per-repository category analyzers
//!
//! Each analyzer owns one category of [`DiscoveredFacts`] and reads only
//! the repository's own endpoints plus the sealed [`OrgSnapshot`].
//! Not-found and forbidden lookups count as "none found"; any other failure
//! is returned and the batch records the category as degraded.

mod access;
mod ci;
mod code;
mod governance;
mod security;

pub use access::AccessAnalyzer;
pub use ci::CiAnalyzer;
pub use code::CodeAnalyzer;
pub use governance::GovernanceAnalyzer;
pub use security::SecurityAnalyzer;

use crate::context::OrgSnapshot;
use crate::error::AnalyzerError;
use async_trait::async_trait;
use relocate_api::{ApiError, ResourceApi};
use relocate_types::{
    AccessFacts, Category, CiFacts, CodeFacts, DiscoveredFacts, GovernanceFacts, RepoRef,
    SecurityFacts,
};
use std::sync::Arc;

/// What an analyzer may look at
#[derive(Debug, Clone, Copy)]
pub struct AnalysisScope<'a> {
    /// API handle
    pub api: &'a dyn ResourceApi,
    /// Repository under analysis
    pub repository: &'a RepoRef,
    /// Sealed organization context
    pub snapshot: &'a OrgSnapshot,
}

impl AnalysisScope<'_> {
    /// `repos/{owner}/{name}/{rest}`
    #[must_use]
    pub fn repo_path(&self, rest: &str) -> String {
        format!("repos/{}/{}/{rest}", self.repository.owner, self.repository.name)
    }
}

/// Facts produced by one analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFacts {
    /// Submodules
    Code(CodeFacts),
    /// Secrets, variables, runners, workflows, environments
    Ci(CiFacts),
    /// Teams and collaborators
    Access(AccessFacts),
    /// Campaigns
    Security(SecurityFacts),
    /// Repository templates only; policies come from the snapshot
    Governance(GovernanceFacts),
}

impl CategoryFacts {
    /// Category these facts belong to
    #[must_use]
    pub fn category(&self) -> Category {
        match self {
            Self::Code(_) => Category::Code,
            Self::Ci(_) => Category::Ci,
            Self::Access(_) => Category::Access,
            Self::Security(_) => Category::Security,
            Self::Governance(_) => Category::Governance,
        }
    }

    /// Write into a repository record.
    ///
    /// Repository templates are placed ahead of any organization templates
    /// already in the record.
    pub fn merge_into(self, facts: &mut DiscoveredFacts) {
        match self {
            Self::Code(code) => facts.code = code,
            Self::Ci(ci) => facts.ci = ci,
            Self::Access(access) => facts.access = access,
            Self::Security(security) => facts.security = security,
            Self::Governance(mut governance) => {
                governance.issue_templates.append(&mut facts.governance.issue_templates);
                governance.pr_templates.append(&mut facts.governance.pr_templates);
                facts.governance.issue_templates = governance.issue_templates;
                facts.governance.pr_templates = governance.pr_templates;
                facts.governance.policies.append(&mut governance.policies);
            }
        }
    }
}

/// One category of repository analysis
#[async_trait]
pub trait CategoryAnalyzer: Send + Sync + std::fmt::Debug {
    /// Category this analyzer fills
    fn category(&self) -> Category;

    /// Analyze one repository.
    ///
    /// # Errors
    ///
    /// Any lookup failure other than not-found/forbidden.
    async fn analyze(&self, scope: &AnalysisScope<'_>) -> Result<CategoryFacts, AnalyzerError>;
}

/// The five standard analyzers
#[must_use]
pub fn default_analyzers() -> Vec<Arc<dyn CategoryAnalyzer>> {
    vec![
        Arc::new(CodeAnalyzer),
        Arc::new(CiAnalyzer),
        Arc::new(AccessAnalyzer),
        Arc::new(SecurityAnalyzer),
        Arc::new(GovernanceAnalyzer),
    ]
}

/// Presence check: `Ok(false)` for not-found/forbidden
pub(crate) async fn exists(api: &dyn ResourceApi, path: &str) -> Result<bool, ApiError> {
    match api.get(path).await {
        Ok(_) => Ok(true),
        Err(err) if err.is_absent() => Ok(false),
        Err(err) => Err(err),
    }
}

/// First location that exists, tried in order
pub(crate) async fn first_existing<'l>(
    scope: &AnalysisScope<'_>,
    locations: &[&'l str],
) -> Result<Option<&'l str>, ApiError> {
    for &location in locations {
        if exists(scope.api, &scope.repo_path(&format!("contents/{location}"))).await? {
            return Ok(Some(location));
        }
    }
    Ok(None)
}
