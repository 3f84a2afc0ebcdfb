//! Organization context: written once, then read many times
//!
//! [`OrgContextBuilder::build`] runs the four loaders concurrently. Each
//! loader writes only its own field. The builder is consumed by the join,
//! so once an [`OrgSnapshot`] exists nothing can write to the context
//! again; readers only ever take the read lock.

use crate::loaders;
use parking_lot::RwLock;
use relocate_api::schema::OrgInfo;
use relocate_api::{ApiError, ResourceApi};
use relocate_types::{Diagnostic, DiagnosticKind, GovernanceFacts, Policy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Subject names used for loader diagnostics
pub mod subjects {
    /// Apps loader
    pub const APPS: &str = "organization apps";
    /// Rulesets part of the governance loader
    pub const RULESETS: &str = "organization rulesets";
    /// Templates part of the governance loader
    pub const TEMPLATES: &str = "organization templates";
    /// Security campaigns loader
    pub const CAMPAIGNS: &str = "security campaigns";
    /// Organization info loader
    pub const ORG_INFO: &str = "organization info";
}

/// A security campaign of the source organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignRef {
    /// Campaign name
    pub name: String,
    /// Status, if reported
    pub status: Option<String>,
}

#[derive(Debug, Default)]
struct OrgContext {
    apps: Vec<String>,
    governance: GovernanceFacts,
    campaigns: Vec<CampaignRef>,
    org_info: Option<OrgInfo>,
}

/// Phase-one writer for one source organization
#[derive(Debug)]
pub struct OrgContextBuilder {
    organization: String,
    context: Arc<RwLock<OrgContext>>,
}

impl OrgContextBuilder {
    /// Empty context for `organization`
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            context: Arc::new(RwLock::new(OrgContext::default())),
        }
    }

    /// Run the four loaders, wait for all of them, and seal the context.
    ///
    /// Loader failures never abort the build; they are collected into
    /// [`OrgSnapshot::load_errors`].
    pub async fn build<A>(self, api: &A, verbose: bool) -> OrgSnapshot
    where
        A: ResourceApi + ?Sized,
    {
        let org = self.organization.as_str();
        let context = &self.context;
        info!(organization = org, "loading organization context");

        let (apps, governance, campaigns, org_info) = tokio::join!(
            async {
                let loaded = loaders::load_apps(api, org).await;
                settle(subjects::APPS, loaded, |apps| context.write().apps = apps)
            },
            async {
                let (governance, diagnostics) = loaders::load_governance(api, org).await;
                context.write().governance = governance;
                diagnostics
            },
            async {
                let loaded = loaders::load_campaigns(api, org).await;
                settle(subjects::CAMPAIGNS, loaded, |campaigns| {
                    context.write().campaigns = campaigns;
                })
            },
            async {
                let loaded = loaders::load_org_info(api, org).await;
                settle(subjects::ORG_INFO, loaded, |info| context.write().org_info = Some(info))
            },
        );

        let load_errors: Vec<Diagnostic> = apps
            .into_iter()
            .chain(governance)
            .chain(campaigns)
            .chain(org_info)
            .collect();
        for diagnostic in &load_errors {
            if verbose {
                warn!(organization = org, %diagnostic, "organization context incomplete");
            } else {
                debug!(organization = org, %diagnostic, "organization context incomplete");
            }
        }

        OrgSnapshot {
            organization: self.organization,
            context: self.context,
            load_errors: load_errors.into(),
        }
    }
}

fn settle<T>(
    subject: &str,
    loaded: Result<T, ApiError>,
    store: impl FnOnce(T),
) -> Option<Diagnostic> {
    match loaded {
        Ok(value) => {
            store(value);
            None
        }
        Err(err) if err.is_absent() => Some(Diagnostic::absent(subject, err.to_string())),
        Err(err) => Some(Diagnostic::failed(subject, err.to_string())),
    }
}

/// The per-repository copy of the context: apps and governance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgView {
    /// `"<app> (org-wide installation)"`
    pub apps: Vec<String>,
    /// Organization policies (member settings first) and templates
    pub governance: GovernanceFacts,
}

/// Sealed, read-only organization context. Cheap to clone.
#[derive(Debug, Clone)]
pub struct OrgSnapshot {
    organization: String,
    context: Arc<RwLock<OrgContext>>,
    load_errors: Arc<[Diagnostic]>,
}

impl OrgSnapshot {
    /// Source organization
    #[inline]
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Copy apps and governance under one read lock.
    ///
    /// Member and security policies derived from the organization settings
    /// lead the policy list.
    #[must_use]
    pub fn view(&self) -> OrgView {
        let context = self.context.read();
        let mut governance = context.governance.clone();
        if let Some(info) = &context.org_info {
            let mut policies = loaders::settings_policies(info);
            policies.append(&mut governance.policies);
            governance.policies = policies;
        }
        OrgView {
            apps: context.apps.clone(),
            governance,
        }
    }

    /// Security campaigns
    #[must_use]
    pub fn campaigns(&self) -> Vec<CampaignRef> {
        self.context.read().campaigns.clone()
    }

    /// Organization settings, when they could be loaded
    #[must_use]
    pub fn org_info(&self) -> Option<OrgInfo> {
        self.context.read().org_info.clone()
    }

    /// All organization policies, as handed to each repository before
    /// ruleset filtering
    #[must_use]
    pub fn policies(&self) -> Vec<Policy> {
        self.view().governance.policies
    }

    /// Loader diagnostics
    #[inline]
    #[must_use]
    pub fn load_errors(&self) -> &[Diagnostic] {
        &self.load_errors
    }

    /// Whether the lookup named `subject` failed (not merely absent)
    #[must_use]
    pub fn failed(&self, subject: &str) -> bool {
        self.load_errors
            .iter()
            .any(|d| d.subject == subject && d.kind == DiagnosticKind::Failed)
    }
}
