//! Batched repository analysis
//!
//! Loads the owner's organization context once, then analyzes every
//! repository concurrently against the sealed snapshot.

use crate::analyzers::{default_analyzers, AnalysisScope, CategoryAnalyzer};
use crate::context::{OrgContextBuilder, OrgSnapshot};
use crate::error::BatchError;
use futures::future::join_all;
use relocate_api::ResourceApi;
use relocate_types::{DegradedCategory, DiscoveredFacts, RepoRef};
use relocate_validation::policy_applies;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Batch behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchOptions {
    /// Log degraded categories and loader failures at warn level
    pub verbose: bool,
    /// Repositories analyzed at once; 0 means no bound
    pub max_parallel_repositories: usize,
}

impl BatchOptions {
    /// Set verbosity
    #[inline]
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Bound the number of repositories in flight
    #[inline]
    #[must_use]
    pub fn with_max_parallel_repositories(mut self, limit: usize) -> Self {
        self.max_parallel_repositories = limit;
        self
    }
}

/// Outcome for one input identifier, at the input's position
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    /// Identifier exactly as given
    pub repository: String,
    /// Facts, or why there are none
    pub outcome: Result<DiscoveredFacts, BatchError>,
}

impl BatchResult {
    /// Facts, if analysis ran
    #[inline]
    #[must_use]
    pub fn facts(&self) -> Option<&DiscoveredFacts> {
        self.outcome.as_ref().ok()
    }

    /// Error, if analysis did not run
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&BatchError> {
        self.outcome.as_ref().err()
    }
}

/// Analyzes repositories of one owner against a shared organization
/// context
#[derive(Debug, Clone)]
pub struct BatchAnalyzer {
    api: Arc<dyn ResourceApi>,
    analyzers: Arc<[Arc<dyn CategoryAnalyzer>]>,
    options: BatchOptions,
}

impl BatchAnalyzer {
    /// Batch with the five standard analyzers
    pub fn new(api: Arc<dyn ResourceApi>, options: BatchOptions) -> Self {
        Self {
            api,
            analyzers: default_analyzers().into(),
            options,
        }
    }

    /// Replace the analyzer set
    #[must_use]
    pub fn with_analyzers(mut self, analyzers: Vec<Arc<dyn CategoryAnalyzer>>) -> Self {
        self.analyzers = analyzers.into();
        self
    }

    /// Options in effect
    #[inline]
    #[must_use]
    pub fn options(&self) -> BatchOptions {
        self.options
    }

    /// Analyze `repositories`, all expected to share the first well-formed
    /// identifier's owner.
    ///
    /// Returns one result per input, in input order. Malformed identifiers
    /// get [`BatchError::MalformedRepository`]; the organization context is
    /// only loaded when at least one identifier is well-formed.
    pub async fn analyze_many<S: AsRef<str>>(&self, repositories: &[S]) -> Vec<BatchResult> {
        let mut slots: Vec<Option<Result<DiscoveredFacts, BatchError>>> =
            Vec::with_capacity(repositories.len());
        let mut parsed = Vec::new();
        for (index, input) in repositories.iter().enumerate() {
            match RepoRef::parse(input.as_ref()) {
                Ok(repository) => {
                    slots.push(None);
                    parsed.push((index, repository));
                }
                Err(err) => {
                    warn!(input = input.as_ref(), error = %err, "skipping malformed repository");
                    slots.push(Some(Err(err.into())));
                }
            }
        }

        if let Some((_, first)) = parsed.first() {
            let owner = first.owner.clone();
            for (_, repository) in &parsed {
                if repository.owner != owner {
                    warn!(
                        repository = %repository,
                        batch_owner = %owner,
                        "repository owner differs from batch owner; organization context is the batch owner's"
                    );
                }
            }

            info!(organization = %owner, repositories = parsed.len(), "analyzing batch");
            let snapshot = OrgContextBuilder::new(owner)
                .build(&*self.api, self.options.verbose)
                .await;
            self.run_tasks(parsed, snapshot, &mut slots).await;
        }

        repositories
            .iter()
            .zip(slots)
            .map(|(input, slot)| {
                let repository = input.as_ref().to_string();
                let outcome = slot.unwrap_or_else(|| {
                    Err(BatchError::TaskAborted {
                        repository: repository.clone(),
                    })
                });
                BatchResult { repository, outcome }
            })
            .collect()
    }

    async fn run_tasks(
        &self,
        parsed: Vec<(usize, RepoRef)>,
        snapshot: OrgSnapshot,
        slots: &mut [Option<Result<DiscoveredFacts, BatchError>>],
    ) {
        let limiter = (self.options.max_parallel_repositories > 0)
            .then(|| Arc::new(Semaphore::new(self.options.max_parallel_repositories)));

        let mut tasks = JoinSet::new();
        for (index, repository) in parsed {
            let api = Arc::clone(&self.api);
            let analyzers = Arc::clone(&self.analyzers);
            let snapshot = snapshot.clone();
            let limiter = limiter.clone();
            let verbose = self.options.verbose;

            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };
                let facts =
                    analyze_repository(&*api, &analyzers, &repository, &snapshot, verbose)
                        .await;
                (index, facts)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, facts)) => slots[index] = Some(Ok(facts)),
                Err(err) => error!(error = %err, "repository analysis task failed"),
            }
        }
    }
}

/// Run every analyzer for one repository and attach the organization data
/// it is entitled to
pub async fn analyze_repository(
    api: &dyn ResourceApi,
    analyzers: &[Arc<dyn CategoryAnalyzer>],
    repository: &RepoRef,
    snapshot: &OrgSnapshot,
    verbose: bool,
) -> DiscoveredFacts {
    let view = snapshot.view();
    let mut facts = DiscoveredFacts::new(repository.to_string());
    facts.integrations.apps = view.apps;
    facts.governance.issue_templates = view.governance.issue_templates;
    facts.governance.pr_templates = view.governance.pr_templates;

    let scope = AnalysisScope {
        api,
        repository,
        snapshot,
    };
    let outcomes = join_all(analyzers.iter().map(|analyzer| analyzer.analyze(&scope))).await;

    for (analyzer, outcome) in analyzers.iter().zip(outcomes) {
        match outcome {
            Ok(category_facts) => category_facts.merge_into(&mut facts),
            Err(err) => {
                if verbose {
                    warn!(repository = %repository, error = %err, "category degraded");
                } else {
                    debug!(repository = %repository, error = %err, "category degraded");
                }
                facts.degraded.push(DegradedCategory {
                    category: analyzer.category(),
                    message: err.to_string(),
                });
            }
        }
    }

    facts.governance.policies.extend(
        view.governance
            .policies
            .into_iter()
            .filter(|policy| policy_applies(policy, &repository.name)),
    );
    facts
}
