//! The relocation readiness facade
//!
//! [`Relocator`] wires one API handle and one configuration through the
//! scanner, the batch analyzer and the classifier.

use crate::config::RelocateConfig;
use crate::error::RelocateError;
use futures::future::join_all;
use indexmap::IndexMap;
use relocate_api::{ResourceApi, RestClient, ThrottledApi};
use relocate_batch::{BatchAnalyzer, BatchError, BatchResult};
use relocate_types::{
    Category, DiscoveredFacts, MigrationValidation, RepoRef, TargetCapabilities,
};
use relocate_validation::{scan_target_capabilities, validate};
use std::sync::Arc;
use tracing::info;

/// Readiness of one input repository
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryAssessment {
    /// Identifier exactly as given
    pub repository: String,
    /// Classification, when the repository could be analyzed
    pub validation: Option<MigrationValidation>,
    /// Categories whose analysis failed; their results are missing from
    /// `validation`
    pub degraded: Vec<Category>,
    /// Why there is no classification
    pub error: Option<BatchError>,
}

impl RepositoryAssessment {
    fn failed(repository: impl Into<String>, error: BatchError) -> Self {
        Self {
            repository: repository.into(),
            validation: None,
            degraded: Vec::new(),
            error: Some(error),
        }
    }
}

/// Readiness of a set of repositories against one target
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    /// What the target already provides
    pub target: TargetCapabilities,
    /// One entry per input, in input order
    pub repositories: Vec<RepositoryAssessment>,
}

impl Assessment {
    /// Classified repositories
    pub fn validations(&self) -> impl Iterator<Item = &MigrationValidation> {
        self.repositories.iter().filter_map(|r| r.validation.as_ref())
    }

    /// Inputs that could not be classified
    pub fn failures(&self) -> impl Iterator<Item = &RepositoryAssessment> {
        self.repositories.iter().filter(|r| r.error.is_some())
    }
}

/// Entry point for scanning, analysis, classification and assessment
#[derive(Debug, Clone)]
pub struct Relocator {
    api: Arc<dyn ResourceApi>,
    config: RelocateConfig,
}

impl Relocator {
    /// Use `api` for every lookup.
    ///
    /// When `max_in_flight_requests` is set the handle is wrapped in a
    /// [`ThrottledApi`] shared by all components.
    pub fn new(api: Arc<dyn ResourceApi>, config: RelocateConfig) -> Self {
        let api: Arc<dyn ResourceApi> = if config.max_in_flight_requests > 0 {
            Arc::new(ThrottledApi::new(api, config.max_in_flight_requests))
        } else {
            api
        };
        Self { api, config }
    }

    /// Build a REST client from `config.api`
    ///
    /// # Errors
    ///
    /// Invalid configuration or a client that cannot be constructed.
    pub fn from_config(config: RelocateConfig) -> Result<Self, RelocateError> {
        config.validate()?;
        let client = RestClient::new(&config.api)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &RelocateConfig {
        &self.config
    }

    /// API handle in use
    #[inline]
    #[must_use]
    pub fn api(&self) -> &Arc<dyn ResourceApi> {
        &self.api
    }

    /// Enumerate what the target organization already provides
    pub async fn scan(&self, target: &str) -> TargetCapabilities {
        scan_target_capabilities(&*self.api, target, &self.config.scan_options()).await
    }

    /// Classify one repository's facts
    #[must_use]
    pub fn validate(&self, facts: &DiscoveredFacts, capabilities: &TargetCapabilities) -> MigrationValidation {
        validate(facts, capabilities, self.config.assign_teams)
    }

    /// Batch analyzer configured like this relocator
    #[must_use]
    pub fn batch(&self) -> BatchAnalyzer {
        BatchAnalyzer::new(Arc::clone(&self.api), self.config.batch_options())
    }

    /// Analyze repositories of one owner
    pub async fn analyze_many<S: AsRef<str>>(&self, repositories: &[S]) -> Vec<BatchResult> {
        self.batch().analyze_many(repositories).await
    }

    /// Assess repositories of any owners against `target`.
    ///
    /// Inputs are grouped by owner in first-seen order and each group is
    /// analyzed as one batch while the target is scanned once.
    pub async fn assess<S: AsRef<str>>(&self, repositories: &[S], target: &str) -> Assessment {
        let mut slots: Vec<Option<RepositoryAssessment>> = vec![None; repositories.len()];
        let mut groups: IndexMap<String, Vec<(usize, &str)>> = IndexMap::new();
        for (index, input) in repositories.iter().enumerate() {
            let input = input.as_ref();
            match RepoRef::parse(input) {
                Ok(repository) => groups.entry(repository.owner).or_default().push((index, input)),
                Err(err) => slots[index] = Some(RepositoryAssessment::failed(input, err.into())),
            }
        }
        info!(owners = groups.len(), repositories = repositories.len(), target_organization = target, "assessing relocation");

        let batch = self.batch();
        let batch = &batch;
        let analyses = join_all(groups.values().map(|members| async move {
            let inputs: Vec<&str> = members.iter().map(|(_, input)| *input).collect();
            (members, batch.analyze_many(&inputs).await)
        }));
        let (capabilities, analyses) = tokio::join!(self.scan(target), analyses);

        for (members, results) in analyses {
            for ((index, _), result) in members.iter().zip(results) {
                slots[*index] = Some(self.assess_one(result, &capabilities));
            }
        }

        Assessment {
            target: capabilities,
            repositories: slots.into_iter().flatten().collect(),
        }
    }

    fn assess_one(&self, result: BatchResult, capabilities: &TargetCapabilities) -> RepositoryAssessment {
        match result.outcome {
            Ok(facts) => RepositoryAssessment {
                validation: Some(self.validate(&facts, capabilities)),
                degraded: facts.degraded.iter().map(|d| d.category).collect(),
                repository: result.repository,
                error: None,
            },
            Err(err) => RepositoryAssessment::failed(result.repository, err),
        }
    }
}
