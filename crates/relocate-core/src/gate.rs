//! Relocation admission
//!
//! A repository may be relocated when its validation has no blockers, or
//! when the caller enforces the relocation anyway.

use crate::error::GateError;
use relocate_types::{MigrationValidation, ValidationResult};
use tracing::{info, warn};

/// Outcome of [`TransferGate::evaluate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Relocation may proceed
    Allowed {
        /// Blockers ignored because the relocation was enforced
        overridden_blockers: usize,
    },
    /// Relocation must not proceed
    Blocked {
        /// Every blocker result, across categories
        blockers: Vec<ValidationResult>,
    },
}

impl GateDecision {
    /// Whether relocation may proceed
    #[inline]
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// `Ok` with the overridden blocker count, or the blockers as an error
    ///
    /// # Errors
    ///
    /// [`GateError::Blocked`] when the decision is [`GateDecision::Blocked`].
    pub fn into_result(self) -> Result<usize, GateError> {
        match self {
            Self::Allowed { overridden_blockers } => Ok(overridden_blockers),
            Self::Blocked { blockers } => Err(GateError::Blocked { blockers }),
        }
    }
}

/// Admission check in front of the relocation workflow
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferGate;

impl TransferGate {
    /// Decide whether `validation` admits relocation
    #[must_use]
    pub fn evaluate(validation: &MigrationValidation, enforce: bool) -> GateDecision {
        let blockers: Vec<ValidationResult> = validation.blockers().into_iter().cloned().collect();

        if blockers.is_empty() {
            info!(
                repository = %validation.repository,
                target_organization = %validation.target_organization,
                readiness = %validation.overall_readiness,
                "relocation admitted"
            );
            GateDecision::Allowed {
                overridden_blockers: 0,
            }
        } else if enforce {
            warn!(
                repository = %validation.repository,
                target_organization = %validation.target_organization,
                blockers = blockers.len(),
                "relocation enforced despite blockers"
            );
            GateDecision::Allowed {
                overridden_blockers: blockers.len(),
            }
        } else {
            warn!(
                repository = %validation.repository,
                target_organization = %validation.target_organization,
                blockers = blockers.len(),
                "relocation blocked"
            );
            GateDecision::Blocked { blockers }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relocate_test_utils::fixtures::{sample_capabilities, sample_facts};
    use relocate_types::{ReadinessStatus, TargetCapabilities};
    use relocate_validation::validate;

    #[test]
    fn clean_validation_is_allowed() {
        let mut facts = sample_facts("acme/api");
        facts.integrations.apps.clear();
        facts.access.teams.clear();
        let validation = validate(&facts, &sample_capabilities("beta"), false);
        assert!(validation.blockers().is_empty());

        assert_eq!(
            TransferGate::evaluate(&validation, false),
            GateDecision::Allowed {
                overridden_blockers: 0
            }
        );
    }

    #[test]
    fn blockers_stop_relocation() {
        let validation = validate(&sample_facts("acme/api"), &TargetCapabilities::new("beta"), false);
        let expected = validation.summary.blockers;
        assert!(expected > 0);

        let decision = TransferGate::evaluate(&validation, false);
        let GateDecision::Blocked { blockers } = &decision else {
            panic!("expected a blocked decision");
        };
        assert_eq!(blockers.len(), expected);
        assert!(blockers.iter().all(|b| b.status == ReadinessStatus::Blocker));

        let err = decision.into_result().unwrap_err();
        assert!(err.to_string().contains(&expected.to_string()));
    }

    #[test]
    fn enforce_overrides_and_counts() {
        let validation = validate(&sample_facts("acme/api"), &TargetCapabilities::new("beta"), false);
        let decision = TransferGate::evaluate(&validation, true);

        assert!(decision.is_allowed());
        assert_eq!(decision.into_result(), Ok(validation.summary.blockers));
    }
}
