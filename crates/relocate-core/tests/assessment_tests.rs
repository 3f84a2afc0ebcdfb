//! End-to-end assessment against a seeded source and target

use pretty_assertions::assert_eq;
use relocate_core::prelude::*;
use relocate_test_utils::fixtures::{seed_repository, seed_source_org, seed_target_org};
use relocate_test_utils::{Fault, FakeApi};
use relocate_types::Category;
use std::sync::Arc;

fn world() -> FakeApi {
    let api = FakeApi::new();
    seed_source_org(&api, "acme");
    seed_source_org(&api, "globex");
    seed_repository(&api, "acme", "api");
    seed_repository(&api, "acme", "web");
    seed_repository(&api, "globex", "api");
    seed_target_org(&api, "beta");
    api
}

fn item_statuses(validation: &MigrationValidation, category: Category) -> Vec<(&str, ReadinessStatus)> {
    validation
        .category(category)
        .iter()
        .map(|r| (r.item.as_str(), r.status))
        .collect()
}

#[tokio::test]
async fn assessment_keeps_input_order_across_owners() -> anyhow::Result<()> {
    let api = Arc::new(world());
    let relocator = Relocator::new(api.clone(), RelocateConfig::default());

    let inputs = ["acme/api", "globex/api", "broken", "acme/web"];
    let assessment = relocator.assess(&inputs, "beta").await;

    let order: Vec<&str> = assessment.repositories.iter().map(|r| r.repository.as_str()).collect();
    assert_eq!(order, inputs);
    assert_eq!(assessment.validations().count(), 3);
    assert_eq!(assessment.failures().count(), 1);
    assert!(matches!(
        assessment.repositories[2].error,
        Some(BatchError::MalformedRepository(_))
    ));

    // One context load per owner, one scan of the target.
    assert_eq!(api.hits("orgs/acme/installations"), 1);
    assert_eq!(api.hits("orgs/globex/installations"), 1);
    assert_eq!(api.hits("orgs/beta/installations"), 1);
    Ok(())
}

#[tokio::test]
async fn classification_reflects_target_capabilities() -> anyhow::Result<()> {
    let relocator = Relocator::new(Arc::new(world()), RelocateConfig::default());
    let assessment = relocator.assess(&["acme/api"], "beta").await;
    let validation = assessment.repositories[0]
        .validation
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("acme/api was not classified"))?;

    assert_eq!(validation.target_organization, "beta");
    assert_eq!(
        item_statuses(validation, Category::Integrations),
        vec![
            ("codecov (org-wide installation)", ReadinessStatus::Ready),
            ("deploy-bot (org-wide installation)", ReadinessStatus::Blocker),
        ]
    );
    assert_eq!(
        item_statuses(validation, Category::Access),
        vec![
            ("platform (push)", ReadinessStatus::Ready),
            ("octocat", ReadinessStatus::Warning),
        ]
    );
    assert_eq!(
        item_statuses(validation, Category::Ci),
        vec![("NPM_TOKEN", ReadinessStatus::Ready)]
    );
    assert_eq!(validation.overall_readiness, ReadinessStatus::Blocker);
    assert_eq!(validation.summary.total, validation.results().count());

    let governance: Vec<&str> = validation.governance.iter().map(|r| r.item.as_str()).collect();
    assert_eq!(
        governance,
        vec![
            "Member Management Policy (status: active)",
            "Security Policy (status: active)",
            "Core protections (status: active)",
            "Organization Security Policy (status: active)",
            ".github/ISSUE_TEMPLATE in acme/.github",
        ]
    );
    assert_eq!(validation.governance[0].status, ReadinessStatus::Ready);
    Ok(())
}

#[tokio::test]
async fn gate_follows_the_assessment() -> anyhow::Result<()> {
    let relocator = Relocator::new(Arc::new(world()), RelocateConfig::default());
    let assessment = relocator.assess(&["acme/api"], "beta").await;
    let validation = assessment
        .validations()
        .next()
        .ok_or_else(|| anyhow::anyhow!("no validation"))?;

    let blocked = TransferGate::evaluate(validation, false);
    assert!(!blocked.is_allowed());
    let Err(GateError::Blocked { blockers }) = blocked.into_result() else {
        anyhow::bail!("expected the gate to block");
    };
    assert_eq!(blockers.len(), 1);
    assert_eq!(blockers[0].item, "deploy-bot (org-wide installation)");

    let forced = TransferGate::evaluate(validation, true).into_result()?;
    assert_eq!(forced, 1);
    Ok(())
}

#[tokio::test]
async fn degraded_categories_are_reported() -> anyhow::Result<()> {
    let api = world();
    api.set_fault("repos/acme/web/teams", Fault::Status(500));
    let relocator = Relocator::new(
        Arc::new(api),
        RelocateConfig::default()
            .with_max_in_flight_requests(3)
            .with_max_parallel_repositories(1),
    );

    let assessment = relocator.assess(&["acme/api", "acme/web"], "beta").await;

    assert!(assessment.repositories[0].degraded.is_empty());
    assert_eq!(assessment.repositories[1].degraded, vec![Category::Access]);
    let web = assessment.repositories[1]
        .validation
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("acme/web was not classified"))?;
    assert!(web.access_permissions.is_empty());
    Ok(())
}
