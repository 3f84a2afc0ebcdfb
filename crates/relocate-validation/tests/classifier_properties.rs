//! Classifier and resolver properties over generated inputs

use proptest::prelude::*;
use relocate_types::{
    DiscoveredFacts, MemberPrivileges, Policy, ReadinessStatus, RulesetConditions,
    TargetCapabilities,
};
use relocate_validation::{applies, validate};

fn name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(name(), 0..4)
}

fn suffixed() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec((name(), "[a-z]{1,5}").prop_map(|(n, s)| format!("{n} ({s})")), 0..4)
}

prop_compose! {
    fn facts()(
        apps in suffixed(),
        teams in suffixed(),
        collaborators in names(),
        secrets in names(),
        variables in names(),
        runners in names(),
        submodules in names(),
        campaigns in names(),
        policy_names in names(),
        templates in names(),
    ) -> DiscoveredFacts {
        let mut facts = DiscoveredFacts::new("acme/api");
        facts.integrations.apps = apps;
        facts.access.teams = teams;
        facts.access.collaborators = collaborators;
        facts.ci.secrets = secrets;
        facts.ci.variables = variables;
        facts.ci.runners = runners;
        facts.code.submodules = submodules;
        facts.security.campaigns = campaigns;
        facts.governance.policies = policy_names
            .into_iter()
            .map(|n| Policy::new(n, "active").with_restriction("Repository creation restricted"))
            .collect();
        facts.governance.issue_templates = templates;
        facts
    }
}

prop_compose! {
    fn capabilities()(
        apps in names(),
        teams in names(),
        secrets in names(),
        variables in names(),
        runners in names(),
        can_create_repos in any::<bool>(),
    ) -> TargetCapabilities {
        TargetCapabilities::new("beta")
            .with_apps(apps)
            .with_teams(teams)
            .with_secrets(secrets)
            .with_variables(variables)
            .with_runners(runners)
            .with_member_privileges(MemberPrivileges {
                can_create_repos,
                ..MemberPrivileges::default()
            })
    }
}

proptest! {
    #[test]
    fn summary_total_matches_result_count(facts in facts(), caps in capabilities()) {
        let validation = validate(&facts, &caps, false);
        let summary = validation.summary;
        prop_assert_eq!(
            summary.total,
            summary.ready + summary.setup_needed + summary.blockers
                + summary.warnings + summary.review + summary.unknown
        );
        prop_assert_eq!(summary.total, validation.results().count());
    }

    #[test]
    fn every_status_is_a_known_token(facts in facts(), caps in capabilities()) {
        let validation = validate(&facts, &caps, false);
        for result in validation.results() {
            let token = serde_json::to_value(result.status).unwrap();
            let token = token.as_str().unwrap().to_string();
            prop_assert!(ReadinessStatus::ALL.iter().any(|s| s.as_str() == token));
        }
    }

    #[test]
    fn overall_blocker_iff_blockers(facts in facts(), caps in capabilities()) {
        let validation = validate(&facts, &caps, false);
        prop_assert_eq!(
            validation.overall_readiness == ReadinessStatus::Blocker,
            validation.summary.blockers > 0
        );
    }

    #[test]
    fn validation_is_idempotent(facts in facts(), caps in capabilities(), assign in any::<bool>()) {
        let first = serde_json::to_vec(&validate(&facts, &caps, assign)).unwrap();
        let second = serde_json::to_vec(&validate(&facts, &caps, assign)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn assign_teams_flag_changes_nothing(facts in facts(), caps in capabilities()) {
        prop_assert_eq!(validate(&facts, &caps, true), validate(&facts, &caps, false));
    }

    #[test]
    fn collaborators_always_warn(collaborators in prop::collection::vec(name(), 1..4), caps in capabilities()) {
        let mut facts = DiscoveredFacts::new("acme/api");
        facts.access.collaborators = collaborators;
        let validation = validate(&facts, &caps, false);
        prop_assert!(validation
            .access_permissions
            .iter()
            .all(|r| r.status == ReadinessStatus::Warning));
    }

    #[test]
    fn empty_conditions_apply_to_any_repository(repo in "[a-zA-Z0-9._-]{1,20}") {
        prop_assert!(applies(&RulesetConditions::all(), &repo));
    }

    #[test]
    fn exact_include_list_rejects_others(include in name(), repo in name()) {
        prop_assume!(include != repo);
        let conditions = RulesetConditions::all().with_include([include]);
        prop_assert!(!applies(&conditions, &repo));
    }
}
