//! Ruleset target resolution
//!
//! Matching rule for both lists: a name matches when it equals an entry, or
//! when *any* entry contains `*`. The wildcard is not positional; `web-*`
//! matches `api` as well.

use relocate_types::{Policy, RulesetConditions};

fn matches_any(entries: &[String], name: &str) -> bool {
    entries.iter().any(|entry| entry == name || entry.contains('*'))
}

/// Whether a ruleset with `conditions` applies to repository `name`.
///
/// Includes are checked first; an include match can still be vetoed by an
/// exclude. With no includes, everything not excluded applies.
/// `protected_only` does not take part in the decision.
#[must_use]
pub fn applies(conditions: &RulesetConditions, name: &str) -> bool {
    if !conditions.include_names.is_empty() && !matches_any(&conditions.include_names, name) {
        return false;
    }
    !matches_any(&conditions.exclude_names, name)
}

/// Whether a cached organization policy applies to repository `name`.
///
/// Structured conditions are used when the policy carries them; otherwise
/// targeting is recovered from the restriction text.
#[must_use]
pub fn policy_applies(policy: &Policy, name: &str) -> bool {
    match &policy.conditions {
        Some(conditions) => applies(conditions, name),
        None => applies(&RulesetConditions::from_restrictions(&policy.restrictions), name),
    }
}
