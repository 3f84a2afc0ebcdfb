//! Relocate Validation - the migration validation engine
//!
//! - [`scanner`]: enumerate what already exists in a target organization
//! - [`ruleset`]: decide whether an organization ruleset targets a repository
//! - [`classifier`]: classify every discovered dependency against the target
//!
//! Data flows scanner → classifier; the batch cache feeds the classifier
//! one [`relocate_types::DiscoveredFacts`] per repository.

pub mod classifier;
pub mod ruleset;
pub mod scanner;

pub use classifier::{is_member_privilege_policy, validate};
pub use ruleset::{applies, policy_applies};
pub use scanner::{scan_target_capabilities, ScanOptions};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
