//! Migration framework
//!
//! Provides:
//! - `MigrationStep`: a `from -> to` rule with its apply capability
//! - `MigrationSet`: the ordered step collection and the chain runner
//! - Dry-run planning with the same selection rule as a real run

mod runner;
mod step;

pub use runner::{AppliedStep, MigrateOutcome, MigrationSet};
pub use step::{Apply, MigrationStep};
