//! litemig Core - schema-version migration runner
//!
//! This crate provides the engine-agnostic half of litemig:
//! - The `VersionStore` contract for reading and writing the persisted version marker
//! - `MigrationStep` / `MigrationSet`, the linear migration-chain runner
//! - `MigrateContext`, the cancellation/deadline context forwarded into every call
//! - The canonical `ExError` facility and the structured logging facility
//!
//! With the default `sqlite` feature, `rusqlite::Connection` implements
//! `VersionStore` on top of `PRAGMA user_version`. Connection helpers and
//! SQL-file steps live in `litemig-store`.

pub mod context;
pub mod errors;
pub mod logging_facility;
pub mod migrate;
pub mod version;

pub use litemig_core_types::schema;

// Re-export commonly used types
pub use context::{CancelHandle, ContextError, MigrateContext};
pub use errors::{ExError, ExErrorKind, Result};
pub use migrate::{AppliedStep, Apply, MigrateOutcome, MigrationSet, MigrationStep};
pub use version::{Version, VersionStore};

#[cfg(feature = "sqlite")]
pub use version::{get_user_version, set_user_version};
