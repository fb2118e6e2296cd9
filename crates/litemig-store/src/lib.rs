//! litemig Store - SQLite collaborator for the migration runner
//!
//! Provides:
//! - Connection helpers
//! - SQL-batch migration steps and a loader for directories of `.sql` files

pub mod db;
pub mod errors;
pub mod migrations;

// Re-export key types
pub use errors::Result;
pub use migrations::{load_sql_dir, sql_step, SqlStep};
pub use litemig_core::{get_user_version, set_user_version};
