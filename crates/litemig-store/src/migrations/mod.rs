//! SQL migration steps
//!
//! Provides:
//! - `SqlStep`: a SQL batch applied inside its own transaction
//! - Loading a directory of `<from>_<to>[_<name>].sql` files as a step list
//! - Checksums identifying the exact SQL a step ran

mod checksums;
mod sql_dir;
mod sql_step;

pub use checksums::compute_checksum;
pub use sql_dir::{load_sql_dir, parse_step_file_name, StepFileName};
pub use sql_step::{sql_step, SqlStep};
