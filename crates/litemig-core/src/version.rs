//! Version Store contract
//!
//! The persisted schema version lives inside the target database. It is read
//! and written only through these two operations and never cached in memory.

#[cfg(feature = "sqlite")]
mod sqlite;

use crate::context::MigrateContext;
use crate::errors::Result;

#[cfg(feature = "sqlite")]
pub use sqlite::{get_user_version, set_user_version};

/// Schema version number. Version 0 is a database no migration has touched.
pub type Version = u32;

/// Access to the single persisted version marker of a database handle
pub trait VersionStore {
    /// Read the current version marker
    ///
    /// # Errors
    ///
    /// `VersionRead` when the marker cannot be queried or decoded, or when
    /// `ctx` is cancelled or past its deadline.
    fn get_version(&self, ctx: &MigrateContext) -> Result<Version>;

    /// Overwrite the version marker with `version`
    ///
    /// # Errors
    ///
    /// `VersionWrite` when the marker cannot be written, or when `ctx` is
    /// cancelled or past its deadline.
    fn set_version(&self, ctx: &MigrateContext, version: Version) -> Result<()>;
}
