//! Version marker backed by `PRAGMA user_version`
//!
//! SQLite keeps a 32-bit integer in the database header for applications to
//! use. Tracking the schema version there needs no table of its own and
//! works before any user table exists.

use rusqlite::Connection;

use crate::context::MigrateContext;
use crate::errors::{from_rusqlite, ExError, ExErrorKind, Result};
use crate::version::{Version, VersionStore};

const USER_VERSION: &str = "user_version";

/// Read `PRAGMA user_version`
///
/// # Errors
///
/// `VersionRead` when the pragma cannot be queried, returns no row, returns
/// something other than an integer, or holds a negative value.
pub fn get_user_version(conn: &Connection) -> Result<Version> {
    let raw: i64 = conn
        .pragma_query_value(None, USER_VERSION, |row| row.get(0))
        .map_err(|e| {
            ExError::new(ExErrorKind::VersionRead)
                .with_op("get_user_version")
                .with_message("cannot read user_version")
                .with_source(from_rusqlite(e))
        })?;

    Version::try_from(raw).map_err(|_| {
        ExError::new(ExErrorKind::VersionRead)
            .with_op("get_user_version")
            .with_message(format!("stored user_version {} is not a valid schema version", raw))
    })
}

/// Overwrite `PRAGMA user_version`
///
/// # Errors
///
/// `VersionWrite` when `version` does not fit the signed 32-bit slot or the
/// pragma cannot be executed.
pub fn set_user_version(conn: &Connection, version: Version) -> Result<()> {
    let value = i32::try_from(version).map_err(|_| {
        ExError::new(ExErrorKind::VersionWrite)
            .with_op("set_user_version")
            .with_to_version(version)
            .with_message(format!("version exceeds the user_version limit of {}", i32::MAX))
    })?;

    conn.pragma_update(None, USER_VERSION, value).map_err(|e| {
        ExError::new(ExErrorKind::VersionWrite)
            .with_op("set_user_version")
            .with_to_version(version)
            .with_message("cannot write user_version")
            .with_source(from_rusqlite(e))
    })
}

impl VersionStore for Connection {
    fn get_version(&self, ctx: &MigrateContext) -> Result<Version> {
        ctx.check().map_err(|e| {
            ExError::new(ExErrorKind::VersionRead)
                .with_op("get_user_version")
                .with_source(e.into())
        })?;
        get_user_version(self)
    }

    fn set_version(&self, ctx: &MigrateContext, version: Version) -> Result<()> {
        ctx.check().map_err(|e| {
            ExError::new(ExErrorKind::VersionWrite)
                .with_op("set_user_version")
                .with_to_version(version)
                .with_source(e.into())
        })?;
        set_user_version(self, version)
    }
}
