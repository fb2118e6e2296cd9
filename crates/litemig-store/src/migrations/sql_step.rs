//! Migration steps made of a plain SQL batch

use litemig_core::errors::{ExError, Result};
use litemig_core::{Apply, MigrateContext, MigrationStep, Version};
use rusqlite::Connection;

use crate::errors::from_rusqlite;
use crate::migrations::checksums::compute_checksum;

/// A SQL batch applied inside its own transaction
///
/// The batch commits as a whole or not at all. The version marker is written
/// by the runner afterwards, outside this transaction, so the batch itself
/// should be safe to run twice (`CREATE TABLE IF NOT EXISTS` and the like).
#[derive(Debug, Clone)]
pub struct SqlStep {
    sql: String,
    checksum: String,
}

impl SqlStep {
    pub fn new(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        let checksum = compute_checksum(&sql);
        Self { sql, checksum }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// SHA-256 of the batch text
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

impl Apply<Connection> for SqlStep {
    fn apply(&self, ctx: &MigrateContext, conn: &mut Connection) -> Result<()> {
        ctx.check().map_err(ExError::from)?;

        // Rolls back on drop if the batch fails
        let tx = conn.transaction().map_err(from_rusqlite)?;
        tx.execute_batch(&self.sql).map_err(from_rusqlite)?;
        tx.commit().map_err(from_rusqlite)?;

        tracing::debug!(
            component = module_path!(),
            op = "sql_step",
            request_id = ctx.request_id().as_str(),
            checksum = %self.checksum,
            "sql batch committed"
        );
        Ok(())
    }
}

/// Build a named step that runs `sql`
///
/// ```
/// use litemig_core::{MigrateContext, MigrationSet};
/// use litemig_store::sql_step;
///
/// let set = MigrationSet::new(vec![
///     sql_step(0, 1, "create_user", "CREATE TABLE user (id INTEGER PRIMARY KEY, name TEXT)"),
///     sql_step(1, 2, "add_description", "ALTER TABLE user ADD COLUMN description TEXT"),
/// ]);
///
/// let mut conn = rusqlite::Connection::open_in_memory().unwrap();
/// set.migrate(&MigrateContext::new(), &mut conn).unwrap();
/// assert_eq!(litemig_store::get_user_version(&conn).unwrap(), 2);
/// ```
pub fn sql_step(
    from: Version,
    to: Version,
    name: impl Into<String>,
    sql: impl Into<String>,
) -> MigrationStep<Connection> {
    MigrationStep::from_apply(from, to, SqlStep::new(sql)).with_name(name)
}
