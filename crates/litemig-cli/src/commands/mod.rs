//! CLI command implementations

pub mod migrate;
pub mod status;
pub mod version;

use std::path::Path;

use rusqlite::Connection;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open a database that must already exist
pub fn open_existing(path: &Path) -> Result<Connection, Box<dyn std::error::Error>> {
    if !path.is_file() {
        return Err(format!("database not found: {}", path.display()).into());
    }
    Ok(litemig_store::db::open(path)?)
}
