//! Version marker commands
//!
//! Usage: litemig version get --db <PATH>
//!        litemig version set --db <PATH> <VERSION>

use clap::{Args, Subcommand};
use litemig_core::Version;
use std::path::PathBuf;

use super::{open_existing, CommandResult};

#[derive(Debug, Args)]
pub struct VersionArgs {
    #[command(subcommand)]
    pub command: VersionCommand,
}

#[derive(Debug, Subcommand)]
pub enum VersionCommand {
    /// Print the stored schema version
    Get(GetArgs),
    /// Overwrite the stored schema version without running any step
    Set(SetArgs),
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Path to the SQLite database
    #[arg(long)]
    pub db: PathBuf,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    /// Path to the SQLite database
    #[arg(long)]
    pub db: PathBuf,

    /// Version to record
    pub version: Version,
}

/// Execute version command
pub fn execute(args: VersionArgs) -> CommandResult {
    match args.command {
        VersionCommand::Get(get_args) => {
            let conn = open_existing(&get_args.db)?;
            println!("{}", litemig_store::get_user_version(&conn)?);
            Ok(())
        }
        VersionCommand::Set(set_args) => {
            let conn = open_existing(&set_args.db)?;
            let previous = litemig_store::get_user_version(&conn)?;
            litemig_store::set_user_version(&conn, set_args.version)?;
            println!("✓ Version set: {} -> {}", previous, set_args.version);
            Ok(())
        }
    }
}
