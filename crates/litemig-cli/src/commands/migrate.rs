//! Migrate command
//!
//! Usage: litemig migrate --db <PATH> --dir <SQL_DIR> [--dry-run] [--timeout-secs <N>]

use clap::Args;
use litemig_core::{MigrateContext, MigrationSet};
use std::path::PathBuf;
use std::time::Duration;

use super::{open_existing, CommandResult};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Path to the SQLite database (created if missing)
    #[arg(long)]
    pub db: PathBuf,

    /// Directory of <from>_<to>[_<name>].sql migration files
    #[arg(long)]
    pub dir: PathBuf,

    /// Print the steps that would run without applying them
    #[arg(long)]
    pub dry_run: bool,

    /// Fail the run once this many seconds have passed
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Execute migrate command
pub fn execute(args: MigrateArgs) -> CommandResult {
    let set = MigrationSet::new(litemig_store::load_sql_dir(&args.dir)?);

    if args.dry_run {
        // A missing database would start at version 0; nothing is created
        let current = if args.db.exists() {
            litemig_store::get_user_version(&open_existing(&args.db)?)?
        } else {
            0
        };
        let plan = set.plan(current)?;
        if plan.is_empty() {
            println!("✓ Already at version {}", current);
        }
        for step in plan {
            println!(
                "Would apply {} -> {} ({})",
                step.from,
                step.to,
                step.name.as_deref().unwrap_or("unnamed")
            );
        }
        return Ok(());
    }

    let mut conn = litemig_store::db::open(&args.db)?;
    litemig_store::db::configure(&conn)?;

    let mut ctx = MigrateContext::new();
    if let Some(secs) = args.timeout_secs {
        ctx = ctx.with_timeout(Duration::from_secs(secs));
    }

    let outcome = set.migrate(&ctx, &mut conn)?;
    if outcome.is_noop() {
        println!("✓ Already at version {}", outcome.to_version);
    } else {
        for step in &outcome.applied {
            println!(
                "Applied {} -> {} ({})",
                step.from,
                step.to,
                step.name.as_deref().unwrap_or("unnamed")
            );
        }
        println!(
            "✓ Migrated from {} to {}",
            outcome.from_version, outcome.to_version
        );
    }
    Ok(())
}
