//! Status command
//!
//! Usage: litemig status --db <PATH> --dir <SQL_DIR> [--json]

use clap::Args;
use litemig_core::{AppliedStep, MigrationSet, Version};
use serde::Serialize;
use std::path::PathBuf;

use super::{open_existing, CommandResult};

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Path to the SQLite database
    #[arg(long)]
    pub db: PathBuf,

    /// Directory of <from>_<to>[_<name>].sql migration files
    #[arg(long)]
    pub dir: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub current_version: Version,
    pub latest_version: Version,
    pub up_to_date: bool,
    pub pending: Vec<PendingStep>,
    /// Set when no chain of steps leads from the current version to the latest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PendingStep {
    pub from: Version,
    pub to: Version,
    pub name: Option<String>,
}

impl From<AppliedStep> for PendingStep {
    fn from(step: AppliedStep) -> Self {
        Self {
            from: step.from,
            to: step.to,
            name: step.name,
        }
    }
}

/// Execute status command
pub fn execute(args: StatusArgs) -> CommandResult {
    let conn = open_existing(&args.db)?;
    let set = MigrationSet::new(litemig_store::load_sql_dir(&args.dir)?);
    let current = litemig_store::get_user_version(&conn)?;

    let (pending, path_error) = match set.plan(current) {
        Ok(plan) => (plan.into_iter().map(PendingStep::from).collect(), None),
        Err(e) => (Vec::new(), Some(e.to_string())),
    };

    let report = StatusReport {
        current_version: current,
        latest_version: set.latest(),
        up_to_date: current == set.latest(),
        pending,
        path_error,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human(&report);
    }
    Ok(())
}

fn print_human(report: &StatusReport) {
    println!("Current version: {}", report.current_version);
    println!("Latest version:  {}", report.latest_version);
    if report.up_to_date {
        println!("✓ Up to date");
        return;
    }
    if let Some(err) = &report.path_error {
        println!("✗ {}", err);
        return;
    }
    println!("Pending steps:");
    for step in &report.pending {
        match &step.name {
            Some(name) => println!("  {} -> {}  {}", step.from, step.to, name),
            None => println!("  {} -> {}", step.from, step.to),
        }
    }
}
