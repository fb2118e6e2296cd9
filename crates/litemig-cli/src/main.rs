//! litemig CLI
//!
//! Command-line interface for inspecting and migrating SQLite schema versions

use clap::{Parser, Subcommand, ValueEnum};
use litemig_core::logging_facility::{self, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "litemig")]
#[command(about = "litemig - SQLite schema version migrations", long_about = None)]
struct Cli {
    /// Log output format (logs go to stderr; RUST_LOG overrides the level)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

impl From<LogFormat> for Profile {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Pretty => Profile::Development,
            LogFormat::Json => Profile::Production,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Read or overwrite the stored schema version
    Version(commands::version::VersionArgs),
    /// Show current, latest and pending steps for a SQL migration directory
    Status(commands::status::StatusArgs),
    /// Migrate a database to the latest version of a SQL migration directory
    Migrate(commands::migrate::MigrateArgs),
}

fn main() {
    let cli = Cli::parse();
    logging_facility::init(cli.log_format.into());

    let result = match cli.command {
        Commands::Version(args) => commands::version::execute(args),
        Commands::Status(args) => commands::status::execute(args),
        Commands::Migrate(args) => commands::migrate::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
