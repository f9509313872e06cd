//! Strata CLI
//!
//! Command-line interface for versioned SQL migrations against SQLite

use clap::{Parser, Subcommand};
use strata_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "strata")]
#[command(about = "Strata - versioned SQL schema migrations", long_about = None)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply outstanding migrations
    Migrate(commands::migrate::MigrateArgs),
    /// Check local scripts against the schema history without applying
    Validate(commands::validate::ValidateArgs),
    /// List every migration with its state
    Info(commands::info::InfoArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let result = match cli.command {
        Commands::Migrate(args) => commands::migrate::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
