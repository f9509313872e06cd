//! Info command
//!
//! Usage: strata info --location <DIR> --database <FILE> [--json]

use clap::Args;
use strata_engine::MigrationInfo;

use super::{open_session, RunArgs};

#[derive(Debug, Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Print the listing as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: InfoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(&args.run)?;

    let rows = strata_engine::info(
        &mut session.conn,
        &session.config,
        &mut session.diagnostics,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_table(&rows);
    }
    Ok(())
}

fn print_table(rows: &[MigrationInfo]) {
    if rows.is_empty() {
        println!("No migrations found");
        return;
    }

    println!(
        "{:<10} {:<30} {:<8} {:<20}",
        "Version", "Description", "State", "Installed on"
    );
    for row in rows {
        let installed_on = row
            .installed_on
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        println!(
            "{:<10} {:<30} {:<8} {:<20}",
            row.version, row.description, row.state, installed_on
        );
    }
}
