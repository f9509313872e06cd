//! Validate command
//!
//! Usage: strata validate --location <DIR> --database <FILE>

use clap::Args;

use super::{open_session, RunArgs};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

pub fn execute(args: ValidateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(&args.run)?;

    let report = strata_engine::validate(
        &mut session.conn,
        &session.config,
        &mut session.diagnostics,
    )?;

    println!("Validated {} migration(s):", report.validated);
    println!("  applied: {}", report.applied);
    println!("  pending: {}", report.pending);
    Ok(())
}
