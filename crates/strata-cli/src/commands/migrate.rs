//! Migrate command
//!
//! Usage: strata migrate --location <DIR> --database <FILE>

use clap::Args;

use super::{open_session, RunArgs};

#[derive(Debug, Args)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub run: RunArgs,
}

pub fn execute(args: MigrateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(&args.run)?;

    let applied = strata_engine::migrate(
        &mut session.conn,
        &session.config,
        &mut session.diagnostics,
    )?;

    if applied == 0 {
        println!("Schema is up to date");
    } else {
        println!("Applied {} migration(s)", applied);
    }
    Ok(())
}
