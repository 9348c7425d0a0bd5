//! Stratum CLI - schema migration ledger over DuckDB

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod revisions;

use cli::Cli;
use commands::common::ExitCode;
use commands::{current, downgrade, history, upgrade, verify};

#[cfg(feature = "serve")]
use commands::serve;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        if let Some(code) = err.downcast_ref::<ExitCode>() {
            std::process::exit(code.0);
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Upgrade(args) => upgrade::execute(args, &cli.global).await,
        cli::Commands::Downgrade(args) => downgrade::execute(args, &cli.global).await,
        cli::Commands::Current => current::execute(&cli.global).await,
        cli::Commands::History(args) => history::execute(args, &cli.global).await,
        cli::Commands::Verify => verify::execute(&cli.global).await,
        #[cfg(feature = "serve")]
        cli::Commands::Serve(args) => serve::execute(args, &cli.global).await,
    }
}
