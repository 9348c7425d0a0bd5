//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Stratum - a schema migration ledger over DuckDB
#[derive(Parser, Debug)]
#[command(name = "stratum")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply forward migrations up to a target revision (default: head)
    Upgrade(UpgradeArgs),

    /// Revert migrations back to a target revision (or "base")
    Downgrade(DowngradeArgs),

    /// Show the current revision marker
    Current,

    /// List the migration ledger and applied state
    History(HistoryArgs),

    /// Check every record's downgrade reverses its upgrade, by simulation
    Verify,

    /// Serve the embedded frontend bundle
    #[cfg(feature = "serve")]
    Serve(ServeArgs),
}

/// Arguments for the upgrade command
#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// Target revision (default: head)
    #[arg(long)]
    pub to: Option<String>,

    /// Branch label disambiguating the head when the ledger has several
    #[arg(long)]
    pub branch: Option<String>,

    /// Print the resolved plan without applying it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the downgrade command
#[derive(Args, Debug)]
pub struct DowngradeArgs {
    /// Target revision, or "base" for the uninitialized state
    #[arg(long)]
    pub to: String,

    /// Print the resolved plan without applying it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: HistoryOutput,
}

/// History output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutput {
    /// Human-readable listing
    Table,
    /// JSON output
    Json,
}

/// Arguments for the serve command
#[cfg(feature = "serve")]
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address (default: all interfaces)
    #[arg(long)]
    pub host: Option<String>,

    /// Port (default: 8000)
    #[arg(long)]
    pub port: Option<u16>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
