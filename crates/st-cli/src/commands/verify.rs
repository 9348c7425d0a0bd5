//! Verify command implementation

use anyhow::Result;
use st_ledger::verify_ledger;

use crate::cli::GlobalArgs;
use crate::commands::common::ExitCode;
use crate::revisions;

/// Execute the verify command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let ledger = revisions::ledger()?;

    if global.verbose {
        println!("Simulating {} migration(s) up and down...", ledger.len());
    }

    let findings = verify_ledger(&ledger, revisions::base_schema())?;

    if findings.is_empty() {
        println!(
            "OK: all {} migration(s) are structurally reversible.",
            ledger.len()
        );
        return Ok(());
    }

    for finding in &findings {
        eprintln!("FAIL {}: {}", finding.revision, finding.detail);
    }
    eprintln!("{} migration(s) failed verification.", findings.len());
    Err(ExitCode(1).into())
}
