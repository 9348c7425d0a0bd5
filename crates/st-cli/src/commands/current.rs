//! Current command implementation

use anyhow::Result;
use st_ledger::{RevisionStore, Target};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_config, open_backend};
use crate::revisions;

/// Execute the current command
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let ledger = revisions::ledger()?;
    let mut backend = open_backend(&config, global)?;

    let current = backend.current()?;
    match &current {
        Some(revision) => println!("Current revision: {revision}"),
        None => println!("Current revision: base (no migrations applied)"),
    }

    // Pending count only makes sense with an unambiguous head
    if ledger.heads().len() == 1 {
        match ledger.resolve(current.as_ref(), &Target::head()) {
            Ok(pending) if pending.is_empty() => println!("Up to date with head."),
            Ok(pending) => println!("{} migration(s) pending.", pending.len()),
            // A marker the ledger does not know indicates drift, not a
            // reason to fail a read-only status command
            Err(e) => eprintln!("Warning: {e}"),
        }
    }
    Ok(())
}
