//! Upgrade command implementation

use anyhow::Result;
use st_ledger::{apply, RevisionStore};

use crate::cli::{GlobalArgs, UpgradeArgs};
use crate::commands::common::{
    load_config, open_backend, parse_upgrade_target, print_plan,
};
use crate::revisions;

/// Execute the upgrade command
pub async fn execute(args: &UpgradeArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let ledger = revisions::ledger()?;
    let mut backend = open_backend(&config, global)?;

    let current = backend.current()?;
    let target = parse_upgrade_target(args.to.as_deref(), args.branch.as_deref());
    let steps = ledger.resolve(current.as_ref(), &target)?;

    if steps.is_empty() {
        println!("Already up to date.");
        return Ok(());
    }

    if args.dry_run {
        println!("Would apply {} migration(s):", steps.len());
        print_plan(&steps);
        return Ok(());
    }

    println!("Applying {} migration(s):", steps.len());
    print_plan(&steps);
    let applied = apply(&steps, &mut backend)?;

    match backend.current()? {
        Some(revision) => println!("Applied {applied} migration(s); now at {revision}."),
        None => println!("Applied {applied} migration(s)."),
    }
    Ok(())
}
