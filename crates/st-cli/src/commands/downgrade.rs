//! Downgrade command implementation

use anyhow::Result;
use st_ledger::{apply, RevisionStore};

use crate::cli::{DowngradeArgs, GlobalArgs};
use crate::commands::common::{
    load_config, open_backend, parse_downgrade_target, print_plan,
};
use crate::revisions;

/// Execute the downgrade command
pub async fn execute(args: &DowngradeArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let ledger = revisions::ledger()?;
    let mut backend = open_backend(&config, global)?;

    let current = backend.current()?;
    let target = parse_downgrade_target(&args.to);
    let steps = ledger.resolve(current.as_ref(), &target)?;

    if steps.is_empty() {
        println!("Already at {}.", args.to);
        return Ok(());
    }

    if args.dry_run {
        println!("Would revert {} migration(s):", steps.len());
        print_plan(&steps);
        return Ok(());
    }

    println!("Reverting {} migration(s):", steps.len());
    print_plan(&steps);
    let applied = apply(&steps, &mut backend)?;

    match backend.current()? {
        Some(revision) => println!("Reverted {applied} migration(s); now at {revision}."),
        None => println!("Reverted {applied} migration(s); database is at base."),
    }
    Ok(())
}
