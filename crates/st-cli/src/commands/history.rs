//! History command implementation

use anyhow::Result;
use serde::Serialize;
use st_ledger::{RevisionStore, Target};
use std::collections::HashSet;

use crate::cli::{GlobalArgs, HistoryArgs, HistoryOutput};
use crate::commands::common::{load_config, open_backend};
use crate::revisions;

/// One row of the history listing
#[derive(Debug, Serialize)]
struct HistoryEntry {
    revision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    description: String,
    applied: bool,
    current: bool,
}

/// Execute the history command
pub async fn execute(args: &HistoryArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let ledger = revisions::ledger()?;
    let mut backend = open_backend(&config, global)?;
    let current = backend.current()?;

    // Everything on the path from base to the marker has been applied
    let applied: HashSet<String> = match &current {
        Some(revision) => ledger
            .resolve(None, &Target::Revision(revision.clone()))
            .map(|steps| {
                steps
                    .iter()
                    .map(|s| s.record.revision.to_string())
                    .collect()
            })
            .unwrap_or_default(),
        None => HashSet::new(),
    };

    let entries: Vec<HistoryEntry> = ledger
        .records()
        .map(|record| HistoryEntry {
            revision: record.revision.to_string(),
            parent: record.parent.as_ref().map(|p| p.to_string()),
            description: record.description.clone(),
            applied: applied.contains(record.revision.as_str()),
            current: current.as_ref() == Some(&record.revision),
        })
        .collect();

    match args.output {
        HistoryOutput::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        HistoryOutput::Table => {
            for entry in &entries {
                let status = if entry.current {
                    "current"
                } else if entry.applied {
                    "applied"
                } else {
                    "pending"
                };
                println!(
                    "{:<12}  {:<8}  {}",
                    entry.revision, status, entry.description
                );
            }
        }
    }
    Ok(())
}
