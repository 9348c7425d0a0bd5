//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use st_db::DuckDbBackend;
use st_ledger::{RevisionId, Step, Target};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;
use crate::config::Config;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error, and should not leak into stderr.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load the project config, honoring `--config` and `--project-dir`.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(Path::new(&global.project_dir)),
    }
}

/// Resolve the database path relative to the project directory.
pub(crate) fn database_path(config: &Config, global: &GlobalArgs) -> PathBuf {
    let path = Path::new(&config.database.path);
    if path.is_absolute() || config.database.path == ":memory:" {
        path.to_path_buf()
    } else {
        Path::new(&global.project_dir).join(path)
    }
}

/// Open the DuckDB backend for the configured database.
pub(crate) fn open_backend(config: &Config, global: &GlobalArgs) -> Result<DuckDbBackend> {
    let path = database_path(config, global);
    if global.verbose {
        println!("Opening database: {}", path.display());
    }
    DuckDbBackend::open(&path)
        .with_context(|| format!("failed to open database {}", path.display()))
}

/// Parse a downgrade target: a revision id, or "base".
pub(crate) fn parse_downgrade_target(to: &str) -> Target {
    if to.eq_ignore_ascii_case("base") {
        Target::Base
    } else {
        Target::Revision(RevisionId::new(to))
    }
}

/// Parse an upgrade target from --to / --branch.
pub(crate) fn parse_upgrade_target(to: Option<&str>, branch: Option<&str>) -> Target {
    match to {
        Some(rev) => Target::Revision(RevisionId::new(rev)),
        None => Target::Head {
            branch: branch.map(str::to_string),
        },
    }
}

/// Print a resolved plan, one record per line.
pub(crate) fn print_plan(steps: &[Step<'_>]) {
    for step in steps {
        println!(
            "  {:<9} {}  {}",
            step.direction.to_string(),
            step.record.revision,
            step.record.description
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_target_is_case_insensitive() {
        assert_eq!(parse_downgrade_target("BASE"), Target::Base);
        assert_eq!(
            parse_downgrade_target("fad2e5b46554"),
            Target::Revision(RevisionId::new("fad2e5b46554"))
        );
    }

    #[test]
    fn upgrade_target_defaults_to_head() {
        assert_eq!(
            parse_upgrade_target(None, None),
            Target::Head { branch: None }
        );
        assert_eq!(
            parse_upgrade_target(None, Some("maps")),
            Target::Head {
                branch: Some("maps".to_string())
            }
        );
        assert_eq!(
            parse_upgrade_target(Some("abc"), None),
            Target::Revision(RevisionId::new("abc"))
        );
    }
}
