//! Tests for stratum.yml parsing.

use super::*;

#[test]
fn parses_full_config() {
    let config: Config = serde_yaml::from_str(
        r#"
name: mapstore
database:
  path: target/ledger.duckdb
serve:
  host: 127.0.0.1
  port: 9000
"#,
    )
    .unwrap();
    assert_eq!(config.name, "mapstore");
    assert_eq!(config.database.path, "target/ledger.duckdb");
    assert_eq!(config.serve.host, "127.0.0.1");
    assert_eq!(config.serve.port, 9000);
}

#[test]
fn defaults_apply_to_missing_sections() {
    let config: Config = serde_yaml::from_str("name: mapstore\n").unwrap();
    assert_eq!(config.database.path, "stratum.duckdb");
    assert_eq!(config.serve.host, "0.0.0.0");
    assert_eq!(config.serve.port, 8000);
}

#[test]
fn unknown_fields_are_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: x\nbogus: 1\n");
    assert!(result.is_err());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "stratum");
}

#[test]
fn load_from_dir_picks_up_yml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("stratum.yml"), "name: fromfile\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "fromfile");
}
