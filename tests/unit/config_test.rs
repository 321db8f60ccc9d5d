//! Tests for configuration files

use std::str::FromStr;

use gant::Verbosity;
use gant::config::GantConfig;
use tempfile::TempDir;

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn parse_full_config() {
    let config = GantConfig::from_str(
        r#"
[defaults]
file = "tools/build.gant"
verbosity = "verbose"
dry_run = true

[definitions]
version = "1.0"
"#,
    )
    .unwrap();

    assert_eq!(config.defaults.file.as_deref(), Some("tools/build.gant"));
    assert_eq!(config.defaults.verbosity, Some(Verbosity::Verbose));
    assert_eq!(config.defaults.dry_run, Some(true));
    assert_eq!(config.definitions.get("version").map(String::as_str), Some("1.0"));
}

#[test]
fn parse_empty_config() {
    let config = GantConfig::from_str("").unwrap();
    assert_eq!(config, GantConfig::default());
}

#[test]
fn parse_rejects_unknown_verbosity() {
    let result = GantConfig::from_str("[defaults]\nverbosity = \"chatty\"\n");
    assert!(result.is_err());
}

// =============================================================================
// Layering Tests
// =============================================================================

#[test]
fn merge_overrides_set_values_only() {
    let mut base = GantConfig::from_str(
        "[defaults]\nfile = \"a.gant\"\ndry_run = true\n[definitions]\nx = \"1\"\ny = \"1\"\n",
    )
    .unwrap();
    let layer =
        GantConfig::from_str("[defaults]\nfile = \"b.gant\"\n[definitions]\ny = \"2\"\n")
            .unwrap();

    base.merge(layer);

    assert_eq!(base.defaults.file.as_deref(), Some("b.gant"));
    assert_eq!(base.defaults.dry_run, Some(true));
    assert_eq!(base.definitions.get("x").map(String::as_str), Some("1"));
    assert_eq!(base.definitions.get("y").map(String::as_str), Some("2"));
}

#[test]
fn load_reads_project_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("gant.toml"), "[defaults]\nfile = \"project.gant\"\n").unwrap();

    let config = GantConfig::load(dir.path());
    assert_eq!(config.defaults.file.as_deref(), Some("project.gant"));
}

#[test]
fn load_ignores_malformed_project_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("gant.toml"), "[defaults\nfile =").unwrap();

    let config = GantConfig::load(dir.path());
    assert_ne!(config.defaults.file.as_deref(), Some("project.gant"));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn save_then_read() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/gant.toml");

    let mut config = GantConfig::default();
    config.defaults.verbosity = Some(Verbosity::Silent);
    config.definitions.insert("release".to_string(), "yes".to_string());
    config.save(&path).unwrap();

    assert_eq!(GantConfig::read(&path).unwrap(), config);
}

#[test]
fn read_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let err = GantConfig::read(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().starts_with("cannot read"));
}
