//! Integration tests for the gant CLI
//!
//! Each test writes a Gantfile into a fresh directory and runs the binary
//! against it, checking output and exit status.

use assert_cmd::cargo;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper function to create a gant command
fn gant() -> assert_cmd::Command {
    assert_cmd::Command::new(cargo::cargo_bin!("gant"))
}

/// Helper to create a project directory holding `build.gant`
fn project(script: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("build.gant"), script).unwrap();
    temp_dir
}

const HELLO: &str = r#"
target(name: "hello", description: "Say hello") {
    println "hi"
}

target(name: "stage", description: "Copy sources") {
    copy(file: "a", todir: "b")
}

target(default: "Run everything") {
    depends(hello)
}
"#;

// =============================================================================
// Running Targets
// =============================================================================

#[test]
fn test_runs_named_target() {
    let temp_dir = project(HELLO);

    gant().current_dir(temp_dir.path()).arg("hello").assert().success().stdout("hi\n");
}

#[test]
fn test_runs_default_target() {
    let temp_dir = project(HELLO);

    gant().current_dir(temp_dir.path()).assert().success().stdout("hi\n");
}

#[test]
fn test_repeated_target_runs_once() {
    let temp_dir = project(HELLO);

    gant()
        .current_dir(temp_dir.path())
        .args(["hello", "default", "hello"])
        .assert()
        .success()
        .stdout("hi\n");
}

#[test]
fn test_unknown_target_fails() {
    let temp_dir = project(HELLO);

    gant()
        .current_dir(temp_dir.path())
        .arg("nope")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("Target nope does not exist."))
        .stderr(predicate::str::contains("BUILD FAILED"));
}

#[test]
fn test_failing_task_fails_build() {
    let temp_dir = project(r#"target(name: "boom") { fail(message: "stop") }"#);

    gant()
        .current_dir(temp_dir.path())
        .arg("boom")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("stop"));
}

#[test]
fn test_tasks_run_in_project_directory() {
    let temp_dir = project(r#"target(name: "init") { mkdir(dir: "out/classes") }"#);

    gant().current_dir(temp_dir.path()).arg("init").assert().success();
    assert!(temp_dir.path().join("out/classes").is_dir());
}

// =============================================================================
// Dry Run and Verbosity
// =============================================================================

#[test]
fn test_dry_run_traces_tasks() {
    let temp_dir = project(HELLO);

    gant()
        .current_dir(temp_dir.path())
        .args(["-n", "stage"])
        .assert()
        .success()
        .stdout("    [copy] file : 'a' , todir : 'b'\n");
    assert!(!temp_dir.path().join("b").exists());
}

#[test]
fn test_silent_dry_run_prints_nothing() {
    let temp_dir = project(HELLO);

    gant()
        .current_dir(temp_dir.path())
        .args(["-s", "-n", "stage"])
        .assert()
        .success()
        .stdout("");
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_list_targets() {
    let temp_dir = project(HELLO);

    gant()
        .current_dir(temp_dir.path())
        .arg("-T")
        .assert()
        .success()
        .stdout("gant hello  --  Say hello\ngant stage  --  Copy sources\n\nRun everything\n");
}

#[test]
fn test_list_targets_json() {
    let temp_dir = project(HELLO);

    let output = gant().current_dir(temp_dir.path()).args(["-T", "--json"]).output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["targets"].as_array().unwrap().len(), 3);
    assert_eq!(parsed["default"], "Run everything");
}

#[test]
fn test_define_binds_variable() {
    let temp_dir = project(r#"target(name: "show") { println "version ${version}" }"#);

    gant()
        .current_dir(temp_dir.path())
        .args(["-D", "version=2.0", "show"])
        .assert()
        .success()
        .stdout("version 2.0\n");
}

#[test]
fn test_script_from_stdin() {
    let temp_dir = TempDir::new().unwrap();

    gant()
        .current_dir(temp_dir.path())
        .args(["-f", "-", "hello"])
        .write_stdin("target(name: 'hello') { println 'from stdin' }\n")
        .assert()
        .success()
        .stdout("from stdin\n");
}

#[test]
fn test_directory_option() {
    let temp_dir = project(HELLO);

    gant().arg("-C").arg(temp_dir.path()).arg("hello").assert().success().stdout("hi\n");
}

#[test]
fn test_alternate_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("other.gant"), "target(name: 'x') { println 'other' }").unwrap();

    gant()
        .current_dir(temp_dir.path())
        .args(["-f", "other.gant", "x"])
        .assert()
        .success()
        .stdout("other\n");
}

#[test]
fn test_project_config_supplies_definitions() {
    let temp_dir = project(r#"target(name: "show") { println name }"#);
    fs::write(temp_dir.path().join("gant.toml"), "[definitions]\nname = \"widget\"\n").unwrap();

    gant().current_dir(temp_dir.path()).arg("show").assert().success().stdout("widget\n");
}

// =============================================================================
// Script Errors
// =============================================================================

#[test]
fn test_missing_gantfile() {
    let temp_dir = TempDir::new().unwrap();

    gant()
        .current_dir(temp_dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot read"));
}

#[test]
fn test_syntax_error_reports_position() {
    let temp_dir = project("target(name: 'x') {\n    println(,)\n}\n");

    gant()
        .current_dir(temp_dir.path())
        .arg("x")
        .assert()
        .code(2)
        .stderr(predicate::str::contains(":2:13:"));
}
