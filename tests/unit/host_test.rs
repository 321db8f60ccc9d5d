//! Tests for the host-tool adapter

use gant::host::{self, Definition};
use gant::{Console, GantTask, HostError};
use serial_test::serial;

use crate::common::TestProject;

fn task(project: &TestProject) -> (GantTask, gant::Captured) {
    let (console, output) = Console::capture();
    (GantTask::new(project.path()).with_console(console), output)
}

#[test]
#[serial(state)]
fn missing_gantfile_is_reported() {
    let project = TestProject::new();
    let (task, _) = task(&project);

    let err = task.execute().unwrap_err();
    assert!(matches!(err, HostError::MissingGantfile(_)));
    assert_eq!(err.to_string(), "Gantfile does not exist.");
}

#[test]
#[serial(state)]
fn definitions_are_visible_to_the_script() {
    let project = TestProject::new();
    project.add_file("build.gant", "target(name:'show'){ println \"v=${version}\" }");
    let (mut task, output) = task(&project);
    task.set_target("show");
    task.add_definition("version", "2.0");

    task.execute().unwrap();
    assert_eq!(output.contents(), "v=2.0\n");
}

#[test]
#[serial(state)]
fn first_definition_wins() {
    let project = TestProject::new();
    project.add_file("build.gant", "target(name:'show'){ println version }");
    let (mut task, output) = task(&project);
    task.set_target("show");
    task.add_definition("version", "1");
    task.add_definition("version", "2");

    task.execute().unwrap();
    assert_eq!(output.contents(), "1\n");
}

#[test]
#[serial(state)]
fn target_then_gant_targets_in_order() {
    let project = TestProject::new();
    project.add_file(
        "tasks.gant",
        "target(name:'a'){ println 'A' }
         target(name:'b'){ println 'B' }
         target(name:'c'){ println 'C' }",
    );
    let (mut task, output) = task(&project);
    task.set_file("tasks.gant");
    task.set_target("c");
    task.add_gant_target("a");
    task.add_gant_target("b");

    assert_eq!(task.targets(), vec!["c", "a", "b"]);
    task.execute().unwrap();
    assert_eq!(output.contents(), "C\nA\nB\n");
}

#[test]
#[serial(state)]
fn no_targets_runs_default() {
    let project = TestProject::new();
    project.add_file(
        "build.gant",
        "target(name:'main'){ println 'main' }\nsetDefaultTarget 'main'",
    );
    let (task, output) = task(&project);

    task.execute().unwrap();
    assert_eq!(output.contents(), "main\n");
}

#[test]
#[serial(state)]
fn non_zero_status_fails_the_host_build() {
    let project = TestProject::new();
    project.add_file("build.gant", "target(name:'t'){ println 'x' }");
    let (mut task, _) = task(&project);
    task.set_target("missing");

    let err = task.execute().unwrap_err();
    assert!(matches!(err, HostError::Failed(code) if code == gant::EXIT_UNKNOWN_TARGET));
    assert_eq!(err.to_string(), "Gant execution failed with return code 3.");
}

#[test]
#[serial(state)]
fn broken_script_fails_to_load() {
    let project = TestProject::new();
    project.add_file("build.gant", "target(name:'t'){ println 'x'");
    let (task, _) = task(&project);

    let err = task.execute().unwrap_err();
    assert!(matches!(err, HostError::Load(_)));
    assert_eq!(err.exit_code(), gant::EXIT_SCRIPT_ERROR);
}

#[test]
#[serial(state)]
fn tasks_run_in_the_base_directory() {
    let project = TestProject::new();
    project.add_file("build.gant", "target(name:'t'){ mkdir(dir: 'out/classes') }");

    host::run(project.path(), std::path::Path::new("build.gant"), &["t".to_string()], &[
        Definition {
            name: "unused".to_string(),
            value: "x".to_string(),
        },
    ])
    .unwrap();

    assert!(project.exists("out/classes"));
}
