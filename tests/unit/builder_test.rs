//! Tests for the task builder proxy
//!
//! Dry-run tracing, silent suppression, and real dispatch with nested
//! elements.

use gant::core::models::{ANT, ANT_ALIAS};
use gant::core::services::trace_line;
use gant::{Attributes, Binding, GantError, TaskBuilder, Value, Verbosity};
use serial_test::serial;

use crate::common::{Harness, RecordingEngine};

// =============================================================================
// Dry Run Tests
// =============================================================================

#[test]
#[serial(state)]
fn dry_run_traces_instead_of_executing() {
    let mut h = Harness::new()
        .mode(true, Verbosity::Normal)
        .load("target(name: 'copy') { ant.copy(file: 'x', todir: 'y') }");

    assert_eq!(h.run(&["copy"]), 0);
    assert_eq!(h.stdout(), "    [copy] file : 'x' , todir : 'y'\n");
    assert!(h.log.borrow().is_empty());
}

#[test]
#[serial(state)]
fn dry_run_silent_prints_nothing() {
    let mut h = Harness::new()
        .mode(true, Verbosity::Silent)
        .load("target(name: 'copy') { ant.copy(file: 'x', todir: 'y') }");

    assert_eq!(h.run(&["copy"]), 0);
    assert_eq!(h.stdout(), "");
    assert!(h.log.borrow().is_empty());
}

#[test]
#[serial(state)]
fn dry_run_recurses_into_nested_body() {
    let script = "target(name: 'pack') {
        ant.jar(destfile: 'app.jar') {
            fileset(dir: 'classes')
        }
    }";
    let mut h = Harness::new().mode(true, Verbosity::Normal).load(script);

    assert_eq!(h.run(&["pack"]), 0);
    assert_eq!(
        h.stdout(),
        "     [jar] destfile : 'app.jar'\n [fileset] dir : 'classes'\n"
    );
}

#[test]
#[serial(state)]
fn dry_run_body_only_call_prints_bare_header() {
    let mut h = Harness::new()
        .mode(true, Verbosity::Normal)
        .load("target(name: 't') { ant.sequential { echo(message: 'hi') } }");

    assert_eq!(h.run(&["t"]), 0);
    assert_eq!(h.stdout(), "[sequential] \n    [echo] message : 'hi'\n");
}

#[test]
#[serial(state)]
fn unqualified_task_is_traced_in_dry_run() {
    let mut h = Harness::new()
        .mode(true, Verbosity::Verbose)
        .load("target(name: 't') { mkdir(dir: 'build') }");

    assert_eq!(h.run(&["t"]), 0);
    assert_eq!(h.stdout(), trace_line("mkdir", Some(&Attributes::new().with("dir", "build"))));
}

// =============================================================================
// Real Dispatch Tests
// =============================================================================

#[test]
#[serial(state)]
fn silent_real_run_still_reaches_engine() {
    let mut h = Harness::new()
        .mode(false, Verbosity::Silent)
        .load("target(name: 'copy') { ant.copy(file: 'x', todir: 'y') }");

    assert_eq!(h.run(&["copy"]), 0);
    assert_eq!(h.stdout(), "");
    let log = h.log.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].name, "copy");
    assert_eq!(log[0].attribute("file").as_deref(), Some("x"));
    assert_eq!(log[0].attribute("todir").as_deref(), Some("y"));
}

#[test]
#[serial(state)]
fn nested_calls_become_child_elements() {
    let script = "target(name: 'pack') {
        ant.copy(todir: 'out') {
            fileset(dir: 'src', includes: '**/*.rs')
            fileset(dir: 'res')
        }
    }";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["pack"]), 0);
    let log = h.log.borrow();
    assert_eq!(log.len(), 1, "nested elements must not be executed on their own");
    let copy = &log[0];
    assert_eq!(copy.children.len(), 2);
    assert_eq!(copy.children[0].name, "fileset");
    assert_eq!(copy.children[0].attribute("includes").as_deref(), Some("**/*.rs"));
    assert_eq!(copy.children[1].attribute("dir").as_deref(), Some("res"));
}

#[test]
#[serial(state)]
fn attribute_values_keep_call_order() {
    let mut h = Harness::new()
        .load("target(name: 't') { ant.javac(srcdir: 's', destdir: 'd', debug: true) }");

    assert_eq!(h.run(&["t"]), 0);
    let log = h.log.borrow();
    let keys: Vec<&str> = log[0].attributes.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["srcdir", "destdir", "debug"]);
    assert_eq!(log[0].attributes.get("debug"), Some(&Value::Bool(true)));
}

#[test]
#[serial(state)]
fn unknown_nested_element_is_missing_method() {
    let mut h = Harness::knowing(&["sequential", "echo"])
        .load("target(name: 't') { sequential { echo(message: 'x'); frobnicate() } }");

    let result = h.gant.achieve("t");
    assert!(
        matches!(&result, Err(GantError::MissingMethod(name)) if name == "frobnicate"),
        "{result:?}"
    );
}

#[test]
#[serial(state)]
fn unknown_top_level_task_keeps_engine_error() {
    let mut h = Harness::knowing(&["echo"]).load("target(name: 't') { ant.jar { echo() } }");

    let result = h.gant.achieve("t");
    assert!(result.as_ref().is_err_and(GantError::is_task_not_found), "{result:?}");
}

// =============================================================================
// Builder Alias Tests
// =============================================================================

#[test]
fn ant_and_alias_are_one_builder() {
    let binding = Binding::with_builder(TaskBuilder::new(RecordingEngine::new()));

    let (Ok(Value::Builder(ant)), Ok(Value::Builder(alias))) =
        (binding.get(ANT), binding.get(ANT_ALIAS))
    else {
        panic!("both names should hold the task builder");
    };
    assert!(ant.ptr_eq(alias));
    assert!(binding.task_builder().is_some_and(|b| b.ptr_eq(ant)));
}

#[test]
#[serial(state)]
fn alias_reaches_the_same_engine() {
    let script = "target(name: 't') {
        Ant.copy(file: 'x', todir: 'y')
        ant.copy(file: 'z', todir: 'w')
    }";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["t"]), 0);
    let files: Vec<Option<String>> = h.log.borrow().iter().map(|t| t.attribute("file")).collect();
    assert_eq!(files, vec![Some("x".to_string()), Some("z".to_string())]);
}

#[test]
#[serial(state)]
fn alias_is_traced_in_dry_run() {
    let mut h = Harness::new()
        .mode(true, Verbosity::Normal)
        .load("target(name: 't') { Ant.copy(file: 'x', todir: 'y') }");

    assert_eq!(h.run(&["t"]), 0);
    assert_eq!(h.stdout(), "    [copy] file : 'x' , todir : 'y'\n");
}

// =============================================================================
// Argument Validation Tests
// =============================================================================

#[test]
#[serial(state)]
fn string_argument_is_unexpected() {
    let mut h = Harness::new().load("target(name: 't') { ant.echo('hello') }");

    assert_eq!(h.run(&["t"]), gant::EXIT_FAILURE);
    assert!(h.stdout().contains("Unexpected type of parameter to method echo"));
}

#[test]
#[serial(state)]
fn builder_invoke_rejects_non_map_from_rust() {
    let mut h = Harness::new();
    let result = h.gant.with_context(|ctx| {
        let ant = ctx.ant()?;
        ant.invoke(ctx, "copy", vec![Value::Int(3)])
    });
    assert!(matches!(result, Err(GantError::UnexpectedArgument(name)) if name == "copy"));
}
