//! Tests for the target resolver
//!
//! `depends` ordering and deduplication, cycles, the task fallback, and
//! error propagation out of target bodies.

use std::cell::RefCell;
use std::rc::Rc;

use gant::{Dependency, GantError, Value};
use serial_test::serial;

use crate::common::Harness;

// =============================================================================
// Depends Tests
// =============================================================================

#[test]
#[serial(state)]
fn depends_runs_left_to_right_depth_first() {
    let script = "
        target(name: 'a') { depends('b', 'c'); println 'A' }
        target(name: 'b') { depends('d'); println 'B' }
        target(name: 'c') { println 'C' }
        target(name: 'd') { println 'D' }
    ";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["a"]), 0);
    assert_eq!(h.stdout(), "D\nB\nC\nA\n");
}

#[test]
#[serial(state)]
fn shared_dependency_runs_once() {
    let script = "
        target(name: 'a') { depends(['b', 'c']); println 'A' }
        target(name: 'b') { depends('c'); println 'B' }
        target(name: 'c') { println 'C' }
    ";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["a"]), 0);
    assert_eq!(h.stdout(), "C\nB\nA\n");
}

#[test]
#[serial(state)]
fn depends_accepts_bodies_and_nested_lists() {
    let script = "
        init = target(name: 'init') { println 'init' }
        target(name: 'all') { depends(init, [['init', 'other']]) }
        target(name: 'other') { println 'other' }
    ";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["all"]), 0);
    assert_eq!(h.stdout(), "init\nother\n");
}

#[test]
#[serial(state)]
fn cycle_terminates_at_first_back_edge() {
    let script = "
        target(name: 'a') { depends('b'); println 'A' }
        target(name: 'b') { depends('a'); println 'B' }
    ";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["a"]), 0);
    assert_eq!(h.stdout(), "B\nA\n");
}

#[test]
#[serial(state)]
fn self_dependency_is_a_no_op() {
    let mut h = Harness::new().load("target(name: 'a') { depends('a'); println 'A' }");

    assert_eq!(h.run(&["a"]), 0);
    assert_eq!(h.stdout(), "A\n");
}

#[test]
#[serial(state)]
fn unknown_dependency_name_fails() {
    let mut h = Harness::new().load("target(name: 'a') { depends('ghost'); println 'A' }");

    assert_eq!(h.run(&["a"]), gant::EXIT_FAILURE);
    let out = h.stdout();
    assert!(out.contains("depends called with an argument (ghost)"), "{out}");
    assert!(!out.contains('A'));
}

#[test]
#[serial(state)]
fn non_target_dependency_value_fails() {
    let mut h = Harness::new().load("target(name: 'a') { depends(42) }");

    assert_eq!(h.run(&["a"]), gant::EXIT_FAILURE);
    assert!(h.stdout().contains("(42)"));
}

#[test]
#[serial(state)]
fn list_items_before_an_invalid_one_still_run() {
    let script = "
        target(name: 'b') { println 'B' }
        target(name: 'a') { depends(['b', 42]); println 'A' }
    ";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["a"]), gant::EXIT_FAILURE);
    let out = h.stdout();
    assert!(out.starts_with("B\n"), "{out}");
    assert!(out.contains("depends called with an argument (42)"), "{out}");
    assert!(!out.contains("A\n"), "{out}");
}

#[test]
#[serial(state)]
fn depends_returns_last_non_nil_result() {
    let mut h = Harness::new();
    h.gant.add_target("one", "", |_| Ok(Value::from("first")));
    h.gant.add_target("two", "", |_| Ok(Value::Nil));
    let result = h.gant.with_context(|ctx| ctx.depends(["one", "two"]));
    assert_eq!(result.unwrap(), Value::from("first"));
}

#[test]
#[serial(state)]
fn rust_targets_depend_with_tagged_variants() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let mut h = Harness::new();

    let seen = Rc::clone(&order);
    let compile = h.gant.add_target("compile", "Compile", move |_| {
        seen.borrow_mut().push("compile");
        Ok(Value::Nil)
    });
    let seen = Rc::clone(&order);
    h.gant.add_target("test", "Test", move |ctx| {
        ctx.depends([Dependency::ByBody(compile.clone()), Dependency::from("compile")])?;
        seen.borrow_mut().push("test");
        Ok(Value::Nil)
    });

    assert_eq!(h.run(&["test"]), 0);
    assert_eq!(*order.borrow(), vec!["compile", "test"]);
}

// =============================================================================
// Call-by-name Tests
// =============================================================================

#[test]
#[serial(state)]
fn target_called_by_name_is_not_rerun_by_depends() {
    let script = "
        target(name: 'init') { println 'init' }
        target(name: 'a') { init(); depends('init'); println 'A' }
    ";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["a"]), 0);
    assert_eq!(h.stdout(), "init\nA\n");
}

#[test]
#[serial(state)]
fn failed_target_is_not_retried() {
    let script = "
        target(name: 'broken') { println 'trying'; ant.fail(message: 'boom') }
        target(name: 'a') { depends('broken') }
    ";
    let mut h = Harness::new().load(script);

    assert_eq!(h.run(&["broken"]), gant::EXIT_FAILURE);
    assert_eq!(h.run(&["a"]), 0);
    assert_eq!(h.stdout().matches("trying").count(), 1);
}

// =============================================================================
// Fallback Tests
// =============================================================================

#[test]
#[serial(state)]
fn unknown_name_forwards_to_task_engine() {
    let mut h = Harness::new().load("target(name: 't') { javac(srcdir: 'src') }");

    assert_eq!(h.run(&["t"]), 0);
    assert_eq!(h.task_names(), vec!["javac"]);
}

#[test]
#[serial(state)]
fn name_unknown_everywhere_is_missing_method() {
    let mut h = Harness::knowing(&["echo"]).load("target(name: 't') { frobnicate(x: 1) }");

    let result = h.gant.achieve("t");
    assert!(
        matches!(&result, Err(GantError::MissingMethod(name)) if name == "frobnicate"),
        "{result:?}"
    );
}

#[test]
#[serial(state)]
fn task_failure_propagates_unchanged() {
    let mut h = Harness::new().load("target(name: 't') { fail(message: 'x'); println 'after' }");

    let result = h.gant.achieve("t");
    assert!(matches!(result, Err(GantError::Task(ref e)) if !e.is_not_found()), "{result:?}");
    assert!(!h.stdout().contains("after"));
}

#[test]
#[serial(state)]
fn qualified_unknown_task_keeps_engine_error() {
    let mut h = Harness::knowing(&[]).load("target(name: 't') { ant.frobnicate(x: 1) }");

    let result = h.gant.achieve("t");
    assert!(result.as_ref().is_err_and(GantError::is_task_not_found), "{result:?}");
}

#[test]
#[serial(state)]
fn builtin_calls_do_not_reach_engine() {
    let mut h = Harness::new().load("target(name: 't') { print 'a', 'b'; println() }");

    assert_eq!(h.run(&["t"]), 0);
    assert_eq!(h.stdout(), "a b\n");
    assert!(h.task_names().is_empty());
}
