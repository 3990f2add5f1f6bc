// ABOUTME: Module loader behaviour: caching, exports, cycles, failures

use aurora_lang::error::{thrown_summary, AuroraError};
use aurora_lang::interp::Interpreter;
use aurora_lang::value::Value;
use serial_test::serial;
use std::fs;
use tempfile::TempDir;

/// Writes module fixtures into a fresh directory and makes it the working
/// directory, since specifiers resolve against the process cwd.
fn setup(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).unwrap();
    }
    std::env::set_current_dir(dir.path()).unwrap();
    dir
}

fn run(source: &str) -> Value {
    Interpreter::new()
        .run(source, "main")
        .expect("program evaluates")
}

const COUNTER_MODULE: &str = "
    let n = 0;
    fun bump() { n = n + 1; return n; }
    module.exports = { bump: bump };
";

#[test]
#[serial]
fn test_module_is_evaluated_once_and_shared() {
    let _dir = setup(&[("a.aur", COUNTER_MODULE)]);
    let source = "
        const m1 = require(\"./a.aur\");
        const m2 = require(\"./a.aur\");
        [m1.bump(), m2.bump(), m1 == m2];
    ";
    assert_eq!(
        run(source),
        Value::array(vec![Value::Number(1.0), Value::Number(2.0), Value::Bool(true)])
    );
}

#[test]
#[serial]
fn test_import_forms_match_require() {
    let _dir = setup(&[
        ("counter.aur", COUNTER_MODULE),
        ("effect.aur", "exports.loaded = true;"),
    ]);
    let source = "
        import \"./effect.aur\";
        import c from \"./counter.aur\";
        c.bump();
    ";
    assert_eq!(run(source), Value::Number(1.0));
}

#[test]
#[serial]
fn test_import_named_binding_is_const() {
    let _dir = setup(&[("m.aur", "exports.x = 1;")]);
    let source = "
        import m from \"./m.aur\";
        let out = null;
        try { m = 2; } catch (e) { out = e.message; }
        out;
    ";
    let Value::Str(message) = run(source) else {
        panic!("expected message string");
    };
    assert!(message.contains("constant 'm'"));
}

#[test]
#[serial]
fn test_exports_mutation_without_reassignment() {
    let _dir = setup(&[("m.aur", "exports.a = 1; exports.b = 2;")]);
    assert_eq!(
        run("const m = require(\"./m.aur\"); [m.a, m.b];"),
        Value::array(vec![Value::Number(1.0), Value::Number(2.0)])
    );
}

#[test]
#[serial]
fn test_module_exports_reassignment_propagates_to_cache() {
    let _dir = setup(&[("m.aur", "module.exports = {fresh: true}; exports.stale = true;")]);
    let source = "
        const first = require(\"./m.aur\");
        const second = require(\"./m.aur\");
        [first.fresh, first.stale, first == second];
    ";
    assert_eq!(
        run(source),
        Value::array(vec![Value::Bool(true), Value::Null, Value::Bool(true)])
    );
}

#[test]
#[serial]
fn test_cycle_observes_partial_exports() {
    let _dir = setup(&[
        (
            "a.aur",
            "exports.name = \"a\"; const b = require(\"./b.aur\"); exports.from_b = b.seen;",
        ),
        ("b.aur", "const a = require(\"./a.aur\"); exports.seen = a.name;"),
    ]);
    assert_eq!(
        run("const a = require(\"./a.aur\"); a.from_b;"),
        Value::str("a")
    );
}

#[test]
#[serial]
fn test_missing_module_is_catchable() {
    let _dir = setup(&[]);
    let source = "
        let out = null;
        try { require(\"./ghost.aur\"); } catch (e) { out = e.message; }
        out;
    ";
    let Value::Str(message) = run(source) else {
        panic!("expected message string");
    };
    assert!(message.contains("./ghost.aur"));
}

#[test]
#[serial]
fn test_syntax_error_in_module_is_catchable_at_require_site() {
    let _dir = setup(&[("broken.aur", "let = ;")]);
    let source = "
        let out = null;
        try { require(\"./broken.aur\"); } catch (e) { out = e.message; }
        out;
    ";
    let Value::Str(message) = run(source) else {
        panic!("expected message string");
    };
    assert!(message.contains("broken.aur"));
}

#[test]
#[serial]
fn test_failed_module_is_not_cached() {
    let dir = setup(&[("flaky.aur", "boom;")]);
    let mut interp = Interpreter::new();
    let first = interp.run("require(\"./flaky.aur\");", "main");
    assert!(matches!(first, Err(AuroraError::Uncaught { .. })));

    // Once the module is fixed, a later require re-evaluates it
    fs::write(dir.path().join("flaky.aur"), "exports.ok = true;").unwrap();
    assert_eq!(
        interp.run("require(\"./flaky.aur\").ok;", "main").unwrap(),
        Value::Bool(true)
    );
}

#[test]
#[serial]
fn test_module_scope_does_not_leak_into_main() {
    let _dir = setup(&[("m.aur", "let secret = 7; exports.ok = true;")]);
    let source = "
        require(\"./m.aur\");
        let out = null;
        try { secret; } catch (e) { out = e.message; }
        out;
    ";
    let Value::Str(message) = run(source) else {
        panic!("expected message string");
    };
    assert!(message.contains("undefined variable 'secret'"));
}

#[test]
#[serial]
fn test_module_error_reports_module_frame() {
    let _dir = setup(&[("m.aur", "fun explode() { throw \"pop\"; } exports.explode = explode;")]);
    let mut interp = Interpreter::new();
    let result = interp.run(
        "const m = require(\"./m.aur\"); m.explode();",
        "main",
    );
    let Err(AuroraError::Uncaught { value, trace }) = result else {
        panic!("expected uncaught error");
    };
    assert_eq!(thrown_summary(&value), "pop");
    assert!(trace[0].starts_with("explode"));
}
