// ABOUTME: End-to-end language semantics through the full lex/parse/eval pipeline

use aurora_lang::error::{thrown_summary, AuroraError};
use aurora_lang::interp::Interpreter;
use aurora_lang::value::Value;

/// Evaluates a program and returns the value of its last statement.
fn run(source: &str) -> Value {
    Interpreter::new()
        .run(source, "test")
        .expect("program evaluates")
}

fn run_err(source: &str) -> Value {
    match Interpreter::new().run(source, "test") {
        Err(AuroraError::Uncaught { value, .. }) => value,
        other => panic!("expected uncaught error, got {:?}", other),
    }
}

fn numbers(values: &[f64]) -> Value {
    Value::array(values.iter().copied().map(Value::Number).collect())
}

#[test]
fn test_arithmetic_and_precedence() {
    assert_eq!(run("1 + 2 * 3 ** 2;"), Value::Number(19.0));
    assert_eq!(run("(1 + 2) * 3;"), Value::Number(9.0));
    assert_eq!(run("10 % 4 + 2 ** 3 ** 1;"), Value::Number(10.0));
    assert_eq!(run("-2 ** 2;"), Value::Number(4.0)); // unary binds tighter
}

#[test]
fn test_closure_shares_binding_with_const_reference() {
    let source = "
        fun mk() {
            let n = 0;
            return fun() { n = n + 1; return n; };
        }
        const c = mk();
        [c(), c(), c()];
    ";
    assert_eq!(run(source), numbers(&[1.0, 2.0, 3.0]));
}

#[test]
fn test_two_closures_from_one_scope_share_the_cell() {
    let source = "
        fun pair() {
            let n = 0;
            return {
                bump: fun() { n = n + 1; return n; },
                read: fun() { return n; }
            };
        }
        const p = pair();
        p.bump(); p.bump();
        p.read();
    ";
    assert_eq!(run(source), Value::Number(2.0));
}

#[test]
fn test_class_constructor_method_and_this() {
    let source = "
        class P {
            constructor(x) { this.x = x; }
            get() { return this.x; }
            add(d) { this.x = this.x + d; return this; }
        }
        let p = new P(42);
        p.add(8);
        p.get();
    ";
    assert_eq!(run(source), Value::Number(50.0));
}

#[test]
fn test_instances_are_records_operationally() {
    let source = "
        class P { constructor() { this.x = 1; } get() { return this.x; } }
        let p = new P();
        [type(p), len(keys(p))];
    ";
    assert_eq!(
        run(source),
        Value::array(vec![Value::str("record"), Value::Number(3.0)])
    );
}

#[test]
fn test_try_catches_runtime_error_scenario() {
    let source = "
        let out = null;
        try { let a = undef; } catch (e) { out = \"caught\"; }
        out;
    ";
    assert_eq!(run(source), Value::str("caught"));
}

#[test]
fn test_user_throw_value_passes_through_unchanged() {
    let source = "
        let out = null;
        try { throw {code: 404}; } catch (e) { out = e.code; }
        out;
    ";
    assert_eq!(run(source), Value::Number(404.0));
}

#[test]
fn test_nested_try_rethrow() {
    let source = "
        let out = [];
        try {
            try { throw \"inner\"; } catch (e) { push(out, e); throw \"outer\"; }
        } catch (e) { push(out, e); }
        out;
    ";
    assert_eq!(
        run(source),
        Value::array(vec![Value::str("inner"), Value::str("outer")])
    );
}

#[test]
fn test_structural_equality_scenarios() {
    let source = "
        [[1,2,3] == [1,2,3], {a:1, b:2} == {b:2, a:1}, [1,2] == [1,2,3]];
    ";
    assert_eq!(
        run(source),
        Value::array(vec![Value::Bool(true), Value::Bool(true), Value::Bool(false)])
    );
}

#[test]
fn test_equality_on_nested_containers() {
    assert_eq!(
        run("{a: [1, {b: 2}]} == {a: [1, {b: 2}]};"),
        Value::Bool(true)
    );
    assert_eq!(run("{a: [1]} == {a: [2]};"), Value::Bool(false));
}

#[test]
fn test_functions_compare_by_identity() {
    assert_eq!(
        run("fun f() { } let g = f; f == g;"),
        Value::Bool(true)
    );
    assert_eq!(
        run("let a = fun() { }; let b = fun() { }; a == b;"),
        Value::Bool(false)
    );
}

#[test]
fn test_truthiness_table() {
    let source = "[!null, !false, !0, !\"\", ![], !{}];";
    assert_eq!(
        run(source),
        Value::array(vec![
            Value::Bool(true),
            Value::Bool(true),
            Value::Bool(false),
            Value::Bool(false),
            Value::Bool(false),
            Value::Bool(false),
        ])
    );
}

#[test]
fn test_logical_operators_yield_operands() {
    assert_eq!(run("null || \"fallback\";"), Value::str("fallback"));
    assert_eq!(run("\"first\" || \"second\";"), Value::str("first"));
    assert_eq!(run("0 || \"unused\";"), Value::Number(0.0)); // zero is truthy
    assert_eq!(run("false && ignored;"), Value::Bool(false));
}

#[test]
fn test_string_comparison_is_lexicographic() {
    assert_eq!(run("\"apple\" < \"banana\";"), Value::Bool(true));
    assert_eq!(run("\"b\" >= \"ab\";"), Value::Bool(true));
}

#[test]
fn test_string_concatenation_rules() {
    assert_eq!(run("\"a\" + \"b\";"), Value::str("ab"));
    assert_eq!(run("\"n=\" + 1.5;"), Value::str("n=1.5"));
    assert_eq!(run("\"v=\" + [1, 2];"), Value::str("v=[1, 2]"));
    let err = run_err("{} + 1;");
    assert!(thrown_summary(&err).contains("unsupported operand types"));
}

#[test]
fn test_for_loop_with_own_scope() {
    let source = "
        let total = 0;
        for (let i = 0; i < 5; i = i + 1) { total = total + i; }
        total;
    ";
    assert_eq!(run(source), Value::Number(10.0));
    // the loop variable does not leak
    let err = run_err("for (let i = 0; i < 1; i = i + 1) { } i;");
    assert!(thrown_summary(&err).contains("undefined variable 'i'"));
}

#[test]
fn test_import_of_unknown_host_module_throws() {
    let err = run_err("import x from \"nope\";");
    assert!(thrown_summary(&err).contains("unknown host module 'nope'"));
}

#[test]
fn test_shadowing_across_function_and_block_scopes() {
    let source = "
        let x = \"outer\";
        fun f() { let x = \"inner\"; return x; }
        [f(), x];
    ";
    assert_eq!(
        run(source),
        Value::array(vec![Value::str("inner"), Value::str("outer")])
    );
}

#[test]
fn test_module_exports_are_aliased_not_copied() {
    let source = "
        let shared = [1];
        fun grab() { return shared; }
        let a = grab();
        push(a, 2);
        shared;
    ";
    assert_eq!(run(source), numbers(&[1.0, 2.0]));
}

#[test]
fn test_error_record_carries_position() {
    let err = run_err("let ok = 1;\nconst c = 2;\nc = 3;");
    let Value::Record(slots) = err else {
        panic!("expected error record");
    };
    let slots = slots.borrow();
    assert_eq!(slots.get("line"), Some(&Value::Number(3.0)));
    assert!(matches!(slots.get("message"), Some(Value::Str(m)) if m.contains("constant 'c'")));
}

#[test]
fn test_determinism_across_runs() {
    let source = "
        let acc = [];
        for (let i = 0; i < 4; i = i + 1) { push(acc, i * i); }
        join(acc, \",\");
    ";
    assert_eq!(run(source), run(source));
    assert_eq!(run(source), Value::str("0,1,4,9"));
}
