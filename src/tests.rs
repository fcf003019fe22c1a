//! End-to-end scenarios, verbatim from `spec.md` §8.

use super::*;

fn run_source(source: &str) -> (InterpretResult, String) {
    let mut chunk = Chunk::new();
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let result = {
        let mut vm = Vm::new(&mut out);
        interpret(source, &mut chunk, &mut vm, &mut diag)
    };
    (result, String::from_utf8(out).unwrap())
}

fn run_source_diag(source: &str) -> (InterpretResult, String) {
    let mut chunk = Chunk::new();
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let result = {
        let mut vm = Vm::new(&mut out);
        interpret(source, &mut chunk, &mut vm, &mut diag)
    };
    (result, String::from_utf8(diag).unwrap())
}

#[test]
fn scenario_add_numbers() {
    let (result, output) = run_source("print 1 + 2;");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "3\n");
}

#[test]
fn scenario_concatenate_strings() {
    let (result, output) = run_source(r#"print "foo" + "bar";"#);
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "foobar\n");
}

#[test]
fn scenario_globals_arithmetic() {
    let (result, output) = run_source("let a = 10; let b = 20; print a + b;");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "30\n");
}

#[test]
fn scenario_nested_block_scoping() {
    let (result, output) = run_source("{ let x = 1; { let x = 2; print x; } print x; }");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "2\n1\n");
}

#[test]
fn scenario_if_else() {
    let (result, output) = run_source(r#"if (true) print "t"; else print "f";"#);
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "t\n");
}

#[test]
fn scenario_truthiness_of_nil_and_zero() {
    let (result, output) = run_source("print !nil;");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "true\n");

    let (result, output) = run_source("print !0;");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "false\n");
}

#[test]
fn scenario_add_number_and_string_is_runtime_error() {
    let (result, diag) = run_source_diag(r#"print 1 + "x";"#);
    assert_eq!(result.exit_code(), 70);
    assert!(diag.contains("Operands must be numbers or strings."));
}

#[test]
fn scenario_undefined_global_read_is_runtime_error() {
    let (result, diag) = run_source_diag("print a;");
    assert_eq!(result.exit_code(), 70);
    assert!(diag.contains("Undefined let binding 'a'."));
}

#[test]
fn scenario_read_local_in_own_initializer_is_compile_error() {
    let (result, diag) = run_source_diag("{ let a = a; }");
    assert_eq!(result.exit_code(), 65);
    assert!(diag.contains("Can't read local let binding in its own initializer."));
}

#[test]
fn division_by_zero_yields_infinity_not_a_runtime_error() {
    let (result, output) = run_source("print 1 / 0;");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "Infinity\n");
}

#[test]
fn while_loop_accumulates() {
    let (result, output) = run_source(
        "let i = 0; let sum = 0; while (i < 5) { sum = sum + i; i = i + 1; } print sum;",
    );
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "10\n");
}

#[test]
fn for_loop_prints_range() {
    let (result, output) =
        run_source("for (let i = 0; i < 3; i = i + 1) { print i; }");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "0\n1\n2\n");
}

#[test]
fn and_or_short_circuit_values() {
    let (result, output) = run_source(r#"print false and 1; print true or 1; print 1 and 2;"#);
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(output, "false\ntrue\n2\n");
}

#[test]
fn repl_style_reuse_preserves_globals_across_interpret_calls() {
    let mut chunk = Chunk::new();
    let mut out = Vec::new();
    let mut diag = Vec::new();
    let mut vm = Vm::new(&mut out);

    let r1 = interpret("let counter = 1;", &mut chunk, &mut vm, &mut diag);
    assert_eq!(r1, InterpretResult::Ok);

    let r2 = interpret("print counter;", &mut chunk, &mut vm, &mut diag);
    assert_eq!(r2, InterpretResult::Ok);
    drop(vm);
    assert_eq!(String::from_utf8(out).unwrap(), "1\n");
}
