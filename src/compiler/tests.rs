use super::*;
use crate::gc::Heap;

fn compile_ok(source: &str) -> (Chunk, bool) {
    let mut chunk = Chunk::new();
    let mut heap = Heap::new();
    let mut out = Vec::new();
    let ok = {
        let mut diagnostics = Diagnostics::new(&mut out);
        let mut compiler = Compiler::new(source, &mut chunk, &mut heap, &mut diagnostics);
        compiler.compile()
    };
    (chunk, ok)
}

fn compile_errors(source: &str) -> String {
    let mut chunk = Chunk::new();
    let mut heap = Heap::new();
    let mut out = Vec::new();
    let ok = {
        let mut diagnostics = Diagnostics::new(&mut out);
        let mut compiler = Compiler::new(source, &mut chunk, &mut heap, &mut diagnostics);
        compiler.compile()
    };
    assert!(!ok, "expected a compile error for: {}", source);
    String::from_utf8(out).unwrap()
}

#[test]
fn simple_print_statement_compiles() {
    let (chunk, ok) = compile_ok("print 1 + 2;");
    assert!(ok);
    assert!(chunk.code.contains(&(OpCode::Print as u8)));
    assert_eq!(chunk.code.len(), chunk.lines.len());
}

#[test]
fn undefined_let_binding_read_in_own_initializer_errors() {
    let message = compile_errors("{ let a = a; }");
    assert!(message.contains("Can't read local let binding in its own initializer."));
}

#[test]
fn duplicate_local_in_same_scope_errors() {
    let message = compile_errors("{ let a = 1; let a = 2; }");
    assert!(message.contains("Already a let binding with this name in this scope."));
}

#[test]
fn missing_semicolon_reports_expect_semicolon() {
    let message = compile_errors("print 1");
    assert!(message.contains("Expect ';' after value."));
}

#[test]
fn two_hundred_fifty_six_locals_compile() {
    let mut source = String::from("{\n");
    for i in 0..256 {
        source.push_str(&format!("let v{} = {};\n", i, i));
    }
    source.push_str("}\n");
    let (_, ok) = compile_ok(&source);
    assert!(ok);
}

#[test]
fn two_hundred_fifty_seven_locals_error() {
    let mut source = String::from("{\n");
    for i in 0..257 {
        source.push_str(&format!("let v{} = {};\n", i, i));
    }
    source.push_str("}\n");
    let message = compile_errors(&source);
    assert!(message.contains("Too many local let bindings in function."));
}

#[test]
fn jump_distance_of_exactly_max_u16_patches_successfully() {
    let mut chunk = Chunk::new();
    let mut heap = Heap::new();
    let mut out = Vec::new();
    let offset;
    let had_error;
    {
        let mut diagnostics = Diagnostics::new(&mut out);
        let mut compiler = Compiler::new("", &mut chunk, &mut heap, &mut diagnostics);
        offset = compiler.emit_jump(OpCode::Jump);
        for _ in 0..u16::MAX {
            compiler.emit_op(OpCode::Pop);
        }
        compiler.patch_jump(offset);
        had_error = compiler.had_error;
    }

    assert!(!had_error);
    assert_eq!(chunk.read_u16(offset), u16::MAX);
}

#[test]
fn jump_distance_one_past_max_u16_errors() {
    let mut chunk = Chunk::new();
    let mut heap = Heap::new();
    let mut out = Vec::new();
    let had_error;
    {
        let mut diagnostics = Diagnostics::new(&mut out);
        let mut compiler = Compiler::new("", &mut chunk, &mut heap, &mut diagnostics);
        let offset = compiler.emit_jump(OpCode::Jump);
        for _ in 0..=u16::MAX {
            compiler.emit_op(OpCode::Pop);
        }
        compiler.patch_jump(offset);
        had_error = compiler.had_error;
    }

    assert!(had_error);
    let message = String::from_utf8(out).unwrap();
    assert!(message.contains("Too much code to jump over."));
}

#[test]
fn block_scoping_pops_locals_on_scope_exit() {
    let (chunk, ok) = compile_ok("{ let x = 1; { let x = 2; print x; } print x; }");
    assert!(ok);
    // Two locals, each entering and leaving a scope, means two Pop-on-exit
    // emissions beyond the statement-level Pops from `print` already having
    // no trailing Pop (print consumes its operand itself).
    let pop_count = chunk.code.iter().filter(|&&b| b == OpCode::Pop as u8).count();
    assert_eq!(pop_count, 2);
}

#[test]
fn if_else_compiles_with_balanced_jumps() {
    let (chunk, ok) = compile_ok("if (true) print \"t\"; else print \"f\";");
    assert!(ok);
    assert!(chunk.code.contains(&(OpCode::JumpFalse as u8)));
    assert!(chunk.code.contains(&(OpCode::Jump as u8)));
}

#[test]
fn while_loop_emits_backward_loop_op() {
    let (chunk, ok) = compile_ok("let i = 0; while (i) { i = 0; }");
    assert!(ok);
    assert!(chunk.code.contains(&(OpCode::Loop as u8)));
}

#[test]
fn for_loop_desugars_without_new_opcodes_beyond_loop() {
    let (chunk, ok) = compile_ok("for (let i = 0; i; i = i) { print i; }");
    assert!(ok);
    assert!(chunk.code.contains(&(OpCode::Loop as u8)));
}

#[test]
fn and_or_short_circuit_with_jump_false() {
    let (chunk, ok) = compile_ok("print true and false;");
    assert!(ok);
    assert!(chunk.code.contains(&(OpCode::JumpFalse as u8)));
}
