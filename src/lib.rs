//! # Kozi
//!
//! A single-pass bytecode scripting language: source text → tokens →
//! bytecode → stack-machine execution, with a tracing garbage collector
//! underneath. See each module's doc comment for the corresponding
//! subsystem; [`interpret`] wires them together the way the CLI and REPL
//! front ends both expect.

pub mod chunk;
pub mod cli;
pub mod compiler;
pub mod error;
pub mod gc;
pub mod repl;
pub mod scanner;
pub mod token;
pub mod value;
pub mod vm;

use std::io::Write;

use chunk::Chunk;
use compiler::Compiler;
use error::{Diagnostics, InterpretResult};
use vm::Vm;

/// Compile `source` into `chunk` and, on success, run it on `vm`.
///
/// Resets `chunk`'s bytecode (keeping its constant pool, so a REPL session
/// can keep accumulating constants across lines) and `vm`'s operand stack
/// before compiling, matching `spec.md` §2's control-flow description.
/// Diagnostics for both compile and runtime errors are written to `diag_out`.
pub fn interpret(
    source: &str,
    chunk: &mut Chunk,
    vm: &mut Vm,
    diag_out: &mut dyn Write,
) -> InterpretResult {
    chunk.reset_code();
    vm.reset_stack();

    let mut diagnostics = Diagnostics::new(diag_out);
    let ok = {
        let mut compiler = Compiler::new(source, chunk, vm.heap_mut(), &mut diagnostics);
        compiler.compile()
    };
    if !ok {
        return InterpretResult::CompileError;
    }

    vm.run(chunk, &mut diagnostics)
}

#[cfg(test)]
mod tests;
