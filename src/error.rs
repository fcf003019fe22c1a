//! # Error Taxonomy
//!
//! Kozi has two disjoint error taxonomies, per `spec.md` §7:
//!
//! - **Scan errors** ([`crate::scanner::ScanError`]) and **compile errors**
//!   (reported through [`Diagnostics`]) are both *data*: the scanner and
//!   compiler never abort, they collect errors and keep going so a single
//!   compile can report more than one problem.
//! - **Runtime errors** ([`RuntimeError`]) stop execution immediately; there
//!   is no unwinding below the top-level call into `interpret`.
//!
//! [`InterpretResult`] is the outcome of one `interpret` call and maps
//! directly to the process exit codes in `spec.md` §6: `Ok` → 0,
//! `CompileError` → 65, `RuntimeError` → 70.

use std::fmt;

/// Errors that can occur while executing bytecode. Each variant's `Display`
/// text is exactly the message `spec.md` §7 specifies.
#[derive(Clone, Debug, PartialEq)]
pub enum RuntimeError {
    OperandMustBeNumber,
    OperandsMustBeNumbers,
    OperandsMustBeNumbersOrStrings,
    UndefinedGlobal(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::OperandMustBeNumber => write!(f, "Operand must be a number."),
            RuntimeError::OperandsMustBeNumbers => write!(f, "Operands must be numbers."),
            RuntimeError::OperandsMustBeNumbersOrStrings => {
                write!(f, "Operands must be numbers or strings.")
            }
            RuntimeError::UndefinedGlobal(name) => {
                write!(f, "Undefined let binding '{}'.", name)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// The outcome of one `interpret` call, carrying enough information for the
/// CLI to choose an exit code without re-deriving it from a `Result`.
#[derive(Debug, PartialEq)]
pub enum InterpretResult {
    Ok,
    CompileError,
    RuntimeError(RuntimeError),
}

impl InterpretResult {
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpretResult::Ok => 0,
            InterpretResult::CompileError => 65,
            InterpretResult::RuntimeError(_) => 70,
        }
    }
}

/// A sink for compiler/runtime diagnostics, threaded explicitly through
/// [`crate::compiler::Compiler`] and [`crate::vm::Vm`] rather than written to
/// a process-wide global (`spec.md` §9's design note: "a clean
/// re-architecture threads an output handle through `VM` and `Compiler`
/// constructors; tests can then substitute an in-memory sink").
pub struct Diagnostics<'a> {
    out: &'a mut dyn std::io::Write,
}

impl<'a> Diagnostics<'a> {
    pub fn new(out: &'a mut dyn std::io::Write) -> Self {
        Diagnostics { out }
    }

    /// Report a compile-time error: `[line L:C] Error: <message>`.
    pub fn report_compile_error(&mut self, line: u32, column: u32, message: &str) {
        let _ = writeln!(self.out, "[line {}:{}] Error: {}", line, column, message);
    }

    /// Report a runtime error: `<message>\n[line L] in script\n`.
    pub fn report_runtime_error(&mut self, message: &str, line: u32) {
        let _ = writeln!(self.out, "{}", message);
        let _ = writeln!(self.out, "[line {}] in script", line);
    }
}
