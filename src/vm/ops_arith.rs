//! # Arithmetic & Comparison Operations
//!
//! Handlers for every binary/unary arithmetic, comparison, and logical-not
//! opcode the VM dispatch loop in [`super`] can encounter. Each handler pops
//! its operands off the VM's operand stack, type-checks them, and pushes
//! exactly one [`Value`] back.
//!
//! ## Type rules (`spec.md` §4.4)
//! - `Add`, `Subtract`, `Multiply`, `Divide` require `Number` operands,
//!   except that `Add` also accepts two `String` operands and concatenates
//!   them into a newly interned string.
//! - Comparisons (`Greater`/`GreaterEqual`/`Less`/`LessEqual`) require
//!   `Number` operands and produce `Bool`.
//! - `Equal`/`NotEqual` accept any two values and use `Value`'s own
//!   equality rules; cross-tag comparisons are always `false`.
//! - `Negate` requires a `Number`; `Not` accepts anything and returns
//!   whether its operand is falsey.

use crate::chunk::Chunk;
use crate::error::RuntimeError;
use crate::value::Value;
use crate::vm::Vm;

type OpResult = Result<(), RuntimeError>;

pub(super) fn add(vm: &mut Vm, chunk: &Chunk) -> OpResult {
    let b = vm.pop();
    let a = vm.pop();
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => vm.push(Value::Number(a + b)),
        (Value::String(a), Value::String(b)) => {
            let concatenated = format!("{}{}", vm.heap().str(a), vm.heap().str(b));
            let handle = vm.intern(&concatenated, chunk);
            vm.push(Value::String(handle));
        }
        _ => return Err(RuntimeError::OperandsMustBeNumbersOrStrings),
    }
    Ok(())
}

fn numeric_binop(vm: &mut Vm, op: impl FnOnce(f64, f64) -> f64) -> OpResult {
    let b = vm.pop();
    let a = vm.pop();
    match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) => {
            vm.push(Value::Number(op(a, b)));
            Ok(())
        }
        _ => Err(RuntimeError::OperandsMustBeNumbers),
    }
}

pub(super) fn subtract(vm: &mut Vm) -> OpResult {
    numeric_binop(vm, |a, b| a - b)
}

pub(super) fn multiply(vm: &mut Vm) -> OpResult {
    numeric_binop(vm, |a, b| a * b)
}

pub(super) fn divide(vm: &mut Vm) -> OpResult {
    numeric_binop(vm, |a, b| a / b)
}

fn numeric_compare(vm: &mut Vm, op: impl FnOnce(f64, f64) -> bool) -> OpResult {
    let b = vm.pop();
    let a = vm.pop();
    match (a.as_number(), b.as_number()) {
        (Some(a), Some(b)) => {
            vm.push(Value::Bool(op(a, b)));
            Ok(())
        }
        _ => Err(RuntimeError::OperandsMustBeNumbers),
    }
}

pub(super) fn greater(vm: &mut Vm) -> OpResult {
    numeric_compare(vm, |a, b| a > b)
}

pub(super) fn greater_equal(vm: &mut Vm) -> OpResult {
    numeric_compare(vm, |a, b| a >= b)
}

pub(super) fn less(vm: &mut Vm) -> OpResult {
    numeric_compare(vm, |a, b| a < b)
}

pub(super) fn less_equal(vm: &mut Vm) -> OpResult {
    numeric_compare(vm, |a, b| a <= b)
}

pub(super) fn equal(vm: &mut Vm) -> OpResult {
    let b = vm.pop();
    let a = vm.pop();
    vm.push(Value::Bool(a == b));
    Ok(())
}

pub(super) fn not_equal(vm: &mut Vm) -> OpResult {
    let b = vm.pop();
    let a = vm.pop();
    vm.push(Value::Bool(a != b));
    Ok(())
}

pub(super) fn negate(vm: &mut Vm) -> OpResult {
    let a = vm.pop();
    match a.as_number() {
        Some(n) => {
            vm.push(Value::Number(-n));
            Ok(())
        }
        None => Err(RuntimeError::OperandMustBeNumber),
    }
}

pub(super) fn not(vm: &mut Vm) -> OpResult {
    let a = vm.pop();
    vm.push(Value::Bool(a.is_falsey()));
    Ok(())
}
