//! # Global-Variable Operations
//!
//! Handlers for `DefineGlobal`, `GetGlobal`, and `SetGlobal`, the three ops
//! whose operand is a 16-bit constant-pool index naming the binding rather
//! than a literal value (`spec.md` §4.2). `Jump`/`JumpFalse`/`Loop` and
//! `GetLocal`/`SetLocal` are simple enough to stay inline in
//! [`super::Vm::run`]'s dispatch loop; these three need the constant pool
//! and the globals table together, so they get their own handlers here.

use crate::chunk::Chunk;
use crate::error::RuntimeError;
use crate::gc::StringHandle;
use crate::vm::Vm;

type OpResult = Result<(), RuntimeError>;

fn name_handle(chunk: &Chunk, ip: &mut usize) -> StringHandle {
    let idx = chunk.read_u16(*ip);
    *ip += 2;
    chunk.constants[idx as usize]
        .as_string_handle()
        .expect("DefineGlobal/GetGlobal/SetGlobal operand must be a string constant")
}

/// Bind the top-of-stack value to the name at the constant-pool index
/// encoded in the next two bytes. Peek-bind-then-pop (`SPEC_FULL.md` §9's
/// resolution of the spec's open question on pop ordering).
pub(super) fn define_global(vm: &mut Vm, chunk: &Chunk, ip: &mut usize) -> OpResult {
    let handle = name_handle(chunk, ip);
    let value = vm.peek(0);
    vm.globals_mut().insert(handle, value);
    vm.pop();
    Ok(())
}

pub(super) fn get_global(vm: &mut Vm, chunk: &Chunk, ip: &mut usize) -> OpResult {
    let handle = name_handle(chunk, ip);
    match vm.globals().get(&handle).copied() {
        Some(value) => {
            vm.push(value);
            Ok(())
        }
        None => Err(RuntimeError::UndefinedGlobal(
            vm.heap().str(handle).to_string(),
        )),
    }
}

pub(super) fn set_global(vm: &mut Vm, chunk: &Chunk, ip: &mut usize) -> OpResult {
    let handle = name_handle(chunk, ip);
    if !vm.globals().contains_key(&handle) {
        return Err(RuntimeError::UndefinedGlobal(
            vm.heap().str(handle).to_string(),
        ));
    }
    let value = vm.peek(0);
    vm.globals_mut().insert(handle, value);
    Ok(())
}
