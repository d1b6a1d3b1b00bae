//! Opcode handlers
//!
//! One file per opcode family, each an `impl VirtualMachine` block.
//! Handlers validate operands and stack contents before mutating anything,
//! so a failing instruction leaves the state as it found it.

mod arithmetic;
mod banking;
mod comparison;
mod control;
mod output;
mod sensors;
mod stack_ops;

use crate::asm::opcode::OpCode;
use crate::error::{VmError, VmResult};

use super::value::Value;
use super::vm::VirtualMachine;

fn number(op: OpCode, value: &Value) -> VmResult<f64> {
    value.as_number().ok_or(VmError::TypeMismatch {
        opcode: op.mnemonic(),
    })
}

impl VirtualMachine {
    /// Top of stack as a number, left in place
    fn peek_number(&self, op: OpCode) -> VmResult<f64> {
        number(op, self.stack.peek()?)
    }

    fn pop_number(&mut self, op: OpCode) -> VmResult<f64> {
        let n = self.peek_number(op)?;
        self.stack.pop()?;
        Ok(n)
    }

    /// Pop `(left, right)` numbers; nothing is popped on failure
    fn pop2_numbers(&mut self, op: OpCode) -> VmResult<(f64, f64)> {
        let top = self.stack.top(2)?;
        let left = number(op, &top[0])?;
        let right = number(op, &top[1])?;
        self.stack.pop2()?;
        Ok((left, right))
    }
}
