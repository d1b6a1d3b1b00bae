use crate::asm::opcode::OpCode;
use crate::error::{VmError, VmResult};
use crate::vm::value::Value;
use crate::vm::vm::{Flow, VirtualMachine};

impl VirtualMachine {
    pub(crate) fn binary_arith(&mut self, op: OpCode, f: fn(f64, f64) -> f64) -> VmResult<Flow> {
        let (left, right) = self.pop2_numbers(op)?;
        self.stack.push(Value::Number(f(left, right)))?;
        Ok(Flow::Next)
    }

    pub(crate) fn divide(&mut self, op: OpCode) -> VmResult<Flow> {
        self.stack.top(2)?;
        let right = self.peek_number(op)?;
        if right == 0.0 {
            return Err(VmError::DivisionByZero);
        }
        self.binary_arith(op, |l, r| l / r)
    }

    pub(crate) fn unary_arith(&mut self, op: OpCode, f: fn(f64) -> f64) -> VmResult<Flow> {
        let value = self.pop_number(op)?;
        self.stack.push(Value::Number(f(value)))?;
        Ok(Flow::Next)
    }
}
