use crate::asm::opcode::OpCode;
use crate::error::VmResult;
use crate::vm::value::Value;
use crate::vm::vm::{Flow, VirtualMachine};

impl VirtualMachine {
    /// Pushes 1 when `f(left, right)` holds, 0 otherwise
    pub(crate) fn compare(&mut self, op: OpCode, f: fn(f64, f64) -> bool) -> VmResult<Flow> {
        let (left, right) = self.pop2_numbers(op)?;
        let result = if f(left, right) { 1.0 } else { 0.0 };
        self.stack.push(Value::Number(result))?;
        Ok(Flow::Next)
    }
}
