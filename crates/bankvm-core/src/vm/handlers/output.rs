use crate::asm::instruction::{Instruction, Operand};
use crate::asm::opcode::OpCode;
use crate::error::VmResult;
use crate::io::PrintWriter;
use crate::vm::value::Value;
use crate::vm::vm::{operand, Flow, VirtualMachine};

impl VirtualMachine {
    /// Pops and prints the top value. Serves both `PRINT` and `PRINT_TOP`.
    pub(crate) fn print(&mut self, out: &mut dyn PrintWriter) -> VmResult<Flow> {
        let value = self.stack.pop()?;
        out.write_line(&value.to_string());
        Ok(Flow::Next)
    }

    /// Prints the operand itself; the stack is not touched.
    pub(crate) fn print_literal(
        &mut self,
        op: OpCode,
        instr: &Instruction,
        out: &mut dyn PrintWriter,
    ) -> VmResult<Flow> {
        match operand(op, instr, 0)? {
            Operand::Text(s) | Operand::Identifier(s) => out.write_line(s),
            Operand::Number(n) => out.write_line(&Value::Number(*n).to_string()),
        }
        Ok(Flow::Next)
    }
}
