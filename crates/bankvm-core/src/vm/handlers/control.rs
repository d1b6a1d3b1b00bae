use crate::asm::instruction::Instruction;
use crate::asm::opcode::OpCode;
use crate::error::VmResult;
use crate::vm::vm::{name_operand, Flow, VirtualMachine};

impl VirtualMachine {
    /// Labels are resolved here, when the jump executes, not at load time.
    pub(crate) fn jump(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let label = name_operand(op, instr, 0)?;
        Ok(Flow::Jump(self.resolve_label(label)?))
    }

    /// Pops the condition; jumps when it is non-zero (`when` = true) or zero
    /// (`when` = false).
    pub(crate) fn jump_if(&mut self, op: OpCode, instr: &Instruction, when: bool) -> VmResult<Flow> {
        let condition = self.peek_number(op)? != 0.0;
        let flow = if condition == when {
            let label = name_operand(op, instr, 0)?;
            Flow::Jump(self.resolve_label(label)?)
        } else {
            Flow::Next
        };
        self.stack.pop()?;
        Ok(flow)
    }
}
