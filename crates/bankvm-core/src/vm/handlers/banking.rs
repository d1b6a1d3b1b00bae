use crate::asm::instruction::Instruction;
use crate::asm::opcode::OpCode;
use crate::error::VmResult;
use crate::vm::vm::{name_operand, Flow, VirtualMachine};

impl VirtualMachine {
    /// Creates the account, or resets an existing one to zero.
    pub(crate) fn account_init(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let name = name_operand(op, instr, 0)?;
        self.accounts.init(name);
        Ok(Flow::Next)
    }

    pub(crate) fn deposit(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let name = name_operand(op, instr, 0)?;
        let amount = self.peek_number(op)?;
        self.accounts.require(name)?;
        self.stack.pop()?;
        *self.accounts.balance_mut(name)? += amount;
        Ok(Flow::Next)
    }

    /// Balances may go negative; there is no overdraft check.
    pub(crate) fn withdraw(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let name = name_operand(op, instr, 0)?;
        let amount = self.peek_number(op)?;
        self.accounts.require(name)?;
        self.stack.pop()?;
        *self.accounts.balance_mut(name)? -= amount;
        Ok(Flow::Next)
    }

    pub(crate) fn transfer(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let source = name_operand(op, instr, 0)?;
        let destination = name_operand(op, instr, 1)?;
        let amount = self.peek_number(op)?;
        self.accounts.require(source)?;
        self.accounts.require(destination)?;
        self.stack.pop()?;
        *self.accounts.balance_mut(source)? -= amount;
        *self.accounts.balance_mut(destination)? += amount;
        Ok(Flow::Next)
    }

    /// balance *= 1 + rate, with the rate taken from the stack
    pub(crate) fn apply_interest(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let name = name_operand(op, instr, 0)?;
        let rate = self.peek_number(op)?;
        self.accounts.require(name)?;
        self.stack.pop()?;
        let balance = self.accounts.balance_mut(name)?;
        *balance += *balance * rate;
        Ok(Flow::Next)
    }
}
