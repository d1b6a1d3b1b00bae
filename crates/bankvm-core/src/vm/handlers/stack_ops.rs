use crate::asm::instruction::{Instruction, Operand};
use crate::asm::opcode::OpCode;
use crate::error::{VmError, VmResult};
use crate::vm::value::Value;
use crate::vm::vm::{name_operand, operand, Flow, VirtualMachine};

impl VirtualMachine {
    pub(crate) fn push_const(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let n = match operand(op, instr, 0)? {
            Operand::Number(n) => *n,
            Operand::Text(s) => s.trim().parse().map_err(|_| VmError::InvalidOperand {
                opcode: op.mnemonic(),
                expected: "a numeric",
            })?,
            Operand::Identifier(_) => {
                return Err(VmError::InvalidOperand {
                    opcode: op.mnemonic(),
                    expected: "a numeric",
                })
            }
        };
        self.stack.push(Value::Number(n))?;
        Ok(Flow::Next)
    }

    pub(crate) fn push_str(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let value = match operand(op, instr, 0)? {
            Operand::Text(s) | Operand::Identifier(s) => Value::Text(s.clone()),
            Operand::Number(n) => Value::Number(*n),
        };
        self.stack.push(value)?;
        Ok(Flow::Next)
    }

    /// Accounts shadow variables of the same name.
    pub(crate) fn load(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let name = name_operand(op, instr, 0)?;
        let value = match self.accounts.balance(name) {
            Some(balance) => Value::Number(balance),
            None => self
                .variables
                .load(name)
                .cloned()
                .ok_or_else(|| VmError::UndefinedName(name.to_string()))?,
        };
        self.stack.push(value)?;
        Ok(Flow::Next)
    }

    /// Writes an account balance when `name` is an account, a variable otherwise.
    pub(crate) fn store(&mut self, op: OpCode, instr: &Instruction) -> VmResult<Flow> {
        let name = name_operand(op, instr, 0)?;
        if self.accounts.contains(name) {
            let amount = self.pop_number(op)?;
            *self.accounts.balance_mut(name)? = amount;
        } else {
            let value = self.stack.pop()?;
            self.variables.store(name, value);
        }
        Ok(Flow::Next)
    }
}
