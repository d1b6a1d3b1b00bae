//! Virtual Machine Core
//!
//! Defines the BankVM structure and its fetch-decode-execute loop.
//! Opcode semantics live in the `handlers` modules; this file only fetches,
//! dispatches and moves the program counter.

use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

use log::{debug, trace};
use serde::Serialize;

use crate::asm::instruction::{Instruction, Operand};
use crate::asm::opcode::OpCode;
use crate::config::VmConfig;
use crate::error::{VmError, VmResult};
use crate::io::{PrintWriter, StdPrint};
use crate::loader::{LabelTable, Program};

use super::memory::{Accounts, Variables};
use super::stack::Stack;
use super::value::Value;

/// What the engine does with the program counter after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Next,
    Jump(usize),
    Halt,
}

/// Serializable view of the execution state after (or during) a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub pc: usize,
    pub steps: u64,
    pub halted: bool,
    pub stack: Vec<Value>,
    pub accounts: BTreeMap<String, f64>,
    pub variables: BTreeMap<String, Value>,
}

/// BankVM Virtual Machine
#[derive(Debug)]
pub struct VirtualMachine {
    pub(crate) config: VmConfig,
    program: Rc<Program>,

    pub(crate) stack: Stack,
    pub(crate) accounts: Accounts,
    pub(crate) variables: Variables,

    pc: usize,
    steps: u64,
    halted: bool,
    pub(crate) started_at: Instant,
}

impl VirtualMachine {
    /// Create a new VM instance over a loaded program
    pub fn new(config: VmConfig, program: Program) -> Self {
        VirtualMachine {
            stack: Stack::new(config.max_stack_size),
            accounts: Accounts::new(),
            variables: Variables::new(),
            program: Rc::new(program),
            pc: 0,
            steps: 0,
            halted: false,
            started_at: Instant::now(),
            config,
        }
    }

    /// Execute the program, printing to stdout
    pub fn run(&mut self) -> VmResult<()> {
        self.run_with_writer(&mut StdPrint)
    }

    /// Execute until `HALT`, the end of the program, or the first error.
    ///
    /// The counter and elapsed-time origin are reset; the stack and the
    /// account and variable tables keep whatever a previous run left.
    pub fn run_with_writer(&mut self, out: &mut impl PrintWriter) -> VmResult<()> {
        self.pc = 0;
        self.steps = 0;
        self.halted = false;
        self.started_at = Instant::now();

        let program = Rc::clone(&self.program);
        debug!("run start: {} instructions", program.len());

        while !self.halted && self.pc < program.instructions.len() {
            let instr = &program.instructions[self.pc];
            trace!("pc={} {} | stack: {:?}", self.pc, instr, self.stack.as_slice());

            let flow = self
                .step(instr, &mut *out)
                .map_err(|e| e.at(self.pc, instr.line))?;
            self.steps += 1;

            match flow {
                Flow::Next => self.pc += 1,
                Flow::Jump(target) => self.pc = target,
                Flow::Halt => {
                    self.halted = true;
                    self.pc += 1;
                }
            }
        }

        debug!(
            "run end: {} steps, halted={}, stack={:?}",
            self.steps,
            self.halted,
            self.stack.as_slice()
        );
        debug!("accounts: {:?}", self.accounts.as_map());
        debug!("variables: {:?}", self.variables.as_map());
        Ok(())
    }

    /// Decode and dispatch a single instruction
    fn step(&mut self, instr: &Instruction, out: &mut dyn PrintWriter) -> VmResult<Flow> {
        let op = instr.opcode.ok_or_else(|| VmError::UnknownInstruction {
            index: self.pc,
            mnemonic: instr.mnemonic.clone(),
        })?;

        match op {
            // Stack
            OpCode::PushConst => self.push_const(op, instr),
            OpCode::PushStr => self.push_str(op, instr),
            OpCode::Load => self.load(op, instr),
            OpCode::Store => self.store(op, instr),

            // Arithmetic
            OpCode::Add => self.binary_arith(op, |l, r| l + r),
            OpCode::Sub => self.binary_arith(op, |l, r| l - r),
            OpCode::Mul => self.binary_arith(op, |l, r| l * r),
            OpCode::Div => self.divide(op),
            OpCode::Mod => self.binary_arith(op, floored_rem),
            OpCode::Neg => self.unary_arith(op, |v| -v),
            OpCode::Not => self.unary_arith(op, |v| if v == 0.0 { 1.0 } else { 0.0 }),

            // Comparison
            OpCode::CmpEq => self.compare(op, |l, r| l == r),
            OpCode::CmpNe => self.compare(op, |l, r| l != r),
            OpCode::CmpLt => self.compare(op, |l, r| l < r),
            OpCode::CmpLe => self.compare(op, |l, r| l <= r),
            OpCode::CmpGt => self.compare(op, |l, r| l > r),
            OpCode::CmpGe => self.compare(op, |l, r| l >= r),

            // Control flow
            OpCode::Jmp => self.jump(op, instr),
            OpCode::JmpIfTrue => self.jump_if(op, instr, true),
            OpCode::JmpIfFalse => self.jump_if(op, instr, false),
            OpCode::Halt => Ok(Flow::Halt),
            OpCode::Nop => Ok(Flow::Next),

            // Banking
            OpCode::AccountInit => self.account_init(op, instr),
            OpCode::Deposit => self.deposit(op, instr),
            OpCode::Withdraw => self.withdraw(op, instr),
            OpCode::Transfer => self.transfer(op, instr),
            OpCode::ApplyInterest => self.apply_interest(op, instr),

            // Sensors
            OpCode::SensorTempo => self.sensor_tempo(),
            OpCode::SensorJuros => self.sensor_juros(),

            // I/O
            OpCode::Print | OpCode::PrintTop => self.print(out),
            OpCode::PrintStrLiteral => self.print_literal(op, instr, out),
        }
    }

    /// Resolve a label to its instruction index
    pub(crate) fn resolve_label(&self, name: &str) -> VmResult<usize> {
        self.program
            .labels
            .resolve(name)
            .ok_or_else(|| VmError::UndefinedLabel(name.to_string()))
    }

    // ---- read access ----

    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    /// Top of the value stack
    pub fn peek_top(&self) -> VmResult<Value> {
        self.stack.peek().cloned()
    }

    pub fn accounts(&self) -> &Accounts {
        &self.accounts
    }

    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.program.instructions
    }

    pub fn labels(&self) -> &LabelTable {
        &self.program.labels
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Index of the next instruction, or of the failing one after an error
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Instructions completed by the last run
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pc: self.pc,
            steps: self.steps,
            halted: self.halted,
            stack: self.stack.as_slice().to_vec(),
            accounts: self.accounts.as_map().clone(),
            variables: self.variables.as_map().clone(),
        }
    }
}

/// Remainder with the sign of the divisor. A zero divisor gives NaN.
fn floored_rem(l: f64, r: f64) -> f64 {
    let m = l % r;
    if m != 0.0 && (m < 0.0) != (r < 0.0) {
        m + r
    } else {
        m
    }
}

// ---- operand decoding shared by the handlers ----

/// Operand at `position`, or `MissingOperand`
pub(crate) fn operand(op: OpCode, instr: &Instruction, position: usize) -> VmResult<&Operand> {
    instr.operands.get(position).ok_or(VmError::MissingOperand {
        opcode: op.mnemonic(),
        position,
    })
}

/// Account, variable or label name at `position`
pub(crate) fn name_operand(op: OpCode, instr: &Instruction, position: usize) -> VmResult<&str> {
    operand(op, instr, position)?
        .as_name()
        .ok_or(VmError::InvalidOperand {
            opcode: op.mnemonic(),
            expected: "a name",
        })
}
