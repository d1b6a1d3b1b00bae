//! Opcode Definitions
//!
//! Defines the closed opcode set of BankVM assembly.
//! This file contains no execution semantics.
//! Mnemonics are case-sensitive and form the text contract of the format.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// BankVM opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OpCode {
    // Stack operations
    PushConst,
    PushStr,
    Load,
    Store,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Neg,
    Not,

    // Comparison
    CmpEq,
    CmpNe,
    CmpLt,
    CmpLe,
    CmpGt,
    CmpGe,

    // Control flow
    Jmp,
    JmpIfTrue,
    JmpIfFalse,
    Halt,

    // Banking primitives
    AccountInit,
    Deposit,
    Withdraw,
    Transfer,
    ApplyInterest,

    // Sensors
    SensorTempo,
    SensorJuros,

    // I/O
    Print,
    PrintStrLiteral,
    PrintTop,

    // System
    Nop,
}

impl OpCode {
    /// Parse a mnemonic. Returns `None` for anything outside the closed set.
    pub fn from_mnemonic(text: &str) -> Option<Self> {
        text.parse().ok()
    }

    /// Canonical mnemonic
    pub fn mnemonic(self) -> &'static str {
        self.into()
    }

    /// Opcodes whose first operand names a label
    pub fn is_jump(self) -> bool {
        matches!(self, OpCode::Jmp | OpCode::JmpIfTrue | OpCode::JmpIfFalse)
    }
}
