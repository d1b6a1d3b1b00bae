//! Instruction Representation
//!
//! One parsed line of BankVM assembly. Immutable once built by the parser.
//! This layer contains no execution semantics.

use std::fmt;

use super::opcode::OpCode;

/// Instruction operand
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Token that parsed as a floating-point literal
    Number(f64),

    /// Quoted string literal, unquoted
    Text(String),

    /// Bare token: account, variable or label name
    Identifier(String),
}

impl Operand {
    /// Name carried by an identifier or text operand
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Operand::Identifier(s) | Operand::Text(s) => Some(s),
            Operand::Number(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Text(s) => write!(f, "\"{}\"", s),
            Operand::Identifier(s) => f.write_str(s),
        }
    }
}

/// Parsed instruction
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    /// Mnemonic as written in the source
    pub mnemonic: String,

    /// Decoded opcode; `None` when the mnemonic is outside the opcode set
    pub opcode: Option<OpCode>,

    pub operands: Vec<Operand>,

    /// 1-based source line, 0 when built directly
    pub line: usize,
}

impl Instruction {
    /// Create an instruction with no operands
    pub fn new(opcode: OpCode) -> Self {
        Self::with_operands(opcode, Vec::new())
    }

    /// Create an instruction with operands
    pub fn with_operands(opcode: OpCode, operands: Vec<Operand>) -> Self {
        Instruction {
            mnemonic: opcode.mnemonic().to_string(),
            opcode: Some(opcode),
            operands,
            line: 0,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonic)?;
        for op in &self.operands {
            write!(f, " {}", op)?;
        }
        Ok(())
    }
}
