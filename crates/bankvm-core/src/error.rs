//! BankVM Error Types
//!
//! Defines all error conditions produced while loading or executing
//! BankVM assembly. Every error is fatal: nothing is retried and no
//! instruction applies a partial effect before failing.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VmError {
    // Load errors
    #[error("line {line}: {reason}")]
    ParseFailure { line: usize, reason: String },

    // Stack errors
    #[error("stack underflow")]
    StackUnderflow,
    #[error("stack overflow")]
    StackOverflow,

    // Name resolution
    #[error("undefined variable or account '{0}'")]
    UndefinedName(String),
    #[error("unknown account '{0}'")]
    UnknownAccount(String),
    #[error("undefined label '{0}'")]
    UndefinedLabel(String),

    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,

    // Instruction decoding
    #[error("unknown instruction '{mnemonic}' at index {index}")]
    UnknownInstruction { index: usize, mnemonic: String },
    #[error("{opcode} expects an operand at position {position}")]
    MissingOperand { opcode: &'static str, position: usize },
    #[error("{opcode} expects {expected} operand")]
    InvalidOperand {
        opcode: &'static str,
        expected: &'static str,
    },
    #[error("{opcode} expects a number")]
    TypeMismatch { opcode: &'static str },

    /// A runtime failure tagged with the executable index and source line
    /// of the instruction that raised it.
    #[error("instruction {index} (line {line}): {source}")]
    Execution {
        index: usize,
        line: usize,
        #[source]
        source: Box<VmError>,
    },

    // Configuration & IO boundary
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl VmError {
    /// Innermost error, looking through `Execution` wrappers.
    pub fn root(&self) -> &VmError {
        match self {
            VmError::Execution { source, .. } => source.root(),
            other => other,
        }
    }

    /// Executable instruction index the error was raised at, if known.
    pub fn index(&self) -> Option<usize> {
        match self {
            VmError::Execution { index, .. } => Some(*index),
            VmError::UnknownInstruction { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub(crate) fn at(self, index: usize, line: usize) -> Self {
        match self {
            // already carries its own position
            err @ VmError::UnknownInstruction { .. } => err,
            err => VmError::Execution {
                index,
                line,
                source: Box::new(err),
            },
        }
    }
}

pub type VmResult<T> = Result<T, VmError>;
