//! VM Stack Implementation
//!
//! Value stack for VM execution.
//! No execution semantics.

use crate::error::{VmError, VmResult};
use super::value::Value;

/// VM value stack
#[derive(Debug)]
pub struct Stack {
    values: Vec<Value>,
    max_size: usize,
}

impl Stack {
    /// Create new stack with maximum size
    pub fn new(max_size: usize) -> Self {
        Stack {
            values: Vec::new(),
            max_size,
        }
    }

    /// Push value onto stack
    pub fn push(&mut self, value: Value) -> VmResult<()> {
        if self.values.len() >= self.max_size {
            return Err(VmError::StackOverflow);
        }
        self.values.push(value);
        Ok(())
    }

    /// Pop value from stack
    pub fn pop(&mut self) -> VmResult<Value> {
        self.values.pop().ok_or(VmError::StackUnderflow)
    }

    /// Pop two values as `(left, right)`: the first pop is the right operand.
    /// Fails without popping anything if fewer than two are present.
    pub fn pop2(&mut self) -> VmResult<(Value, Value)> {
        if self.values.len() < 2 {
            return Err(VmError::StackUnderflow);
        }
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }

    /// Peek at top of stack without removing
    pub fn peek(&self) -> VmResult<&Value> {
        self.values.last().ok_or(VmError::StackUnderflow)
    }

    /// Top `n` values without removing them, deepest first
    pub fn top(&self, n: usize) -> VmResult<&[Value]> {
        let len = self.values.len();
        if len < n {
            return Err(VmError::StackUnderflow);
        }
        Ok(&self.values[len - n..])
    }

    /// Get current stack size
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if stack is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bottom-to-top view
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}
