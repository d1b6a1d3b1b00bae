//! Instruction Parser
//!
//! Turns one line of BankVM assembly into an [`Instruction`].
//! The parser is permissive: mnemonics are decoded but never rejected here,
//! an unknown mnemonic only fails once the engine reaches it.

use super::instruction::{Instruction, Operand};
use super::opcode::OpCode;

/// Parse a single source line.
///
/// Two shapes are recognised:
/// - `OPCODE "quoted text"`: one `Text` operand, taken verbatim up to the
///   next quote; anything after the closing quote is ignored.
/// - `OPCODE tok tok ...`: whitespace separated; tokens that parse as `f64`
///   become `Number`, everything else `Identifier`.
///
/// An empty line parses as `NOP`.
pub fn parse_line(line: &str) -> Instruction {
    let line = line.trim();

    if let Some((mnemonic, text)) = split_quoted(line) {
        return build(mnemonic, vec![Operand::Text(text.to_string())]);
    }

    let mut tokens = line.split_whitespace();
    let mnemonic = match tokens.next() {
        Some(m) => m,
        None => return Instruction::new(OpCode::Nop),
    };

    let operands = tokens.map(parse_operand).collect();
    build(mnemonic, operands)
}

fn build(mnemonic: &str, operands: Vec<Operand>) -> Instruction {
    Instruction {
        mnemonic: mnemonic.to_string(),
        opcode: OpCode::from_mnemonic(mnemonic),
        operands,
        line: 0,
    }
}

fn parse_operand(token: &str) -> Operand {
    match token.parse::<f64>() {
        Ok(n) => Operand::Number(n),
        Err(_) => Operand::Identifier(token.to_string()),
    }
}

/// Match `<word> <ws>+ "<text>"` anchored at the start of the line.
fn split_quoted(line: &str) -> Option<(&str, &str)> {
    let word_end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    if word_end == 0 {
        return None;
    }
    let (word, rest) = line.split_at(word_end);

    let after_ws = rest.trim_start();
    if after_ws.len() == rest.len() {
        // no separating whitespace
        return None;
    }

    let body = after_ws.strip_prefix('"')?;
    let close = body.find('"')?;
    Some((word, &body[..close]))
}
