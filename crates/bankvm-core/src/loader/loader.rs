//! Program Loader
//!
//! Two-pass loading of BankVM assembly source.
//! Pass one registers labels against the executable-instruction count and
//! collects the remaining lines; pass two parses each kept line.
//! Label targets are not validated unless the strict path is requested.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::asm::instruction::{Instruction, Operand};
use crate::asm::parser::parse_line;
use crate::error::{VmError, VmResult};

/// Comment marker
const COMMENT_PREFIX: char = '#';

/// Label declaration keyword
const LABEL_KEYWORD: &str = "LABEL";

/// Label name -> executable instruction index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: BTreeMap<String, usize>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` at `index`, returning the index it replaced.
    pub fn define(&mut self, name: &str, index: usize) -> Option<usize> {
        self.labels.insert(name.to_string(), index)
    }

    pub fn resolve(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Loaded program
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
    pub labels: LabelTable,
}

impl Program {
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

/// Assembly program loader
pub struct ProgramLoader;

impl ProgramLoader {
    /// Load a program from source text. Jump targets are resolved lazily by
    /// the engine, so a missing label only fails if the jump executes.
    pub fn load(source: &str) -> VmResult<Program> {
        let mut labels = LabelTable::new();
        let mut kept: Vec<(usize, &str)> = Vec::new();

        // Pass one: labels and executable lines
        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
                continue;
            }

            if let Some(name) = Self::label_name(line, line_no)? {
                if let Some(previous) = labels.define(name, kept.len()) {
                    warn!(
                        "line {}: label '{}' redefined (was instruction {}, now {})",
                        line_no,
                        name,
                        previous,
                        kept.len()
                    );
                }
                continue;
            }

            kept.push((line_no, line));
        }

        // Pass two: parse kept lines
        let instructions: Vec<Instruction> = kept
            .into_iter()
            .map(|(line_no, line)| parse_line(line).at_line(line_no))
            .collect();

        debug!("labels: {:?}", labels.labels);
        debug!("instructions: {}", instructions.len());

        Ok(Program {
            instructions,
            labels,
        })
    }

    /// Load and additionally require every jump target to be declared.
    pub fn load_strict(source: &str) -> VmResult<Program> {
        let program = Self::load(source)?;
        Self::validate_labels(&program)?;
        Ok(program)
    }

    /// Check every `JMP`/`JMP_IF_*` target against the label table.
    pub fn validate_labels(program: &Program) -> VmResult<()> {
        for instr in &program.instructions {
            let is_jump = instr.opcode.map(|op| op.is_jump()).unwrap_or(false);
            if !is_jump {
                continue;
            }
            match instr.operands.first() {
                Some(Operand::Identifier(name)) | Some(Operand::Text(name)) => {
                    if program.labels.resolve(name).is_none() {
                        return Err(VmError::UndefinedLabel(name.clone()));
                    }
                }
                Some(other) => {
                    return Err(VmError::ParseFailure {
                        line: instr.line,
                        reason: format!("{} target must be a label, got {}", instr.mnemonic, other),
                    });
                }
                None => {
                    return Err(VmError::ParseFailure {
                        line: instr.line,
                        reason: format!("{} is missing its label", instr.mnemonic),
                    });
                }
            }
        }
        Ok(())
    }

    /// `Some(name)` for a label declaration line, `None` for anything else.
    fn label_name(line: &str, line_no: usize) -> VmResult<Option<&str>> {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some(LABEL_KEYWORD) {
            return Ok(None);
        }
        match tokens.next() {
            Some(name) => Ok(Some(name)),
            None => Err(VmError::ParseFailure {
                line: line_no,
                reason: "LABEL without a name".to_string(),
            }),
        }
    }
}
