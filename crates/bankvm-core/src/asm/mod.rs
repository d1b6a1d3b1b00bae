pub mod instruction;
pub mod opcode;
pub mod parser;

pub use instruction::{Instruction, Operand};
pub use opcode::OpCode;
pub use parser::parse_line;
