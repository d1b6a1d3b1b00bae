//! BankVM - Core Library
//!
//! Loader and stack-based execution engine for BankVM assembly, the
//! target language of the MoneyLang compiler.
//!
//! ```
//! use bankvm_core::{CollectStringPrint, ProgramLoader, VirtualMachine, VmConfig};
//!
//! let program = ProgramLoader::load("PUSH_CONST 3\nPUSH_CONST 4\nADD\nPRINT\n").unwrap();
//! let mut vm = VirtualMachine::new(VmConfig::default(), program);
//! let mut out = CollectStringPrint::new();
//! vm.run_with_writer(&mut out).unwrap();
//! assert_eq!(out.output(), "7\n");
//! ```

pub mod asm;
pub mod config;
pub mod error;
pub mod io;
pub mod loader;
pub mod vm;

// Re-export commonly used types
pub use asm::{Instruction, OpCode, Operand};
pub use config::VmConfig;
pub use error::{VmError, VmResult};
pub use io::{CollectStringPrint, NoPrint, PrintWriter, StdPrint};
pub use loader::{LabelTable, Program, ProgramLoader};
pub use vm::{Snapshot, Value, VirtualMachine};

/// Load `source` and run it to completion with the given configuration.
pub fn execute(
    source: &str,
    config: VmConfig,
    out: &mut impl PrintWriter,
) -> VmResult<VirtualMachine> {
    let program = ProgramLoader::load(source)?;
    let mut vm = VirtualMachine::new(config, program);
    vm.run_with_writer(out)?;
    Ok(vm)
}
