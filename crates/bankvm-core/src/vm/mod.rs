mod handlers;
pub mod memory;
pub mod stack;
pub mod value;
pub mod vm;

pub use memory::{Accounts, Variables};
pub use value::Value;
pub use vm::{Snapshot, VirtualMachine};
