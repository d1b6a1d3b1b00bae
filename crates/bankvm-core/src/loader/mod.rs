pub mod loader;

pub use loader::{LabelTable, Program, ProgramLoader};
