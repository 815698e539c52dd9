// Loading
mod loader;
pub use loader::Program;
mod error;
mod span;

// Running
mod opcode;
pub use opcode::Opcode;
mod runtime;
pub use runtime::{Error, Flags, Machine, Next, MEMORY_SIZE, REGISTER_COUNT, STACK_START};
mod output;
pub use output::{Capture, Console, Terminal};

/// Amount of lines to show as context, each side of focus line (line containing span).
pub const DIAGNOSTIC_CONTEXT_LINES: usize = 4;
