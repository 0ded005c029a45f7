//! External process execution

pub mod subprocess;

pub use subprocess::{ExecutionResult, ProcessRunner, SystemRunner, INTERRUPTED_EXIT_CODE};
