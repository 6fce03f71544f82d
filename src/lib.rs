#[macro_use]
mod macros;
pub(crate) mod common;
pub(crate) mod cutils;
pub(crate) mod exec;
pub(crate) mod log;
pub(crate) mod mode;
pub(crate) mod parser;
pub(crate) mod system;

mod shell;

pub use exec::{Outcome, Supervisor};
pub use mode::Mode;
pub use parser::CommandDescriptor;
pub use shell::main as smallsh_main;
