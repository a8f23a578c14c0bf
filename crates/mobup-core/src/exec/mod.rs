//! External process execution

mod environment;
mod runner;

pub use environment::Environment;
pub use runner::{CommandSpec, ProcessRunner};
