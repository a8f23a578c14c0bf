pub mod cache;
pub mod config;
pub mod error;
pub mod exec;
pub mod fs;
pub mod lock;
pub mod log;
pub mod path;

pub use error::{MobupError, Result};
