// Command-line entry layer
pub mod commands;

pub use commands::*;
