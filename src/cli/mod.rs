// CLI module for pathtag
//
// Argument parsing, per-file command loops and console output. The pattern
// engine and the tag containers live in the library.

pub mod commands;
pub mod config;
pub mod confirm;
pub mod output;

pub use config::{Commands, Config};
pub use output::OutputFormatter;
