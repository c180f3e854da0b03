//! Campus navigation CLI library.
//!
//! Subcommand handlers and output formatting for the `campusnav` binary.

pub mod commands;
pub mod output;
