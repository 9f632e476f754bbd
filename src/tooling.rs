//! Tooling & Integration Layer
//!
//! Command-line front end for the parsers, session and collaborator formats.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
