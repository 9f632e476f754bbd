//! Integration tests for the action parsers, tree builder, session and CLI

mod cli_commands;
mod scanner_scenarios;
mod session_flow;
mod strict_ingestion;
mod tree_properties;
