//! Code Studio: Incremental Project Trees from Model Output
//!
//! Scans streamed model responses for file-write, shell and design actions,
//! merges them into a hierarchical project tree batch by batch, and hands the
//! result to a preview runtime and a deploy service.

pub mod action;
pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod tooling;
pub mod tree;
pub mod types;
