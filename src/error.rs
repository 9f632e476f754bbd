//! Error types for action parsing, tree construction and the outer API.

use thiserror::Error;

/// Strict XML ingestion errors
///
/// The permissive scanner never produces these; only the strict document path does.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to parse XML at byte {position}: {message}")]
    Xml { position: usize, message: String },

    #[error("Could not find any file actions in the XML")]
    NoActions,
}

/// Tree construction and lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("Path has no segments: {path:?}")]
    EmptyPath { path: String },

    #[error("Path conflict: '{segment}' is a file but '{path}' needs it as a folder")]
    FileAsFolder { path: String, segment: String },

    #[error("Path conflict: '{path}' is a folder and cannot be written as a file")]
    FolderAsFile { path: String },

    #[error("Invalid name {segment:?} under '{path}'")]
    InvalidSegment { path: String, segment: String },

    #[error("No node at path: {path}")]
    NotFound { path: String },

    #[error("Node at '{path}' is not a file")]
    NotAFile { path: String },
}

impl TreeError {
    /// True for the file/folder type collisions reported as conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            TreeError::FileAsFolder { .. } | TreeError::FolderAsFile { .. }
        )
    }
}

/// API errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Runtime error: {0}")]
    Runtime(String),

    #[error("Deploy error: {0}")]
    Deploy(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
