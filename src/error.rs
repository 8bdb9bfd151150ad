//! Error types for G-code post-processing.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the post-processor.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Invalid post-processor arguments: {message}")]
    InvalidArguments { message: String },

    #[error("The object '{label}' is not a path. Select only paths and compounds")]
    NotAPath { label: String },

    #[error("{command} is missing required parameter {param}")]
    MissingParameter { command: String, param: char },

    #[error("Invalid peck step Q={step}: must be greater than zero")]
    InvalidPeckStep { step: f64 },

    #[error("{command} in relative mode needs a known {axis} position")]
    UnknownPosition { command: String, axis: char },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Review step failed: {message}")]
    Review { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PostError {
    /// Whether this error comes from malformed input (tree or command data).
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            PostError::NotAPath { .. }
                | PostError::MissingParameter { .. }
                | PostError::InvalidPeckStep { .. }
                | PostError::UnknownPosition { .. }
                | PostError::ParseError { .. }
        )
    }
}

/// Result type alias for post-processor operations.
pub type Result<T> = std::result::Result<T, PostError>;
