//! Error types for genoscope

use thiserror::Error;

/// Genoscope error type
#[derive(Debug, Error)]
pub enum GenoscopeError {
    /// Genome listing failed to parse
    #[error("Parse error: {0}")]
    Parse(#[from] crate::vm::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenoscopeError>;
