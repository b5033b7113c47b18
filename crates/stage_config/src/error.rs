//! Document error types.

use thiserror::Error;

/// Errors that can occur while reading a scene document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The document could not be read from disk.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be understood.
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl DocumentError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}
