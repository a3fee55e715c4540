//! Error types for sqlforge-sql

use thiserror::Error;

/// The result type for sqlforge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during SQL tokenization, parsing, and generation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Malformed lexical input (unterminated string/comment, illegal character)
    #[error("Tokenize error at line {line}, column {column}: {message}")]
    Tokenize {
        message: String,
        line: usize,
        column: usize,
    },

    /// Grammar violation at a known token
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    /// Syntactically consumed but unmodeled construct that cannot be
    /// retained as raw text
    #[error("Unsupported construct: {construct}")]
    Unsupported { construct: String },

    /// Error during SQL generation
    #[error("Generation error: {0}")]
    Generate(String),

    /// Internal invariant breach (should not happen in normal usage)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a tokenization error
    pub fn tokenize(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Tokenize {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a parse error at a source position
    pub fn parse(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create an unsupported-construct error
    pub fn unsupported(construct: impl Into<String>) -> Self {
        Error::Unsupported {
            construct: construct.into(),
        }
    }

    /// Create a generation error
    pub fn generate(message: impl Into<String>) -> Self {
        Error::Generate(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Error::Internal(message.into())
    }

    /// The source line of the error, when one is known
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Tokenize { line, .. } | Error::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The source column of the error, when one is known
    pub fn column(&self) -> Option<usize> {
        match self {
            Error::Tokenize { column, .. } | Error::Parse { column, .. } => Some(*column),
            _ => None,
        }
    }
}
