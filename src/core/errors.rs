//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vandalcheck operations
#[derive(Debug, Error)]
pub enum Error {
    /// The raw change log does not follow the block format
    #[error("Malformed log {path}:{line}: {message}")]
    MalformedLog {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Train and test datasets do not share an attribute schema
    #[error("Incompatible schema: {0}")]
    IncompatibleSchema(String),

    /// A categorical value outside its declared domain
    #[error("Unknown value '{value}' for attribute '{attribute}'")]
    UnknownCategoricalValue { attribute: String, value: String },

    /// Failure reported by a vectorizer, ranker or classifier
    #[error("{capability} failed: {message}")]
    ExternalCapability {
        capability: &'static str,
        message: String,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed-log error pointing at a line of the input
    pub fn malformed_log(
        path: impl Into<PathBuf>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::MalformedLog {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an error for a value outside an attribute's domain
    pub fn unknown_value(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownCategoricalValue {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Create an error raised by one of the pluggable capabilities
    pub fn capability(capability: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalCapability {
            capability,
            message: message.into(),
        }
    }

    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
