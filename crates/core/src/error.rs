//! Error types for Datapoint
//!
//! Every fallible operation in the workspace returns [`DatapointResult`].
//! Variants are grouped by who is at fault:
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | `Config` | A schema or store configuration is invalid |
//! | `Schema` | A record is missing a required field or carries a rejected one |
//! | `SchemaMismatch` | An existing file header does not match the configured fields |
//! | `UnsupportedQuery` | A filter needs a field the store does not have |
//! | `Validation` | A required argument was omitted |
//! | `InvalidTimestamp` | A timestamp string could not be parsed |
//! | `Conversion` | A field codec could not decode a stored value |
//! | `Io` / `Csv` | The backing file could not be read or written |

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the workspace
pub type DatapointResult<T> = std::result::Result<T, DatapointError>;

/// Unified error type
#[derive(Debug, Error)]
pub enum DatapointError {
    /// Invalid schema or store configuration
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// A record failed field validation
    #[error("schema violation: {message}")]
    Schema {
        /// Description of the problem
        message: String,
    },

    /// The header of an existing file differs from the configured fields
    #[error("field names in file header of {} ({found:?}) do not match configured field names ({expected:?})", path.display())]
    SchemaMismatch {
        /// File that was opened
        path: PathBuf,
        /// Field names the store was configured with
        expected: Vec<String>,
        /// Field names found in the header row
        found: Vec<String>,
    },

    /// The query needs a timestamp or object-id field the store lacks
    #[error("unsupported query: {message}")]
    UnsupportedQuery {
        /// Description of the problem
        message: String,
    },

    /// A required argument was missing
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the problem
        message: String,
    },

    /// A timestamp string could not be parsed
    #[error("invalid timestamp: {input:?}")]
    InvalidTimestamp {
        /// The offending input
        input: String,
    },

    /// A stored value could not be converted back from text
    #[error("cannot convert field '{field}': {message}")]
    Conversion {
        /// Field being decoded
        field: String,
        /// Codec error message
        message: String,
    },

    /// I/O failure on the backing medium
    #[error("{message}: {source}")]
    Io {
        /// What was being attempted
        message: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Delimited-text encoding or decoding failure
    #[error("delimited file error: {message}")]
    Csv {
        /// Underlying error, rendered
        message: String,
    },
}

impl DatapointError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        DatapointError::Config {
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema(message: impl Into<String>) -> Self {
        DatapointError::Schema {
            message: message.into(),
        }
    }

    /// Create an unsupported-query error
    pub fn unsupported_query(message: impl Into<String>) -> Self {
        DatapointError::UnsupportedQuery {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        DatapointError::Validation {
            message: message.into(),
        }
    }

    /// Create an invalid-timestamp error
    pub fn invalid_timestamp(input: impl Into<String>) -> Self {
        DatapointError::InvalidTimestamp {
            input: input.into(),
        }
    }

    /// Create a conversion error for a field
    pub fn conversion(field: impl Into<String>, message: impl Into<String>) -> Self {
        DatapointError::Conversion {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Wrap an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        DatapointError::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a delimited-text error
    pub fn csv(message: impl Into<String>) -> Self {
        DatapointError::Csv {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller's input rather than the medium
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, DatapointError::Io { .. } | DatapointError::Csv { .. })
    }
}

impl From<std::io::Error> for DatapointError {
    fn from(source: std::io::Error) -> Self {
        DatapointError::Io {
            message: "I/O error".to_string(),
            source,
        }
    }
}
