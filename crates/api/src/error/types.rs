//! Error type definitions

use thiserror::Error as ThisError;

/// Primary error type
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// A parameter-set identifier that is not in the registry
    #[error("unknown parameter set '{name}'")]
    UnknownParameterSet { name: String },

    /// Invalid parameter error
    #[error("invalid parameter in {context}: {message}")]
    InvalidParameter {
        context: &'static str,
        message: String,
    },

    /// Invalid length error with context
    #[error("invalid length in {context}: expected {expected}, got {actual}")]
    InvalidLength {
        context: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Harness configuration could not be loaded or failed validation
    #[error("configuration error: {message}")]
    Config { message: String },
}

/// Result type for harness operations
pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`Error::Config`]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid_parameter(context: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            context,
            message: message.into(),
        }
    }

    /// Whether the error was raised before any KEM instance could be built
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnknownParameterSet { .. } | Self::Config { .. } | Self::InvalidParameter { .. }
        )
    }
}
