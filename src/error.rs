//! Error types for the seed_classifier library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for seed_classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Error types for loading seed data and running the parameter search
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Input file could not be opened or read
    #[error("Failed to read {}: {message}", .path.display())]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Table is missing a column or holds a value of the wrong shape
    #[error("Malformed table: {0}")]
    DataShape(String),

    /// Not enough seeds to split into the requested number of folds
    #[error("Cannot split {samples} samples into {folds} folds")]
    InsufficientSamples { samples: usize, folds: usize },

    /// Classifier grid produced no configuration to evaluate
    #[error("Parameter grid is empty")]
    EmptySearch,

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// OpenCV operation failed
    #[error("OpenCV error: {operation}")]
    OpenCvError {
        operation: String,
        #[source]
        source: opencv::Error,
    },
}

impl ClassifierError {
    /// Create an I/O error for the given file
    pub fn io<E>(path: impl Into<PathBuf>, message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Io {
            path: path.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a data shape error
    pub fn data_shape(message: impl Into<String>) -> Self {
        Self::DataShape(message.into())
    }

    /// Create an OpenCV error with context
    pub fn opencv(operation: impl Into<String>, source: opencv::Error) -> Self {
        Self::OpenCvError {
            operation: operation.into(),
            source,
        }
    }

    /// Check if this error was caused by the input tables rather than the search itself
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ClassifierError::Io { .. }
                | ClassifierError::DataShape(_)
                | ClassifierError::InsufficientSamples { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_errors_are_flagged() {
        assert!(ClassifierError::data_shape("missing column `red`").is_data_error());
        assert!(ClassifierError::InsufficientSamples { samples: 3, folds: 10 }.is_data_error());
        assert!(!ClassifierError::EmptySearch.is_data_error());
        assert!(!ClassifierError::Config("folds".into()).is_data_error());
    }

    #[test]
    fn test_error_messages() {
        let err = ClassifierError::InsufficientSamples { samples: 3, folds: 10 };
        assert_eq!(err.to_string(), "Cannot split 3 samples into 10 folds");

        let err = ClassifierError::data_shape("missing column `red`");
        assert_eq!(err.to_string(), "Malformed table: missing column `red`");
    }
}
