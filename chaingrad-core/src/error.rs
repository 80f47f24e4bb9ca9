use thiserror::Error;

/// Custom error type for the chaingrad engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum ChainGradError {
    /// The operation's cache is not in the state the call requires
    /// (backward before apply, a second apply, a dropped output, ...).
    #[error("Invalid state in operation {operation}: {message}")]
    InvalidState { operation: String, message: String },

    /// A kernel was asked for a rule it does not provide.
    #[error("Operation {operation} does not implement {method}")]
    NotImplemented { operation: String, method: String },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Recursive backward traversal exceeded the depth limit of {limit}")]
    RecursionLimitExceeded { limit: usize },
}

impl ChainGradError {
    pub(crate) fn invalid_state(operation: &str, message: impl Into<String>) -> Self {
        ChainGradError::InvalidState {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_implemented(operation: &str, method: &str) -> Self {
        ChainGradError::NotImplemented {
            operation: operation.to_string(),
            method: method.to_string(),
        }
    }
}
