use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the form tree, wizard and submission layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Control not found: {0}")]
    NotFound(String),
    #[error("Control at `{path}` is not a {expected}")]
    WrongKind { path: String, expected: &'static str },
    #[error("Index {index} out of range for `{path}`")]
    IndexOutOfRange { path: String, index: usize },
    #[error("Application is missing required section: {0}")]
    IncompleteTree(String),
    #[error("Submission transport failed: {0}")]
    SubmissionTransport(String),
    #[error("Submission already in progress")]
    SubmissionInProgress,
    #[error("Wizard step out of range: {0}")]
    StepOutOfRange(usize),
    #[error("Cascade cycle detected through `{0}`")]
    CascadeCycle(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Persistence error: {0}")]
    StorageError(String),
}

pub type Result<T> = StdResult<T, FormError>;

impl FormError {
    pub(crate) fn wrong_kind(path: impl ToString, expected: &'static str) -> Self {
        FormError::WrongKind {
            path: path.to_string(),
            expected,
        }
    }
}

impl From<std::io::Error> for FormError {
    fn from(err: std::io::Error) -> Self {
        FormError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        FormError::StorageError(err.to_string())
    }
}
