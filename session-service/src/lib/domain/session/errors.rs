use thiserror::Error;

/// Error for SubjectId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubjectIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for storage operations.
///
/// Always carries the failing operation name so failures can be logged with
/// context; the cause never reaches a response body.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    #[error("{operation} failed: {cause}")]
    Database {
        operation: &'static str,
        cause: String,
    },
}

impl RepositoryError {
    pub fn database(operation: &'static str, cause: impl ToString) -> Self {
        Self::Database {
            operation,
            cause: cause.to_string(),
        }
    }
}

/// Error for the metrics collaborator.
#[derive(Debug, Clone, Error)]
pub enum MetricsError {
    #[error("Failed to record metric: {0}")]
    RecordFailed(String),
}

/// Top-level error for all session operations.
///
/// `Authentication` deliberately carries no payload: whichever internal
/// check failed (unknown email, wrong password, bad signature, rotated or
/// expired token), callers see the same error. Internal causes are logged
/// where they occur.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Invalid credentials")]
    Authentication,

    #[error("Insufficient role")]
    Authorization { required: auth::Role },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<EmailError> for SessionError {
    fn from(err: EmailError) -> Self {
        SessionError::Validation(err.to_string())
    }
}
