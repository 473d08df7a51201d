//! Common error types used throughout actionforge.
//!
//! Two families of failure are kept apart. [`Error::Validation`]
//! reports that an action's own rules rejected its input before anything ran.
//! Every other variant is an execution failure: something went wrong while
//! the action was doing its work, and the surrounding transaction was rolled
//! back.

use std::fmt;

use crate::validation::ValidationErrors;

/// Common error type for actionforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "user", "post").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// An action's validation rules rejected its attributes.
    ///
    /// The message is the human-readable join of every validation message.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// A record failed model-level validation or a table constraint while
    /// being written.
    #[error("Validation failed: {errors}")]
    RecordInvalid {
        /// The kind of record being written (e.g. "Post").
        model: String,
        /// What was wrong with it.
        errors: ValidationErrors,
    },

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A conflicting record already exists.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The transaction was rolled back because a nested unit inside it failed.
    #[error("Transaction aborted: {0}")]
    TransactionAborted(String),

    /// An action was run without overriding `execute`.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A single-use action was invoked a second time.
    #[error("Action '{action}' has already been executed")]
    AlreadyExecuted {
        /// Name of the action.
        action: String,
    },

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a new Database error.
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Database {
            source: source.into(),
        }
    }

    /// Create a new RecordInvalid error.
    pub fn record_invalid(model: impl Into<String>, errors: ValidationErrors) -> Self {
        Self::RecordInvalid {
            model: model.into(),
            errors,
        }
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new NotImplemented error.
    pub fn not_implemented<S: Into<String>>(msg: S) -> Self {
        Self::NotImplemented(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
