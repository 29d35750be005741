//! Application error model.

use thiserror::Error;

/// Result type used across the repository and handler layers.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error.
///
/// This is a closed set: every repository operation either succeeds or
/// returns exactly one of these kinds. Storage-engine failures never cross
/// the repository boundary raw; they are re-wrapped as `Database` unless
/// they map to a more specific kind.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AppError {
    /// No record matches the given identifier or query.
    ///
    /// Malformed identifiers are deliberately reported as `NotFound` too, so
    /// callers cannot distinguish a bad id from a missing record.
    #[error("{0}")]
    NotFound(String),

    /// Caller-supplied data failed structural or semantic checks.
    #[error("{message}")]
    Validation {
        message: String,
        /// Field-level details, when the validating layer produced them.
        details: Option<serde_json::Value>,
    },

    /// A uniqueness constraint (document identifier) would be violated.
    #[error("{0}")]
    Duplicate(String),

    /// The storage engine failed for reasons opaque to the caller.
    #[error("database operation failed: {0}")]
    Database(String),
}

impl AppError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(format!("{} not found", resource.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            details: None,
        }
    }

    pub fn validation_with_details(msg: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Validation {
            message: msg.into(),
            details: Some(details),
        }
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    /// HTTP-equivalent status code for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::NotFound(_) => 404,
            AppError::Validation { .. } => 400,
            AppError::Duplicate(_) => 409,
            AppError::Database(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_has_a_fixed_status_code() {
        assert_eq!(AppError::not_found("client").status_code(), 404);
        assert_eq!(AppError::validation("bad input").status_code(), 400);
        assert_eq!(AppError::duplicate("document taken").status_code(), 409);
        assert_eq!(AppError::database("connection reset").status_code(), 500);
    }

    #[test]
    fn messages_render_through_display() {
        assert_eq!(AppError::not_found("client").to_string(), "client not found");
        assert_eq!(
            AppError::database("pool closed").to_string(),
            "database operation failed: pool closed"
        );
    }
}
