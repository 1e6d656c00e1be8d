//! Error types for the tag query engine

use thiserror::Error;

use crate::domain::AlgorithmId;

/// Errors surfaced by catalog operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or contradictory criteria, rejected before compilation.
    /// Never converted into a zero-match result.
    #[error("invalid criteria: {field}: {reason}")]
    InvalidCriteria { field: &'static str, reason: String },

    /// Referenced entity absent in tenant scope
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Algorithm has never produced a prediction for the tenant and is not
    /// the tenant's configured active algorithm
    #[error("algorithm {0} has no predictions for this tenant")]
    UnknownAlgorithm(AlgorithmId),

    /// Uniqueness violation outside the covered upsert paths
    #[error("conflict: {0}")]
    Conflict(String),

    /// Storage failure, propagated to the caller without retry
    #[error("database error: {0}")]
    Database(sea_orm::DbErr),
}

impl From<sea_orm::DbErr> for Error {
    fn from(err: sea_orm::DbErr) -> Self {
        // Upsert paths absorb their own conflicts; any unique violation
        // reaching here came from an uncovered write.
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) => Self::Conflict(detail),
            _ => Self::Database(err),
        }
    }
}

impl Error {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidCriteria {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, Error>;
