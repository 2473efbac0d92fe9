//! The module contains the error the engine can throw.
//!
//! The errors are grouped by who can fix them:
//!
//! - [`InvalidField`] and [`InvalidAmount`] are client-fixable payload errors.
//! - [`Unauthenticated`] and [`Forbidden`] are raised by the access guard
//!   before anything is written.
//! - [`KeyNotFound`], [`Conflict`] and [`Unprocessable`] describe the state of
//!   the stored entities.
//! - [`Database`] wraps any storage failure; the transaction it happened in is
//!   always rolled back.
//!
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`Unauthenticated`]: EngineError::Unauthenticated
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Conflict`]: EngineError::Conflict
//!  [`Unprocessable`]: EngineError::Unprocessable
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid role: {0}")]
    InvalidRole(String),
    #[error("Invalid id: {0}")]
    InvalidId(String),
    #[error("Not authenticated")]
    Unauthenticated,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("\"{0}\" not found!")]
    KeyNotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("{message}")]
    Unprocessable {
        message: String,
        unmatched: Vec<String>,
    },
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Shorthand for a validation failure naming the offending field.
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, when the error is a field validation error.
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::InvalidField { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::InvalidField {
                    field: fa,
                    reason: ra,
                },
                Self::InvalidField {
                    field: fb,
                    reason: rb,
                },
            ) => fa == fb && ra == rb,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidRole(a), Self::InvalidRole(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Unauthenticated, Self::Unauthenticated) => true,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (
                Self::Unprocessable {
                    message: ma,
                    unmatched: ua,
                },
                Self::Unprocessable {
                    message: mb,
                    unmatched: ub,
                },
            ) => ma == mb && ua == ub,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
