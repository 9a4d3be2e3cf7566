//! The module contains the errors the engine can throw.
//!
//! - [`Unauthenticated`] the caller identity cannot be trusted.
//! - [`Forbidden`] the caller lacks the premium entitlement.
//! - [`KeyNotFound`] a lookup scoped by owner found nothing. Missing records
//!   and records owned by someone else are deliberately indistinguishable.
//! - [`Validation`] invalid input, with the offending field.
//! - [`Database`] the store failed.
//! - [`Internal`] a local computation such as password hashing failed.
//!
//!  [`Unauthenticated`]: EngineError::Unauthenticated
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Validation`]: EngineError::Validation
//!  [`Database`]: EngineError::Database
//!  [`Internal`]: EngineError::Internal
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("not authenticated: {0}")]
    Unauthenticated(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("engine misconfigured: {0}")]
    Configuration(String),
    #[error("internal failure: {0}")]
    Internal(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn expense_not_found() -> Self {
        Self::KeyNotFound("expense not found or unauthorized".to_string())
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unauthenticated(a), Self::Unauthenticated(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (
                Self::Validation {
                    field: fa,
                    message: ma,
                },
                Self::Validation {
                    field: fb,
                    message: mb,
                },
            ) => fa == fb && ma == mb,
            (Self::Configuration(a), Self::Configuration(b)) => a == b,
            (Self::Internal(a), Self::Internal(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
