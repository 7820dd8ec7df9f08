//! Catalog error types.

use catalog_db::DbError;
use serde::Serialize;
use thiserror::Error;

/// Errors returned by the catalog services.
///
/// The message is what the client sees; store detail is logged where the
/// error is produced and never carried in here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The request was malformed or out of range.
    #[error("{0}")]
    Validation(String),

    /// The requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The store failed.
    #[error("{0}")]
    Internal(String),
}

impl CatalogError {
    /// Shorthand for an internal error with a fixed message.
    pub fn internal(message: impl Into<String>) -> Self {
        CatalogError::Internal(message.into())
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::Validation(_) => 400,
            CatalogError::NotFound(_) => 404,
            CatalogError::Internal(_) => 500,
        }
    }

    /// The client-facing message.
    pub fn message(&self) -> &str {
        match self {
            CatalogError::Validation(m) | CatalogError::NotFound(m) | CatalogError::Internal(m) => m,
        }
    }

    /// JSON payload, `{"message": ...}`.
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.message().to_string(),
        }
    }
}

/// Error payload written to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Store errors that escape a service without a fixed message.
impl From<DbError> for CatalogError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => CatalogError::NotFound("Not found".to_string()),
            DbError::UnknownColumn { .. } | DbError::UnsupportedOperand(_) => {
                CatalogError::Validation(e.to_string())
            }
            _ => CatalogError::Internal("Internal Server Error".to_string()),
        }
    }
}
