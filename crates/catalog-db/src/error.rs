//! Database error types.

use thiserror::Error;

/// Errors that can occur when using the store.
#[derive(Error, Debug)]
pub enum DbError {
    /// Failed to open the database.
    #[error("Failed to open database: {0}")]
    OpenError(String),

    /// Failed to execute a query.
    #[error("Query execution failed: {0}")]
    QueryError(String),

    /// A uniqueness or key constraint rejected the write.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A filter named a column the table does not have.
    #[error("Unknown column {column} on table {table}")]
    UnknownColumn { table: String, column: String },

    /// A filter used an operator the store does not accept.
    #[error("Unsupported operand: {0}")]
    UnsupportedOperand(String),

    /// Type conversion error.
    #[error("Type conversion error: {0}")]
    TypeError(String),

    /// No rows returned when one was expected.
    #[error("No rows returned")]
    NotFound,
}

impl DbError {
    /// Whether this is the not-found sentinel.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound)
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DbError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                DbError::Constraint(db.message().to_string())
            }
            sqlx::Error::ColumnDecode { index, source } => {
                DbError::TypeError(format!("column {}: {}", index, source))
            }
            other => DbError::QueryError(other.to_string()),
        }
    }
}
