//! Error types for the record-keeping core.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Root error type returned by repository, export and receipt operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Project {project_id} does not exist")]
    Referential { project_id: i64 },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Storage operation failed: {0}")]
    OperationFailed(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Export(#[from] csv::Error),
}

/// A required field is missing or a constraint is violated
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("'{value}' is not a valid {kind}; expected one of: {expected}")]
    UnknownLabel {
        kind: &'static str,
        value: String,
        expected: String,
    },
}

impl Error {
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Translate a SQLite foreign-key violation into a referential error for `project_id`
    pub(crate) fn from_insert(err: sqlx::Error, project_id: i64) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Error::Referential { project_id }
            }
            _ => Error::OperationFailed(err),
        }
    }
}
