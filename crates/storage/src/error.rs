use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    /// Maps unique and check constraint failures to `ConstraintViolation`,
    /// leaving every other database error untouched.
    pub(crate) fn from_write(error: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = error {
            if db_err.is_unique_violation() || db_err.is_check_violation() {
                return StorageError::ConstraintViolation(format!("{}: {}", what, db_err.message()));
            }
        }
        StorageError::from(error)
    }
}
