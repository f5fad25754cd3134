use catalog_core::error::CoreError;

/// PostgreSQL SQLSTATE codes that mean "the row violates a field constraint".
const NOT_NULL_VIOLATION: &str = "23502";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Error type returned by every repository method.
///
/// Constraint violations raised by PostgreSQL are folded into
/// [`CoreError::Validation`] / [`CoreError::Conflict`] on conversion, so a
/// caller sees the same error kind whether the DTO validator or the schema
/// caught the problem.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A domain-level error from `catalog_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Any other database error from sqlx.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Schema migration failure.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Missing or malformed configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience alias for repository return values.
pub type DbResult<T> = Result<T, DbError>;

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        classify_sqlx_error(err)
    }
}

impl From<validator::ValidationErrors> for DbError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DbError::Core(CoreError::from(errors))
    }
}

impl DbError {
    /// Whether this error is a field-constraint rejection.
    pub fn is_validation(&self) -> bool {
        matches!(self, DbError::Core(CoreError::Validation(_)))
    }
}

/// Map constraint violations onto domain errors; pass everything else through.
fn classify_sqlx_error(err: sqlx::Error) -> DbError {
    let (code, constraint, message) = match &err {
        sqlx::Error::Database(db_err) => (
            db_err.code().map(|c| c.into_owned()),
            db_err.constraint().unwrap_or("unknown").to_string(),
            db_err.message().to_string(),
        ),
        _ => return DbError::Database(err),
    };

    let core = match code.as_deref() {
        Some(CHECK_VIOLATION) => {
            CoreError::Validation(format!("Value violates check constraint: {constraint}"))
        }
        Some(NOT_NULL_VIOLATION) => {
            CoreError::Validation(format!("Required field missing: {message}"))
        }
        Some(STRING_DATA_RIGHT_TRUNCATION) => {
            CoreError::Validation(format!("Value too long: {message}"))
        }
        Some(FOREIGN_KEY_VIOLATION) => CoreError::Validation(format!(
            "Referenced record does not exist: {constraint}"
        )),
        Some(UNIQUE_VIOLATION) if constraint.starts_with("uq_") => {
            CoreError::Conflict(format!("Duplicate value violates unique constraint: {constraint}"))
        }
        _ => return DbError::Database(err),
    };

    tracing::warn!(error = %message, code = ?code, "Database constraint violation");
    DbError::Core(core)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_row_not_found_stays_database_error() {
        assert_matches!(DbError::from(sqlx::Error::RowNotFound), DbError::Database(_));
    }

    #[test]
    fn test_validation_errors_become_core_validation() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("name", validator::ValidationError::new("blank"));
        let err = DbError::from(errors);
        assert!(err.is_validation());
    }
}
