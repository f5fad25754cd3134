#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a `NotFound` for any displayable key (numeric id or copy UUID).
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_includes_entity_and_id() {
        let err = CoreError::not_found("book", 42);
        assert_eq!(err.to_string(), "Entity not found: book with id 42");
    }

    #[test]
    fn test_validation_errors_convert_to_validation_variant() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("title", validator::ValidationError::new("blank"));
        let err = CoreError::from(errors);
        assert!(matches!(err, CoreError::Validation(ref msg) if msg.contains("title")));
    }
}
