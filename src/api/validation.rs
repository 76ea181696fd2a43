use super::ApiError;
use crate::domain::ObjectId;
use crate::services::TodoError;

pub fn require_field<T>(value: Option<T>, name: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::validation(format!("{name} is required")))
}

/// Rejects path ids that can never name a todo, before the body is looked at.
pub fn validate_todo_id(id: &str) -> Result<(), ApiError> {
    if ObjectId::is_valid(id) {
        Ok(())
    } else {
        Err(TodoError::InvalidId(id.to_string()).into())
    }
}
