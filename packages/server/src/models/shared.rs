use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;

/// Body of every successful create: the new entity's surrogate id.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CreatedResponse {
    /// Surrogate key assigned by the store.
    #[schema(example = 1)]
    pub id: i32,
}

/// Serde helper for PATCH semantics on nullable fields.
///
/// * JSON field absent  => `None`          (don't update)
/// * JSON field = null  => `Some(None)`    (set to NULL)
/// * JSON field = value => `Some(Some(v))` (set to value)
pub fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::deserialize(deserializer)?))
}

/// Validate a display name (1-256 Unicode characters, not only whitespace).
pub fn validate_name(field: &str, name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() || name.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(())
}
