use serde::{Deserialize, Serialize};

use super::shared::validate_name;
use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateAuthorRequest {
    #[schema(example = "Prof. Example")]
    pub name: String,
}

#[derive(Debug, Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateAuthorRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthorResponse {
    pub name: String,
}

impl From<crate::entity::author::Model> for AuthorResponse {
    fn from(m: crate::entity::author::Model) -> Self {
        Self { name: m.name }
    }
}

pub fn validate_create_author(req: &CreateAuthorRequest) -> Result<(), AppError> {
    validate_name("name", &req.name)
}

pub fn validate_update_author(req: &UpdateAuthorRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_name("name", name)?;
    }
    Ok(())
}
