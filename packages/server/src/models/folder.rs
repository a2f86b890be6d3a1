use serde::{Deserialize, Serialize};

use super::shared::validate_name;
use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateFolderRequest {
    #[schema(example = "Shelf 3, Binder IV")]
    pub name: String,
}

#[derive(Debug, Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateFolderRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct FolderResponse {
    pub name: String,
}

impl From<crate::entity::folder::Model> for FolderResponse {
    fn from(m: crate::entity::folder::Model) -> Self {
        Self { name: m.name }
    }
}

pub fn validate_create_folder(req: &CreateFolderRequest) -> Result<(), AppError> {
    validate_name("name", &req.name)
}

pub fn validate_update_folder(req: &UpdateFolderRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_name("name", name)?;
    }
    Ok(())
}
