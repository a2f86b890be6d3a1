use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::utils::filename::validate_filename;

/// Media types a document may carry. Uploads and metadata writes outside
/// this list are rejected.
pub const ALLOWED_CONTENT_TYPES: [&str; 7] = [
    "application/msword",
    "application/pdf",
    "application/x-latex",
    "image/png",
    "image/jpeg",
    "image/gif",
    "text/plain",
];

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateDocumentRequest {
    #[schema(example = "exam.pdf")]
    pub filename: String,
    /// Whether anonymous callers may fetch the payload (in conjunction with
    /// the visibility of the items referencing this document).
    #[serde(default)]
    pub downloadable: bool,
    #[schema(example = "application/pdf")]
    pub content_type: String,
}

#[derive(Debug, Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateDocumentRequest {
    pub filename: Option<String>,
    pub downloadable: Option<bool>,
    pub content_type: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DocumentResponse {
    pub filename: String,
    pub downloadable: bool,
    pub content_type: String,
}

impl From<crate::entity::document::Model> for DocumentResponse {
    fn from(m: crate::entity::document::Model) -> Self {
        Self {
            filename: m.filename,
            downloadable: m.downloadable,
            content_type: m.content_type,
        }
    }
}

fn validate_content_type(content_type: &str) -> Result<(), AppError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(AppError::Validation(format!(
            "Content type {content_type} is not allowed"
        )));
    }
    Ok(())
}

pub fn validate_create_document(req: &CreateDocumentRequest) -> Result<(), AppError> {
    validate_filename(&req.filename).map_err(|e| AppError::Validation(e.message().into()))?;
    validate_content_type(&req.content_type)
}

pub fn validate_update_document(req: &UpdateDocumentRequest) -> Result<(), AppError> {
    if let Some(ref filename) = req.filename {
        validate_filename(filename).map_err(|e| AppError::Validation(e.message().into()))?;
    }
    if let Some(ref content_type) = req.content_type {
        validate_content_type(content_type)?;
    }
    Ok(())
}
