use serde::{Deserialize, Serialize};

use super::shared::validate_name;
use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateCourseRequest {
    #[schema(example = "Rocket Science")]
    pub long_name: String,
    #[schema(example = "RS")]
    pub short_name: String,
    /// Alternate names the course is known under.
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateCourseRequest {
    pub long_name: Option<String>,
    pub short_name: Option<String>,
    /// When present, fully replaces the alias set.
    pub aliases: Option<Vec<String>>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CourseResponse {
    pub long_name: String,
    pub short_name: String,
    pub aliases: Vec<String>,
}

fn validate_aliases(aliases: &[String]) -> Result<(), AppError> {
    for alias in aliases {
        validate_name("alias", alias)?;
    }
    Ok(())
}

pub fn validate_create_course(req: &CreateCourseRequest) -> Result<(), AppError> {
    validate_name("long_name", &req.long_name)?;
    validate_name("short_name", &req.short_name)?;
    validate_aliases(&req.aliases)
}

pub fn validate_update_course(req: &UpdateCourseRequest) -> Result<(), AppError> {
    if let Some(ref long_name) = req.long_name {
        validate_name("long_name", long_name)?;
    }
    if let Some(ref short_name) = req.short_name {
        validate_name("short_name", short_name)?;
    }
    if let Some(ref aliases) = req.aliases {
        validate_aliases(aliases)?;
    }
    Ok(())
}
