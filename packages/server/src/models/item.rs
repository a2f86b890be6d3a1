use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::shared::{double_option, validate_name};
use crate::error::AppError;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateItemRequest {
    #[schema(example = "Exam WS21")]
    pub name: String,
    /// Calendar date of the exam or lecture, if known.
    #[serde(default)]
    #[schema(example = "2021-12-03")]
    pub date: Option<NaiveDate>,
    /// Whether anonymous callers may see this item.
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub documents: Vec<i32>,
    #[serde(default)]
    pub authors: Vec<i32>,
    #[serde(default)]
    pub courses: Vec<i32>,
    #[serde(default)]
    pub folders: Vec<i32>,
}

#[derive(Debug, Deserialize, Default, PartialEq, utoipa::ToSchema)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    /// Absent keeps the stored date, `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    pub date: Option<Option<NaiveDate>>,
    pub visible: Option<bool>,
    /// Relation fields, when present, fully replace the membership set;
    /// absent relations are left untouched.
    pub documents: Option<Vec<i32>>,
    pub authors: Option<Vec<i32>>,
    pub courses: Option<Vec<i32>>,
    pub folders: Option<Vec<i32>>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ItemResponse {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub visible: bool,
    /// Ids of referenced entities, ascending.
    pub documents: Vec<i32>,
    pub authors: Vec<i32>,
    pub courses: Vec<i32>,
    pub folders: Vec<i32>,
}

impl ItemResponse {
    /// Representation of a bare item row, before its relation id lists are
    /// filled in.
    pub fn from_row(m: crate::entity::item::Model) -> Self {
        Self {
            name: m.name,
            date: m.date,
            visible: m.visible,
            documents: Vec::new(),
            authors: Vec::new(),
            courses: Vec::new(),
            folders: Vec::new(),
        }
    }
}

pub fn validate_create_item(req: &CreateItemRequest) -> Result<(), AppError> {
    validate_name("name", &req.name)
}

pub fn validate_update_item(req: &UpdateItemRequest) -> Result<(), AppError> {
    if let Some(ref name) = req.name {
        validate_name("name", name)?;
    }
    Ok(())
}
