use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An archived exam or lecture record. Its document, author, course and
/// folder memberships live in the four `item_*` join tables.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub date: Option<Date>,
    pub visible: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item_document::Entity")]
    ItemDocument,
    #[sea_orm(has_many = "super::item_author::Entity")]
    ItemAuthor,
    #[sea_orm(has_many = "super::item_course::Entity")]
    ItemCourse,
    #[sea_orm(has_many = "super::item_folder::Entity")]
    ItemFolder,
}

impl Related<super::item_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemDocument.def()
    }
}

impl Related<super::item_author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemAuthor.def()
    }
}

impl Related<super::item_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemCourse.def()
    }
}

impl Related<super::item_folder::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemFolder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
