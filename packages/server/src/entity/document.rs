use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub filename: String,
    pub downloadable: bool,
    pub content_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item_document::Entity")]
    ItemDocument,
}

impl Related<super::item_document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemDocument.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
