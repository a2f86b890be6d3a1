use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "author")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item_author::Entity")]
    ItemAuthor,
}

impl Related<super::item_author::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemAuthor.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
