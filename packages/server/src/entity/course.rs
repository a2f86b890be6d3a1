use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub long_name: String,
    pub short_name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::course_alias::Entity")]
    CourseAlias,
    #[sea_orm(has_many = "super::item_course::Entity")]
    ItemCourse,
}

impl Related<super::course_alias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CourseAlias.def()
    }
}

impl Related<super::item_course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemCourse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
