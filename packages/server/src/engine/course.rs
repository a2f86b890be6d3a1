use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use super::{Resource, ResourceKind, Scope};
use crate::entity::{course, course_alias, item_course};
use crate::error::AppError;
use crate::models::course::{
    CourseResponse, CreateCourseRequest, UpdateCourseRequest, validate_create_course,
    validate_update_course,
};

pub struct Courses;

/// Replace the full alias set of one course.
async fn replace_aliases<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    aliases: Vec<String>,
) -> Result<(), AppError> {
    course_alias::Entity::delete_many()
        .filter(course_alias::Column::CourseId.eq(course_id))
        .exec(db)
        .await?;

    let unique: BTreeSet<String> = aliases.into_iter().collect();
    if !unique.is_empty() {
        let rows = unique.into_iter().map(|name| course_alias::ActiveModel {
            course_id: Set(course_id),
            name: Set(name),
        });
        course_alias::Entity::insert_many(rows).exec(db).await?;
    }
    Ok(())
}

fn response(model: course::Model, aliases: Vec<String>) -> CourseResponse {
    CourseResponse {
        long_name: model.long_name,
        short_name: model.short_name,
        aliases,
    }
}

#[async_trait]
impl Resource for Courses {
    const KIND: ResourceKind = ResourceKind::Courses;

    type Create = CreateCourseRequest;
    type Update = UpdateCourseRequest;
    type Repr = CourseResponse;

    async fn validate_create<C: ConnectionTrait>(
        _db: &C,
        data: &Self::Create,
    ) -> Result<(), AppError> {
        validate_create_course(data)
    }

    async fn validate_update<C: ConnectionTrait>(
        _db: &C,
        data: &Self::Update,
    ) -> Result<(), AppError> {
        validate_update_course(data)
    }

    async fn insert<C: ConnectionTrait>(db: &C, data: Self::Create) -> Result<i32, AppError> {
        let model = course::ActiveModel {
            long_name: Set(data.long_name),
            short_name: Set(data.short_name),
            ..Default::default()
        }
        .insert(db)
        .await?;

        replace_aliases(db, model.id, data.aliases).await?;
        Ok(model.id)
    }

    async fn apply_update<C: ConnectionTrait>(
        db: &C,
        id: i32,
        data: Self::Update,
    ) -> Result<(), AppError> {
        let existing = course::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(super::not_found::<Self>)?;

        let mut active: course::ActiveModel = existing.into();
        let mut dirty = false;
        if let Some(long_name) = data.long_name {
            active.long_name = Set(long_name);
            dirty = true;
        }
        if let Some(short_name) = data.short_name {
            active.short_name = Set(short_name);
            dirty = true;
        }
        if dirty {
            active.update(db).await?;
        }

        if let Some(aliases) = data.aliases {
            replace_aliases(db, id, aliases).await?;
        }
        Ok(())
    }

    async fn remove<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, AppError> {
        item_course::Entity::delete_many()
            .filter(item_course::Column::CourseId.eq(id))
            .exec(db)
            .await?;
        course_alias::Entity::delete_many()
            .filter(course_alias::Column::CourseId.eq(id))
            .exec(db)
            .await?;

        let res = course::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn fetch<C: ConnectionTrait>(
        db: &C,
        id: i32,
        _scope: Scope,
    ) -> Result<Option<Self::Repr>, AppError> {
        let Some(model) = course::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        let mut aliases: Vec<String> = course_alias::Entity::find()
            .filter(course_alias::Column::CourseId.eq(id))
            .all(db)
            .await?
            .into_iter()
            .map(|a| a.name)
            .collect();
        aliases.sort();

        Ok(Some(response(model, aliases)))
    }

    async fn fetch_all<C: ConnectionTrait>(
        db: &C,
        _scope: Scope,
    ) -> Result<BTreeMap<i32, Self::Repr>, AppError> {
        let mut out: BTreeMap<i32, CourseResponse> = course::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, response(m, Vec::new())))
            .collect();

        for alias in course_alias::Entity::find().all(db).await? {
            if let Some(repr) = out.get_mut(&alias.course_id) {
                repr.aliases.push(alias.name);
            }
        }
        for repr in out.values_mut() {
            repr.aliases.sort();
        }

        Ok(out)
    }
}
