use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use super::{Resource, ResourceKind, Scope};
use crate::entity::{author, item_author};
use crate::error::AppError;
use crate::models::author::{
    AuthorResponse, CreateAuthorRequest, UpdateAuthorRequest, validate_create_author,
    validate_update_author,
};

pub struct Authors;

#[async_trait]
impl Resource for Authors {
    const KIND: ResourceKind = ResourceKind::Authors;

    type Create = CreateAuthorRequest;
    type Update = UpdateAuthorRequest;
    type Repr = AuthorResponse;

    async fn validate_create<C: ConnectionTrait>(
        _db: &C,
        data: &Self::Create,
    ) -> Result<(), AppError> {
        validate_create_author(data)
    }

    async fn validate_update<C: ConnectionTrait>(
        _db: &C,
        data: &Self::Update,
    ) -> Result<(), AppError> {
        validate_update_author(data)
    }

    async fn insert<C: ConnectionTrait>(db: &C, data: Self::Create) -> Result<i32, AppError> {
        let model = author::ActiveModel {
            name: Set(data.name),
            ..Default::default()
        }
        .insert(db)
        .await?;
        Ok(model.id)
    }

    async fn apply_update<C: ConnectionTrait>(
        db: &C,
        id: i32,
        data: Self::Update,
    ) -> Result<(), AppError> {
        let existing = author::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(super::not_found::<Self>)?;

        let mut active: author::ActiveModel = existing.into();
        if let Some(name) = data.name {
            active.name = Set(name);
            active.update(db).await?;
        }
        Ok(())
    }

    async fn remove<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, AppError> {
        item_author::Entity::delete_many()
            .filter(item_author::Column::AuthorId.eq(id))
            .exec(db)
            .await?;

        let res = author::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn fetch<C: ConnectionTrait>(
        db: &C,
        id: i32,
        _scope: Scope,
    ) -> Result<Option<Self::Repr>, AppError> {
        Ok(author::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(AuthorResponse::from))
    }

    async fn fetch_all<C: ConnectionTrait>(
        db: &C,
        _scope: Scope,
    ) -> Result<BTreeMap<i32, Self::Repr>, AppError> {
        Ok(author::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, AuthorResponse::from(m)))
            .collect())
    }
}
