use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use super::{Resource, ResourceKind, Scope};
use crate::entity::{folder, item_folder};
use crate::error::AppError;
use crate::models::folder::{
    CreateFolderRequest, FolderResponse, UpdateFolderRequest, validate_create_folder,
    validate_update_folder,
};

pub struct Folders;

#[async_trait]
impl Resource for Folders {
    const KIND: ResourceKind = ResourceKind::Folders;

    type Create = CreateFolderRequest;
    type Update = UpdateFolderRequest;
    type Repr = FolderResponse;

    async fn validate_create<C: ConnectionTrait>(
        _db: &C,
        data: &Self::Create,
    ) -> Result<(), AppError> {
        validate_create_folder(data)
    }

    async fn validate_update<C: ConnectionTrait>(
        _db: &C,
        data: &Self::Update,
    ) -> Result<(), AppError> {
        validate_update_folder(data)
    }

    async fn insert<C: ConnectionTrait>(db: &C, data: Self::Create) -> Result<i32, AppError> {
        let model = folder::ActiveModel {
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
        let existing = folder::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(super::not_found::<Self>)?;

        let mut active: folder::ActiveModel = existing.into();
        if let Some(name) = data.name {
            active.name = Set(name);
            active.update(db).await?;
        }
        Ok(())
    }

    async fn remove<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, AppError> {
        item_folder::Entity::delete_many()
            .filter(item_folder::Column::FolderId.eq(id))
            .exec(db)
            .await?;

        let res = folder::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn fetch<C: ConnectionTrait>(
        db: &C,
        id: i32,
        _scope: Scope,
    ) -> Result<Option<Self::Repr>, AppError> {
        Ok(folder::Entity::find_by_id(id)
            .one(db)
            .await?
            .map(FolderResponse::from))
    }

    async fn fetch_all<C: ConnectionTrait>(
        db: &C,
        _scope: Scope,
    ) -> Result<BTreeMap<i32, Self::Repr>, AppError> {
        Ok(folder::Entity::find()
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, FolderResponse::from(m)))
            .collect())
    }
}
