use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use super::{Resource, ResourceKind, Scope};
use crate::entity::{document, item, item_document};
use crate::error::AppError;
use crate::models::document::{
    CreateDocumentRequest, DocumentResponse, UpdateDocumentRequest, validate_create_document,
    validate_update_document,
};
use crate::policy::document_visible_to_public;

pub struct Documents;

/// Ids of visible items among the given ones.
async fn visible_items_among<C: ConnectionTrait>(
    db: &C,
    among: &[i32],
) -> Result<HashSet<i32>, AppError> {
    if among.is_empty() {
        return Ok(HashSet::new());
    }
    Ok(item::Entity::find()
        .filter(item::Column::Visible.eq(true))
        .filter(item::Column::Id.is_in(among.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect())
}

#[async_trait]
impl Resource for Documents {
    const KIND: ResourceKind = ResourceKind::Documents;

    type Create = CreateDocumentRequest;
    type Update = UpdateDocumentRequest;
    type Repr = DocumentResponse;

    async fn validate_create<C: ConnectionTrait>(
        _db: &C,
        data: &Self::Create,
    ) -> Result<(), AppError> {
        validate_create_document(data)
    }

    async fn validate_update<C: ConnectionTrait>(
        _db: &C,
        data: &Self::Update,
    ) -> Result<(), AppError> {
        validate_update_document(data)
    }

    async fn insert<C: ConnectionTrait>(db: &C, data: Self::Create) -> Result<i32, AppError> {
        let model = document::ActiveModel {
            filename: Set(data.filename),
            downloadable: Set(data.downloadable),
            content_type: Set(data.content_type),
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
        let existing = document::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(super::not_found::<Self>)?;

        let mut active: document::ActiveModel = existing.into();
        let mut dirty = false;
        if let Some(filename) = data.filename {
            active.filename = Set(filename);
            dirty = true;
        }
        if let Some(downloadable) = data.downloadable {
            active.downloadable = Set(downloadable);
            dirty = true;
        }
        if let Some(content_type) = data.content_type {
            active.content_type = Set(content_type);
            dirty = true;
        }
        if dirty {
            active.update(db).await?;
        }
        Ok(())
    }

    async fn remove<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, AppError> {
        item_document::Entity::delete_many()
            .filter(item_document::Column::DocumentId.eq(id))
            .exec(db)
            .await?;

        let res = document::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn fetch<C: ConnectionTrait>(
        db: &C,
        id: i32,
        scope: Scope,
    ) -> Result<Option<Self::Repr>, AppError> {
        let Some(model) = document::Entity::find_by_id(id).one(db).await? else {
            return Ok(None);
        };

        if scope == Scope::PublicOnly {
            let attached: Vec<i32> = item_document::Entity::find()
                .filter(item_document::Column::DocumentId.eq(id))
                .all(db)
                .await?
                .into_iter()
                .map(|link| link.item_id)
                .collect();
            let visible = visible_items_among(db, &attached).await?;

            if !document_visible_to_public(model.downloadable, &attached, &visible) {
                return Ok(None);
            }
        }

        Ok(Some(model.into()))
    }

    async fn fetch_all<C: ConnectionTrait>(
        db: &C,
        scope: Scope,
    ) -> Result<BTreeMap<i32, Self::Repr>, AppError> {
        let rows = document::Entity::find().all(db).await?;

        if scope == Scope::All {
            return Ok(rows
                .into_iter()
                .map(|m| (m.id, DocumentResponse::from(m)))
                .collect());
        }

        let mut attachments: HashMap<i32, Vec<i32>> = HashMap::new();
        for link in item_document::Entity::find().all(db).await? {
            attachments
                .entry(link.document_id)
                .or_default()
                .push(link.item_id);
        }
        let visible: HashSet<i32> = item::Entity::find()
            .filter(item::Column::Visible.eq(true))
            .all(db)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        Ok(rows
            .into_iter()
            .filter(|m| {
                let attached = attachments.get(&m.id).map(Vec::as_slice).unwrap_or(&[]);
                document_visible_to_public(m.downloadable, attached, &visible)
            })
            .map(|m| (m.id, DocumentResponse::from(m)))
            .collect())
    }
}
