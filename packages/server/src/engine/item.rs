use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use super::{Resource, ResourceKind, Scope};
use crate::entity::{
    author, course, document, folder, item, item_author, item_course, item_document, item_folder,
};
use crate::error::AppError;
use crate::models::item::{
    CreateItemRequest, ItemResponse, UpdateItemRequest, validate_create_item, validate_update_item,
};

pub struct Items;

/// Relation id lists arrive as JSON arrays but are sets; duplicates
/// collapse silently.
fn id_set(ids: &[i32]) -> BTreeSet<i32> {
    ids.iter().copied().collect()
}

/// Fail unless every id in `ids` names an existing row of the relation's
/// target table. Runs inside the caller's transaction, so a concurrent
/// delete cannot slip a dangling reference past the check.
async fn ensure_known<C: ConnectionTrait>(
    db: &C,
    relation: &str,
    ids: &BTreeSet<i32>,
) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }

    let found = match relation {
        "documents" => {
            document::Entity::find()
                .filter(document::Column::Id.is_in(ids.iter().copied()))
                .count(db)
                .await?
        }
        "authors" => {
            author::Entity::find()
                .filter(author::Column::Id.is_in(ids.iter().copied()))
                .count(db)
                .await?
        }
        "courses" => {
            course::Entity::find()
                .filter(course::Column::Id.is_in(ids.iter().copied()))
                .count(db)
                .await?
        }
        _ => {
            folder::Entity::find()
                .filter(folder::Column::Id.is_in(ids.iter().copied()))
                .count(db)
                .await?
        }
    };

    if found as usize != ids.len() {
        return Err(AppError::Validation(format!(
            "{relation} contains unknown ids"
        )));
    }
    Ok(())
}

/// Atomically replace the full membership set of one relation
/// (delete-then-insert under the caller's transaction).
async fn set_documents<C: ConnectionTrait>(
    db: &C,
    item_id: i32,
    ids: &BTreeSet<i32>,
) -> Result<(), AppError> {
    item_document::Entity::delete_many()
        .filter(item_document::Column::ItemId.eq(item_id))
        .exec(db)
        .await?;
    if !ids.is_empty() {
        let rows = ids.iter().map(|&id| item_document::ActiveModel {
            item_id: Set(item_id),
            document_id: Set(id),
        });
        item_document::Entity::insert_many(rows).exec(db).await?;
    }
    Ok(())
}

async fn set_authors<C: ConnectionTrait>(
    db: &C,
    item_id: i32,
    ids: &BTreeSet<i32>,
) -> Result<(), AppError> {
    item_author::Entity::delete_many()
        .filter(item_author::Column::ItemId.eq(item_id))
        .exec(db)
        .await?;
    if !ids.is_empty() {
        let rows = ids.iter().map(|&id| item_author::ActiveModel {
            item_id: Set(item_id),
            author_id: Set(id),
        });
        item_author::Entity::insert_many(rows).exec(db).await?;
    }
    Ok(())
}

async fn set_courses<C: ConnectionTrait>(
    db: &C,
    item_id: i32,
    ids: &BTreeSet<i32>,
) -> Result<(), AppError> {
    item_course::Entity::delete_many()
        .filter(item_course::Column::ItemId.eq(item_id))
        .exec(db)
        .await?;
    if !ids.is_empty() {
        let rows = ids.iter().map(|&id| item_course::ActiveModel {
            item_id: Set(item_id),
            course_id: Set(id),
        });
        item_course::Entity::insert_many(rows).exec(db).await?;
    }
    Ok(())
}

async fn set_folders<C: ConnectionTrait>(
    db: &C,
    item_id: i32,
    ids: &BTreeSet<i32>,
) -> Result<(), AppError> {
    item_folder::Entity::delete_many()
        .filter(item_folder::Column::ItemId.eq(item_id))
        .exec(db)
        .await?;
    if !ids.is_empty() {
        let rows = ids.iter().map(|&id| item_folder::ActiveModel {
            item_id: Set(item_id),
            folder_id: Set(id),
        });
        item_folder::Entity::insert_many(rows).exec(db).await?;
    }
    Ok(())
}

/// Fill the relation id lists of one item representation.
async fn load_relations<C: ConnectionTrait>(
    db: &C,
    id: i32,
    repr: &mut ItemResponse,
) -> Result<(), AppError> {
    repr.documents = item_document::Entity::find()
        .filter(item_document::Column::ItemId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.document_id)
        .collect();
    repr.authors = item_author::Entity::find()
        .filter(item_author::Column::ItemId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.author_id)
        .collect();
    repr.courses = item_course::Entity::find()
        .filter(item_course::Column::ItemId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.course_id)
        .collect();
    repr.folders = item_folder::Entity::find()
        .filter(item_folder::Column::ItemId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.folder_id)
        .collect();

    repr.documents.sort_unstable();
    repr.authors.sort_unstable();
    repr.courses.sort_unstable();
    repr.folders.sort_unstable();
    Ok(())
}

#[async_trait]
impl Resource for Items {
    const KIND: ResourceKind = ResourceKind::Items;

    type Create = CreateItemRequest;
    type Update = UpdateItemRequest;
    type Repr = ItemResponse;

    async fn validate_create<C: ConnectionTrait>(
        db: &C,
        data: &Self::Create,
    ) -> Result<(), AppError> {
        validate_create_item(data)?;
        ensure_known(db, "documents", &id_set(&data.documents)).await?;
        ensure_known(db, "authors", &id_set(&data.authors)).await?;
        ensure_known(db, "courses", &id_set(&data.courses)).await?;
        ensure_known(db, "folders", &id_set(&data.folders)).await?;
        Ok(())
    }

    async fn validate_update<C: ConnectionTrait>(
        db: &C,
        data: &Self::Update,
    ) -> Result<(), AppError> {
        validate_update_item(data)?;
        if let Some(ref ids) = data.documents {
            ensure_known(db, "documents", &id_set(ids)).await?;
        }
        if let Some(ref ids) = data.authors {
            ensure_known(db, "authors", &id_set(ids)).await?;
        }
        if let Some(ref ids) = data.courses {
            ensure_known(db, "courses", &id_set(ids)).await?;
        }
        if let Some(ref ids) = data.folders {
            ensure_known(db, "folders", &id_set(ids)).await?;
        }
        Ok(())
    }

    async fn insert<C: ConnectionTrait>(db: &C, data: Self::Create) -> Result<i32, AppError> {
        let model = item::ActiveModel {
            name: Set(data.name),
            date: Set(data.date),
            visible: Set(data.visible),
            ..Default::default()
        }
        .insert(db)
        .await?;

        set_documents(db, model.id, &id_set(&data.documents)).await?;
        set_authors(db, model.id, &id_set(&data.authors)).await?;
        set_courses(db, model.id, &id_set(&data.courses)).await?;
        set_folders(db, model.id, &id_set(&data.folders)).await?;

        Ok(model.id)
    }

    async fn apply_update<C: ConnectionTrait>(
        db: &C,
        id: i32,
        data: Self::Update,
    ) -> Result<(), AppError> {
        let existing = item::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(super::not_found::<Self>)?;

        let mut active: item::ActiveModel = existing.into();
        let mut dirty = false;
        if let Some(name) = data.name {
            active.name = Set(name);
            dirty = true;
        }
        if let Some(date) = data.date {
            active.date = Set(date);
            dirty = true;
        }
        if let Some(visible) = data.visible {
            active.visible = Set(visible);
            dirty = true;
        }
        if dirty {
            active.update(db).await?;
        }

        // Relations not mentioned in the payload stay untouched.
        if let Some(ids) = data.documents {
            set_documents(db, id, &id_set(&ids)).await?;
        }
        if let Some(ids) = data.authors {
            set_authors(db, id, &id_set(&ids)).await?;
        }
        if let Some(ids) = data.courses {
            set_courses(db, id, &id_set(&ids)).await?;
        }
        if let Some(ids) = data.folders {
            set_folders(db, id, &id_set(&ids)).await?;
        }
        Ok(())
    }

    async fn remove<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, AppError> {
        // Join rows go first; the referenced documents, authors, courses
        // and folders themselves stay.
        let empty = BTreeSet::new();
        set_documents(db, id, &empty).await?;
        set_authors(db, id, &empty).await?;
        set_courses(db, id, &empty).await?;
        set_folders(db, id, &empty).await?;

        let res = item::Entity::delete_by_id(id).exec(db).await?;
        Ok(res.rows_affected > 0)
    }

    async fn fetch<C: ConnectionTrait>(
        db: &C,
        id: i32,
        scope: Scope,
    ) -> Result<Option<Self::Repr>, AppError> {
        let mut query = item::Entity::find_by_id(id);
        if scope == Scope::PublicOnly {
            query = query.filter(item::Column::Visible.eq(true));
        }
        let Some(model) = query.one(db).await? else {
            return Ok(None);
        };

        let mut repr = ItemResponse::from_row(model);
        load_relations(db, id, &mut repr).await?;
        Ok(Some(repr))
    }

    async fn fetch_all<C: ConnectionTrait>(
        db: &C,
        scope: Scope,
    ) -> Result<BTreeMap<i32, Self::Repr>, AppError> {
        let mut query = item::Entity::find();
        if scope == Scope::PublicOnly {
            query = query.filter(item::Column::Visible.eq(true));
        }

        let mut out: BTreeMap<i32, ItemResponse> = query
            .all(db)
            .await?
            .into_iter()
            .map(|m| (m.id, ItemResponse::from_row(m)))
            .collect();

        for link in item_document::Entity::find().all(db).await? {
            if let Some(repr) = out.get_mut(&link.item_id) {
                repr.documents.push(link.document_id);
            }
        }
        for link in item_author::Entity::find().all(db).await? {
            if let Some(repr) = out.get_mut(&link.item_id) {
                repr.authors.push(link.author_id);
            }
        }
        for link in item_course::Entity::find().all(db).await? {
            if let Some(repr) = out.get_mut(&link.item_id) {
                repr.courses.push(link.course_id);
            }
        }
        for link in item_folder::Entity::find().all(db).await? {
            if let Some(repr) = out.get_mut(&link.item_id) {
                repr.folders.push(link.folder_id);
            }
        }

        for repr in out.values_mut() {
            repr.documents.sort_unstable();
            repr.authors.sort_unstable();
            repr.courses.sort_unstable();
            repr.folders.sort_unstable();
        }

        Ok(out)
    }
}
