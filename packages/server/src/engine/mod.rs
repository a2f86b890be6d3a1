//! The generic CRUD engine shared by all five resource kinds.
//!
//! Each kind supplies a [`Resource`] descriptor: its payload types, its
//! validation hooks, and how its rows and relation sets are stored. The
//! operations in this module layer caller privileges, visibility scoping
//! and transaction handling on top, so the per-kind code stays free of
//! policy concerns.

pub mod author;
pub mod course;
pub mod document;
pub mod folder;
pub mod item;

use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub use author::Authors;
pub use course::Courses;
pub use document::Documents;
pub use folder::Folders;
pub use item::Items;

/// The fixed set of archived resource kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Documents,
    Courses,
    Folders,
    Authors,
    Items,
}

impl ResourceKind {
    /// Collection name, as used in URLs and access-rule keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Courses => "courses",
            Self::Folders => "folders",
            Self::Authors => "authors",
            Self::Items => "items",
        }
    }

    /// Singular display name for error messages.
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Documents => "Document",
            Self::Courses => "Course",
            Self::Folders => "Folder",
            Self::Authors => "Author",
            Self::Items => "Item",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "documents" => Some(Self::Documents),
            "courses" => Some(Self::Courses),
            "folders" => Some(Self::Folders),
            "authors" => Some(Self::Authors),
            "items" => Some(Self::Items),
            _ => None,
        }
    }
}

/// The identity a core operation runs under. The transport layer builds
/// this from the request's bearer token; the core never sees headers.
#[derive(Clone, Debug)]
pub enum Caller {
    Authenticated { username: String },
    Anonymous,
}

impl Caller {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The read scope this caller operates in.
    pub fn scope(&self) -> Scope {
        if self.is_authenticated() {
            Scope::All
        } else {
            Scope::PublicOnly
        }
    }

    /// Write privilege is boolean: the configured principal has it,
    /// anonymous callers do not.
    pub fn require_write(&self) -> Result<(), AppError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

/// Which entities a read operation may surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    /// Everything, hidden or not.
    All,
    /// Only entities the visibility policy exposes to anonymous callers.
    PublicOnly,
}

/// Descriptor of one resource kind: payload types plus storage and
/// validation hooks. All mutation hooks run inside the transaction the
/// engine opened, so a failing hook never leaves partial state behind.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    const KIND: ResourceKind;

    type Create: DeserializeOwned + Send + Sync + 'static;
    type Update: DeserializeOwned + Default + PartialEq + Send + Sync + 'static;
    type Repr: Serialize + Send + Sync + 'static;

    /// Kind-specific validation of a full create payload, including
    /// referenced-id existence checks against the store.
    async fn validate_create<C: ConnectionTrait>(
        db: &C,
        data: &Self::Create,
    ) -> Result<(), AppError>;

    /// Kind-specific validation of a partial update payload; only fields
    /// present in the payload are checked.
    async fn validate_update<C: ConnectionTrait>(
        db: &C,
        data: &Self::Update,
    ) -> Result<(), AppError>;

    /// Insert the scalar row and any relation sets; returns the new id.
    async fn insert<C: ConnectionTrait>(db: &C, data: Self::Create) -> Result<i32, AppError>;

    /// Merge the present fields of `data` over the stored row, replacing
    /// exactly the relation sets the payload names. `NotFound` if the row
    /// does not exist.
    async fn apply_update<C: ConnectionTrait>(
        db: &C,
        id: i32,
        data: Self::Update,
    ) -> Result<(), AppError>;

    /// Remove the row and its relation memberships. Returns `false` if the
    /// row did not exist.
    async fn remove<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, AppError>;

    /// Fetch one entity's representation within the given scope.
    async fn fetch<C: ConnectionTrait>(
        db: &C,
        id: i32,
        scope: Scope,
    ) -> Result<Option<Self::Repr>, AppError>;

    /// Fetch all representations within the given scope, keyed by id.
    async fn fetch_all<C: ConnectionTrait>(
        db: &C,
        scope: Scope,
    ) -> Result<BTreeMap<i32, Self::Repr>, AppError>;
}

fn not_found<R: Resource>() -> AppError {
    AppError::NotFound(format!("{} not found", R::KIND.singular()))
}

/// List every entity of a kind the caller may see, keyed by id.
pub async fn list<R: Resource>(
    db: &DatabaseConnection,
    caller: &Caller,
) -> Result<BTreeMap<i32, R::Repr>, AppError> {
    R::fetch_all(db, caller.scope()).await
}

/// Fetch one entity the caller may see. Entities outside the caller's
/// scope answer `NotFound`, indistinguishable from absent ids.
pub async fn get<R: Resource>(
    db: &DatabaseConnection,
    caller: &Caller,
    id: i32,
) -> Result<R::Repr, AppError> {
    R::fetch(db, id, caller.scope())
        .await?
        .ok_or_else(not_found::<R>)
}

/// Validate and insert a new entity; returns the assigned id.
pub async fn create<R: Resource>(
    db: &DatabaseConnection,
    caller: &Caller,
    data: R::Create,
) -> Result<i32, AppError> {
    caller.require_write()?;

    let txn = db.begin().await?;
    R::validate_create(&txn, &data).await?;
    let id = R::insert(&txn, data).await?;
    txn.commit().await?;

    Ok(id)
}

/// Partially update an entity and return its new representation. Fields
/// absent from the payload keep their stored values.
pub async fn update<R: Resource>(
    db: &DatabaseConnection,
    caller: &Caller,
    id: i32,
    data: R::Update,
) -> Result<R::Repr, AppError> {
    caller.require_write()?;

    // An empty patch only has to prove the row exists.
    if data == R::Update::default() {
        return R::fetch(db, id, Scope::All)
            .await?
            .ok_or_else(not_found::<R>);
    }

    let txn = db.begin().await?;
    R::validate_update(&txn, &data).await?;
    R::apply_update(&txn, id, data).await?;
    let repr = R::fetch(&txn, id, Scope::All)
        .await?
        .ok_or_else(|| AppError::Internal("row missing after update".into()))?;
    txn.commit().await?;

    Ok(repr)
}

/// Delete an entity and its relation memberships.
pub async fn delete<R: Resource>(
    db: &DatabaseConnection,
    caller: &Caller,
    id: i32,
) -> Result<(), AppError> {
    caller.require_write()?;

    let txn = db.begin().await?;
    if !R::remove(&txn, id).await? {
        return Err(not_found::<R>());
    }
    txn.commit().await?;

    Ok(())
}
