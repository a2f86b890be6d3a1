use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::engine::{self, Caller, Items};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::item::{CreateItemRequest, ItemResponse, UpdateItemRequest};
use crate::models::shared::CreatedResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/items",
    tag = "Items",
    operation_id = "listItems",
    summary = "List items as an id-to-representation map",
    description = "Anonymous callers only receive items whose `visible` flag is set; \
        the authenticated principal sees everything.",
    responses(
        (status = 200, description = "Map of item id to representation"),
    ),
)]
#[instrument(skip(state, caller))]
pub async fn list_items(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<i32, ItemResponse>>, AppError> {
    Ok(Json(engine::list::<Items>(&state.db, &caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    tag = "Items",
    operation_id = "createItem",
    summary = "Create a new item",
    description = "Relation lists (`documents`, `authors`, `courses`, `folders`) may only \
        reference existing ids; unknown ids fail the whole request and nothing is written.",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = CreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    let id = engine::create::<Items>(&state.db, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    tag = "Items",
    operation_id = "getItem",
    summary = "Get an item by id",
    description = "Hidden items answer 404 to anonymous callers; existence is not leaked.",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item representation", body = ItemResponse),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller), fields(id))]
pub async fn get_item(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse>, AppError> {
    Ok(Json(engine::get::<Items>(&state.db, &caller, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/items/{id}",
    tag = "Items",
    operation_id = "updateItem",
    summary = "Partially update an item",
    description = "PATCH semantics field by field. A present relation list fully replaces \
        that relation's membership set; absent relations stay untouched. `date: null` \
        clears the stored date.",
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    let caller = Caller::from(auth_user);
    Ok(Json(
        engine::update::<Items>(&state.db, &caller, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    tag = "Items",
    operation_id = "deleteItem",
    summary = "Delete an item",
    description = "Removes the item and its relation memberships; the referenced documents, \
        authors, courses and folders stay in the archive.",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    engine::delete::<Items>(&state.db, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
