use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::engine::{self, Caller, Folders};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::folder::{CreateFolderRequest, FolderResponse, UpdateFolderRequest};
use crate::models::shared::CreatedResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/folders",
    tag = "Folders",
    operation_id = "listFolders",
    summary = "List all folders as an id-to-representation map",
    responses(
        (status = 200, description = "Map of folder id to representation"),
    ),
)]
#[instrument(skip(state, caller))]
pub async fn list_folders(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<i32, FolderResponse>>, AppError> {
    Ok(Json(engine::list::<Folders>(&state.db, &caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/folders",
    tag = "Folders",
    operation_id = "createFolder",
    summary = "Create a new folder",
    request_body = CreateFolderRequest,
    responses(
        (status = 201, description = "Folder created", body = CreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_folder(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFolderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    let id = engine::create::<Folders>(&state.db, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/api/v1/folders/{id}",
    tag = "Folders",
    operation_id = "getFolder",
    summary = "Get a folder by id",
    params(("id" = i32, Path, description = "Folder ID")),
    responses(
        (status = 200, description = "Folder representation", body = FolderResponse),
        (status = 404, description = "Folder not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller), fields(id))]
pub async fn get_folder(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FolderResponse>, AppError> {
    Ok(Json(engine::get::<Folders>(&state.db, &caller, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/folders/{id}",
    tag = "Folders",
    operation_id = "updateFolder",
    summary = "Partially update a folder",
    params(("id" = i32, Path, description = "Folder ID")),
    request_body = UpdateFolderRequest,
    responses(
        (status = 200, description = "Folder updated", body = FolderResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Folder not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_folder(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateFolderRequest>,
) -> Result<Json<FolderResponse>, AppError> {
    let caller = Caller::from(auth_user);
    Ok(Json(
        engine::update::<Folders>(&state.db, &caller, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/folders/{id}",
    tag = "Folders",
    operation_id = "deleteFolder",
    summary = "Delete a folder",
    params(("id" = i32, Path, description = "Folder ID")),
    responses(
        (status = 204, description = "Folder deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Folder not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_folder(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    engine::delete::<Folders>(&state.db, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
