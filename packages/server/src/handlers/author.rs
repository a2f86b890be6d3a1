use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::engine::{self, Authors, Caller};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::author::{AuthorResponse, CreateAuthorRequest, UpdateAuthorRequest};
use crate::models::shared::CreatedResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/authors",
    tag = "Authors",
    operation_id = "listAuthors",
    summary = "List all authors as an id-to-representation map",
    responses(
        (status = 200, description = "Map of author id to representation"),
    ),
)]
#[instrument(skip(state, caller))]
pub async fn list_authors(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<i32, AuthorResponse>>, AppError> {
    Ok(Json(engine::list::<Authors>(&state.db, &caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/authors",
    tag = "Authors",
    operation_id = "createAuthor",
    summary = "Create a new author",
    request_body = CreateAuthorRequest,
    responses(
        (status = 201, description = "Author created", body = CreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_author(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateAuthorRequest>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    let id = engine::create::<Authors>(&state.db, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/api/v1/authors/{id}",
    tag = "Authors",
    operation_id = "getAuthor",
    summary = "Get an author by id",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author representation", body = AuthorResponse),
        (status = 404, description = "Author not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller), fields(id))]
pub async fn get_author(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<AuthorResponse>, AppError> {
    Ok(Json(engine::get::<Authors>(&state.db, &caller, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/authors/{id}",
    tag = "Authors",
    operation_id = "updateAuthor",
    summary = "Partially update an author",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = UpdateAuthorRequest,
    responses(
        (status = 200, description = "Author updated", body = AuthorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Author not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_author(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateAuthorRequest>,
) -> Result<Json<AuthorResponse>, AppError> {
    let caller = Caller::from(auth_user);
    Ok(Json(
        engine::update::<Authors>(&state.db, &caller, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/authors/{id}",
    tag = "Authors",
    operation_id = "deleteAuthor",
    summary = "Delete an author",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Author not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_author(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    engine::delete::<Authors>(&state.db, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
