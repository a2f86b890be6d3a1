use std::collections::BTreeMap;

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use sha2::{Digest, Sha256};
use tracing::instrument;

use crate::engine::{self, Caller, Documents};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::document::{CreateDocumentRequest, DocumentResponse, UpdateDocumentRequest};
use crate::models::shared::CreatedResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/documents",
    tag = "Documents",
    operation_id = "listDocuments",
    summary = "List documents as an id-to-representation map",
    description = "Anonymous callers only receive documents that are downloadable and not \
        attached exclusively to hidden items.",
    responses(
        (status = 200, description = "Map of document id to representation"),
    ),
)]
#[instrument(skip(state, caller))]
pub async fn list_documents(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<i32, DocumentResponse>>, AppError> {
    Ok(Json(engine::list::<Documents>(&state.db, &caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/documents",
    tag = "Documents",
    operation_id = "createDocument",
    summary = "Create a new document's metadata",
    description = "Creates the metadata row only; the payload is supplied via the upload \
        endpoint. The filename must be a flat secure filename and the content type must \
        be allowlisted.",
    request_body = CreateDocumentRequest,
    responses(
        (status = 201, description = "Document created", body = CreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(filename = %payload.filename))]
pub async fn create_document(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDocumentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    let id = engine::create::<Documents>(&state.db, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}",
    tag = "Documents",
    operation_id = "getDocument",
    summary = "Get a document's metadata by id",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document representation", body = DocumentResponse),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller), fields(id))]
pub async fn get_document(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DocumentResponse>, AppError> {
    Ok(Json(engine::get::<Documents>(&state.db, &caller, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/documents/{id}",
    tag = "Documents",
    operation_id = "updateDocument",
    summary = "Partially update a document's metadata",
    params(("id" = i32, Path, description = "Document ID")),
    request_body = UpdateDocumentRequest,
    responses(
        (status = 200, description = "Document updated", body = DocumentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_document(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateDocumentRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let caller = Caller::from(auth_user);
    Ok(Json(
        engine::update::<Documents>(&state.db, &caller, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/documents/{id}",
    tag = "Documents",
    operation_id = "deleteDocument",
    summary = "Delete a document and its stored payload",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_document(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    engine::delete::<Documents>(&state.db, &caller, id).await?;

    // Payload removal is best-effort; a document without an upload is fine.
    if let Err(err) = state.docs.delete(id).await {
        tracing::warn!("Failed to remove stored file for document {id}: {err}");
    }

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/documents/{id}/upload",
    tag = "Documents",
    operation_id = "uploadDocument",
    summary = "Upload a document's payload",
    description = "Raw request body. The declared `Content-Type` header must equal the \
        content type the document was created with; re-uploading replaces the payload.",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Payload stored"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Document not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, headers, body), fields(id))]
pub async fn upload_document(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    let doc = engine::get::<Documents>(&state.db, &caller, id).await?;

    let declared = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Validation("Content-Type header is required".into()))?;
    if declared != doc.content_type {
        return Err(AppError::Validation(format!(
            "Content type {declared} does not match the document's {}",
            doc.content_type
        )));
    }

    state.docs.put(id, &body).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/documents/{id}/download",
    tag = "Documents",
    operation_id = "downloadDocument",
    summary = "Download a document's payload",
    description = "Streams the payload as an attachment. Anonymous callers only reach \
        documents that are downloadable and visible through their items. Supports \
        ETag-based caching via If-None-Match.",
    params(("id" = i32, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document payload"),
        (status = 304, description = "Not Modified (ETag match)"),
        (status = 404, description = "Document or payload not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller, headers), fields(id))]
pub async fn download_document(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let doc = engine::get::<Documents>(&state.db, &caller, id).await?;
    let bytes = state.docs.get(id).await?;

    let etag_value = format!("\"{}\"", hex::encode(Sha256::digest(&bytes)));
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && let Ok(val) = if_none_match.to_str()
        && (val == etag_value || val == "*")
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, doc.content_type)
        .header(header::CONTENT_LENGTH, bytes.len().to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&doc.filename),
        )
        .header(header::ETAG, &etag_value)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(Body::from(bytes))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => String::from(b as char),
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("attachment; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
