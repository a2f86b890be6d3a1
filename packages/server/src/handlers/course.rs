use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::instrument;

use crate::engine::{self, Caller, Courses};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::course::{CourseResponse, CreateCourseRequest, UpdateCourseRequest};
use crate::models::shared::CreatedResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/courses",
    tag = "Courses",
    operation_id = "listCourses",
    summary = "List all courses as an id-to-representation map",
    responses(
        (status = 200, description = "Map of course id to representation"),
    ),
)]
#[instrument(skip(state, caller))]
pub async fn list_courses(
    caller: Caller,
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<i32, CourseResponse>>, AppError> {
    Ok(Json(engine::list::<Courses>(&state.db, &caller).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/courses",
    tag = "Courses",
    operation_id = "createCourse",
    summary = "Create a new course",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    let id = engine::create::<Courses>(&state.db, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    tag = "Courses",
    operation_id = "getCourse",
    summary = "Get a course by id",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course representation", body = CourseResponse),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, caller), fields(id))]
pub async fn get_course(
    caller: Caller,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CourseResponse>, AppError> {
    Ok(Json(engine::get::<Courses>(&state.db, &caller, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/courses/{id}",
    tag = "Courses",
    operation_id = "updateCourse",
    summary = "Partially update a course",
    description = "PATCH semantics field by field; a present `aliases` list fully replaces the stored alias set.",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(id))]
pub async fn update_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    let caller = Caller::from(auth_user);
    Ok(Json(
        engine::update::<Courses>(&state.db, &caller, id, payload).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/courses/{id}",
    tag = "Courses",
    operation_id = "deleteCourse",
    summary = "Delete a course",
    description = "Items referencing this course lose the reference; their other fields are untouched.",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("bearer" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let caller = Caller::from(auth_user);
    engine::delete::<Courses>(&state.db, &caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
