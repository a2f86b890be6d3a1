use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{ConnectInfo, DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};

use crate::engine::ResourceKind;
use crate::error::AppError;
use crate::handlers;
use crate::policy::AccessPolicy;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let upload_limit = state.config.storage.max_document_size as usize + 1024;

    Router::new()
        .nest("/auth", auth_routes())
        .nest(
            "/documents",
            guarded(document_routes(upload_limit), ResourceKind::Documents, state),
        )
        .nest(
            "/courses",
            guarded(course_routes(), ResourceKind::Courses, state),
        )
        .nest(
            "/folders",
            guarded(folder_routes(), ResourceKind::Folders, state),
        )
        .nest(
            "/authors",
            guarded(author_routes(), ResourceKind::Authors, state),
        )
        .nest("/items", guarded(item_routes(), ResourceKind::Items, state))
}

/// Apply the network access rules for one resource kind in front of a
/// subtree. Requests are screened before any handler or engine code runs.
fn guarded(router: Router<AppState>, kind: ResourceKind, state: &AppState) -> Router<AppState> {
    let policy = state.access.clone();
    router.layer(middleware::from_fn(move |req: Request, next: Next| {
        let policy = policy.clone();
        async move { enforce_network_rules(kind, policy, req, next).await }
    }))
}

async fn enforce_network_rules(
    kind: ResourceKind,
    policy: Arc<AccessPolicy>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if policy.is_empty() {
        return Ok(next.run(req).await);
    }

    let addr = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    match addr {
        Some(ip) if policy.permits(kind, ip) => Ok(next.run(req).await),
        Some(_) => Err(AppError::PermissionDenied),
        None => {
            tracing::warn!(
                "Rejecting {} request: peer address unavailable",
                kind.as_str()
            );
            Err(AppError::PermissionDenied)
        }
    }
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/me", get(handlers::auth::me))
}

fn document_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::document::list_documents).post(handlers::document::create_document),
        )
        .route(
            "/{id}",
            get(handlers::document::get_document)
                .patch(handlers::document::update_document)
                .delete(handlers::document::delete_document),
        )
        .route(
            "/{id}/upload",
            post(handlers::document::upload_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/{id}/download", get(handlers::document::download_document))
}

fn course_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::course::list_courses).post(handlers::course::create_course),
        )
        .route(
            "/{id}",
            get(handlers::course::get_course)
                .patch(handlers::course::update_course)
                .delete(handlers::course::delete_course),
        )
}

fn folder_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::folder::list_folders).post(handlers::folder::create_folder),
        )
        .route(
            "/{id}",
            get(handlers::folder::get_folder)
                .patch(handlers::folder::update_folder)
                .delete(handlers::folder::delete_folder),
        )
}

fn author_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::author::list_authors).post(handlers::author::create_author),
        )
        .route(
            "/{id}",
            get(handlers::author::get_author)
                .patch(handlers::author::update_author)
                .delete(handlers::author::delete_author),
        )
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::item::list_items).post(handlers::item::create_item),
        )
        .route(
            "/{id}",
            get(handlers::item::get_item)
                .patch(handlers::item::update_item)
                .delete(handlers::item::delete_item),
        )
}
