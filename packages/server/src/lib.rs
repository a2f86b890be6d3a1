pub mod config;
pub mod database;
pub mod engine;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod routes;
pub mod state;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Exam Archive API",
        version = "1.0.0",
        description = "API for an archive of exam documents: items tagged with courses, \
            authors and physical folders, each carrying binary documents"
    ),
    paths(
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::me,
        handlers::document::list_documents,
        handlers::document::create_document,
        handlers::document::get_document,
        handlers::document::update_document,
        handlers::document::delete_document,
        handlers::document::upload_document,
        handlers::document::download_document,
        handlers::course::list_courses,
        handlers::course::create_course,
        handlers::course::get_course,
        handlers::course::update_course,
        handlers::course::delete_course,
        handlers::folder::list_folders,
        handlers::folder::create_folder,
        handlers::folder::get_folder,
        handlers::folder::update_folder,
        handlers::folder::delete_folder,
        handlers::author::list_authors,
        handlers::author::create_author,
        handlers::author::get_author,
        handlers::author::update_author,
        handlers::author::delete_author,
        handlers::item::list_items,
        handlers::item::create_item,
        handlers::item::get_item,
        handlers::item::update_item,
        handlers::item::delete_item,
    ),
    tags(
        (name = "Auth", description = "Login, logout and principal info"),
        (name = "Documents", description = "Document metadata and payload management"),
        (name = "Courses", description = "Course CRUD operations"),
        (name = "Folders", description = "Physical folder CRUD operations"),
        (name = "Authors", description = "Author CRUD operations"),
        (name = "Items", description = "Archived exam/lecture records"),
    ),
    modifiers(&SecurityAddon),
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes(&state))
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let mut layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age));

    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {origin}");
                None
            }
        })
        .collect();
    if !origins.is_empty() {
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    layer
}
