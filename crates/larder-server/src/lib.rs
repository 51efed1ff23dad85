//! larder-server
//!
//! HTTP surface over the recipe store: JSON API, image uploads and static
//! serving of stored images.

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{delete, get, patch, post, put};
use larder_core::upload_keys::UPLOADS_ROUTE;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use config::ServerConfig;
use state::AppState;

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new().allow_origin(origin.clone()),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        .route("/", get(routes::health::api_info))
        .route("/api/health", get(routes::health::health_check))
        .route("/api/recipes", get(routes::recipes::list_recipes))
        .route("/api/recipes", post(routes::recipes::create_recipe))
        .route("/api/recipes/{id}", get(routes::recipes::get_recipe))
        .route("/api/recipes/{id}", put(routes::recipes::update_recipe))
        .route("/api/recipes/{id}", delete(routes::recipes::delete_recipe))
        .route("/api/recipes/{id}/pin", patch(routes::recipes::set_pinned))
        .route(
            "/api/recipes/{id}/ingredients",
            get(routes::recipes::get_ingredient_lines),
        )
        .nest_service(UPLOADS_ROUTE, ServeDir::new(&config.uploads_dir))
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
