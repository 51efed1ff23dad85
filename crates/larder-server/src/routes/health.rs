use axum::Json;
use axum::extract::State;
use serde::Serialize;
use serde_json::{Value, json};

use larder_core::aggregate::{CollectionSummary, collection_summary};

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: jiff::Timestamp,
    pub database: CollectionSummary,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.store.lock().await;
    Json(HealthResponse {
        status: "OK",
        timestamp: jiff::Timestamp::now(),
        database: collection_summary(store.all()),
    })
}

pub async fn api_info() -> Json<Value> {
    Json(json!({
        "message": "Recipe API is running!",
        "endpoints": {
            "health": "/api/health",
            "recipes": "/api/recipes",
            "uploads": "/uploads",
        }
    }))
}
