use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::server::app::AxumAppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    ai_configured: bool,
    groups: usize,
}

/// Liveness banner
pub async fn root_handler() -> &'static str {
    "Lunch Order API is Running!"
}

/// Health check endpoint
///
/// Always 200 while the process serves requests. `ai_configured` is false
/// when no AI credential was found; extraction then returns placeholders.
pub async fn health_handler(Extension(state): Extension<AxumAppState>) -> Json<HealthResponse> {
    let deps = &state.server_deps;

    Json(HealthResponse {
        status: "healthy".to_string(),
        ai_configured: deps.ai.is_some(),
        groups: deps.groups.count().await,
    })
}
