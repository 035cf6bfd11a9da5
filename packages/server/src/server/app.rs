//! Application setup and server configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, post},
    Router,
};
use gemini_client::GeminiClient;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::domains::groups::{GroupStore, InMemoryGroupStore};
use crate::kernel::{BaseAI, GeminiAI, HttpUrlResolver, ServerDeps};
use crate::server::routes::{
    analyze_menu_handler, create_group_handler, delete_order_handler, get_group_handler,
    health_handler, root_handler, set_paid_amount_handler, submit_order_handler,
    update_status_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub server_deps: Arc<ServerDeps>,
}

/// Wire production dependencies from configuration.
///
/// A missing AI key is not an error: the server starts and extraction
/// answers with placeholder records.
pub async fn build_server_deps(config: &Config) -> Result<ServerDeps> {
    let ai: Option<Arc<dyn BaseAI>> = match &config.gemini_api_key {
        Some(key) => {
            let mut client = GeminiClient::new(key.clone());
            if let Some(base_url) = &config.gemini_base_url {
                client = client.with_base_url(base_url.clone());
            }
            let client = client
                .with_timeout(config.model_timeout)
                .context("Failed to create Gemini client")?;
            Some(Arc::new(GeminiAI::new(client)))
        }
        None => {
            tracing::warn!("GEMINI_API_KEY not set; menu extraction will return placeholders");
            None
        }
    };

    let url_resolver = Arc::new(HttpUrlResolver::new(config.redirect_timeout)?);

    let groups: Arc<dyn GroupStore> = match &config.group_store_path {
        Some(path) => {
            let store = InMemoryGroupStore::open(path.clone())
                .await
                .with_context(|| format!("Failed to open group store at {}", path.display()))?;
            tracing::info!(
                path = %path.display(),
                groups = store.count().await,
                "Group store loaded"
            );
            Arc::new(store)
        }
        None => Arc::new(InMemoryGroupStore::new()),
    };

    Ok(ServerDeps::new(
        ai,
        url_resolver,
        groups,
        config.model_timeout,
    ))
}

/// Build the Axum application router
pub fn build_app(server_deps: ServerDeps) -> Router {
    let app_state = AxumAppState {
        server_deps: Arc::new(server_deps),
    };

    // CORS configuration: the ordering page is served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/analyze_menu", post(analyze_menu_handler))
        .route("/api/create_group", post(create_group_handler))
        .route("/api/group/:group_id", get(get_group_handler))
        .route("/api/group/:group_id/order", post(submit_order_handler))
        .route("/api/group/:group_id/status", post(update_status_handler))
        .route(
            "/api/group/:group_id/order/:order_id",
            delete(delete_order_handler),
        )
        .route(
            "/api/group/:group_id/order/:order_id/paid",
            post(set_paid_amount_handler),
        )
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
