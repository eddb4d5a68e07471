// src/routes/mod.rs
pub mod analysis;
pub mod chat;
pub mod tryon;

use std::path::Path;

use crate::config::{DEFAULT_MAX_BODY_BYTES, DEFAULT_STATIC_DIR};
use crate::state::SharedState;
use analysis::{analyze_body_handler, analyze_skin_handler};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{
        HeaderName, Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::{get, post},
};
use chat::fashion_chat_handler;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tryon::generate_tryon_handler;

pub fn create_router() -> Router<SharedState> {
    router(DEFAULT_STATIC_DIR, DEFAULT_MAX_BODY_BYTES)
}

/// Function endpoints plus the storefront build served from `static_dir`.
pub fn router(static_dir: impl AsRef<Path>, max_body_bytes: usize) -> Router<SharedState> {
    let functions = Router::new()
        .route("/analyze-body", post(analyze_body_handler).options(preflight))
        .route("/analyze-skin", post(analyze_skin_handler).options(preflight))
        .route("/generate-tryon", post(generate_tryon_handler).options(preflight))
        .route("/fashion-chat", post(fashion_chat_handler).options(preflight))
        .layer(DefaultBodyLimit::max(max_body_bytes));

    Router::new()
        .nest("/functions/v1", functions)
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

async fn preflight() -> StatusCode {
    StatusCode::OK
}
