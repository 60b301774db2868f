//! Processing service router.
//!
//! Layers (outermost → innermost): CORS → request tracing → body limit.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::models::MAX_FILE_SIZE;

/// Request body cap: the file limit plus room for multipart framing.
pub const MAX_BODY_BYTES: usize = MAX_FILE_SIZE as usize + 5 * 1024 * 1024;

/// Build the processing service router.
pub fn processing_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::health::root))
        .route("/health", get(endpoints::health::check))
        .route("/formats", get(endpoints::formats::list))
        .route("/process", post(endpoints::process::process))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
