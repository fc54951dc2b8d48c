use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Create image server routes
pub fn image_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Image operations
        .route("/api/images", get(handlers::list_images))
        .route("/api/images/:filename", get(handlers::get_image))
}
