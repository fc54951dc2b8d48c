use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageServerError {
    #[error("Image not found: {0}")]
    NotFound(String),

    #[error("Path is outside the image directory")]
    PathTraversal,

    #[error("Image directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for ImageServerError {
    fn into_response(self) -> Response {
        // Traversal rejections answer 404 like a missing file so the
        // response never reveals whether anything exists outside the
        // configured directory.
        let (status, code) = match &self {
            ImageServerError::NotFound(_) | ImageServerError::PathTraversal => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            ImageServerError::DirectoryUnavailable(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DIRECTORY_UNAVAILABLE")
            }
            ImageServerError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        };

        let error = match &self {
            ImageServerError::PathTraversal => "Image not found".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse { error, code };

        (status, Json(body)).into_response()
    }
}
