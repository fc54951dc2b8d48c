use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    extract::{Path as RoutePath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::error::ImageServerError;
use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub image_dir: String,
}

// ============================================================================
// Helper functions
// ============================================================================

/// Resolve a client-supplied filename inside the image directory, ensuring
/// the result cannot escape it.
///
/// The filename is built onto the directory component-by-component: parent
/// directory (..) references, absolute path components, and embedded null
/// bytes are rejected outright, without consulting the filesystem. The built
/// path is then canonicalized and verified to still be a descendant of the
/// canonicalized image directory, which catches symlinks pointing outside.
///
/// A rejected filename surfaces as `PathTraversal`; a filename that passes
/// the checks but names nothing on disk surfaces as `NotFound`.
fn resolve_image_path(root: &Path, filename: &str) -> Result<PathBuf, ImageServerError> {
    if filename.is_empty() {
        return Err(ImageServerError::NotFound(filename.to_string()));
    }

    let mut resolved = root.to_path_buf();

    for component in Path::new(filename).components() {
        match component {
            Component::Normal(name) => {
                if name.to_string_lossy().contains('\0') {
                    warn!("Filename component contains null byte: {:?}", filename);
                    return Err(ImageServerError::PathTraversal);
                }
                resolved.push(name);
            }
            Component::ParentDir => {
                warn!("Path traversal attempt: parent directory (..) in {:?}", filename);
                return Err(ImageServerError::PathTraversal);
            }
            Component::CurDir => continue,
            Component::RootDir | Component::Prefix(_) => {
                warn!("Absolute path component in filename: {:?}", filename);
                return Err(ImageServerError::PathTraversal);
            }
        }
    }

    if !resolved.exists() {
        return Err(ImageServerError::NotFound(filename.to_string()));
    }

    // Canonicalize and re-verify so a symlink inside the directory cannot
    // point the request outside of it.
    let canonical_root = root.canonicalize().map_err(ImageServerError::Io)?;
    let canonical = resolved.canonicalize().map_err(ImageServerError::Io)?;

    if !canonical.starts_with(&canonical_root) {
        warn!(
            "Symlink escape attempt: {:?} resolved to {:?} which is outside {:?}",
            resolved, canonical, canonical_root
        );
        return Err(ImageServerError::PathTraversal);
    }

    Ok(canonical)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        image_dir: state.image_dir.display().to_string(),
    })
}

/// GET /api/images - List all entries in the image directory
///
/// Every directory entry is returned as-is: no extension filtering, and
/// subdirectory names are included. The directory is re-read on every
/// request, so external additions and removals show up immediately.
pub async fn list_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ImageServerError> {
    let mut entries = fs::read_dir(&state.image_dir).await.map_err(|err| {
        warn!(
            "Image directory unreadable: {}: {}",
            state.image_dir.display(),
            err
        );
        ImageServerError::DirectoryUnavailable(state.image_dir.display().to_string())
    })?;

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(ImageServerError::Io)? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    // read_dir order is platform-dependent; sort for a stable response
    names.sort();

    debug!(
        "Listed {} entries in {}",
        names.len(),
        state.image_dir.display()
    );

    Ok(Json(names))
}

/// GET /api/images/:filename - Fetch a single image's bytes
///
/// Uses streaming so large files are not loaded entirely into memory. The
/// content type is inferred from the file extension, falling back to
/// application/octet-stream.
pub async fn get_image(
    State(state): State<AppState>,
    RoutePath(filename): RoutePath<String>,
) -> Result<Response, ImageServerError> {
    let path = resolve_image_path(&state.image_dir, &filename)?;

    if path.is_dir() {
        return Err(ImageServerError::NotFound(filename));
    }

    debug!("Streaming image: {}", path.display());

    let metadata = fs::metadata(&path).await.map_err(ImageServerError::Io)?;
    let file_size = metadata.len();

    let file = fs::File::open(&path).await.map_err(ImageServerError::Io)?;
    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    let mime = mime_guess::from_path(&path)
        .first_or_octet_stream()
        .to_string();

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    // Sanitize filename for Content-Disposition header
    let safe_filename = file_name.replace('"', "'");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime),
            (header::CONTENT_LENGTH, file_size.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", safe_filename),
            ),
        ],
        body,
    )
        .into_response())
}
