//! Minimal HTTP image server.
//!
//! Exposes one directory of image files over two endpoints: list the
//! directory's filenames, and fetch a single file's bytes by name. The
//! router can be embedded in another application or run via the bundled
//! binary.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use std::path::PathBuf;

pub use config::Config;
pub use error::ImageServerError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Directory whose entries are listed and served
    pub image_dir: PathBuf,
}

impl AppState {
    /// Create a new AppState serving the given image directory.
    ///
    /// The directory is not required to exist yet; requests fail
    /// individually until it does.
    pub fn new(image_dir: PathBuf) -> Self {
        Self { image_dir }
    }
}
