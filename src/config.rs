use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Image server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory of images to serve
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// Address to bind to
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
