//! Application configuration loaded from TOML.

use glint_vfs::path;
use serde::Deserialize;

use crate::error::AppError;

/// Where assets live, relative to the transport root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub asset_root: String,
    pub shader_dir: String,
    pub model_dir: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_root: "assets".into(),
            shader_dir: "shader".into(),
            model_dir: "model".into(),
        }
    }
}

impl AssetConfig {
    /// Base path the shader cache resolves `{name}.glsl` against.
    pub fn shader_path(&self) -> String {
        path::join(&self.asset_root, &self.shader_dir)
    }

    /// Base path the model cache resolves `{name}.tml` against.
    pub fn model_path(&self) -> String {
        path::join(&self.asset_root, &self.model_dir)
    }
}

/// Top-level configuration, usually from `glint.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub assets: AssetConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Name of the model to load and draw.
    pub model: String,
    /// Id of the canvas to render into. A canvas is created when absent.
    pub canvas_id: Option<String>,
}

fn default_log_level() -> String {
    "info".into()
}

impl AppConfig {
    /// Configuration with default settings for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            assets: AssetConfig::default(),
            log_level: default_log_level(),
            model: model.into(),
            canvas_id: None,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|err| AppError::Config(err.to_string()))
    }

    /// The configured log level, falling back to `Info` when unparsable.
    pub fn level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or_else(|_| {
            log::warn!("Unknown log level {:?}, using info", self.log_level);
            log::LevelFilter::Info
        })
    }
}
