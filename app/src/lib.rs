//! # Glint App
//!
//! Bootstrap for the Glint viewer: reads the configuration, installs the
//! logger, acquires the graphics context and wires the asset caches together.
//!
//! ## Overview
//!
//! - [`AppConfig`] - Configuration, usually loaded from `glint.toml`
//! - [`Application`] - Owns the services and draws the loaded model each frame
//! - `start` - Browser entry point (wasm only)
//!
//! ## Example
//!
//! ```ignore
//! use glint_app::{AppConfig, Application};
//!
//! let config = AppConfig::from_toml_str(&text)?;
//! let app = Application::new(config, FileSystemProvider::new("."), gl_context)?;
//! app.load_model().await?;
//! app.render_frame(&frame_uniforms)?;
//! ```

mod application;
mod config;
mod error;
#[cfg(target_arch = "wasm32")]
mod web;

pub use application::{Application, init_logging};
pub use config::{AppConfig, AssetConfig};
pub use error::AppError;
#[cfg(target_arch = "wasm32")]
pub use web::start;

/// App library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
