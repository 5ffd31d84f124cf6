//! Application errors.

use glint_graphics::GraphicsError;
use thiserror::Error;

/// Errors raised while bootstrapping or running the application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// The configuration document could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A failure in the graphics pipeline.
    #[error(transparent)]
    Graphics(#[from] GraphicsError),

    /// The page is missing something the application needs.
    #[error("page setup failed: {0}")]
    Page(String),
}
