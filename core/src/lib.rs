//! # Glint Core
//!
//! CPU-side data shared by the Glint crates: the GLSL type table used for
//! shader reflection, uniform values, model documents and shader cache keys.
//! Nothing in this crate touches the GPU.

pub mod document;
pub mod error;
pub mod fingerprint;
pub mod glsl;
pub mod uniform;

pub use error::CoreError;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
