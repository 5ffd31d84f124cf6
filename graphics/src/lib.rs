//! # Glint Graphics
//!
//! Shader reflection, uniform upload and the asset loading pipeline of the
//! Glint engine.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`GraphicsContext`] - Holds the active [`GpuBackend`] and builds uniform setters
//! - [`Shader`] - Linked program with reflected attributes and uniforms
//! - [`ShaderCache`], [`MaterialCache`], [`ModelCache`] - Async, single-flight asset caches
//! - Two backends: glow (WebGL2 / OpenGL ES 3) and Dummy (for testing)
//!
//! ## Example
//!
//! ```ignore
//! use glint_graphics::{GraphicsContext, MaterialCache, ModelCache, ShaderCache};
//!
//! let context = Rc::new(GraphicsContext::new());
//! context.initialize(canvas)?;
//! let shaders = Rc::new(ShaderCache::new(context.clone(), store.clone(), "shader"));
//! let materials = Rc::new(MaterialCache::new(shaders));
//! let models = ModelCache::new(context.clone(), store, materials, "model");
//! let model = models.load("teapot").await?;
//! model.draw(context.current()?.as_ref(), &frame_uniforms)?;
//! ```

pub mod backend;
pub mod context;
pub mod error;
pub mod managers;
pub mod materials;
pub mod mesh;
pub mod model;
pub mod shader;

// Re-export main types for convenience
pub use backend::GpuBackend;
#[cfg(feature = "dummy")]
pub use backend::dummy::DummyBackend;
#[cfg(feature = "glow-backend")]
pub use backend::glow_backend::GlowBackend;
pub use context::{DeviceSurface, GraphicsContext, UniformSetter};
pub use error::GraphicsError;
pub use managers::{MaterialCache, ModelCache, ShaderCache};
pub use materials::Material;
pub use mesh::Mesh;
pub use model::Model;
pub use shader::{AttributeDescriptor, Shader, UniformDescriptor};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
