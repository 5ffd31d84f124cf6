//! Asset managers.
//!
//! Three caches sit on top of the [`AssetStore`](glint_vfs::AssetStore), each
//! depending on the one before it:
//!
//! - [`ShaderCache`] - shader documents to linked, reflected [`Shader`](crate::Shader)s
//! - [`MaterialCache`] - material descriptors to [`Material`](crate::Material)s
//! - [`ModelCache`] - model documents to [`Model`](crate::Model)s
//!
//! Every cache is write-once per key and never evicts. Loads are
//! single-flight: requests for a key already loading join that load. A
//! failed load leaves its key absent, so asking again retries from scratch.
//! There is no other retry.

mod inflight;
mod material_cache;
mod model_cache;
mod shader_cache;

pub use inflight::{InflightCache, SharedLoad};
pub use material_cache::MaterialCache;
pub use model_cache::ModelCache;
pub use shader_cache::ShaderCache;
