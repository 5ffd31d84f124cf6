//! Shader loading and caching.

use std::future::Future;
use std::rc::Rc;

use glint_core::fingerprint::shader_fingerprint;
use glint_vfs::{AssetStore, path};

use crate::context::GraphicsContext;
use crate::error::GraphicsError;
use crate::shader::Shader;

use super::inflight::InflightCache;

/// Loads `{base_path}/{name}.glsl` documents and builds shaders from them.
///
/// Shaders are keyed by a fingerprint of the name and the ordered define
/// list, so the same document built with different defines yields distinct
/// shaders. Two keys with equal fingerprints share one entry.
pub struct ShaderCache {
    context: Rc<GraphicsContext>,
    store: AssetStore,
    base_path: String,
    shaders: InflightCache<u32, Shader>,
}

impl ShaderCache {
    pub fn new(context: Rc<GraphicsContext>, store: AssetStore, base_path: impl Into<String>) -> Self {
        Self {
            context,
            store,
            base_path: base_path.into(),
            shaders: InflightCache::new(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Load the shader `name` built with `defines`.
    ///
    /// Concurrent loads of the same key share one fetch and one build.
    pub fn load(
        &self,
        name: &str,
        defines: &[String],
    ) -> impl Future<Output = Result<Rc<Shader>, GraphicsError>> + use<> {
        let key = shader_fingerprint(name, defines);
        self.shaders.get_or_load(key, || {
            let context = self.context.clone();
            let source = self
                .store
                .load_text(&path::join(&self.base_path, &format!("{name}.glsl")));
            let name = name.to_owned();
            let defines = defines.to_vec();
            log::debug!("Loading shader {name} (fingerprint {key:08x})");

            async move {
                let source = source.await?;
                Shader::build_with_defines(&context, &name, &source, &defines)
            }
        })
    }

    /// The shader for `name` and `defines` if it has finished loading.
    pub fn get(&self, name: &str, defines: &[String]) -> Option<Rc<Shader>> {
        self.shaders.get(&shader_fingerprint(name, defines))
    }

    /// Number of shaders loaded or loading.
    pub fn len(&self) -> usize {
        self.shaders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
    }
}
