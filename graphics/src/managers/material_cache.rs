//! Material caching.

use std::future::Future;
use std::rc::Rc;

use glint_core::document::MaterialDescriptor;

use crate::error::GraphicsError;
use crate::materials::Material;

use super::inflight::InflightCache;
use super::shader_cache::ShaderCache;

/// Builds materials from descriptors, keyed by material name.
///
/// The first descriptor seen for a name wins. Later descriptors with the same
/// name get the existing material back and their properties are ignored.
pub struct MaterialCache {
    shaders: Rc<ShaderCache>,
    materials: InflightCache<String, Material>,
}

impl MaterialCache {
    pub fn new(shaders: Rc<ShaderCache>) -> Self {
        Self {
            shaders,
            materials: InflightCache::new(),
        }
    }

    pub fn shaders(&self) -> &Rc<ShaderCache> {
        &self.shaders
    }

    /// Build the material described by `descriptor`, loading its shader.
    pub fn build(
        &self,
        descriptor: &MaterialDescriptor,
    ) -> impl Future<Output = Result<Rc<Material>, GraphicsError>> + use<> {
        self.materials.get_or_load(descriptor.name.clone(), || {
            let shader = self
                .shaders
                .load(&descriptor.shader.name, &descriptor.shader.defines);
            let name = descriptor.name.clone();
            let properties = descriptor.properties.clone();

            async move { Ok(Material::new(name, shader.await?, properties)) }
        })
    }

    /// The material `name` if it has finished building.
    pub fn get(&self, name: &str) -> Option<Rc<Material>> {
        self.materials.get(&name.to_owned())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
