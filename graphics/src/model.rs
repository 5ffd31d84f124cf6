//! Models: meshes with their materials.

use std::rc::Rc;

use glint_core::uniform::UniformMap;

use crate::backend::GpuBackend;
use crate::error::GraphicsError;
use crate::materials::Material;
use crate::mesh::Mesh;

/// A drawable model.
///
/// Each mesh refers to its material by name; the materials the model was
/// built with are kept alongside so drawing needs no cache lookups.
#[derive(Debug)]
pub struct Model {
    name: String,
    meshes: Vec<Mesh>,
    materials: Vec<Rc<Material>>,
}

impl Model {
    pub fn new(name: impl Into<String>, meshes: Vec<Mesh>, materials: Vec<Rc<Material>>) -> Self {
        Self {
            name: name.into(),
            meshes,
            materials,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Rc<Material>] {
        &self.materials
    }

    /// Find a material of this model by name.
    pub fn material(&self, name: &str) -> Option<&Rc<Material>> {
        self.materials.iter().find(|material| material.name() == name)
    }

    /// Draw every mesh with its material.
    ///
    /// `frame_uniforms` (camera matrices and the like) are uploaded after the
    /// material's own values, to each shader that declares them.
    pub fn draw(
        &self,
        backend: &dyn GpuBackend,
        frame_uniforms: &UniformMap,
    ) -> Result<(), GraphicsError> {
        for mesh in &self.meshes {
            let material =
                self.material(mesh.material())
                    .ok_or_else(|| GraphicsError::MissingMaterialReference {
                        mesh: mesh.name().to_owned(),
                        material: mesh.material().to_owned(),
                    })?;
            material.bind()?;
            material.shader().upload_matching_uniforms(frame_uniforms)?;
            mesh.draw(backend);
        }
        Ok(())
    }
}
