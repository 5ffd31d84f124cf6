//! Model loading and caching.

use std::future::Future;
use std::rc::Rc;

use glint_core::document::{self, ModelDocument};
use glint_vfs::{AssetStore, VfsError, path};

use crate::context::GraphicsContext;
use crate::error::GraphicsError;
use crate::mesh::Mesh;
use crate::model::Model;

use super::inflight::InflightCache;
use super::material_cache::MaterialCache;

/// Loads `{base_path}/{name}.tml` model documents into [`Model`]s.
pub struct ModelCache {
    context: Rc<GraphicsContext>,
    store: AssetStore,
    materials: Rc<MaterialCache>,
    base_path: String,
    models: InflightCache<String, Model>,
}

impl ModelCache {
    pub fn new(
        context: Rc<GraphicsContext>,
        store: AssetStore,
        materials: Rc<MaterialCache>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            context,
            store,
            materials,
            base_path: base_path.into(),
            models: InflightCache::new(),
        }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn materials(&self) -> &Rc<MaterialCache> {
        &self.materials
    }

    /// Load the model `name`.
    ///
    /// The document is validated before anything is built. Its materials are
    /// then built one after another in document order, every mesh reference
    /// is resolved, and the meshes are uploaded. Any failure leaves `name`
    /// uncached.
    pub fn load(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Rc<Model>, GraphicsError>> + use<> {
        self.models.get_or_load(name.to_owned(), || {
            let uri = path::join(&self.base_path, &format!("{name}.tml"));
            let context = self.context.clone();
            let store = self.store.clone();
            let materials = self.materials.clone();
            let name = name.to_owned();
            log::debug!("Loading model {name}");

            async move {
                let decode_uri = uri.clone();
                let value = store
                    .load_with(&uri, move |bytes| -> Result<_, GraphicsError> {
                        let text = String::from_utf8(bytes).map_err(|err| VfsError::Decode {
                            uri: decode_uri,
                            message: err.to_string(),
                        })?;
                        Ok(document::decode_json(&text)?)
                    })
                    .await?;
                document::validate(&value)?;
                let document = ModelDocument::from_value((*value).clone())?;

                let mut built = Vec::with_capacity(document.materials.len());
                for descriptor in &document.materials {
                    built.push(materials.build(descriptor).await?);
                }

                let mut resolved = Vec::with_capacity(document.meshes.len());
                for mesh in &document.meshes {
                    let material = built
                        .iter()
                        .find(|material| material.name() == mesh.material)
                        .ok_or_else(|| GraphicsError::MissingMaterialReference {
                            mesh: mesh.name.clone(),
                            material: mesh.material.clone(),
                        })?;
                    resolved.push((mesh, material));
                }

                let backend = context.current()?;
                let meshes = resolved
                    .into_iter()
                    .map(|(mesh, material)| {
                        Mesh::from_document(backend.as_ref(), mesh, material.shader().attributes())
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                log::info!(
                    "Loaded model {name}: {} meshes, {} materials",
                    meshes.len(),
                    built.len()
                );
                Ok(Model::new(name, meshes, built))
            }
        })
    }

    /// The model `name` if it has finished loading.
    pub fn get(&self, name: &str) -> Option<Rc<Model>> {
        self.models.get(&name.to_owned())
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
