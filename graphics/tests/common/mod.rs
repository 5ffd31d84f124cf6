//! Common utilities for loading pipeline tests.
//!
//! A [`TestContext`] wires the whole pipeline together over an in-memory
//! provider and the recording dummy backend.

#![allow(dead_code)]

use std::rc::Rc;

use glint_core::glsl::GlslType;
use glint_graphics::backend::dummy::{BackendCall, DummyBackend, ProgramInterface};
use glint_graphics::{GraphicsContext, MaterialCache, ModelCache, ShaderCache};
use glint_vfs::{AssetStore, MemoryProvider};

pub const SHADER_DIR: &str = "shader";
pub const MODEL_DIR: &str = "model";

/// A flat color shader.
pub const BASIC_SHADER: &str = "__VERTEX__
#version 300 es
in vec3 position;
uniform mat4 u_view_projection;
void main() { gl_Position = u_view_projection * vec4(position, 1.0); }
__FRAGMENT__
#version 300 es
precision mediump float;
uniform vec4 u_color;
out vec4 color;
void main() { color = u_color; }
";

/// One red triangle.
pub const TRIANGLE_MODEL: &str = r#"{
    "name": "triangle",
    "materials": [
        {
            "name": "red",
            "shader": { "name": "basic" },
            "properties": { "u_color": [1, 0, 0, 1] }
        }
    ],
    "meshes": [
        {
            "name": "tri",
            "material": "red",
            "buffers": {
                "vertex": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "index": [0, 1, 2]
            }
        }
    ]
}"#;

/// The interface the dummy backend reports for [`BASIC_SHADER`].
pub fn basic_interface() -> ProgramInterface {
    ProgramInterface::new()
        .attribute("position", GlslType::Vec3, 0)
        .uniform("u_color", GlslType::Vec4)
        .uniform("u_view_projection", GlslType::Mat4)
}

pub fn shader_path(name: &str) -> String {
    format!("{SHADER_DIR}/{name}.glsl")
}

pub fn model_path(name: &str) -> String {
    format!("{MODEL_DIR}/{name}.tml")
}

/// The full pipeline over in-memory assets.
pub struct TestContext {
    pub provider: MemoryProvider,
    pub backend: Rc<DummyBackend>,
    pub context: Rc<GraphicsContext>,
    pub store: AssetStore,
    pub shaders: Rc<ShaderCache>,
    pub materials: Rc<MaterialCache>,
    pub models: ModelCache,
}

impl TestContext {
    /// A pipeline serving [`BASIC_SHADER`] and [`TRIANGLE_MODEL`].
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let provider = MemoryProvider::new();
        provider.insert_str(shader_path("basic"), BASIC_SHADER);
        provider.insert_str(model_path("triangle"), TRIANGLE_MODEL);

        let backend = Rc::new(DummyBackend::with_interface(basic_interface()));
        let context = Rc::new(GraphicsContext::new());
        context
            .initialize(backend.clone())
            .expect("dummy backend initializes");

        let store = AssetStore::new(provider.clone());
        let shaders = Rc::new(ShaderCache::new(context.clone(), store.clone(), SHADER_DIR));
        let materials = Rc::new(MaterialCache::new(shaders.clone()));
        let models = ModelCache::new(context.clone(), store.clone(), materials.clone(), MODEL_DIR);

        Self {
            provider,
            backend,
            context,
            store,
            shaders,
            materials,
            models,
        }
    }

    /// Number of backend calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.backend.count(predicate)
    }

    pub fn links(&self) -> usize {
        self.count(|call| matches!(call, BackendCall::LinkProgram(_)))
    }

    pub fn vertex_arrays(&self) -> usize {
        self.count(|call| matches!(call, BackendCall::CreateVertexArray(_)))
    }
}
