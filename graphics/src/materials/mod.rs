//! Materials.
//!
//! A [`Material`] pairs a shared [`Shader`] with the uniform values it is
//! drawn with. Several materials may share one shader; the shader is never
//! copied.

use std::rc::Rc;

use glint_core::uniform::UniformMap;

use crate::error::GraphicsError;
use crate::shader::Shader;

/// A named shader plus uniform values.
#[derive(Debug)]
pub struct Material {
    name: String,
    shader: Rc<Shader>,
    uniforms: UniformMap,
}

impl Material {
    /// Create a material. An empty property map is allowed.
    pub fn new(name: impl Into<String>, shader: Rc<Shader>, uniforms: UniformMap) -> Self {
        let name = name.into();
        if uniforms.is_empty() {
            log::warn!("Material {name} has no properties");
        }
        Self {
            name,
            shader,
            uniforms,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shader(&self) -> &Rc<Shader> {
        &self.shader
    }

    /// Uniform values uploaded by [`bind`](Self::bind).
    pub fn uniforms(&self) -> &UniformMap {
        &self.uniforms
    }

    /// Bind the shader and upload this material's uniform values.
    ///
    /// Uniforms of the shader without a value here keep whatever the program
    /// last had.
    pub fn bind(&self) -> Result<(), GraphicsError> {
        self.shader.bind();
        self.shader.upload_uniforms(&self.uniforms)
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::backend::dummy::{BackendCall, DummyBackend, ProgramInterface};
    use crate::context::GraphicsContext;
    use glint_core::glsl::GlslType;
    use glint_core::uniform::UniformValue;

    const SOURCE: &str = "__VERTEX__ void main() {} __FRAGMENT__ void main() {}";

    fn shader(backend: &Rc<DummyBackend>) -> Rc<Shader> {
        let context = GraphicsContext::new();
        context.initialize(backend.clone()).unwrap();
        Rc::new(Shader::build(&context, "flat", SOURCE).unwrap())
    }

    #[test]
    fn bind_uploads_supplied_properties_only() {
        let backend = Rc::new(DummyBackend::with_interface(
            ProgramInterface::new()
                .uniform("u_color", GlslType::Vec4)
                .uniform("u_time", GlslType::Float),
        ));
        let shader = shader(&backend);
        let mut uniforms = UniformMap::new();
        uniforms.insert("u_color".into(), UniformValue::from([0.0, 1.0, 0.0, 1.0]));
        let material = Material::new("green", shader.clone(), uniforms);
        backend.clear_calls();

        material.bind().unwrap();

        assert_eq!(backend.calls()[0], BackendCall::UseProgram(Some(shader.program())));
        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::UploadUniform { .. })),
            1
        );
    }

    #[test]
    fn empty_properties_are_allowed() {
        let backend = Rc::new(DummyBackend::new());
        let material = Material::new("plain", shader(&backend), UniformMap::new());

        material.bind().unwrap();

        assert_eq!(material.name(), "plain");
        assert!(material.uniforms().is_empty());
    }
}
