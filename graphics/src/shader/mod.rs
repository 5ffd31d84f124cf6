//! Shader programs.
//!
//! A [`Shader`] is built in one synchronous step from a source document
//! already in memory:
//!
//! 1. split the document into stages ([`source::split_source`])
//! 2. inject defines into both stages ([`source::inject_defines`])
//! 3. compile both stages and link them
//! 4. reflect attributes and uniforms ([`reflection`])
//!
//! The result is immutable. Loading from disk or network and caching by
//! name and defines is the job of [`ShaderCache`](crate::ShaderCache).
//!
//! # Example
//!
//! ```ignore
//! let shader = Shader::build(&context, "basic", &source)?;
//! shader.bind();
//! shader.upload_uniforms(&uniforms)?;
//! ```

pub mod reflection;
pub mod source;

use std::collections::HashMap;
use std::rc::Rc;

use glint_core::uniform::{UniformMap, UniformValue};

use crate::backend::{GpuBackend, ProgramHandle, ShaderHandle, ShaderStage};
use crate::context::GraphicsContext;
use crate::error::GraphicsError;

pub use reflection::{AttributeDescriptor, UniformDescriptor};
pub use source::{FRAGMENT_MARKER, VERTEX_MARKER};

/// A linked program with its reflected interface.
pub struct Shader {
    name: String,
    source: String,
    program: ProgramHandle,
    backend: Rc<dyn GpuBackend>,
    attributes: Vec<AttributeDescriptor>,
    uniforms: Vec<UniformDescriptor>,
    uniform_index: HashMap<String, usize>,
}

impl std::fmt::Debug for Shader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("name", &self.name)
            .field("program", &self.program)
            .field("attributes", &self.attributes)
            .field("uniforms", &self.uniforms)
            .finish_non_exhaustive()
    }
}

impl Shader {
    /// Build a shader from a source document without defines.
    pub fn build(
        context: &GraphicsContext,
        name: &str,
        source: &str,
    ) -> Result<Self, GraphicsError> {
        Self::build_with_defines(context, name, source, &[])
    }

    /// Build a shader from a source document, injecting `defines` into both stages.
    pub fn build_with_defines(
        context: &GraphicsContext,
        name: &str,
        source: &str,
        defines: &[String],
    ) -> Result<Self, GraphicsError> {
        let backend = context.current()?;
        let stages =
            source::split_source(source).map_err(|reason| GraphicsError::InvalidShaderSource {
                shader: name.to_owned(),
                reason: reason.to_owned(),
            })?;
        let vertex_source = source::inject_defines(&stages.vertex, defines);
        let fragment_source = source::inject_defines(&stages.fragment, defines);

        let vertex = compile(backend.as_ref(), name, ShaderStage::Vertex, &vertex_source)?;
        let fragment =
            match compile(backend.as_ref(), name, ShaderStage::Fragment, &fragment_source) {
                Ok(fragment) => fragment,
                Err(err) => {
                    backend.delete_shader(vertex);
                    return Err(err);
                }
            };

        let program = link(backend.as_ref(), name, vertex, fragment);
        backend.delete_shader(vertex);
        backend.delete_shader(fragment);
        let program = program?;

        let reflected = reflection::reflect_attributes(backend.as_ref(), program).and_then(
            |attributes| {
                reflection::reflect_uniforms(context, backend.as_ref(), program)
                    .map(|uniforms| (attributes, uniforms))
            },
        );
        let (attributes, uniforms) = match reflected {
            Ok(reflected) => reflected,
            Err(err) => {
                backend.delete_program(program);
                return Err(err);
            }
        };

        let uniform_index = uniforms
            .iter()
            .enumerate()
            .map(|(index, uniform)| (uniform.name.clone(), index))
            .collect();

        log::debug!(
            "Built shader {name}: {} attributes, {} uniforms",
            attributes.len(),
            uniforms.len()
        );

        Ok(Self {
            name: name.to_owned(),
            source: source.to_owned(),
            program,
            backend,
            attributes,
            uniforms,
            uniform_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The source document the shader was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    /// Vertex attributes ordered by location.
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Uniforms in reflection order.
    pub fn uniforms(&self) -> &[UniformDescriptor] {
        &self.uniforms
    }

    /// Look up a uniform by name.
    pub fn uniform(&self, name: &str) -> Option<&UniformDescriptor> {
        self.uniform_index.get(name).map(|&index| &self.uniforms[index])
    }

    /// Size of one packed vertex in bytes, 0 without attributes.
    pub fn stride_bytes(&self) -> u32 {
        self.attributes
            .first()
            .map_or(0, |attribute| attribute.stride_bytes)
    }

    /// Make this shader's program current.
    pub fn bind(&self) {
        self.backend.use_program(Some(self.program));
    }

    /// Clear the current program.
    pub fn unbind(&self) {
        self.backend.use_program(None);
    }

    /// Upload every value in `values` to the uniform of the same name.
    ///
    /// Only the supplied names are uploaded. Names the shader has no uniform
    /// for are logged and skipped. The shader must be bound.
    pub fn upload_uniforms(&self, values: &UniformMap) -> Result<(), GraphicsError> {
        for (name, value) in values {
            match self.uniform(name) {
                Some(uniform) => self.set_uniform(uniform, value)?,
                None => log::warn!("Shader {} has no uniform {name}, skipping", self.name),
            }
        }
        Ok(())
    }

    /// Upload the values in `values` whose names the shader has a uniform for.
    pub(crate) fn upload_matching_uniforms(&self, values: &UniformMap) -> Result<(), GraphicsError> {
        for (name, value) in values {
            if let Some(uniform) = self.uniform(name) {
                self.set_uniform(uniform, value)?;
            }
        }
        Ok(())
    }

    fn set_uniform(
        &self,
        uniform: &UniformDescriptor,
        value: &UniformValue,
    ) -> Result<(), GraphicsError> {
        uniform
            .set(value)
            .map_err(|err| GraphicsError::UniformValueMismatch {
                shader: self.name.clone(),
                uniform: uniform.name.clone(),
                reason: err.to_string(),
            })
    }
}

fn compile(
    backend: &dyn GpuBackend,
    name: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderHandle, GraphicsError> {
    let shader = backend.create_shader(stage)?;
    if backend.compile_shader(shader, source) {
        return Ok(shader);
    }

    let info_log = backend.shader_info_log(shader);
    backend.delete_shader(shader);
    log::error!("Failed to compile {stage} stage of shader {name}: {info_log}\n{source}");
    Err(GraphicsError::ShaderCompile {
        shader: name.to_owned(),
        stage,
        info_log,
        stage_source: source.to_owned(),
    })
}

fn link(
    backend: &dyn GpuBackend,
    name: &str,
    vertex: ShaderHandle,
    fragment: ShaderHandle,
) -> Result<ProgramHandle, GraphicsError> {
    let program = backend.create_program()?;
    if backend.link_program(program, vertex, fragment) {
        return Ok(program);
    }

    let info_log = backend.program_info_log(program);
    backend.delete_program(program);
    log::error!("Failed to link shader {name}: {info_log}");
    Err(GraphicsError::ShaderLink {
        shader: name.to_owned(),
        info_log,
    })
}
