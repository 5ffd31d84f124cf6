//! GPU backend abstraction layer.
//!
//! The loading pipeline talks to the GPU only through the [`GpuBackend`]
//! trait, a thin WebGL2-shaped surface covering what shader reflection,
//! uniform upload and indexed mesh drawing need.
//!
//! # Available Backends
//!
//! - `dummy` (default): Recording backend with scripted reflection, for tests
//! - `glow-backend` (default): OpenGL ES 3 / WebGL2 through glow
//!
//! # Architecture
//!
//! GL objects are referred to by small copyable handles issued by the
//! backend. Every call takes `&self`; backends keep their handle tables
//! behind `RefCell` because a GL context is bound to one thread and the
//! backend is shared with `Rc`.

#[cfg(feature = "dummy")]
pub mod dummy;

#[cfg(feature = "glow-backend")]
pub mod glow_backend;

use std::fmt;

use glint_core::glsl::{BaseType, UniformCall};
use glint_core::uniform::UniformData;

use crate::error::GraphicsError;

/// Handle to a compiled shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// Handle to a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Handle to a GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Handle to a vertex array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexArrayHandle(pub u32);

/// Resolved location of a uniform in one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Programmable pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => f.write_str("vertex"),
            Self::Fragment => f.write_str("fragment"),
        }
    }
}

/// Buffer binding target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex data.
    Array,
    /// Index data.
    ElementArray,
}

/// An active attribute or uniform reported by program introspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveVariable {
    pub name: String,
    /// Native type enum value.
    pub type_code: u32,
    /// Array length, 1 for non-arrays.
    pub size: u32,
}

/// Trait for GPU backends.
pub trait GpuBackend: 'static {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    // --- Shaders and programs ---

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, GraphicsError>;

    /// Set the source of `shader` and compile it. Returns the compile status.
    fn compile_shader(&self, shader: ShaderHandle, source: &str) -> bool;

    fn shader_info_log(&self, shader: ShaderHandle) -> String;

    fn delete_shader(&self, shader: ShaderHandle);

    fn create_program(&self) -> Result<ProgramHandle, GraphicsError>;

    /// Attach both stages and link. Returns the link status.
    fn link_program(
        &self,
        program: ProgramHandle,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> bool;

    fn program_info_log(&self, program: ProgramHandle) -> String;

    fn delete_program(&self, program: ProgramHandle);

    /// Make `program` current, or clear the current program with `None`.
    fn use_program(&self, program: Option<ProgramHandle>);

    // --- Introspection ---

    /// Active attributes in the order the driver enumerates them.
    fn active_attributes(&self, program: ProgramHandle) -> Vec<ActiveVariable>;

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32>;

    /// Active uniforms in the order the driver enumerates them.
    fn active_uniforms(&self, program: ProgramHandle) -> Vec<ActiveVariable>;

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    // --- Uniform upload ---

    /// Upload through one of the scalar or vector primitives.
    ///
    /// Applies to the current program. `data` already has the element kind
    /// and length `call` expects.
    fn upload_uniform(&self, location: UniformLocation, call: UniformCall, data: &UniformData);

    /// Upload through one of the `uniformMatrix*fv` primitives.
    fn upload_uniform_matrix(
        &self,
        location: UniformLocation,
        call: UniformCall,
        transpose: bool,
        data: &[f32],
    );

    // --- Geometry ---

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, GraphicsError>;

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);

    fn create_buffer(&self) -> Result<BufferHandle, GraphicsError>;

    /// Bind `buffer` to `target` and fill it with static data.
    fn buffer_data(&self, target: BufferTarget, buffer: BufferHandle, data: &[u8]);

    fn enable_vertex_attribute(&self, location: u32);

    /// Describe one attribute of the buffer bound to [`BufferTarget::Array`].
    fn vertex_attribute_pointer(
        &self,
        location: u32,
        components: u32,
        base_type: BaseType,
        normalized: bool,
        stride: u32,
        offset: u32,
    );

    /// Draw `index_count` 32-bit indices of the bound vertex array as triangles.
    fn draw_indexed_triangles(&self, index_count: u32);
}
