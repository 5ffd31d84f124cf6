//! OpenGL ES 3 / WebGL2 backend built on glow.

use std::cell::RefCell;

use glint_core::glsl::{BaseType, UniformCall};
use glint_core::uniform::UniformData;
use glow::HasContext;

use crate::error::GraphicsError;

use super::{
    ActiveVariable, BufferHandle, BufferTarget, GpuBackend, ProgramHandle, ShaderHandle,
    ShaderStage, UniformLocation, VertexArrayHandle,
};

type GlShader = <glow::Context as HasContext>::Shader;
type GlProgram = <glow::Context as HasContext>::Program;
type GlBuffer = <glow::Context as HasContext>::Buffer;
type GlVertexArray = <glow::Context as HasContext>::VertexArray;
type GlUniformLocation = <glow::Context as HasContext>::UniformLocation;

/// Slot table mapping backend handles to GL objects.
struct Slots<T> {
    items: Vec<Option<T>>,
}

impl<T: Clone> Slots<T> {
    fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn insert(&mut self, item: T) -> u32 {
        self.items.push(Some(item));
        (self.items.len() - 1) as u32
    }

    fn get(&self, id: u32) -> Option<T> {
        self.items.get(id as usize).cloned().flatten()
    }

    fn take(&mut self, id: u32) -> Option<T> {
        self.items.get_mut(id as usize).and_then(Option::take)
    }
}

struct Tables {
    shaders: Slots<GlShader>,
    programs: Slots<GlProgram>,
    buffers: Slots<GlBuffer>,
    vertex_arrays: Slots<GlVertexArray>,
    uniform_locations: Slots<GlUniformLocation>,
}

/// GPU backend issuing calls on a glow context.
pub struct GlowBackend {
    gl: glow::Context,
    tables: RefCell<Tables>,
}

impl GlowBackend {
    /// Wrap a glow context.
    pub fn new(gl: glow::Context) -> Self {
        Self {
            gl,
            tables: RefCell::new(Tables {
                shaders: Slots::new(),
                programs: Slots::new(),
                buffers: Slots::new(),
                vertex_arrays: Slots::new(),
                uniform_locations: Slots::new(),
            }),
        }
    }

    /// The wrapped glow context.
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    fn shader(&self, handle: ShaderHandle) -> Option<GlShader> {
        self.tables.borrow().shaders.get(handle.0)
    }

    fn program(&self, handle: ProgramHandle) -> Option<GlProgram> {
        self.tables.borrow().programs.get(handle.0)
    }

    fn uniform(&self, location: UniformLocation) -> Option<GlUniformLocation> {
        self.tables.borrow().uniform_locations.get(location.0)
    }
}

fn stage_code(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn target_code(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => glow::ELEMENT_ARRAY_BUFFER,
    }
}

impl GpuBackend for GlowBackend {
    fn name(&self) -> &'static str {
        "glow"
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, GraphicsError> {
        let shader = unsafe { self.gl.create_shader(stage_code(stage)) }
            .map_err(GraphicsError::ResourceCreationFailed)?;
        Ok(ShaderHandle(self.tables.borrow_mut().shaders.insert(shader)))
    }

    fn compile_shader(&self, shader: ShaderHandle, source: &str) -> bool {
        let Some(shader) = self.shader(shader) else {
            return false;
        };
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.shader(shader)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        if let Some(shader) = self.tables.borrow_mut().shaders.take(shader.0) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn create_program(&self) -> Result<ProgramHandle, GraphicsError> {
        let program =
            unsafe { self.gl.create_program() }.map_err(GraphicsError::ResourceCreationFailed)?;
        Ok(ProgramHandle(self.tables.borrow_mut().programs.insert(program)))
    }

    fn link_program(
        &self,
        program: ProgramHandle,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> bool {
        let (Some(program), Some(vertex), Some(fragment)) = (
            self.program(program),
            self.shader(vertex),
            self.shader(fragment),
        ) else {
            return false;
        };
        unsafe {
            self.gl.attach_shader(program, vertex);
            self.gl.attach_shader(program, fragment);
            self.gl.link_program(program);
            let linked = self.gl.get_program_link_status(program);
            self.gl.detach_shader(program, vertex);
            self.gl.detach_shader(program, fragment);
            linked
        }
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        self.program(program)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ProgramHandle) {
        if let Some(program) = self.tables.borrow_mut().programs.take(program.0) {
            unsafe { self.gl.delete_program(program) };
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        let program = program.and_then(|program| self.program(program));
        unsafe { self.gl.use_program(program) };
    }

    fn active_attributes(&self, program: ProgramHandle) -> Vec<ActiveVariable> {
        let Some(program) = self.program(program) else {
            return Vec::new();
        };
        unsafe {
            (0..self.gl.get_active_attributes(program))
                .filter_map(|index| self.gl.get_active_attribute(program, index))
                .map(|attribute| ActiveVariable {
                    name: attribute.name,
                    type_code: attribute.atype,
                    size: attribute.size.max(0) as u32,
                })
                .collect()
        }
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> Option<u32> {
        let program = self.program(program)?;
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn active_uniforms(&self, program: ProgramHandle) -> Vec<ActiveVariable> {
        let Some(program) = self.program(program) else {
            return Vec::new();
        };
        unsafe {
            (0..self.gl.get_active_uniforms(program))
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .map(|uniform| ActiveVariable {
                    name: uniform.name,
                    type_code: uniform.utype,
                    size: uniform.size.max(0) as u32,
                })
                .collect()
        }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let program = self.program(program)?;
        let location = unsafe { self.gl.get_uniform_location(program, name) }?;
        let id = self.tables.borrow_mut().uniform_locations.insert(location);
        Some(UniformLocation(id))
    }

    fn upload_uniform(&self, location: UniformLocation, call: UniformCall, data: &UniformData) {
        let location = self.uniform(location);
        let location = location.as_ref();
        let gl = &self.gl;
        unsafe {
            match (call, data) {
                (UniformCall::Uniform1f, UniformData::Float(v)) => gl.uniform_1_f32(location, v[0]),
                (UniformCall::Uniform2fv, UniformData::Float(v)) => {
                    gl.uniform_2_f32_slice(location, v)
                }
                (UniformCall::Uniform3fv, UniformData::Float(v)) => {
                    gl.uniform_3_f32_slice(location, v)
                }
                (UniformCall::Uniform4fv, UniformData::Float(v)) => {
                    gl.uniform_4_f32_slice(location, v)
                }
                (UniformCall::Uniform1i, UniformData::Int(v)) => gl.uniform_1_i32(location, v[0]),
                (UniformCall::Uniform2iv, UniformData::Int(v)) => {
                    gl.uniform_2_i32_slice(location, v)
                }
                (UniformCall::Uniform3iv, UniformData::Int(v)) => {
                    gl.uniform_3_i32_slice(location, v)
                }
                (UniformCall::Uniform4iv, UniformData::Int(v)) => {
                    gl.uniform_4_i32_slice(location, v)
                }
                (UniformCall::Uniform1ui, UniformData::Uint(v)) => {
                    gl.uniform_1_u32(location, v[0])
                }
                (UniformCall::Uniform2uiv, UniformData::Uint(v)) => {
                    gl.uniform_2_u32_slice(location, v)
                }
                (UniformCall::Uniform3uiv, UniformData::Uint(v)) => {
                    gl.uniform_3_u32_slice(location, v)
                }
                (UniformCall::Uniform4uiv, UniformData::Uint(v)) => {
                    gl.uniform_4_u32_slice(location, v)
                }
                (call, data) => {
                    log::error!("glow: {call:?} cannot upload {data:?}");
                }
            }
        }
    }

    fn upload_uniform_matrix(
        &self,
        location: UniformLocation,
        call: UniformCall,
        transpose: bool,
        data: &[f32],
    ) {
        let location = self.uniform(location);
        let location = location.as_ref();
        let gl = &self.gl;
        unsafe {
            match call {
                UniformCall::UniformMatrix2fv => {
                    gl.uniform_matrix_2_f32_slice(location, transpose, data)
                }
                UniformCall::UniformMatrix3fv => {
                    gl.uniform_matrix_3_f32_slice(location, transpose, data)
                }
                UniformCall::UniformMatrix4fv => {
                    gl.uniform_matrix_4_f32_slice(location, transpose, data)
                }
                UniformCall::UniformMatrix2x3fv => {
                    gl.uniform_matrix_2x3_f32_slice(location, transpose, data)
                }
                UniformCall::UniformMatrix2x4fv => {
                    gl.uniform_matrix_2x4_f32_slice(location, transpose, data)
                }
                UniformCall::UniformMatrix3x2fv => {
                    gl.uniform_matrix_3x2_f32_slice(location, transpose, data)
                }
                UniformCall::UniformMatrix3x4fv => {
                    gl.uniform_matrix_3x4_f32_slice(location, transpose, data)
                }
                UniformCall::UniformMatrix4x2fv => {
                    gl.uniform_matrix_4x2_f32_slice(location, transpose, data)
                }
                UniformCall::UniformMatrix4x3fv => {
                    gl.uniform_matrix_4x3_f32_slice(location, transpose, data)
                }
                other => log::error!("glow: {other:?} is not a matrix upload"),
            }
        }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, GraphicsError> {
        let vertex_array = unsafe { self.gl.create_vertex_array() }
            .map_err(GraphicsError::ResourceCreationFailed)?;
        let id = self.tables.borrow_mut().vertex_arrays.insert(vertex_array);
        Ok(VertexArrayHandle(id))
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        let vertex_array =
            vertex_array.and_then(|handle| self.tables.borrow().vertex_arrays.get(handle.0));
        unsafe { self.gl.bind_vertex_array(vertex_array) };
    }

    fn create_buffer(&self) -> Result<BufferHandle, GraphicsError> {
        let buffer =
            unsafe { self.gl.create_buffer() }.map_err(GraphicsError::ResourceCreationFailed)?;
        Ok(BufferHandle(self.tables.borrow_mut().buffers.insert(buffer)))
    }

    fn buffer_data(&self, target: BufferTarget, buffer: BufferHandle, data: &[u8]) {
        let buffer = self.tables.borrow().buffers.get(buffer.0);
        let target = target_code(target);
        unsafe {
            self.gl.bind_buffer(target, buffer);
            self.gl.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
        }
    }

    fn enable_vertex_attribute(&self, location: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(location) };
    }

    fn vertex_attribute_pointer(
        &self,
        location: u32,
        components: u32,
        base_type: BaseType,
        normalized: bool,
        stride: u32,
        offset: u32,
    ) {
        unsafe {
            self.gl.vertex_attrib_pointer_f32(
                location,
                components as i32,
                base_type.code(),
                normalized,
                stride as i32,
                offset as i32,
            );
        }
    }

    fn draw_indexed_triangles(&self, index_count: u32) {
        unsafe {
            self.gl.draw_elements(
                glow::TRIANGLES,
                index_count.min(i32::MAX as u32) as i32,
                glow::UNSIGNED_INT,
                0,
            );
        }
    }
}
