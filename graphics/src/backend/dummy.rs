//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't touch a GPU. It records every call it receives and
//! answers introspection queries from a scripted [`ProgramInterface`], so the
//! whole loading pipeline can run in unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use glint_core::glsl::{BaseType, GlslType, UniformCall};
use glint_core::uniform::UniformData;

use crate::error::GraphicsError;

use super::{
    ActiveVariable, BufferHandle, BufferTarget, GpuBackend, ProgramHandle, ShaderHandle,
    ShaderStage, UniformLocation, VertexArrayHandle,
};

/// A call received by the [`DummyBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CompileShader {
        shader: ShaderHandle,
        stage: ShaderStage,
        source: String,
    },
    DeleteShader(ShaderHandle),
    LinkProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    UseProgram(Option<ProgramHandle>),
    UploadUniform {
        location: UniformLocation,
        call: UniformCall,
        data: UniformData,
    },
    UploadUniformMatrix {
        location: UniformLocation,
        call: UniformCall,
        transpose: bool,
        data: Vec<f32>,
    },
    CreateVertexArray(VertexArrayHandle),
    BindVertexArray(Option<VertexArrayHandle>),
    CreateBuffer(BufferHandle),
    BufferData {
        target: BufferTarget,
        buffer: BufferHandle,
        bytes: usize,
    },
    EnableVertexAttribute(u32),
    VertexAttributePointer {
        location: u32,
        components: u32,
        base_type: BaseType,
        normalized: bool,
        stride: u32,
        offset: u32,
    },
    DrawIndexedTriangles(u32),
}

/// An attribute the dummy backend reports for every linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedAttribute {
    pub name: String,
    pub type_code: u32,
    pub location: Option<u32>,
}

/// A uniform the dummy backend reports for every linked program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedUniform {
    pub name: String,
    pub type_code: u32,
    /// Whether [`GpuBackend::uniform_location`] resolves this uniform.
    pub located: bool,
}

/// The active interface reported by introspection.
///
/// Uniform locations are the uniform's index in `uniforms`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramInterface {
    pub attributes: Vec<ScriptedAttribute>,
    pub uniforms: Vec<ScriptedUniform>,
}

impl ProgramInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute of a known type at `location`.
    pub fn attribute(self, name: &str, ty: GlslType, location: u32) -> Self {
        self.raw_attribute(name, ty.code(), Some(location))
    }

    /// Add an attribute with an arbitrary type code and optional location.
    pub fn raw_attribute(mut self, name: &str, type_code: u32, location: Option<u32>) -> Self {
        self.attributes.push(ScriptedAttribute {
            name: name.to_owned(),
            type_code,
            location,
        });
        self
    }

    /// Add a uniform of a known type.
    pub fn uniform(self, name: &str, ty: GlslType) -> Self {
        self.raw_uniform(name, ty.code(), true)
    }

    /// Add a uniform with an arbitrary type code.
    pub fn raw_uniform(mut self, name: &str, type_code: u32, located: bool) -> Self {
        self.uniforms.push(ScriptedUniform {
            name: name.to_owned(),
            type_code,
            located,
        });
        self
    }
}

/// Dummy GPU backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    interface: RefCell<ProgramInterface>,
    calls: RefCell<Vec<BackendCall>>,
    stages: RefCell<HashMap<ShaderHandle, ShaderStage>>,
    next_handle: Cell<u32>,
    compile_failure: RefCell<Option<String>>,
    link_failure: Cell<bool>,
}

impl DummyBackend {
    /// Create a new dummy backend reporting an empty interface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dummy backend reporting `interface` for every program.
    pub fn with_interface(interface: ProgramInterface) -> Self {
        let backend = Self::new();
        backend.set_interface(interface);
        backend
    }

    /// Replace the interface reported for programs linked from now on.
    pub fn set_interface(&self, interface: ProgramInterface) {
        *self.interface.borrow_mut() = interface;
    }

    /// Fail compilation of every stage whose source contains `marker`.
    pub fn fail_compile_containing(&self, marker: impl Into<String>) {
        *self.compile_failure.borrow_mut() = Some(marker.into());
    }

    /// Make every link fail (or succeed again).
    pub fn set_link_failure(&self, fail: bool) {
        self.link_failure.set(fail);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.borrow().clone()
    }

    /// Number of calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&BackendCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| predicate(call)).count()
    }

    /// Forget the recorded calls.
    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: BackendCall) {
        log::trace!("DummyBackend: {call:?}");
        self.calls.borrow_mut().push(call);
    }

    fn next(&self) -> u32 {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        handle
    }

    fn scripted_variables<'a>(
        list: impl Iterator<Item = (&'a String, u32)>,
    ) -> Vec<ActiveVariable> {
        list.map(|(name, type_code)| ActiveVariable {
            name: name.clone(),
            type_code,
            size: 1,
        })
        .collect()
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy"
    }

    fn create_shader(&self, stage: ShaderStage) -> Result<ShaderHandle, GraphicsError> {
        let shader = ShaderHandle(self.next());
        self.stages.borrow_mut().insert(shader, stage);
        Ok(shader)
    }

    fn compile_shader(&self, shader: ShaderHandle, source: &str) -> bool {
        let stage = self
            .stages
            .borrow()
            .get(&shader)
            .copied()
            .unwrap_or(ShaderStage::Vertex);
        self.record(BackendCall::CompileShader {
            shader,
            stage,
            source: source.to_owned(),
        });
        match &*self.compile_failure.borrow() {
            Some(marker) => !source.contains(marker.as_str()),
            None => true,
        }
    }

    fn shader_info_log(&self, _shader: ShaderHandle) -> String {
        "ERROR: 0:1: dummy compile failure".to_owned()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.record(BackendCall::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<ProgramHandle, GraphicsError> {
        Ok(ProgramHandle(self.next()))
    }

    fn link_program(
        &self,
        program: ProgramHandle,
        _vertex: ShaderHandle,
        _fragment: ShaderHandle,
    ) -> bool {
        self.record(BackendCall::LinkProgram(program));
        !self.link_failure.get()
    }

    fn program_info_log(&self, _program: ProgramHandle) -> String {
        "ERROR: dummy link failure".to_owned()
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.record(BackendCall::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.record(BackendCall::UseProgram(program));
    }

    fn active_attributes(&self, _program: ProgramHandle) -> Vec<ActiveVariable> {
        let interface = self.interface.borrow();
        Self::scripted_variables(
            interface
                .attributes
                .iter()
                .map(|attribute| (&attribute.name, attribute.type_code)),
        )
    }

    fn attribute_location(&self, _program: ProgramHandle, name: &str) -> Option<u32> {
        self.interface
            .borrow()
            .attributes
            .iter()
            .find(|attribute| attribute.name == name)
            .and_then(|attribute| attribute.location)
    }

    fn active_uniforms(&self, _program: ProgramHandle) -> Vec<ActiveVariable> {
        let interface = self.interface.borrow();
        Self::scripted_variables(
            interface
                .uniforms
                .iter()
                .map(|uniform| (&uniform.name, uniform.type_code)),
        )
    }

    fn uniform_location(&self, _program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        self.interface
            .borrow()
            .uniforms
            .iter()
            .position(|uniform| uniform.name == name && uniform.located)
            .map(|index| UniformLocation(index as u32))
    }

    fn upload_uniform(&self, location: UniformLocation, call: UniformCall, data: &UniformData) {
        self.record(BackendCall::UploadUniform {
            location,
            call,
            data: data.clone(),
        });
    }

    fn upload_uniform_matrix(
        &self,
        location: UniformLocation,
        call: UniformCall,
        transpose: bool,
        data: &[f32],
    ) {
        self.record(BackendCall::UploadUniformMatrix {
            location,
            call,
            transpose,
            data: data.to_vec(),
        });
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, GraphicsError> {
        let vertex_array = VertexArrayHandle(self.next());
        self.record(BackendCall::CreateVertexArray(vertex_array));
        Ok(vertex_array)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        self.record(BackendCall::BindVertexArray(vertex_array));
    }

    fn create_buffer(&self) -> Result<BufferHandle, GraphicsError> {
        let buffer = BufferHandle(self.next());
        self.record(BackendCall::CreateBuffer(buffer));
        Ok(buffer)
    }

    fn buffer_data(&self, target: BufferTarget, buffer: BufferHandle, data: &[u8]) {
        self.record(BackendCall::BufferData {
            target,
            buffer,
            bytes: data.len(),
        });
    }

    fn enable_vertex_attribute(&self, location: u32) {
        self.record(BackendCall::EnableVertexAttribute(location));
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
        self.record(BackendCall::VertexAttributePointer {
            location,
            components,
            base_type,
            normalized,
            stride,
            offset,
        });
    }

    fn draw_indexed_triangles(&self, index_count: u32) {
        self.record(BackendCall::DrawIndexedTriangles(index_count));
    }
}
