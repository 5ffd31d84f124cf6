//! Program reflection.
//!
//! Turns the active attributes and uniforms of a linked program into typed
//! descriptors. Attributes get a packed vertex layout: sorted by location,
//! each attribute starts where the previous one ends, and every descriptor
//! carries the total vertex size as its stride.

use std::fmt;

use glint_core::CoreError;
use glint_core::glsl::{BaseType, GlslType};
use glint_core::uniform::UniformValue;

use crate::backend::{GpuBackend, ProgramHandle, UniformLocation};
use crate::context::{GraphicsContext, UniformSetter};
use crate::error::GraphicsError;

/// A vertex attribute of a program and its place in the packed vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub location: u32,
    pub base_type: BaseType,
    pub glsl_type: GlslType,
    pub name: String,
    pub component_count: u32,
    /// Size of one whole vertex in bytes, the same for every attribute.
    pub stride_bytes: u32,
    /// Sum of the sizes of all attributes at lower locations.
    pub offset_bytes: u32,
    pub normalized: bool,
}

impl AttributeDescriptor {
    /// Size of this attribute in bytes.
    pub fn size_bytes(&self) -> u32 {
        self.component_count * self.base_type.size()
    }
}

/// A uniform of a program with its upload closure.
#[derive(Clone)]
pub struct UniformDescriptor {
    pub type_code: u32,
    pub glsl_type: GlslType,
    pub name: String,
    pub location: UniformLocation,
    setter: UniformSetter,
}

impl UniformDescriptor {
    /// Upload `value`. The owning program must be current.
    pub fn set(&self, value: &UniformValue) -> Result<(), CoreError> {
        (self.setter)(value)
    }
}

impl fmt::Debug for UniformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformDescriptor")
            .field("type_code", &self.type_code)
            .field("glsl_type", &self.glsl_type)
            .field("name", &self.name)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

fn is_builtin(name: &str) -> bool {
    name.starts_with("gl_")
}

/// Reflect the vertex attributes of `program`.
///
/// Built-in `gl_` attributes are skipped. Matrix, boolean and sampler types
/// cannot be packed and fail with [`GraphicsError::UnknownAttributeType`].
pub fn reflect_attributes(
    backend: &dyn GpuBackend,
    program: ProgramHandle,
) -> Result<Vec<AttributeDescriptor>, GraphicsError> {
    let mut attributes = Vec::new();

    for active in backend.active_attributes(program) {
        if is_builtin(&active.name) {
            continue;
        }
        let unknown = || GraphicsError::UnknownAttributeType {
            name: active.name.clone(),
            code: active.type_code,
        };
        let glsl_type = GlslType::from_code(active.type_code).ok_or_else(unknown)?;
        let (base_type, component_count) = glsl_type.attribute_layout().ok_or_else(unknown)?;
        let location = backend
            .attribute_location(program, &active.name)
            .ok_or_else(|| GraphicsError::AttributeLocationUnavailable {
                name: active.name.clone(),
            })?;

        attributes.push(AttributeDescriptor {
            location,
            base_type,
            glsl_type,
            name: active.name,
            component_count,
            stride_bytes: 0,
            offset_bytes: 0,
            normalized: false,
        });
    }

    attributes.sort_by_key(|attribute| attribute.location);

    let mut offset = 0;
    for (index, attribute) in attributes.iter_mut().enumerate() {
        if attribute.location != index as u32 {
            log::warn!(
                "Attribute {} is at location {}, expected {index}; the packed layout assumes contiguous locations",
                attribute.name,
                attribute.location
            );
        }
        attribute.offset_bytes = offset;
        offset += attribute.size_bytes();
    }
    for attribute in &mut attributes {
        attribute.stride_bytes = offset;
    }

    Ok(attributes)
}

/// Reflect the uniforms of `program` and build their setters.
///
/// Built-in `gl_` uniforms are skipped. Array uniforms are reflected as their
/// first element, under their name without the `[0]` suffix.
pub fn reflect_uniforms(
    context: &GraphicsContext,
    backend: &dyn GpuBackend,
    program: ProgramHandle,
) -> Result<Vec<UniformDescriptor>, GraphicsError> {
    let mut uniforms = Vec::new();

    for active in backend.active_uniforms(program) {
        if is_builtin(&active.name) {
            continue;
        }
        let name = active
            .name
            .strip_suffix("[0]")
            .unwrap_or(&active.name)
            .to_owned();
        if active.size > 1 {
            log::debug!("Uniform {name} is an array of {}, only element 0 is bound", active.size);
        }

        let glsl_type =
            GlslType::from_code(active.type_code).ok_or_else(|| GraphicsError::UnknownUniformType {
                name: name.clone(),
                code: active.type_code,
            })?;
        let location = backend
            .uniform_location(program, &active.name)
            .ok_or_else(|| GraphicsError::UniformLocationUnavailable { name: name.clone() })?;
        let setter = context.build_uniform_setter(active.type_code, location)?;

        uniforms.push(UniformDescriptor {
            type_code: active.type_code,
            glsl_type,
            name,
            location,
            setter,
        });
    }

    Ok(uniforms)
}
