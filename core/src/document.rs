//! Model documents.
//!
//! A model document is a JSON file describing one model: its name, the
//! materials it uses and the meshes it is made of. Decoding happens in three
//! steps, each of which can be run on its own:
//!
//! 1. [`decode_json`] parses the text, reporting syntax errors with a short
//!    excerpt of the text at the failing position.
//! 2. [`validate`] checks the top-level shape and stops at the first problem.
//! 3. [`ModelDocument::from_value`] converts the validated value into typed
//!    descriptors.
//!
//! [`ModelDocument::parse`] runs all three.

use serde::Deserialize;
use serde_json::Value;

use crate::error::CoreError;
use crate::uniform::UniformMap;

/// Number of characters shown around a JSON syntax error.
const EXCERPT_LEN: usize = 10;

/// A decoded model document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDocument {
    pub name: String,
    #[serde(default)]
    pub materials: Vec<MaterialDescriptor>,
    pub meshes: Vec<MeshDocument>,
}

/// Describes a material: the shader it uses and the uniform values it sets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialDescriptor {
    pub name: String,
    pub shader: ShaderReference,
    #[serde(default)]
    pub properties: UniformMap,
}

/// Names a shader and the preprocessor defines it is compiled with.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShaderReference {
    pub name: String,
    #[serde(default)]
    pub defines: Vec<String>,
}

/// One mesh of a model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MeshDocument {
    pub name: String,
    /// Name of the material this mesh is drawn with.
    pub material: String,
    pub buffers: MeshBuffers,
}

/// Raw geometry of a mesh.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MeshBuffers {
    /// Interleaved vertex components.
    pub vertex: Vec<f32>,
    pub index: Vec<u32>,
}

impl ModelDocument {
    /// Decode, validate and convert a model document.
    pub fn parse(text: &str) -> Result<Self, CoreError> {
        let value = decode_json(text)?;
        validate(&value)?;
        Self::from_value(value)
    }

    /// Convert an already validated JSON value.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        serde_json::from_value(value)
            .map_err(|err| CoreError::validation("document", err.to_string()))
    }
}

/// Parse JSON text.
///
/// On a syntax error the returned [`CoreError::JsonSyntax`] carries the byte
/// offset of the failure and up to ten characters of text starting there.
pub fn decode_json(text: &str) -> Result<Value, CoreError> {
    serde_json::from_str(text).map_err(|err| {
        let offset = error_offset(text, err.line(), err.column());
        let excerpt = text[offset..]
            .chars()
            .filter(|c| *c != '\n' && *c != '\r')
            .take(EXCERPT_LEN)
            .collect();
        CoreError::JsonSyntax {
            offset,
            line: err.line(),
            column: err.column(),
            excerpt,
        }
    })
}

/// Byte offset of a one-based line and column, clamped to the text.
fn error_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Check the top-level shape of a model document.
///
/// Fields are checked in the order `name`, `materials`, `meshes`; the first
/// violation is returned.
pub fn validate(value: &Value) -> Result<(), CoreError> {
    let Some(document) = value.as_object() else {
        return Err(CoreError::validation(
            "document",
            format!("expected \"object\", found \"{}\"", type_name(value)),
        ));
    };

    match document.get("name") {
        None | Some(Value::Null) => return Err(CoreError::validation("name", "not found")),
        Some(Value::String(name)) if name.is_empty() => {
            return Err(CoreError::validation("name", "not found"));
        }
        Some(Value::String(_)) => {}
        Some(other) => return Err(expected("name", "string", other)),
    }

    if let Some(materials) = document.get("materials")
        && !materials.is_null()
        && !materials.is_array()
    {
        return Err(expected("materials", "array", materials));
    }

    match document.get("meshes") {
        None | Some(Value::Null) => Err(no_meshes()),
        Some(Value::Array(meshes)) if meshes.is_empty() => Err(no_meshes()),
        Some(Value::Array(_)) => Ok(()),
        Some(other) => Err(expected("meshes", "array", other)),
    }
}

fn no_meshes() -> CoreError {
    CoreError::validation("meshes", "model needs at least 1 mesh, found 0")
}

fn expected(field: &str, kind: &str, found: &Value) -> CoreError {
    CoreError::validation(
        field,
        format!("expected \"{kind}\", found \"{}\"", type_name(found)),
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
