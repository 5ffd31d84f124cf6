//! Graphics error types.

use glint_core::CoreError;
use glint_vfs::VfsError;
use thiserror::Error;

use crate::backend::ShaderStage;

/// Errors that can occur in the graphics system.
///
/// `Clone` so the result of one in-flight load can be handed to every caller
/// waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    /// The graphics context was used before [`GraphicsContext::initialize`](crate::GraphicsContext::initialize).
    #[error("graphics context is not initialized")]
    NotInitialized,
    /// [`GraphicsContext::initialize`](crate::GraphicsContext::initialize) was called twice.
    #[error("graphics context is already initialized")]
    AlreadyInitialized,
    /// The surface could not provide a graphics context.
    #[error("graphics context unavailable")]
    ContextUnavailable,

    /// Loading an asset failed.
    #[error(transparent)]
    Asset(#[from] VfsError),
    /// A document could not be decoded or validated.
    #[error(transparent)]
    Document(#[from] CoreError),

    /// The shader source does not contain both stage markers in order.
    #[error("invalid source for shader {shader}: {reason}")]
    InvalidShaderSource { shader: String, reason: String },
    /// A shader stage failed to compile. `stage_source` is the stage source as compiled.
    #[error("failed to compile {stage} stage of shader {shader}: {info_log}")]
    ShaderCompile {
        shader: String,
        stage: ShaderStage,
        info_log: String,
        stage_source: String,
    },
    /// The program failed to link.
    #[error("failed to link shader {shader}: {info_log}")]
    ShaderLink { shader: String, info_log: String },

    /// An active attribute has a type that cannot be a vertex attribute.
    #[error("attribute {name} has unknown type 0x{code:04X}")]
    UnknownAttributeType { name: String, code: u32 },
    /// An active attribute has no bound location.
    #[error("attribute {name} has no location")]
    AttributeLocationUnavailable { name: String },
    /// An active uniform has a type outside the known set.
    #[error("uniform {name} has unknown type 0x{code:04X}")]
    UnknownUniformType { name: String, code: u32 },
    /// An active uniform has no location.
    #[error("uniform {name} has no location")]
    UniformLocationUnavailable { name: String },
    /// No upload primitive exists for this type code.
    #[error("unsupported uniform type 0x{0:04X}")]
    UnsupportedUniformType(u32),
    /// A uniform value does not fit the uniform's type.
    #[error("uniform {uniform} of shader {shader}: {reason}")]
    UniformValueMismatch {
        shader: String,
        uniform: String,
        reason: String,
    },

    /// The vertex buffer length is not a multiple of the vertex stride.
    #[error(
        "vertex buffer of mesh {mesh} has {len} components, not a multiple of the stride ({stride} components)"
    )]
    VertexBufferMisaligned {
        mesh: String,
        len: usize,
        stride: usize,
    },
    /// The index buffer does not reference exactly the vertices in the vertex buffer.
    #[error("index buffer of mesh {mesh} references {referenced} vertices, vertex buffer holds {vertex_count}")]
    IndexVertexCountMismatch {
        mesh: String,
        referenced: u64,
        vertex_count: usize,
    },
    /// A mesh names a material the model does not define.
    #[error("material {material} not found for mesh {mesh}")]
    MissingMaterialReference { mesh: String, material: String },

    /// Failed to create a resource.
    #[error("resource creation failed: {0}")]
    ResourceCreationFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphicsError::NotInitialized;
        assert_eq!(err.to_string(), "graphics context is not initialized");

        let err = GraphicsError::UnknownUniformType {
            name: "u_tex".into(),
            code: 0x8B62,
        };
        assert_eq!(err.to_string(), "uniform u_tex has unknown type 0x8B62");

        let err = GraphicsError::MissingMaterialReference {
            mesh: "body".into(),
            material: "red".into(),
        };
        assert_eq!(err.to_string(), "material red not found for mesh body");
    }

    #[test]
    fn wrapped_errors_are_transparent() {
        let err = GraphicsError::from(VfsError::not_found("shader/basic.glsl"));
        assert_eq!(
            err.to_string(),
            "failed to load shader/basic.glsl: status 404: not found"
        );
    }
}
