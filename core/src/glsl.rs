//! GLSL data-type codes reported by program introspection.
//!
//! WebGL2 reports the type of every active attribute and uniform as a native
//! enum value (`FLOAT_VEC3`, `FLOAT_MAT4`, ...). This module turns that open
//! `u32` into the closed [`GlslType`] enumeration and provides one table,
//! [`GlslType::info`], mapping each variant to its element kind, component
//! count and the uniform upload primitive that must be used for it.
//!
//! Everything that needs to know "what does type code X mean" goes through
//! this table so the ~27 cases cannot drift apart between call sites.

use std::fmt;

/// Scalar component type used when describing vertex attribute layouts.
///
/// These are the values passed as the `type` argument of
/// `vertexAttribPointer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
}

impl BaseType {
    /// All base types, in native code order.
    pub const ALL: [BaseType; 7] = [
        Self::Byte,
        Self::UnsignedByte,
        Self::Short,
        Self::UnsignedShort,
        Self::Int,
        Self::UnsignedInt,
        Self::Float,
    ];

    /// Native enum value of this base type.
    pub fn code(self) -> u32 {
        match self {
            Self::Byte => 0x1400,
            Self::UnsignedByte => 0x1401,
            Self::Short => 0x1402,
            Self::UnsignedShort => 0x1403,
            Self::Int => 0x1404,
            Self::UnsignedInt => 0x1405,
            Self::Float => 0x1406,
        }
    }

    /// Look up a base type by its native enum value.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|base| base.code() == code)
    }

    /// Size in bytes of one component.
    pub fn size(self) -> u32 {
        match self {
            Self::Byte | Self::UnsignedByte => 1,
            Self::Short | Self::UnsignedShort => 2,
            Self::Int | Self::UnsignedInt | Self::Float => 4,
        }
    }
}

/// Element kind a uniform value must convert to before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Float,
    Int,
    Uint,
    Bool,
    /// Texture unit index, uploaded as a signed integer.
    Sampler,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Bool => "bool",
            Self::Sampler => "sampler",
        };
        f.write_str(name)
    }
}

/// Typed uniform upload primitive.
///
/// Variants are named after the WebGL2 entry points they stand for. Matrix
/// primitives are always invoked with `transpose = false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformCall {
    Uniform1f,
    Uniform1i,
    Uniform1ui,
    Uniform2fv,
    Uniform3fv,
    Uniform4fv,
    Uniform2iv,
    Uniform3iv,
    Uniform4iv,
    Uniform2uiv,
    Uniform3uiv,
    Uniform4uiv,
    UniformMatrix2fv,
    UniformMatrix3fv,
    UniformMatrix4fv,
    UniformMatrix2x3fv,
    UniformMatrix2x4fv,
    UniformMatrix3x2fv,
    UniformMatrix3x4fv,
    UniformMatrix4x2fv,
    UniformMatrix4x3fv,
}

impl UniformCall {
    /// Number of scalar values the primitive consumes.
    pub fn arity(self) -> usize {
        match self {
            Self::Uniform1f | Self::Uniform1i | Self::Uniform1ui => 1,
            Self::Uniform2fv | Self::Uniform2iv | Self::Uniform2uiv => 2,
            Self::Uniform3fv | Self::Uniform3iv | Self::Uniform3uiv => 3,
            Self::Uniform4fv | Self::Uniform4iv | Self::Uniform4uiv => 4,
            Self::UniformMatrix2fv => 4,
            Self::UniformMatrix3fv => 9,
            Self::UniformMatrix4fv => 16,
            Self::UniformMatrix2x3fv | Self::UniformMatrix3x2fv => 6,
            Self::UniformMatrix2x4fv | Self::UniformMatrix4x2fv => 8,
            Self::UniformMatrix3x4fv | Self::UniformMatrix4x3fv => 12,
        }
    }

    /// Whether this is one of the `uniformMatrix*fv` primitives.
    pub fn is_matrix(self) -> bool {
        matches!(
            self,
            Self::UniformMatrix2fv
                | Self::UniformMatrix3fv
                | Self::UniformMatrix4fv
                | Self::UniformMatrix2x3fv
                | Self::UniformMatrix2x4fv
                | Self::UniformMatrix3x2fv
                | Self::UniformMatrix3x4fv
                | Self::UniformMatrix4x2fv
                | Self::UniformMatrix4x3fv
        )
    }
}

/// The closed set of GLSL types the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlslType {
    Float,
    Int,
    Uint,
    Bool,
    Vec2,
    Vec3,
    Vec4,
    IVec2,
    IVec3,
    IVec4,
    UVec2,
    UVec3,
    UVec4,
    BVec2,
    BVec3,
    BVec4,
    Mat2,
    Mat3,
    Mat4,
    Mat2x3,
    Mat2x4,
    Mat3x2,
    Mat3x4,
    Mat4x2,
    Mat4x3,
    Sampler2D,
    SamplerCube,
}

/// One row of the type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlslTypeInfo {
    /// Native enum value reported by introspection.
    pub code: u32,
    /// GLSL spelling of the type.
    pub name: &'static str,
    /// Kind of value the uniform setter accepts.
    pub element: ElementKind,
    /// Number of scalar components (rows * columns for matrices).
    pub components: u32,
    /// Upload primitive used by uniform setters.
    pub upload: UniformCall,
}

const fn row(
    code: u32,
    name: &'static str,
    element: ElementKind,
    components: u32,
    upload: UniformCall,
) -> GlslTypeInfo {
    GlslTypeInfo {
        code,
        name,
        element,
        components,
        upload,
    }
}

impl GlslType {
    /// Every recognized type.
    pub const ALL: [GlslType; 27] = [
        Self::Float,
        Self::Int,
        Self::Uint,
        Self::Bool,
        Self::Vec2,
        Self::Vec3,
        Self::Vec4,
        Self::IVec2,
        Self::IVec3,
        Self::IVec4,
        Self::UVec2,
        Self::UVec3,
        Self::UVec4,
        Self::BVec2,
        Self::BVec3,
        Self::BVec4,
        Self::Mat2,
        Self::Mat3,
        Self::Mat4,
        Self::Mat2x3,
        Self::Mat2x4,
        Self::Mat3x2,
        Self::Mat3x4,
        Self::Mat4x2,
        Self::Mat4x3,
        Self::Sampler2D,
        Self::SamplerCube,
    ];

    /// The type table.
    pub fn info(self) -> GlslTypeInfo {
        use ElementKind as E;
        use UniformCall as U;

        match self {
            Self::Float => row(0x1406, "float", E::Float, 1, U::Uniform1f),
            Self::Int => row(0x1404, "int", E::Int, 1, U::Uniform1i),
            Self::Uint => row(0x1405, "uint", E::Uint, 1, U::Uniform1ui),
            Self::Bool => row(0x8B56, "bool", E::Bool, 1, U::Uniform1i),
            Self::Vec2 => row(0x8B50, "vec2", E::Float, 2, U::Uniform2fv),
            Self::Vec3 => row(0x8B51, "vec3", E::Float, 3, U::Uniform3fv),
            Self::Vec4 => row(0x8B52, "vec4", E::Float, 4, U::Uniform4fv),
            Self::IVec2 => row(0x8B53, "ivec2", E::Int, 2, U::Uniform2iv),
            Self::IVec3 => row(0x8B54, "ivec3", E::Int, 3, U::Uniform3iv),
            Self::IVec4 => row(0x8B55, "ivec4", E::Int, 4, U::Uniform4iv),
            Self::UVec2 => row(0x8DC6, "uvec2", E::Uint, 2, U::Uniform2uiv),
            Self::UVec3 => row(0x8DC7, "uvec3", E::Uint, 3, U::Uniform3uiv),
            Self::UVec4 => row(0x8DC8, "uvec4", E::Uint, 4, U::Uniform4uiv),
            Self::BVec2 => row(0x8B57, "bvec2", E::Bool, 2, U::Uniform2iv),
            Self::BVec3 => row(0x8B58, "bvec3", E::Bool, 3, U::Uniform3iv),
            Self::BVec4 => row(0x8B59, "bvec4", E::Bool, 4, U::Uniform4iv),
            Self::Mat2 => row(0x8B5A, "mat2", E::Float, 4, U::UniformMatrix2fv),
            Self::Mat3 => row(0x8B5B, "mat3", E::Float, 9, U::UniformMatrix3fv),
            Self::Mat4 => row(0x8B5C, "mat4", E::Float, 16, U::UniformMatrix4fv),
            Self::Mat2x3 => row(0x8B65, "mat2x3", E::Float, 6, U::UniformMatrix2x3fv),
            Self::Mat2x4 => row(0x8B66, "mat2x4", E::Float, 8, U::UniformMatrix2x4fv),
            Self::Mat3x2 => row(0x8B67, "mat3x2", E::Float, 6, U::UniformMatrix3x2fv),
            Self::Mat3x4 => row(0x8B68, "mat3x4", E::Float, 12, U::UniformMatrix3x4fv),
            Self::Mat4x2 => row(0x8B69, "mat4x2", E::Float, 8, U::UniformMatrix4x2fv),
            Self::Mat4x3 => row(0x8B6A, "mat4x3", E::Float, 12, U::UniformMatrix4x3fv),
            Self::Sampler2D => row(0x8B5E, "sampler2D", E::Sampler, 1, U::Uniform1i),
            Self::SamplerCube => row(0x8B60, "samplerCube", E::Sampler, 1, U::Uniform1i),
        }
    }

    /// Look up a type by the native enum value reported by introspection.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.info().code == code)
    }

    /// Native enum value.
    pub fn code(self) -> u32 {
        self.info().code
    }

    /// Vertex attribute layout for this type: `(base type, component count)`.
    ///
    /// Only float, int and uint scalars and vectors can be vertex attributes;
    /// booleans, matrices and samplers return `None`.
    pub fn attribute_layout(self) -> Option<(BaseType, u32)> {
        let info = self.info();
        if info.components > 4 {
            return None;
        }
        match info.element {
            ElementKind::Float => Some((BaseType::Float, info.components)),
            ElementKind::Int => Some((BaseType::Int, info.components)),
            ElementKind::Uint => Some((BaseType::UnsignedInt, info.components)),
            ElementKind::Bool | ElementKind::Sampler => None,
        }
    }
}

impl fmt::Display for GlslType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.info().name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let codes: HashSet<u32> = GlslType::ALL.iter().map(|ty| ty.code()).collect();
        assert_eq!(codes.len(), GlslType::ALL.len());
    }

    #[test]
    fn from_code_roundtrips_every_type() {
        for ty in GlslType::ALL {
            assert_eq!(GlslType::from_code(ty.code()), Some(ty));
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert_eq!(GlslType::from_code(0xDEAD), None);
        assert_eq!(BaseType::from_code(0x1407), None);
    }

    #[test]
    fn upload_arity_matches_component_count() {
        for ty in GlslType::ALL {
            let info = ty.info();
            assert_eq!(info.upload.arity(), info.components as usize, "{ty}");
        }
    }

    #[rstest]
    #[case::float(GlslType::Float, Some((BaseType::Float, 1)))]
    #[case::vec3(GlslType::Vec3, Some((BaseType::Float, 3)))]
    #[case::ivec4(GlslType::IVec4, Some((BaseType::Int, 4)))]
    #[case::uvec2(GlslType::UVec2, Some((BaseType::UnsignedInt, 2)))]
    #[case::bool(GlslType::Bool, None)]
    #[case::mat4(GlslType::Mat4, None)]
    #[case::sampler(GlslType::Sampler2D, None)]
    fn attribute_layouts(#[case] ty: GlslType, #[case] expected: Option<(BaseType, u32)>) {
        assert_eq!(ty.attribute_layout(), expected);
    }

    #[test]
    fn only_matrices_use_matrix_uploads() {
        for ty in GlslType::ALL {
            let info = ty.info();
            let is_matrix_type = info.name.starts_with("mat");
            assert_eq!(info.upload.is_matrix(), is_matrix_type, "{ty}");
        }
    }

    #[test]
    fn base_type_sizes() {
        assert_eq!(BaseType::Byte.size(), 1);
        assert_eq!(BaseType::UnsignedShort.size(), 2);
        assert_eq!(BaseType::Float.size(), 4);
        assert_eq!(BaseType::from_code(0x1406), Some(BaseType::Float));
    }
}
