//! Uniform values and their conversion to upload payloads.
//!
//! Material documents and per-frame inputs describe uniforms with the loose
//! [`UniformValue`] union. Before anything reaches the GPU the value is checked
//! against the reflected type of the uniform and converted to a
//! [`UniformData`] payload of the exact element kind and length the upload
//! primitive expects. A wrong arity or a fractional value for an integer
//! uniform is an error, never a silent misupload.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::CoreError;
use crate::glsl::ElementKind;

/// Named uniform values, iterated in name order.
pub type UniformMap = BTreeMap<String, UniformValue>;

/// A value supplied for a uniform.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "PropertyValue")]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Uint(u32),
    Bool(bool),
    /// Flat vector or matrix data; matrices are column-major.
    FloatArray(Vec<f32>),
}

/// Shape of a property value in a material document.
#[derive(Deserialize)]
#[serde(untagged)]
enum PropertyValue {
    Bool(bool),
    Number(f64),
    Array(Vec<f64>),
}

impl From<PropertyValue> for UniformValue {
    fn from(value: PropertyValue) -> Self {
        match value {
            PropertyValue::Bool(b) => Self::Bool(b),
            PropertyValue::Number(n) => Self::Float(n as f32),
            PropertyValue::Array(values) => {
                Self::FloatArray(values.into_iter().map(|v| v as f32).collect())
            }
        }
    }
}

/// Converted payload for one upload primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformData {
    Float(Vec<f32>),
    Int(Vec<i32>),
    Uint(Vec<u32>),
}

impl UniformData {
    /// Number of scalar components in the payload.
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Uint(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UniformValue {
    /// Number of scalar components this value carries.
    pub fn len(&self) -> usize {
        match self {
            Self::FloatArray(values) => values.len(),
            _ => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert to an upload payload of `arity` components of `element` kind.
    pub fn convert(&self, element: ElementKind, arity: usize) -> Result<UniformData, CoreError> {
        if self.len() != arity {
            return Err(self.mismatch(element, arity));
        }

        let components = self.components();
        match element {
            ElementKind::Float => {
                if matches!(self, Self::Bool(_)) {
                    return Err(self.mismatch(element, arity));
                }
                Ok(UniformData::Float(
                    components.iter().map(|&v| v as f32).collect(),
                ))
            }
            ElementKind::Int | ElementKind::Sampler => {
                if matches!(self, Self::Bool(_)) {
                    return Err(self.mismatch(element, arity));
                }
                components
                    .iter()
                    .map(|&v| integral(v).and_then(|v| i32::try_from(v).ok()))
                    .collect::<Option<Vec<_>>>()
                    .map(UniformData::Int)
                    .ok_or_else(|| self.mismatch(element, arity))
            }
            ElementKind::Uint => {
                if matches!(self, Self::Bool(_)) {
                    return Err(self.mismatch(element, arity));
                }
                components
                    .iter()
                    .map(|&v| integral(v).and_then(|v| u32::try_from(v).ok()))
                    .collect::<Option<Vec<_>>>()
                    .map(UniformData::Uint)
                    .ok_or_else(|| self.mismatch(element, arity))
            }
            ElementKind::Bool => components
                .iter()
                .map(|&v| match integral(v) {
                    Some(0) => Some(0),
                    Some(1) => Some(1),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(UniformData::Int)
                .ok_or_else(|| self.mismatch(element, arity)),
        }
    }

    fn components(&self) -> Vec<f64> {
        match self {
            Self::Float(v) => vec![f64::from(*v)],
            Self::Int(v) => vec![f64::from(*v)],
            Self::Uint(v) => vec![f64::from(*v)],
            Self::Bool(b) => vec![if *b { 1.0 } else { 0.0 }],
            Self::FloatArray(values) => values.iter().map(|&v| f64::from(v)).collect(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Float(v) => format!("float {v}"),
            Self::Int(v) => format!("int {v}"),
            Self::Uint(v) => format!("uint {v}"),
            Self::Bool(b) => format!("bool {b}"),
            Self::FloatArray(values) => format!("array of {} values", values.len()),
        }
    }

    fn mismatch(&self, element: ElementKind, arity: usize) -> CoreError {
        let plural = if arity == 1 { "" } else { "s" };
        CoreError::ValueMismatch {
            expected: format!("{arity} {element} value{plural}"),
            found: self.describe(),
        }
    }
}

fn integral(value: f64) -> Option<i64> {
    (value.fract() == 0.0 && value.is_finite()).then_some(value as i64)
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for UniformValue {
    fn from(value: u32) -> Self {
        Self::Uint(value)
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(values: Vec<f32>) -> Self {
        Self::FloatArray(values)
    }
}

impl<const N: usize> From<[f32; N]> for UniformValue {
    fn from(values: [f32; N]) -> Self {
        Self::FloatArray(values.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn float_array_converts_to_float_payload() {
        let value = UniformValue::from([1.0, 0.0, 0.0, 1.0]);
        assert_eq!(
            value.convert(ElementKind::Float, 4).unwrap(),
            UniformData::Float(vec![1.0, 0.0, 0.0, 1.0])
        );
    }

    #[rstest]
    #[case::too_short(UniformValue::from([1.0, 2.0, 3.0]), ElementKind::Float, 4)]
    #[case::scalar_for_vector(UniformValue::Float(1.0), ElementKind::Float, 2)]
    #[case::fraction_for_int(UniformValue::Float(1.5), ElementKind::Int, 1)]
    #[case::negative_for_uint(UniformValue::Int(-1), ElementKind::Uint, 1)]
    #[case::bool_for_float(UniformValue::Bool(true), ElementKind::Float, 1)]
    #[case::two_for_bool(UniformValue::Float(2.0), ElementKind::Bool, 1)]
    fn mismatches_are_rejected(
        #[case] value: UniformValue,
        #[case] element: ElementKind,
        #[case] arity: usize,
    ) {
        assert!(matches!(
            value.convert(element, arity),
            Err(CoreError::ValueMismatch { .. })
        ));
    }

    #[test]
    fn integral_floats_convert_to_integers() {
        assert_eq!(
            UniformValue::Float(3.0).convert(ElementKind::Int, 1).unwrap(),
            UniformData::Int(vec![3])
        );
        assert_eq!(
            UniformValue::from(vec![1.0, 2.0])
                .convert(ElementKind::Uint, 2)
                .unwrap(),
            UniformData::Uint(vec![1, 2])
        );
        assert_eq!(
            UniformValue::Float(0.0)
                .convert(ElementKind::Sampler, 1)
                .unwrap(),
            UniformData::Int(vec![0])
        );
    }

    #[test]
    fn bools_upload_as_integers() {
        assert_eq!(
            UniformValue::Bool(true).convert(ElementKind::Bool, 1).unwrap(),
            UniformData::Int(vec![1])
        );
        assert_eq!(
            UniformValue::from(vec![0.0, 1.0, 1.0])
                .convert(ElementKind::Bool, 3)
                .unwrap(),
            UniformData::Int(vec![0, 1, 1])
        );
    }

    #[test]
    fn mismatch_message_names_expectation() {
        let err = UniformValue::from([1.0, 2.0, 3.0])
            .convert(ElementKind::Float, 4)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected 4 float values, found array of 3 values"
        );
    }

    #[test]
    fn properties_deserialize_from_json() {
        let map: UniformMap = serde_json::from_str(
            r#"{ "u_color": [1, 0.5, 0, 1], "u_shininess": 32, "u_lit": true }"#,
        )
        .unwrap();

        assert_eq!(
            map["u_color"],
            UniformValue::FloatArray(vec![1.0, 0.5, 0.0, 1.0])
        );
        assert_eq!(map["u_shininess"], UniformValue::Float(32.0));
        assert_eq!(map["u_lit"], UniformValue::Bool(true));
    }
}
