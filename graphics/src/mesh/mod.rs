//! GPU meshes.
//!
//! A [`Mesh`] is built from the buffers of a [`MeshDocument`] and the
//! reflected attribute layout of the shader that will draw it. Vertex data is
//! interleaved 32-bit floats laid out exactly as the attribute descriptors
//! describe; index data is 32-bit unsigned integers drawn as triangles.

use glint_core::document::MeshDocument;

use crate::backend::{BufferTarget, GpuBackend, VertexArrayHandle};
use crate::error::GraphicsError;
use crate::shader::AttributeDescriptor;

/// Size of one vertex buffer component in bytes.
const COMPONENT_SIZE: u32 = 4;

/// An indexed triangle mesh uploaded to the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mesh {
    name: String,
    material: String,
    vertex_array: VertexArrayHandle,
    vertex_count: u32,
    index_count: u32,
}

/// Number of vertices in `vertex_len` components at `stride_components` per
/// vertex, after checking the index buffer references exactly those vertices.
///
/// The index buffer must be non-empty and its largest value must be the last
/// vertex.
pub fn check_geometry(
    mesh: &str,
    vertex_len: usize,
    stride_components: usize,
    indices: &[u32],
) -> Result<usize, GraphicsError> {
    if stride_components == 0 || vertex_len % stride_components != 0 {
        return Err(GraphicsError::VertexBufferMisaligned {
            mesh: mesh.to_owned(),
            len: vertex_len,
            stride: stride_components,
        });
    }

    let vertex_count = vertex_len / stride_components;
    // u64 so the largest u32 index cannot wrap on 32-bit targets.
    let referenced = indices.iter().max().map_or(0, |&max| u64::from(max) + 1);
    if indices.is_empty() || referenced != vertex_count as u64 {
        return Err(GraphicsError::IndexVertexCountMismatch {
            mesh: mesh.to_owned(),
            referenced,
            vertex_count,
        });
    }

    Ok(vertex_count)
}

impl Mesh {
    /// Upload `document` using the vertex layout in `attributes`.
    pub fn from_document(
        backend: &dyn GpuBackend,
        document: &MeshDocument,
        attributes: &[AttributeDescriptor],
    ) -> Result<Self, GraphicsError> {
        let stride_bytes = attributes.first().map_or(0, |attribute| attribute.stride_bytes);
        let vertices = &document.buffers.vertex;
        let indices = &document.buffers.index;
        let vertex_count = check_geometry(
            &document.name,
            vertices.len(),
            (stride_bytes / COMPONENT_SIZE) as usize,
            indices,
        )?;

        let vertex_array = backend.create_vertex_array()?;
        backend.bind_vertex_array(Some(vertex_array));

        let vertex_buffer = backend.create_buffer()?;
        backend.buffer_data(
            BufferTarget::Array,
            vertex_buffer,
            bytemuck::cast_slice(vertices.as_slice()),
        );
        let index_buffer = backend.create_buffer()?;
        backend.buffer_data(
            BufferTarget::ElementArray,
            index_buffer,
            bytemuck::cast_slice(indices.as_slice()),
        );

        for attribute in attributes {
            backend.enable_vertex_attribute(attribute.location);
            backend.vertex_attribute_pointer(
                attribute.location,
                attribute.component_count,
                attribute.base_type,
                attribute.normalized,
                attribute.stride_bytes,
                attribute.offset_bytes,
            );
        }
        backend.bind_vertex_array(None);

        log::debug!(
            "Uploaded mesh {}: {vertex_count} vertices, {} indices",
            document.name,
            indices.len()
        );

        Ok(Self {
            name: document.name.clone(),
            material: document.material.clone(),
            vertex_array,
            vertex_count: vertex_count as u32,
            index_count: indices.len() as u32,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the material this mesh is drawn with.
    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Draw the mesh with whatever program is current.
    pub fn draw(&self, backend: &dyn GpuBackend) {
        backend.bind_vertex_array(Some(self.vertex_array));
        backend.draw_indexed_triangles(self.index_count);
        backend.bind_vertex_array(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::one_triangle(9, 3, &[0, 1, 2], Ok(3))]
    #[case::quad(12, 3, &[0, 1, 2, 2, 3, 0], Ok(4))]
    #[case::interleaved(10, 5, &[1, 0, 1], Ok(2))]
    #[case::misaligned(10, 3, &[0, 1, 2], Err("misaligned"))]
    #[case::zero_stride(9, 0, &[0, 1, 2], Err("misaligned"))]
    #[case::too_few_referenced(9, 3, &[0, 1, 1], Err("mismatch"))]
    #[case::too_many_referenced(9, 3, &[0, 1, 3], Err("mismatch"))]
    #[case::no_indices(9, 3, &[], Err("mismatch"))]
    #[case::largest_index_without_vertices(0, 3, &[u32::MAX], Err("mismatch"))]
    fn vertex_index_consistency(
        #[case] len: usize,
        #[case] stride: usize,
        #[case] indices: &[u32],
        #[case] expected: Result<usize, &str>,
    ) {
        let result = check_geometry("m", len, stride, indices);
        match (result, expected) {
            (Ok(count), Ok(expected)) => assert_eq!(count, expected),
            (Err(GraphicsError::VertexBufferMisaligned { .. }), Err("misaligned")) => {}
            (Err(GraphicsError::IndexVertexCountMismatch { .. }), Err("mismatch")) => {}
            (result, expected) => panic!("got {result:?}, expected {expected:?}"),
        }
    }

    #[test]
    fn consistency_holds_arithmetically() {
        for stride in 1..5usize {
            for len in 0..20usize {
                for max in 0..8u32 {
                    let indices = [0, max];
                    let ok = len % stride == 0 && max as usize + 1 == len / stride;
                    assert_eq!(
                        check_geometry("m", len, stride, &indices).is_ok(),
                        ok,
                        "len {len} stride {stride} max {max}"
                    );
                }
            }
        }
    }

    #[test]
    fn mismatch_reports_counts() {
        let err = check_geometry("body", 9, 3, &[0, 4]).unwrap_err();
        assert_eq!(
            err,
            GraphicsError::IndexVertexCountMismatch {
                mesh: "body".into(),
                referenced: 5,
                vertex_count: 3,
            }
        );
    }

    #[test]
    fn largest_index_does_not_wrap() {
        let err = check_geometry("body", 0, 3, &[u32::MAX]).unwrap_err();
        assert_eq!(
            err,
            GraphicsError::IndexVertexCountMismatch {
                mesh: "body".into(),
                referenced: u64::from(u32::MAX) + 1,
                vertex_count: 0,
            }
        );
    }

    #[cfg(feature = "dummy")]
    mod upload {
        use super::*;
        use crate::backend::dummy::{BackendCall, DummyBackend};
        use glint_core::document::MeshBuffers;
        use glint_core::glsl::{BaseType, GlslType};

        fn attribute(name: &str, location: u32, components: u32, offset: u32) -> AttributeDescriptor {
            AttributeDescriptor {
                location,
                base_type: BaseType::Float,
                glsl_type: if components == 3 { GlslType::Vec3 } else { GlslType::Vec2 },
                name: name.into(),
                component_count: components,
                stride_bytes: 20,
                offset_bytes: offset,
                normalized: false,
            }
        }

        fn document(vertex: Vec<f32>, index: Vec<u32>) -> MeshDocument {
            MeshDocument {
                name: "tri".into(),
                material: "red".into(),
                buffers: MeshBuffers { vertex, index },
            }
        }

        #[test]
        fn uploads_buffers_and_layout() {
            let backend = DummyBackend::new();
            let attributes = [attribute("position", 0, 3, 0), attribute("uv", 1, 2, 12)];
            let doc = document(vec![0.0; 15], vec![0, 1, 2]);

            let mesh = Mesh::from_document(&backend, &doc, &attributes).unwrap();

            assert_eq!(mesh.name(), "tri");
            assert_eq!(mesh.material(), "red");
            assert_eq!(mesh.vertex_count(), 3);
            assert_eq!(mesh.index_count(), 3);

            let calls = backend.calls();
            assert!(calls.contains(&BackendCall::BufferData {
                target: BufferTarget::Array,
                buffer: crate::backend::BufferHandle(2),
                bytes: 60,
            }));
            assert!(calls.contains(&BackendCall::BufferData {
                target: BufferTarget::ElementArray,
                buffer: crate::backend::BufferHandle(3),
                bytes: 12,
            }));
            assert!(calls.contains(&BackendCall::VertexAttributePointer {
                location: 1,
                components: 2,
                base_type: BaseType::Float,
                normalized: false,
                stride: 20,
                offset: 12,
            }));
            assert_eq!(calls.last(), Some(&BackendCall::BindVertexArray(None)));
        }

        #[test]
        fn invalid_geometry_touches_no_gpu_state() {
            let backend = DummyBackend::new();
            let attributes = [attribute("position", 0, 3, 0), attribute("uv", 1, 2, 12)];
            let doc = document(vec![0.0; 14], vec![0, 1, 2]);

            let err = Mesh::from_document(&backend, &doc, &attributes).unwrap_err();

            assert!(matches!(err, GraphicsError::VertexBufferMisaligned { .. }));
            assert!(backend.calls().is_empty());
        }

        #[test]
        fn draw_binds_and_unbinds() {
            let backend = DummyBackend::new();
            let doc = document(vec![0.0; 15], vec![0, 1, 2, 2, 1, 0]);
            let mesh =
                Mesh::from_document(&backend, &doc, &[attribute("position", 0, 3, 0), attribute("uv", 1, 2, 12)])
                    .unwrap();
            backend.clear_calls();

            mesh.draw(&backend);

            assert_eq!(
                backend.calls(),
                vec![
                    BackendCall::BindVertexArray(Some(mesh.vertex_array())),
                    BackendCall::DrawIndexedTriangles(6),
                    BackendCall::BindVertexArray(None),
                ]
            );
        }
    }
}
