//! Collision mesh model: shared positions, per-triangle surface material
//! references, and joining of multiple meshes into one.

use crate::error::{ExportError, Result};
use crate::mesh::remap::MaterialRemap;

/// A collision surface material.
///
/// The fields are C expressions spliced verbatim into the surface type and
/// polygon tables; the exporter does not interpret them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMaterial {
    pub surface_type_0: String,
    pub surface_type_1: String,
    pub flags_a: String,
    pub flags_b: String,
}

impl Default for CollisionMaterial {
    fn default() -> Self {
        Self {
            surface_type_0: "0".to_string(),
            surface_type_1: "0".to_string(),
            flags_a: "0".to_string(),
            flags_b: "0".to_string(),
        }
    }
}

/// A collision triangle: three vertex indices and a material index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionTriangle {
    pub verts: [u32; 3],
    pub material: u32,
}

/// A collision mesh with positions shared between triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMesh {
    pub vertices: Vec<[f32; 3]>,
    pub triangles: Vec<CollisionTriangle>,
    pub materials: Vec<CollisionMaterial>,
}

/// Flat attribute buffers describing a triangulated collision mesh.
///
/// Unlike render meshes there are no loop attributes; loops only route
/// triangle corners to point indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionBuffers<'a> {
    /// Point positions, 3 floats per point.
    pub positions: &'a [f32],
    /// Loop indices, 3 per triangle.
    pub triangle_loops: &'a [u32],
    /// Raw material index per triangle.
    pub triangle_materials: &'a [u32],
    /// Point index per loop.
    pub loop_vertex_indices: &'a [u32],
}

impl CollisionMesh {
    /// Build a collision mesh from flat buffers.
    ///
    /// Materials are remapped into a dense used-only array; triangles with
    /// an empty or out-of-range material slot get `default_material`.
    pub fn from_buffers(
        buffers: &CollisionBuffers<'_>,
        materials: &[Option<&CollisionMaterial>],
        default_material: &CollisionMaterial,
    ) -> Result<CollisionMesh> {
        let n_loops = buffers.loop_vertex_indices.len();
        let n_faces = buffers.triangle_loops.len() / 3;
        if buffers.triangle_materials.len() != n_faces {
            return Err(ExportError::BufferLength {
                buffer: "triangle_materials",
                expected: n_faces,
                actual: buffers.triangle_materials.len(),
            });
        }

        let remap = MaterialRemap::build(buffers.triangle_materials, materials);

        let n_points = buffers.positions.len() / 3;
        let mut vertices = Vec::with_capacity(n_points);
        for point in buffers.positions.chunks_exact(3) {
            vertices.push([point[0], point[1], point[2]]);
        }

        let mut triangles = Vec::with_capacity(n_faces);
        for (i_face, loops) in buffers.triangle_loops.chunks_exact(3).enumerate() {
            let mut verts = [0u32; 3];
            for (j, &loop_index) in loops.iter().enumerate() {
                if loop_index as usize >= n_loops {
                    return Err(ExportError::LoopOutOfBounds {
                        triangle: i_face,
                        loop_index,
                        loop_count: n_loops,
                    });
                }
                let point = buffers.loop_vertex_indices[loop_index as usize];
                if point as usize >= n_points {
                    return Err(ExportError::VertexOutOfBounds {
                        loop_index: loop_index as usize,
                        offset: point as usize * 3,
                        len: buffers.positions.len(),
                    });
                }
                verts[j] = point;
            }
            triangles.push(CollisionTriangle {
                verts,
                material: remap.slot(buffers.triangle_materials[i_face]),
            });
        }

        let materials = remap.collect(materials, default_material);
        log::debug!(
            "built collision mesh: {} vertices, {} triangles, {} materials",
            vertices.len(),
            triangles.len(),
            materials.len()
        );

        Ok(CollisionMesh {
            vertices,
            triangles,
            materials,
        })
    }

    /// Concatenate meshes, offsetting vertex and material indices.
    ///
    /// Materials are not deduplicated across inputs; each mesh keeps its
    /// own run in the joined material array.
    pub fn join(meshes: &[&CollisionMesh]) -> CollisionMesh {
        let mut joined = CollisionMesh {
            vertices: Vec::new(),
            triangles: Vec::new(),
            materials: Vec::new(),
        };

        for mesh in meshes {
            let vert_offset = joined.vertices.len() as u32;
            let mat_offset = joined.materials.len() as u32;
            joined.vertices.extend_from_slice(&mesh.vertices);
            joined.materials.extend_from_slice(&mesh.materials);
            joined
                .triangles
                .extend(mesh.triangles.iter().map(|tri| CollisionTriangle {
                    verts: tri.verts.map(|v| v + vert_offset),
                    material: tri.material + mat_offset,
                }));
        }

        joined
    }
}
