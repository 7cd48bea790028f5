//! Render mesh types and construction from flat attribute buffers.
//!
//! [`Mesh::from_buffers`] materializes one vertex per loop (face corner) from
//! the flat buffers a content tool hands over, validating every length and
//! index relationship up front. Corners are deliberately not deduplicated
//! here; that happens during display-list packing where identity is
//! byte-exact over all attributes.

pub mod remap;

use crate::error::{ExportError, Result};
use crate::material::Material;
use crate::types::channel_to_u8;
use remap::{MaterialRemap, UNUSED};

/// A vertex in a render mesh, one per loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Texture coordinates; zero when the mesh has no UV layer.
    pub uv: [f32; 2],
    /// Loop normal.
    pub normal: [f32; 3],
    /// Vertex color (RGBA), 255 per channel when the mesh has no color layer.
    pub color: [u8; 4],
}

/// A triangle referencing three vertices and one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    pub verts: [u32; 3],
    pub material: u32,
}

/// A triangle mesh with a dense, used-only material array.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
    pub materials: Vec<Material>,
}

/// Flat attribute buffers describing a triangulated mesh.
///
/// Lengths are related by fixed component counts: positions hold 3 floats
/// per point, normals 3 per loop, colors 4, UVs 2. [`Mesh::from_buffers`]
/// checks every relationship before building anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshBuffers<'a> {
    /// Point positions, 3 floats per point.
    pub positions: &'a [f32],
    /// Loop indices, 3 per triangle.
    pub triangle_loops: &'a [u32],
    /// Raw material index per triangle.
    pub triangle_materials: &'a [u32],
    /// Point index per loop.
    pub loop_vertex_indices: &'a [u32],
    /// Normal per loop, 3 floats each. Mandatory.
    pub loop_normals: &'a [f32],
    /// RGBA color per loop, 4 floats each. Exclusive with `point_colors`.
    pub corner_colors: Option<&'a [f32]>,
    /// RGBA color per point, 4 floats each. Exclusive with `corner_colors`.
    pub point_colors: Option<&'a [f32]>,
    /// UV per loop, 2 floats each.
    pub loop_uvs: Option<&'a [f32]>,
}

impl Mesh {
    /// Build a mesh from flat buffers.
    ///
    /// `materials` are the declared material slots (`None` = empty slot);
    /// any triangle referencing an empty or out-of-range slot gets
    /// `default_material` instead. Returns the first validation failure
    /// without building a partial mesh.
    pub fn from_buffers(
        name: impl Into<String>,
        buffers: &MeshBuffers<'_>,
        materials: &[Option<&Material>],
        default_material: &Material,
    ) -> Result<Mesh> {
        if buffers.corner_colors.is_some() && buffers.point_colors.is_some() {
            return Err(ExportError::ConflictingColorBuffers);
        }

        let n_loops = buffers.loop_vertex_indices.len();
        if buffers.loop_normals.len() != n_loops * 3 {
            return Err(ExportError::BufferLength {
                buffer: "loop_normals",
                expected: n_loops * 3,
                actual: buffers.loop_normals.len(),
            });
        }
        if let Some(colors) = buffers.corner_colors {
            if colors.len() != n_loops * 4 {
                return Err(ExportError::BufferLength {
                    buffer: "corner_colors",
                    expected: n_loops * 4,
                    actual: colors.len(),
                });
            }
        }
        if let Some(colors) = buffers.point_colors {
            if colors.len() != buffers.positions.len() * 4 / 3 {
                return Err(ExportError::BufferLength {
                    buffer: "point_colors",
                    expected: buffers.positions.len() * 4 / 3,
                    actual: colors.len(),
                });
            }
        }
        if let Some(uvs) = buffers.loop_uvs {
            if uvs.len() != n_loops * 2 {
                return Err(ExportError::BufferLength {
                    buffer: "loop_uvs",
                    expected: n_loops * 2,
                    actual: uvs.len(),
                });
            }
        }

        let n_faces = buffers.triangle_loops.len() / 3;
        if buffers.triangle_materials.len() != n_faces {
            return Err(ExportError::BufferLength {
                buffer: "triangle_materials",
                expected: n_faces,
                actual: buffers.triangle_materials.len(),
            });
        }

        let remap = MaterialRemap::build(buffers.triangle_materials, materials);

        let mut vertices = Vec::with_capacity(n_loops);
        for (i_loop, &point) in buffers.loop_vertex_indices.iter().enumerate() {
            let offset = point as usize * 3;
            if offset + 3 > buffers.positions.len() {
                return Err(ExportError::VertexOutOfBounds {
                    loop_index: i_loop,
                    offset,
                    len: buffers.positions.len(),
                });
            }
            let position = [
                buffers.positions[offset],
                buffers.positions[offset + 1],
                buffers.positions[offset + 2],
            ];

            let uv = match buffers.loop_uvs {
                Some(uvs) => [uvs[i_loop * 2], uvs[i_loop * 2 + 1]],
                None => [0.0, 0.0],
            };

            let normal = [
                buffers.loop_normals[i_loop * 3],
                buffers.loop_normals[i_loop * 3 + 1],
                buffers.loop_normals[i_loop * 3 + 2],
            ];

            let mut color = [255u8; 4];
            if let Some(colors) = buffers.corner_colors {
                for (j, c) in color.iter_mut().enumerate() {
                    *c = channel_to_u8(colors[i_loop * 4 + j]);
                }
            } else if let Some(colors) = buffers.point_colors {
                let color_offset = point as usize * 4;
                if color_offset + 4 > colors.len() {
                    return Err(ExportError::PointColorOutOfBounds {
                        loop_index: i_loop,
                        offset: color_offset,
                        len: colors.len(),
                    });
                }
                for (j, c) in color.iter_mut().enumerate() {
                    *c = channel_to_u8(colors[color_offset + j]);
                }
            }

            vertices.push(Vertex {
                position,
                uv,
                normal,
                color,
            });
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
                verts[j] = loop_index;
            }
            triangles.push(Triangle {
                verts,
                material: remap.slot(buffers.triangle_materials[i_face]),
            });
        }

        let materials = remap.collect(materials, default_material);
        log::debug!(
            "built mesh: {} vertices, {} triangles, {} materials",
            vertices.len(),
            triangles.len(),
            materials.len()
        );

        Ok(Mesh {
            name: name.into(),
            vertices,
            triangles,
            materials,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Partition into one single-material mesh per material slot.
    ///
    /// Each sub-mesh keeps only the vertices its own triangles reference,
    /// in first-encounter order, with triangle indices rewritten into the
    /// local vertex space. Sub-meshes are named `{mesh}_{material}`.
    pub fn split_by_material(&self) -> Vec<Mesh> {
        (0..self.materials.len())
            .map(|i_mat| {
                let mut vert_remap = vec![UNUSED; self.vertices.len()];
                let mut vertices = Vec::new();
                let mut triangles = Vec::new();

                for tri in &self.triangles {
                    if tri.material as usize != i_mat {
                        continue;
                    }
                    let mut verts = [0u32; 3];
                    for (j, &v) in tri.verts.iter().enumerate() {
                        if vert_remap[v as usize] == UNUSED {
                            vert_remap[v as usize] = vertices.len() as u32;
                            vertices.push(self.vertices[v as usize]);
                        }
                        verts[j] = vert_remap[v as usize];
                    }
                    triangles.push(Triangle { verts, material: 0 });
                }

                Mesh {
                    name: format!("{}_{}", self.name, self.materials[i_mat].name),
                    vertices,
                    triangles,
                    materials: vec![self.materials[i_mat].clone()],
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn default_material() -> Material {
        Material::new("default")
    }

    /// One triangle, three loops mapping to three points.
    fn simple_buffers<'a>() -> MeshBuffers<'a> {
        MeshBuffers {
            positions: &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            triangle_loops: &[0, 1, 2],
            triangle_materials: &[0],
            loop_vertex_indices: &[0, 1, 2],
            loop_normals: &[0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0],
            ..Default::default()
        }
    }

    #[test]
    fn test_build_round_trip() {
        let mat = Material::new("stone");
        let mesh =
            Mesh::from_buffers("mesh", &simple_buffers(), &[Some(&mat)], &default_material())
                .unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[0].uv, [0.0, 0.0]);
        assert_eq!(mesh.vertices[0].color, [255, 255, 255, 255]);
        assert_eq!(mesh.materials.len(), 1);
        assert_eq!(mesh.materials[0].name, "stone");
        assert_eq!(mesh.triangles[0].verts, [0, 1, 2]);
    }

    #[test]
    fn test_missing_material_uses_default() {
        let mesh =
            Mesh::from_buffers("mesh", &simple_buffers(), &[None], &default_material()).unwrap();

        assert_eq!(mesh.materials.len(), 1);
        assert_eq!(mesh.materials[0].name, "default");
        assert_eq!(mesh.triangles[0].material, 0);
    }

    #[test]
    fn test_conflicting_color_buffers() {
        let corner = [1.0f32; 12];
        let point = [1.0f32; 12];
        let mut buffers = simple_buffers();
        buffers.corner_colors = Some(&corner);
        buffers.point_colors = Some(&point);

        let err = Mesh::from_buffers("mesh", &buffers, &[], &default_material()).unwrap_err();
        assert_eq!(err, ExportError::ConflictingColorBuffers);
    }

    #[test]
    fn test_normal_length_mismatch() {
        let mut buffers = simple_buffers();
        buffers.loop_normals = &[0.0; 8];

        let err = Mesh::from_buffers("mesh", &buffers, &[], &default_material()).unwrap_err();
        assert_eq!(
            err,
            ExportError::BufferLength {
                buffer: "loop_normals",
                expected: 9,
                actual: 8,
            }
        );
    }

    #[test]
    fn test_material_index_length_mismatch() {
        let mut buffers = simple_buffers();
        buffers.triangle_materials = &[0, 0];

        let err = Mesh::from_buffers("mesh", &buffers, &[], &default_material()).unwrap_err();
        assert_eq!(
            err,
            ExportError::BufferLength {
                buffer: "triangle_materials",
                expected: 1,
                actual: 2,
            }
        );
    }

    #[test]
    fn test_loop_vertex_out_of_bounds() {
        let mut buffers = simple_buffers();
        buffers.loop_vertex_indices = &[0, 1, 9];

        let err = Mesh::from_buffers("mesh", &buffers, &[], &default_material()).unwrap_err();
        assert_eq!(
            err,
            ExportError::VertexOutOfBounds {
                loop_index: 2,
                offset: 27,
                len: 9,
            }
        );
    }

    #[test]
    fn test_triangle_loop_out_of_bounds() {
        let mut buffers = simple_buffers();
        buffers.triangle_loops = &[0, 1, 5];

        let err = Mesh::from_buffers("mesh", &buffers, &[], &default_material()).unwrap_err();
        assert_eq!(
            err,
            ExportError::LoopOutOfBounds {
                triangle: 0,
                loop_index: 5,
                loop_count: 3,
            }
        );
    }

    #[test]
    fn test_corner_colors_scaled_and_clamped() {
        let corner = [
            0.0, 0.5, 1.0, 1.0, //
            2.0, -1.0, 0.25, 1.0, //
            1.0, 1.0, 1.0, 0.0,
        ];
        let mut buffers = simple_buffers();
        buffers.corner_colors = Some(&corner);

        let mesh = Mesh::from_buffers("mesh", &buffers, &[], &default_material()).unwrap();
        assert_eq!(mesh.vertices[0].color, [0, 127, 255, 255]);
        assert_eq!(mesh.vertices[1].color, [255, 0, 63, 255]);
        assert_eq!(mesh.vertices[2].color, [255, 255, 255, 0]);
    }

    #[test]
    fn test_point_colors_looked_up_via_vertex_index() {
        let point = [
            1.0, 0.0, 0.0, 1.0, //
            0.0, 1.0, 0.0, 1.0, //
            0.0, 0.0, 1.0, 1.0,
        ];
        let mut buffers = simple_buffers();
        // Two loops share point 0.
        buffers.loop_vertex_indices = &[0, 0, 2];
        buffers.point_colors = Some(&point);

        let mesh = Mesh::from_buffers("mesh", &buffers, &[], &default_material()).unwrap();
        assert_eq!(mesh.vertices[0].color, [255, 0, 0, 255]);
        assert_eq!(mesh.vertices[1].color, [255, 0, 0, 255]);
        assert_eq!(mesh.vertices[2].color, [0, 0, 255, 255]);
    }

    #[test]
    fn test_split_by_material_coverage() {
        // Two triangles on materials 0 and 1 sharing point indices.
        let positions = [
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, 1.0, 0.0,
        ];
        let normals = [0.0f32, 0.0, 1.0].repeat(6);
        let buffers = MeshBuffers {
            positions: &positions,
            triangle_loops: &[0, 1, 2, 3, 4, 5],
            triangle_materials: &[0, 1],
            loop_vertex_indices: &[0, 1, 2, 1, 3, 2],
            loop_normals: &normals,
            ..Default::default()
        };
        let a = Material::new("a");
        let b = Material::new("b");
        let mesh =
            Mesh::from_buffers("mesh", &buffers, &[Some(&a), Some(&b)], &default_material())
                .unwrap();

        let parts = mesh.split_by_material();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "mesh_a");
        assert_eq!(parts[1].name, "mesh_b");

        let total: usize = parts.iter().map(Mesh::triangle_count).sum();
        assert_eq!(total, mesh.triangle_count());

        for part in &parts {
            assert_eq!(part.materials.len(), 1);
            assert_eq!(part.vertex_count(), 3);
            // Every local vertex is referenced by some triangle.
            let mut used = vec![false; part.vertex_count()];
            for tri in &part.triangles {
                assert_eq!(tri.material, 0);
                for &v in &tri.verts {
                    used[v as usize] = true;
                }
            }
            assert!(used.iter().all(|&u| u));
        }

        // Localized vertices carry the original attribute data.
        assert_eq!(parts[1].vertices[0].position, [1.0, 0.0, 0.0]);
    }
}
