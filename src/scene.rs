//! JSON document layer.
//!
//! Mirrors the in-memory model with owned, deserializable documents so a
//! whole export job can be described in a single JSON file, then builds the
//! real types from them.

use std::sync::Arc;

use serde::Deserialize;

use crate::collision::{CollisionBuffers, CollisionMaterial, CollisionMesh};
use crate::error::{ExportError, Result};
use crate::material::{
    Combiner, GeometryMode, Image, Material, OtherModes, Tile, TileFormat, TileSize, Vals,
    TILE_COUNT,
};
use crate::mesh::{Mesh, MeshBuffers};

/// One texture tile in a material document.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TileDoc {
    pub image: Option<Image>,
    pub format: TileFormat,
    pub size: TileSize,
    pub line: u32,
    pub address: u32,
    pub palette: u32,
    pub clamp_s: bool,
    pub mirror_s: bool,
    pub mask_s: u32,
    pub shift_s: u32,
    pub clamp_t: bool,
    pub mirror_t: bool,
    pub mask_t: u32,
    pub shift_t: u32,
    pub upper_left_s: f32,
    pub upper_left_t: f32,
    pub lower_right_s: f32,
    pub lower_right_t: f32,
}

impl TileDoc {
    fn build(&self) -> Tile {
        Tile {
            image: self.image.clone().map(Arc::new),
            format: self.format,
            size: self.size,
            line: self.line,
            address: self.address,
            palette: self.palette,
            clamp_s: self.clamp_s,
            mirror_s: self.mirror_s,
            mask_s: self.mask_s,
            shift_s: self.shift_s,
            clamp_t: self.clamp_t,
            mirror_t: self.mirror_t,
            mask_t: self.mask_t,
            shift_t: self.shift_t,
            upper_left_s: self.upper_left_s,
            upper_left_t: self.upper_left_t,
            lower_right_s: self.lower_right_s,
            lower_right_t: self.lower_right_t,
        }
    }
}

/// A render material document. Unlisted tiles stay at their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaterialDoc {
    pub name: String,
    pub uv_basis_s: i32,
    pub uv_basis_t: i32,
    pub other_modes: OtherModes,
    pub tiles: Vec<TileDoc>,
    pub combiner: Combiner,
    pub vals: Vals,
    pub geometry_mode: GeometryMode,
}

impl Default for MaterialDoc {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            uv_basis_s: 32,
            uv_basis_t: 32,
            other_modes: OtherModes::default(),
            tiles: Vec::new(),
            combiner: Combiner::default(),
            vals: Vals::default(),
            geometry_mode: GeometryMode::default(),
        }
    }
}

impl MaterialDoc {
    pub fn build(&self) -> Result<Material> {
        if self.tiles.len() > TILE_COUNT {
            return Err(ExportError::TileCount {
                material: self.name.clone(),
                actual: self.tiles.len(),
            });
        }
        let mut material = Material::new(&self.name);
        material.uv_basis_s = self.uv_basis_s;
        material.uv_basis_t = self.uv_basis_t;
        material.other_modes = self.other_modes;
        material.combiner = self.combiner;
        material.vals = self.vals;
        material.geometry_mode = self.geometry_mode;
        for (tile, doc) in material.tiles.iter_mut().zip(&self.tiles) {
            *tile = doc.build();
        }
        Ok(material)
    }
}

/// A render mesh document with flat attribute buffers.
#[derive(Debug, Clone, Deserialize)]
pub struct MeshDoc {
    #[serde(default = "default_mesh_name")]
    pub name: String,
    pub positions: Vec<f32>,
    pub triangle_loops: Vec<u32>,
    pub triangle_materials: Vec<u32>,
    pub loop_vertex_indices: Vec<u32>,
    pub loop_normals: Vec<f32>,
    #[serde(default)]
    pub corner_colors: Option<Vec<f32>>,
    #[serde(default)]
    pub point_colors: Option<Vec<f32>>,
    #[serde(default)]
    pub loop_uvs: Option<Vec<f32>>,
    #[serde(default)]
    pub materials: Vec<Option<MaterialDoc>>,
    #[serde(default)]
    pub default_material: MaterialDoc,
}

fn default_mesh_name() -> String {
    "mesh".to_string()
}

impl MeshDoc {
    pub fn build(&self) -> Result<Mesh> {
        let mut materials = Vec::with_capacity(self.materials.len());
        for doc in &self.materials {
            materials.push(match doc {
                Some(doc) => Some(doc.build()?),
                None => None,
            });
        }
        let material_refs: Vec<Option<&Material>> =
            materials.iter().map(Option::as_ref).collect();
        let default_material = self.default_material.build()?;

        let buffers = MeshBuffers {
            positions: &self.positions,
            triangle_loops: &self.triangle_loops,
            triangle_materials: &self.triangle_materials,
            loop_vertex_indices: &self.loop_vertex_indices,
            loop_normals: &self.loop_normals,
            corner_colors: self.corner_colors.as_deref(),
            point_colors: self.point_colors.as_deref(),
            loop_uvs: self.loop_uvs.as_deref(),
        };
        Mesh::from_buffers(&self.name, &buffers, &material_refs, &default_material)
    }
}

/// A collision surface material document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollisionMaterialDoc {
    pub surface_type_0: String,
    pub surface_type_1: String,
    pub flags_a: String,
    pub flags_b: String,
}

impl Default for CollisionMaterialDoc {
    fn default() -> Self {
        Self {
            surface_type_0: "0".to_string(),
            surface_type_1: "0".to_string(),
            flags_a: "0".to_string(),
            flags_b: "0".to_string(),
        }
    }
}

impl CollisionMaterialDoc {
    fn build(&self) -> CollisionMaterial {
        CollisionMaterial {
            surface_type_0: self.surface_type_0.clone(),
            surface_type_1: self.surface_type_1.clone(),
            flags_a: self.flags_a.clone(),
            flags_b: self.flags_b.clone(),
        }
    }
}

/// One collision mesh in a collision document.
#[derive(Debug, Clone, Deserialize)]
pub struct CollisionMeshDoc {
    pub positions: Vec<f32>,
    pub triangle_loops: Vec<u32>,
    pub triangle_materials: Vec<u32>,
    pub loop_vertex_indices: Vec<u32>,
    #[serde(default)]
    pub materials: Vec<Option<CollisionMaterialDoc>>,
    #[serde(default)]
    pub default_material: CollisionMaterialDoc,
}

impl CollisionMeshDoc {
    pub fn build(&self) -> Result<CollisionMesh> {
        let materials: Vec<Option<CollisionMaterial>> = self
            .materials
            .iter()
            .map(|doc| doc.as_ref().map(CollisionMaterialDoc::build))
            .collect();
        let material_refs: Vec<Option<&CollisionMaterial>> =
            materials.iter().map(Option::as_ref).collect();
        let default_material = self.default_material.build();

        let buffers = CollisionBuffers {
            positions: &self.positions,
            triangle_loops: &self.triangle_loops,
            triangle_materials: &self.triangle_materials,
            loop_vertex_indices: &self.loop_vertex_indices,
        };
        CollisionMesh::from_buffers(&buffers, &material_refs, &default_material)
    }
}

/// A collision export job: array identifiers plus the meshes to join.
#[derive(Debug, Clone, Deserialize)]
pub struct CollisionDoc {
    #[serde(default = "default_vtx_list")]
    pub vtx_list: String,
    #[serde(default = "default_poly_list")]
    pub poly_list: String,
    #[serde(default = "default_surface_types")]
    pub surface_types: String,
    pub meshes: Vec<CollisionMeshDoc>,
}

fn default_vtx_list() -> String {
    "collisionVtxList".to_string()
}

fn default_poly_list() -> String {
    "collisionPolyList".to_string()
}

fn default_surface_types() -> String {
    "collisionSurfaceTypes".to_string()
}

impl CollisionDoc {
    /// Build all meshes and join them into one.
    pub fn build(&self) -> Result<CollisionMesh> {
        let meshes: Vec<CollisionMesh> = self
            .meshes
            .iter()
            .map(CollisionMeshDoc::build)
            .collect::<Result<_>>()?;
        let refs: Vec<&CollisionMesh> = meshes.iter().collect();
        Ok(CollisionMesh::join(&refs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_doc_minimal() {
        let doc: MeshDoc = serde_json::from_str(
            r#"{
                "positions": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "triangle_loops": [0, 1, 2],
                "triangle_materials": [0],
                "loop_vertex_indices": [0, 1, 2],
                "loop_normals": [0, 1, 0, 0, 1, 0, 0, 1, 0]
            }"#,
        )
        .unwrap();
        let mesh = doc.build().unwrap();

        assert_eq!(mesh.name, "mesh");
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.materials.len(), 1);
        assert_eq!(mesh.materials[0].name, "default");
    }

    #[test]
    fn test_mesh_doc_with_material() {
        let doc: MeshDoc = serde_json::from_str(
            r#"{
                "name": "room",
                "positions": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "triangle_loops": [0, 1, 2],
                "triangle_materials": [0],
                "loop_vertex_indices": [0, 1, 2],
                "loop_normals": [0, 1, 0, 0, 1, 0, 0, 1, 0],
                "materials": [
                    {
                        "name": "stone",
                        "uv_basis_s": 64,
                        "geometry_mode": { "lighting": true },
                        "tiles": [
                            {
                                "image": { "c_identifier": "tex_stone", "width": 64, "height": 64 },
                                "mask_s": 6,
                                "mask_t": 6
                            }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();
        let mesh = doc.build().unwrap();

        assert_eq!(mesh.name, "room");
        let mat = &mesh.materials[0];
        assert_eq!(mat.name, "stone");
        assert_eq!(mat.uv_basis_s, 64);
        assert_eq!(mat.uv_basis_t, 32);
        assert!(mat.geometry_mode.lighting);
        assert_eq!(
            mat.tiles[0].image.as_ref().unwrap().c_identifier,
            "tex_stone"
        );
        assert!(mat.tiles[1].image.is_none());
    }

    #[test]
    fn test_material_doc_too_many_tiles() {
        let doc = MaterialDoc {
            name: "overfull".to_string(),
            tiles: vec![TileDoc::default(); 9],
            ..Default::default()
        };
        let err = doc.build().unwrap_err();
        assert_eq!(
            err,
            ExportError::TileCount {
                material: "overfull".to_string(),
                actual: 9,
            }
        );
    }

    #[test]
    fn test_collision_doc_joins_meshes() {
        let doc: CollisionDoc = serde_json::from_str(
            r#"{
                "vtx_list": "roomVtx",
                "poly_list": "roomPolys",
                "surface_types": "roomSurfaces",
                "meshes": [
                    {
                        "positions": [0, 0, 0, 1, 0, 0, 0, 0, 1],
                        "triangle_loops": [0, 1, 2],
                        "triangle_materials": [0],
                        "loop_vertex_indices": [0, 1, 2]
                    },
                    {
                        "positions": [5, 0, 0, 6, 0, 0, 5, 0, 1],
                        "triangle_loops": [0, 1, 2],
                        "triangle_materials": [0],
                        "loop_vertex_indices": [0, 1, 2]
                    }
                ]
            }"#,
        )
        .unwrap();
        let mesh = doc.build().unwrap();

        assert_eq!(mesh.vertices.len(), 6);
        assert_eq!(mesh.triangles.len(), 2);
        assert_eq!(mesh.materials.len(), 2);
        assert_eq!(mesh.triangles[1].verts, [3, 4, 5]);
        assert_eq!(mesh.triangles[1].material, 1);
    }
}
