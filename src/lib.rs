//! # F3D Export
//!
//! A Rust library for turning content-tool polygon meshes into N64 display
//! list and collision mesh C source.
//!
//! ## Overview
//!
//! Render meshes come in as flat attribute buffers (positions, loops,
//! normals, colors, UVs) plus materials describing the full RDP pipeline
//! state. The library validates and assembles them, splits by material,
//! packs fixed-point geometry against the 32-slot vertex cache, and emits
//! `Gfx`/`Vtx` arrays ready to compile into a ROM. Collision meshes go
//! through a similar path ending in `Vec3s`/`CollisionPoly`/`SurfaceType`
//! arrays.
//!
//! ## Quick Start
//!
//! ```ignore
//! use f3d_export::{export_f3d, Material, Mesh, MeshBuffers};
//!
//! let buffers = MeshBuffers {
//!     positions: &positions,
//!     triangle_loops: &triangle_loops,
//!     triangle_materials: &triangle_materials,
//!     loop_vertex_indices: &loop_vertex_indices,
//!     loop_normals: &loop_normals,
//!     ..Default::default()
//! };
//! let mesh = Mesh::from_buffers("room", &buffers, &materials, &default_material)?;
//! let export = export_f3d(&mesh)?;
//! std::fs::write("room_model.c", &export.source)?;
//! ```
//!
//! Whole export jobs can also be described as JSON documents; see the
//! [`scene`] module.

pub mod collision;
pub mod error;
pub mod export;
pub mod f3d;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod types;

// Re-export main types for convenience
pub use collision::{CollisionBuffers, CollisionMaterial, CollisionMesh, CollisionTriangle};
pub use error::{ExportError, Result};
pub use export::{
    export_collision, export_f3d, CollisionExport, CollisionNames, F3dExport,
};
pub use f3d::{pack_mesh, F3dMesh, Shading, VERTEX_CACHE_SIZE};
pub use material::{Image, Material, Tile, TILE_COUNT};
pub use mesh::{Mesh, MeshBuffers, Triangle, Vertex};
pub use types::{Bounds, Rgba};
