//! Display-list geometry packing.
//!
//! Turns a single-material triangle mesh into fixed-point vertices grouped
//! into vertex-cache load entries: each entry loads a run of consecutive
//! vertices into the 32-slot cache and draws triangles indexed into it.

pub mod optimize;

use crate::mesh::Mesh;
use optimize::{
    generate_vertex_remap, optimize_vertex_cache, remap_index_buffer, remap_vertex_buffer,
};

/// Size of the microcode vertex cache.
pub const VERTEX_CACHE_SIZE: usize = 32;

/// How the shading channel of packed vertices is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Leave the color bytes zeroed.
    None,
    /// Vertex colors, for materials without lighting.
    Colors,
    /// Signed normals packed into the color bytes, for lit materials.
    Normals,
}

/// A fixed-point vertex as laid out in the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct F3dVertex {
    pub position: [i16; 3],
    /// Texture coordinates in 10.5 fixed point, pre-scaled by the UV basis.
    pub st: [i16; 2],
    /// Color bytes, or signed normal bytes when shading from normals.
    pub color_normal: [u8; 3],
    pub alpha: u8,
}

/// A triangle drawn out of the current cache load, slot indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryTriangle {
    pub indices: [u8; 3],
}

/// One vertex load plus the triangles drawn from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEntry {
    /// Offset of the first loaded vertex in the packed vertex buffer.
    pub buffer_start: usize,
    /// Number of vertices this entry loads.
    pub loaded: u8,
    /// Cache slot the load starts at. Always 0 with the current packer,
    /// kept explicit because the load command takes it.
    pub v0: u8,
    pub triangles: Vec<EntryTriangle>,
}

impl LoadEntry {
    fn new(buffer_start: usize) -> Self {
        Self {
            buffer_start,
            loaded: 0,
            v0: 0,
            triangles: Vec::new(),
        }
    }
}

/// Packed display-list geometry for one material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F3dMesh {
    pub vertices: Vec<F3dVertex>,
    pub entries: Vec<LoadEntry>,
}

#[derive(PartialEq, Eq, Hash)]
struct VertexKey {
    position: [u32; 3],
    uv: [u32; 2],
    normal: [u32; 3],
    color: [u8; 4],
}

fn pack_vertex(v: &crate::mesh::Vertex, uv_basis_s: i32, uv_basis_t: i32, shading: Shading) -> F3dVertex {
    let position = [
        v.position[0] as i16,
        v.position[1] as i16,
        v.position[2] as i16,
    ];

    // 10.5 fixed point, T axis flipped to image convention.
    let st = [
        (v.uv[0] * uv_basis_s as f32 * 32.0) as i32 as i16,
        ((1.0 - v.uv[1]) * uv_basis_t as f32 * 32.0) as i32 as i16,
    ];

    let color_normal = match shading {
        Shading::None => [0, 0, 0],
        Shading::Colors => [v.color[0], v.color[1], v.color[2]],
        Shading::Normals => {
            let pack = |n: f32| (n * 127.0).clamp(-127.0, 127.0) as i32 as u8;
            [pack(v.normal[0]), pack(v.normal[1]), pack(v.normal[2])]
        }
    };

    F3dVertex {
        position,
        st,
        color_normal,
        // Alpha comes from the vertex color in every shading mode.
        alpha: v.color[3],
    }
}

/// Pack a single-material mesh into load entries.
///
/// Deduplicates byte-identical vertices, reorders triangles for cache
/// locality, then walks them greedily: a triangle joins the current entry
/// while its not-yet-cached vertices still fit in the cache, otherwise a
/// new entry starts and the same triangle is retried against the empty
/// cache.
pub fn pack_mesh(
    mesh: &Mesh,
    uv_basis_s: i32,
    uv_basis_t: i32,
    shading: Shading,
) -> F3dMesh {
    let mut indices: Vec<u32> = mesh
        .triangles
        .iter()
        .flat_map(|t| t.verts)
        .collect();

    let (remap, unique) = generate_vertex_remap(&indices, &mesh.vertices, |v| VertexKey {
        position: v.position.map(f32::to_bits),
        uv: v.uv.map(f32::to_bits),
        normal: v.normal.map(f32::to_bits),
        color: v.color,
    });
    remap_index_buffer(&mut indices, &remap);
    let unique_vertices = remap_vertex_buffer(&mesh.vertices, &remap, unique);
    optimize_vertex_cache(&mut indices, unique, VERTEX_CACHE_SIZE as u32);

    log::debug!(
        "packing {}: {} loops -> {} unique vertices",
        mesh.name,
        mesh.vertices.len(),
        unique
    );

    let mut vertices: Vec<F3dVertex> = Vec::with_capacity(unique);
    // Deduplicated vertex indices resident in the current cache load.
    let mut cache: Vec<u32> = Vec::with_capacity(VERTEX_CACHE_SIZE);
    let mut entries = vec![LoadEntry::new(0)];
    let mut cur = 0usize;

    let mut i_tri = 0usize;
    while i_tri * 3 < indices.len() {
        let tri = [
            indices[i_tri * 3],
            indices[i_tri * 3 + 1],
            indices[i_tri * 3 + 2],
        ];

        let n_in_cache = tri
            .iter()
            .filter(|&&v| cache.iter().any(|&c| c == v))
            .count();
        if cache.len() + 3 - n_in_cache > VERTEX_CACHE_SIZE {
            entries.push(LoadEntry::new(vertices.len()));
            cur += 1;
            cache.clear();
            // Retry the same triangle against the fresh entry.
            continue;
        }

        let mut slots = [0u8; 3];
        for (j, &v) in tri.iter().enumerate() {
            let slot = match cache.iter().position(|&c| c == v) {
                Some(slot) => slot,
                None => {
                    let slot = cache.len();
                    cache.push(v);
                    // A vertex revisited in a later entry is appended again
                    // so each entry loads one consecutive run.
                    vertices.push(pack_vertex(
                        &unique_vertices[v as usize],
                        uv_basis_s,
                        uv_basis_t,
                        shading,
                    ));
                    entries[cur].loaded += 1;
                    slot
                }
            };
            slots[j] = slot as u8;
        }
        entries[cur].triangles.push(EntryTriangle { indices: slots });
        i_tri += 1;
    }

    log::debug!(
        "packed {}: {} buffer vertices, {} load entries",
        mesh.name,
        vertices.len(),
        entries.len()
    );

    F3dMesh { vertices, entries }
}
