//! Index/vertex buffer optimization passes run before display-list packing.
//!
//! Deduplication merges vertices whose attribute keys are byte-identical,
//! then the index buffer is reordered for temporal locality against a
//! FIFO vertex cache so that fewer vertex loads are emitted downstream.

use std::collections::HashMap;
use std::hash::Hash;

use crate::mesh::remap::UNUSED;

/// Build a remap table merging vertices with equal keys.
///
/// Walks the index buffer and assigns each distinct key the next dense
/// index in first-encounter order. Vertices never referenced by the index
/// buffer map to [`UNUSED`]. Returns the per-vertex remap table and the
/// number of unique vertices.
pub fn generate_vertex_remap<T, K, F>(
    indices: &[u32],
    vertices: &[T],
    key: F,
) -> (Vec<u32>, usize)
where
    K: Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut remap = vec![UNUSED; vertices.len()];
    let mut seen: HashMap<K, u32> = HashMap::with_capacity(vertices.len());
    let mut unique = 0u32;

    for &index in indices {
        let index = index as usize;
        if remap[index] != UNUSED {
            continue;
        }
        let k = key(&vertices[index]);
        match seen.get(&k) {
            Some(&dense) => remap[index] = dense,
            None => {
                seen.insert(k, unique);
                remap[index] = unique;
                unique += 1;
            }
        }
    }

    (remap, unique as usize)
}

/// Rewrite an index buffer through a remap table.
pub fn remap_index_buffer(indices: &mut [u32], remap: &[u32]) {
    for index in indices {
        debug_assert_ne!(remap[*index as usize], UNUSED);
        *index = remap[*index as usize];
    }
}

/// Compact a vertex buffer through a remap table.
///
/// Keeps the first source vertex mapped to each dense index and drops
/// unreferenced ones.
pub fn remap_vertex_buffer<T: Copy>(vertices: &[T], remap: &[u32], unique: usize) -> Vec<T> {
    let mut out: Vec<Option<T>> = vec![None; unique];
    for (vertex, &dense) in vertices.iter().zip(remap) {
        if dense != UNUSED && out[dense as usize].is_none() {
            out[dense as usize] = Some(*vertex);
        }
    }
    debug_assert!(out.iter().all(Option::is_some));
    out.into_iter().flatten().collect()
}

/// Reorder triangles for FIFO vertex cache locality.
///
/// Tipsify-style: greedily grow fans around a focus vertex, preferring
/// cache-resident candidates whose remaining triangles still fit, and fall
/// back to the dead-end stack then a linear scan when the fan runs dry.
/// Purely index-order surgery; the triangle set is unchanged.
pub fn optimize_vertex_cache(indices: &mut [u32], vertex_count: usize, cache_size: u32) {
    let face_count = indices.len() / 3;
    if face_count == 0 {
        return;
    }

    // Vertex -> incident triangle adjacency, counting sort layout.
    let mut valence = vec![0u32; vertex_count];
    for &v in indices.iter() {
        valence[v as usize] += 1;
    }
    let mut offsets = vec![0u32; vertex_count + 1];
    for v in 0..vertex_count {
        offsets[v + 1] = offsets[v] + valence[v];
    }
    let mut adjacency = vec![0u32; indices.len()];
    {
        let mut cursor = offsets.clone();
        for (face, tri) in indices.chunks_exact(3).enumerate() {
            for &v in tri {
                adjacency[cursor[v as usize] as usize] = face as u32;
                cursor[v as usize] += 1;
            }
        }
    }

    let mut live = valence.clone();
    // FIFO emulation via timestamps: a vertex is resident while
    // time - stamp <= cache_size.
    let mut stamp = vec![0u32; vertex_count];
    let mut time = cache_size + 1;

    let mut emitted = vec![false; face_count];
    let mut output = Vec::with_capacity(indices.len());
    let mut dead_end: Vec<u32> = Vec::new();
    let mut input_cursor = 0usize;
    let mut focus = indices[0];

    loop {
        // Emit every live triangle around the focus vertex.
        let start = offsets[focus as usize] as usize;
        let end = start + valence[focus as usize] as usize;
        let mut candidates: Vec<u32> = Vec::new();
        for &face in &adjacency[start..end] {
            if emitted[face as usize] {
                continue;
            }
            emitted[face as usize] = true;
            for &v in &indices[face as usize * 3..face as usize * 3 + 3] {
                output.push(v);
                dead_end.push(v);
                candidates.push(v);
                live[v as usize] -= 1;
                if time - stamp[v as usize] > cache_size {
                    stamp[v as usize] = time;
                    time += 1;
                }
            }
        }

        // Best candidate: resident, and loading its fan won't evict it.
        let mut next = None;
        let mut best_priority = 0u32;
        for &v in &candidates {
            if live[v as usize] == 0 {
                continue;
            }
            let age = time - stamp[v as usize];
            if age + 2 * live[v as usize] <= cache_size {
                // Prefer the vertex closest to eviction.
                if next.is_none() || age > best_priority {
                    best_priority = age;
                    next = Some(v);
                }
            } else if next.is_none() {
                next = Some(v);
                best_priority = 0;
            }
        }

        focus = match next {
            Some(v) => v,
            None => {
                // Dead-end stack first, then scan the input order.
                let mut found = None;
                while let Some(v) = dead_end.pop() {
                    if live[v as usize] > 0 {
                        found = Some(v);
                        break;
                    }
                }
                if found.is_none() {
                    while input_cursor < vertex_count {
                        if live[input_cursor] > 0 {
                            found = Some(input_cursor as u32);
                            break;
                        }
                        input_cursor += 1;
                    }
                }
                match found {
                    Some(v) => v,
                    None => break,
                }
            }
        };
    }

    debug_assert_eq!(output.len(), indices.len());
    indices.copy_from_slice(&output);
}
