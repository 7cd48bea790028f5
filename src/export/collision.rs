//! Collision C source emission.
//!
//! Emits a deduplicated `Vec3s` vertex list, a `CollisionPoly` list with
//! precomputed plane equations, and a `SurfaceType` table, and reports the
//! bounding box of the emitted vertices.

use std::fmt::Write;

use glam::Vec3;

use crate::collision::CollisionMesh;
use crate::error::Result;
use crate::f3d::optimize::{generate_vertex_remap, remap_vertex_buffer};
use crate::types::Bounds;

/// C identifiers for the three emitted arrays.
#[derive(Debug, Clone, Copy)]
pub struct CollisionNames<'a> {
    pub vtx_list: &'a str,
    pub poly_list: &'a str,
    pub surface_types: &'a str,
}

/// Emitted collision source plus the bounding box of the vertex list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionExport {
    pub source: String,
    pub bounds: Bounds,
}

/// Plane equation of a triangle, with the vertex order rotated so the
/// lowest-Y vertex comes first.
///
/// The engine's min-Y lookup only checks the first polygon vertex, so the
/// rotation keeps it correct. Degenerate triangles get a unit X normal.
fn triangle_plane(positions: [[f32; 3]; 3]) -> ([usize; 3], Vec3, i16) {
    let [y0, y1, y2] = [positions[0][1], positions[1][1], positions[2][1]];
    let order = if y1 < y0 && y1 < y2 {
        [1, 2, 0]
    } else if y2 < y0 && y2 < y1 {
        [2, 0, 1]
    } else {
        [0, 1, 2]
    };

    let p0 = Vec3::from(positions[order[0]]);
    let p1 = Vec3::from(positions[order[1]]);
    let p2 = Vec3::from(positions[order[2]]);

    // Length check, not a component check: a tiny cross product can be
    // nonzero yet have a squared length that underflows to 0.
    let cross = (p1 - p0).cross(p2 - p0);
    let normal = match cross.try_normalize() {
        Some(normal) => normal,
        None => {
            log::debug!("degenerate triangle at {p0:?}, using fallback normal");
            Vec3::X
        }
    };
    let dist = (-normal.dot(p0)) as i16;

    (order, normal, dist)
}

/// Export a collision mesh as C source.
pub fn export_collision(mesh: &CollisionMesh, names: &CollisionNames<'_>) -> Result<CollisionExport> {
    let indices: Vec<u32> = mesh.triangles.iter().flat_map(|t| t.verts).collect();
    let (remap, unique) = generate_vertex_remap(&indices, &mesh.vertices, |v| {
        v.map(f32::to_bits)
    });
    let vertices = remap_vertex_buffer(&mesh.vertices, &remap, unique);

    log::debug!(
        "exporting collision: {} -> {} vertices, {} polys",
        mesh.vertices.len(),
        unique,
        mesh.triangles.len()
    );

    let mut source = String::new();
    let mut bounds = Bounds::default();

    if let Some(first) = vertices.first() {
        let p = first.map(|c| c as i16);
        bounds = Bounds { min: p, max: p };
    }

    writeln!(source, "Vec3s {}[] = {{", names.vtx_list).unwrap();
    for v in &vertices {
        let p = v.map(|c| c as i16);
        writeln!(source, "    {{ {}, {}, {} }},", p[0], p[1], p[2]).unwrap();
        bounds.extend(p);
    }
    writeln!(source, "}};").unwrap();

    writeln!(source, "CollisionPoly {}[] = {{", names.poly_list).unwrap();
    for tri in &mesh.triangles {
        let positions = tri.verts.map(|v| mesh.vertices[v as usize]);
        let (order, normal, dist) = triangle_plane(positions);
        let verts = order.map(|j| remap[tri.verts[j] as usize]);

        let material = &mesh.materials[tri.material as usize];
        writeln!(source, "    {{").unwrap();
        writeln!(source, "        {},", tri.material).unwrap();
        writeln!(source, "        {{").unwrap();
        writeln!(
            source,
            "            COLPOLY_VTX({}, {}),",
            verts[0], material.flags_a
        )
        .unwrap();
        writeln!(
            source,
            "            COLPOLY_VTX({}, {}),",
            verts[1], material.flags_b
        )
        .unwrap();
        writeln!(source, "            COLPOLY_VTX({}, 0),", verts[2]).unwrap();
        writeln!(source, "        }},").unwrap();
        writeln!(source, "        {{").unwrap();
        writeln!(source, "            COLPOLY_SNORMAL({:.6}),", normal.x).unwrap();
        writeln!(source, "            COLPOLY_SNORMAL({:.6}),", normal.y).unwrap();
        writeln!(source, "            COLPOLY_SNORMAL({:.6}),", normal.z).unwrap();
        writeln!(source, "        }},").unwrap();
        writeln!(source, "        {dist},").unwrap();
        writeln!(source, "    }},").unwrap();
    }
    writeln!(source, "}};").unwrap();

    writeln!(source, "SurfaceType {}[] = {{", names.surface_types).unwrap();
    for material in &mesh.materials {
        writeln!(source, "    {{").unwrap();
        writeln!(source, "        {{").unwrap();
        writeln!(source, "            {},", material.surface_type_0).unwrap();
        writeln!(source, "            {},", material.surface_type_1).unwrap();
        writeln!(source, "        }},").unwrap();
        writeln!(source, "    }},").unwrap();
    }
    writeln!(source, "}};").unwrap();

    Ok(CollisionExport { source, bounds })
}
