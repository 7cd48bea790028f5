//! Display-list C source emission.
//!
//! Emits, per material, a `{name}_mat_dl` Gfx array with the full pipeline
//! state, a `{name}_mesh_vtx` Vtx array and a `{name}_mesh_dl` Gfx array,
//! then a top-level `{name}_dl` chaining them all.

use std::fmt::Write;

use crate::error::Result;
use crate::f3d::{pack_mesh, F3dMesh, Shading};
use crate::material::Material;
use crate::mesh::Mesh;

/// Emitted display-list source plus the C identifier of the top-level list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct F3dExport {
    pub source: String,
    pub dl_name: String,
}

fn tx_mirror(mirror: bool) -> &'static str {
    if mirror {
        "G_TX_MIRROR"
    } else {
        "G_TX_NOMIRROR"
    }
}

fn tx_clamp(clamp: bool) -> &'static str {
    if clamp {
        "G_TX_CLAMP"
    } else {
        "G_TX_WRAP"
    }
}

/// Emit the `{name}_mat_dl` Gfx array configuring the full pipeline state.
pub fn write_material(out: &mut String, material: &Material, name: &str) {
    let om = &material.other_modes;

    writeln!(out, "Gfx {name}_mat_dl[] = {{").unwrap();

    writeln!(
        out,
        "    gsDPPipelineMode({}),",
        if om.atomic_prim {
            "G_PM_1PRIMITIVE"
        } else {
            "G_PM_NPRIMITIVE"
        }
    )
    .unwrap();
    writeln!(out, "    gsDPSetCycleType({}),", om.cycle_type.gbi_name()).unwrap();
    writeln!(
        out,
        "    gsDPSetTexturePersp({}),",
        if om.persp_tex_en {
            "G_TP_PERSP"
        } else {
            "G_TP_NONE"
        }
    )
    .unwrap();
    // Having both detail and sharpen at once is invalid; detail wins.
    writeln!(
        out,
        "    gsDPSetTextureDetail({}),",
        if om.detail_tex_en {
            "G_TD_DETAIL"
        } else if om.sharpen_tex_en {
            "G_TD_SHARPEN"
        } else {
            "G_TD_CLAMP"
        }
    )
    .unwrap();
    writeln!(
        out,
        "    gsDPSetTextureLOD({}),",
        if om.tex_lod_en { "G_TL_LOD" } else { "G_TL_TILE" }
    )
    .unwrap();
    writeln!(
        out,
        "    gsDPSetTextureLUT({}),",
        if om.tlut_en {
            if om.tlut_type {
                "G_TT_IA16"
            } else {
                "G_TT_RGBA16"
            }
        } else {
            "G_TT_NONE"
        }
    )
    .unwrap();
    writeln!(
        out,
        "    gsDPSetTextureFilter({}),",
        if om.sample_type {
            if om.mid_texel {
                "G_TF_AVERAGE"
            } else {
                "G_TF_BILERP"
            }
        } else {
            "G_TF_POINT"
        }
    )
    .unwrap();
    // Approximate: the convert mode bits don't map 1:1 onto the macros.
    let convert = if om.bi_lerp_0 && om.bi_lerp_1 {
        "G_TC_FILT"
    } else if om.bi_lerp_0 && om.convert_one {
        "G_TC_FILTCONV"
    } else {
        "G_TC_CONV"
    };
    writeln!(out, "    gsDPSetTextureConvert({convert}),").unwrap();
    writeln!(
        out,
        "    gsDPSetCombineKey({}),",
        if om.key_en { "G_CK_KEY" } else { "G_CK_NONE" }
    )
    .unwrap();
    writeln!(out, "    gsDPSetColorDither({}),", om.rgb_dither.gbi_name()).unwrap();
    writeln!(
        out,
        "    gsDPSetAlphaDither({}),",
        om.alpha_dither.gbi_name()
    )
    .unwrap();

    let mut render_mode = String::new();
    if om.antialias_en {
        render_mode.push_str("AA_EN | ");
    }
    if om.z_compare_en {
        render_mode.push_str("Z_CMP | ");
    }
    if om.z_update_en {
        render_mode.push_str("Z_UPD | ");
    }
    if om.image_read_en {
        render_mode.push_str("IM_RD | ");
    }
    if om.color_on_cvg {
        render_mode.push_str("CLR_ON_CVG | ");
    }
    write!(
        render_mode,
        "{} | {} | ",
        om.cvg_dest.gbi_name(),
        om.z_mode.gbi_name()
    )
    .unwrap();
    if om.cvg_x_alpha {
        render_mode.push_str("CVG_X_ALPHA | ");
    }
    if om.alpha_cvg_select {
        render_mode.push_str("ALPHA_CVG_SEL | ");
    }
    if om.force_blend {
        render_mode.push_str("FORCE_BL | ");
    }
    write!(
        render_mode,
        "GBL_c1({}, {}, {}, {}), GBL_c2({}, {}, {}, {})",
        om.bl_m1a_0.gbi_name(),
        om.bl_m1b_0.gbi_name(),
        om.bl_m2a_0.gbi_name(),
        om.bl_m2b_0.gbi_name(),
        om.bl_m1a_1.gbi_name(),
        om.bl_m1b_1.gbi_name(),
        om.bl_m2a_1.gbi_name(),
        om.bl_m2b_1.gbi_name(),
    )
    .unwrap();
    writeln!(out, "    gsDPSetRenderMode({render_mode}),").unwrap();

    writeln!(
        out,
        "    gsDPSetDepthSource({}),",
        if om.z_source_prim {
            "G_ZS_PRIM"
        } else {
            "G_ZS_PIXEL"
        }
    )
    .unwrap();
    writeln!(
        out,
        "    gsDPSetAlphaCompare({}),",
        if om.alpha_compare_en {
            if om.dither_alpha_en {
                "G_AC_DITHER"
            } else {
                "G_AC_THRESHOLD"
            }
        } else {
            "G_AC_NONE"
        }
    )
    .unwrap();

    for (i_tile, tile) in material.tiles.iter().enumerate() {
        let Some(image) = &tile.image else { continue };
        writeln!(
            out,
            "    gsDPLoadMultiBlock({}, 0x{:03X}, {}, {}, {}, {}, {}, {}, {} | {}, {} | {}, {}, {}, {}, {}),",
            image.c_identifier,
            tile.address,
            i_tile,
            tile.format.gbi_name(),
            tile.size.gbi_name(),
            image.width,
            image.height,
            tile.palette,
            tx_mirror(tile.mirror_s),
            tx_clamp(tile.clamp_s),
            tx_mirror(tile.mirror_t),
            tx_clamp(tile.clamp_t),
            tile.mask_s,
            tile.mask_t,
            tile.shift_s,
            tile.shift_t,
        )
        .unwrap();
    }

    for (i_tile, tile) in material.tiles.iter().enumerate() {
        // SetTile takes the T axis parameters before S.
        writeln!(
            out,
            "    gsDPSetTile({}, {}, 0x{:X}, 0x{:03X}, {}, {}, {} | {}, {}, {}, {} | {}, {}, {}),",
            tile.format.gbi_name(),
            tile.size.gbi_name(),
            tile.line,
            tile.address,
            i_tile,
            tile.palette,
            tx_mirror(tile.mirror_t),
            tx_clamp(tile.clamp_t),
            tile.mask_t,
            tile.shift_t,
            tx_mirror(tile.mirror_s),
            tx_clamp(tile.clamp_s),
            tile.mask_s,
            tile.shift_s,
        )
        .unwrap();
        writeln!(
            out,
            "    gsDPSetTileSize({}, (int)({:.2} * 4), (int)({:.2} * 4), (int)({:.2} * 4), (int)({:.2} * 4)),",
            i_tile,
            tile.upper_left_s,
            tile.upper_left_t,
            tile.lower_right_s,
            tile.lower_right_t,
        )
        .unwrap();
    }

    let c = &material.combiner;
    writeln!(
        out,
        "    gsDPSetCombineLERP({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}),",
        c.rgb_a_0.gbi_name(),
        c.rgb_b_0.gbi_name(),
        c.rgb_c_0.gbi_name(),
        c.rgb_d_0.gbi_name(),
        c.alpha_a_0.gbi_name(),
        c.alpha_b_0.gbi_name(),
        c.alpha_c_0.gbi_name(),
        c.alpha_d_0.gbi_name(),
        c.rgb_a_1.gbi_name(),
        c.rgb_b_1.gbi_name(),
        c.rgb_c_1.gbi_name(),
        c.rgb_d_1.gbi_name(),
        c.alpha_a_1.gbi_name(),
        c.alpha_b_1.gbi_name(),
        c.alpha_c_1.gbi_name(),
        c.alpha_d_1.gbi_name(),
    )
    .unwrap();

    let vals = &material.vals;
    writeln!(
        out,
        "    gsDPSetPrimDepth({}, {}),",
        vals.primitive_depth_z, vals.primitive_depth_dz
    )
    .unwrap();
    let [r, g, b, a] = vals.fog_color.to_u8();
    writeln!(out, "    gsDPSetFogColor({r}, {g}, {b}, {a}),").unwrap();
    let [r, g, b, a] = vals.blend_color.to_u8();
    writeln!(out, "    gsDPSetBlendColor({r}, {g}, {b}, {a}),").unwrap();
    let [r, g, b, a] = vals.primitive_color.to_u8();
    writeln!(
        out,
        "    gsDPSetPrimColor({}, {}, {r}, {g}, {b}, {a}),",
        vals.min_level, vals.prim_lod_frac
    )
    .unwrap();
    let [r, g, b, a] = vals.environment_color.to_u8();
    writeln!(out, "    gsDPSetEnvColor({r}, {g}, {b}, {a}),").unwrap();

    if material.geometry_mode.lighting {
        writeln!(out, "    gsSPSetGeometryMode(G_LIGHTING),").unwrap();
    } else {
        writeln!(out, "    gsSPClearGeometryMode(G_LIGHTING),").unwrap();
    }

    writeln!(out, "    gsSPEndDisplayList(),").unwrap();
    writeln!(out, "}};").unwrap();
}

/// Emit the `{name}_mesh_vtx` and `{name}_mesh_dl` arrays for packed
/// geometry.
pub fn write_geometry(out: &mut String, mesh: &F3dMesh, name: &str) {
    writeln!(out, "Vtx {name}_mesh_vtx[] = {{").unwrap();
    for v in &mesh.vertices {
        writeln!(
            out,
            "    {{{{ {{ {}, {}, {} }}, 0, {{ {}, {} }}, {{ 0x{:X}, 0x{:X}, 0x{:X}, {} }} }}}},",
            v.position[0],
            v.position[1],
            v.position[2],
            v.st[0],
            v.st[1],
            v.color_normal[0],
            v.color_normal[1],
            v.color_normal[2],
            v.alpha,
        )
        .unwrap();
    }
    writeln!(out, "}};").unwrap();

    writeln!(out, "Gfx {name}_mesh_dl[] = {{").unwrap();
    for entry in &mesh.entries {
        writeln!(
            out,
            "    gsSPVertex(&{name}_mesh_vtx[{}], {}, {}),",
            entry.buffer_start, entry.loaded, entry.v0
        )
        .unwrap();

        let mut tris = entry.triangles.chunks_exact(2);
        for pair in &mut tris {
            let (a, b) = (&pair[0].indices, &pair[1].indices);
            writeln!(
                out,
                "    gsSP2Triangles({}, {}, {}, 0, {}, {}, {}, 0),",
                a[0], a[1], a[2], b[0], b[1], b[2]
            )
            .unwrap();
        }
        if let [tri] = tris.remainder() {
            let t = &tri.indices;
            writeln!(out, "    gsSP1Triangle({}, {}, {}, 0),", t[0], t[1], t[2]).unwrap();
        }
    }
    writeln!(out, "    gsSPEndDisplayList(),").unwrap();
    writeln!(out, "}};").unwrap();
}

/// Export a mesh as display-list C source.
///
/// The mesh is split per material; each part gets a material and geometry
/// display list, and the returned `dl_name` identifies the top-level list
/// chaining them in material order.
pub fn export_f3d(mesh: &Mesh) -> Result<F3dExport> {
    let mut source = String::new();

    let parts = mesh.split_by_material();
    for part in &parts {
        let material = &part.materials[0];
        write_material(&mut source, material, &part.name);

        let shading = if material.geometry_mode.lighting {
            Shading::Normals
        } else {
            Shading::Colors
        };
        let packed = pack_mesh(part, material.uv_basis_s, material.uv_basis_t, shading);
        write_geometry(&mut source, &packed, &part.name);
    }

    let dl_name = format!("{}_dl", mesh.name);
    writeln!(source, "Gfx {dl_name}[] = {{").unwrap();
    for part in &parts {
        writeln!(source, "    gsSPDisplayList({}_mat_dl),", part.name).unwrap();
        writeln!(source, "    gsSPDisplayList({}_mesh_dl),", part.name).unwrap();
    }
    writeln!(source, "    gsSPEndDisplayList(),").unwrap();
    writeln!(source, "}};").unwrap();

    log::info!(
        "exported {}: {} materials, {} bytes of source",
        mesh.name,
        parts.len(),
        source.len()
    );

    Ok(F3dExport { source, dl_name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Image, Material};
    use crate::mesh::MeshBuffers;
    use std::sync::Arc;

    fn lit_material(name: &str) -> Material {
        let mut mat = Material::new(name);
        mat.geometry_mode.lighting = true;
        mat
    }

    fn single_triangle(material: &Material) -> Mesh {
        let buffers = MeshBuffers {
            positions: &[0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0, 0.0],
            triangle_loops: &[0, 1, 2],
            triangle_materials: &[0],
            loop_vertex_indices: &[0, 1, 2],
            loop_normals: &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            ..Default::default()
        };
        Mesh::from_buffers(
            "mesh",
            &buffers,
            &[Some(material)],
            &Material::new("default"),
        )
        .unwrap()
    }

    #[test]
    fn test_default_material_directives() {
        let mut out = String::new();
        write_material(&mut out, &Material::new("mymaterial"), "mesh_mymaterial");

        assert!(out.starts_with("Gfx mesh_mymaterial_mat_dl[] = {\n"));
        assert!(out.contains("    gsDPPipelineMode(G_PM_NPRIMITIVE),\n"));
        assert!(out.contains("    gsDPSetCycleType(G_CYC_1CYCLE),\n"));
        assert!(out.contains("    gsDPSetTexturePersp(G_TP_NONE),\n"));
        assert!(out.contains("    gsDPSetTextureDetail(G_TD_CLAMP),\n"));
        assert!(out.contains("    gsDPSetTextureLOD(G_TL_TILE),\n"));
        assert!(out.contains("    gsDPSetTextureLUT(G_TT_NONE),\n"));
        assert!(out.contains("    gsDPSetTextureFilter(G_TF_POINT),\n"));
        assert!(out.contains("    gsDPSetTextureConvert(G_TC_CONV),\n"));
        assert!(out.contains("    gsDPSetCombineKey(G_CK_NONE),\n"));
        assert!(out.contains("    gsDPSetColorDither(G_CD_MAGICSQ),\n"));
        assert!(out.contains("    gsDPSetAlphaDither(G_AD_DISABLE),\n"));
        assert!(out.contains(
            "    gsDPSetRenderMode(CVG_DST_CLAMP | ZMODE_OPA | \
             GBL_c1(G_BL_CLR_IN, G_BL_0, G_BL_CLR_IN, G_BL_1), \
             GBL_c2(G_BL_CLR_IN, G_BL_0, G_BL_CLR_IN, G_BL_1)),\n"
        ));
        assert!(out.contains("    gsDPSetDepthSource(G_ZS_PIXEL),\n"));
        assert!(out.contains("    gsDPSetAlphaCompare(G_AC_NONE),\n"));
        // No images: no load blocks, but all 8 tiles still configured.
        assert!(!out.contains("gsDPLoadMultiBlock"));
        assert_eq!(out.matches("gsDPSetTile(").count(), 8);
        assert_eq!(out.matches("gsDPSetTileSize(").count(), 8);
        assert!(out.contains(
            "    gsDPSetCombineLERP(0, 0, 0, TEXEL0, 0, 0, 0, 1, \
             0, 0, 0, TEXEL0, 0, 0, 0, 1),\n"
        ));
        assert!(out.contains("    gsDPSetPrimDepth(0, 0),\n"));
        assert!(out.contains("    gsDPSetFogColor(255, 255, 255, 255),\n"));
        assert!(out.contains("    gsDPSetBlendColor(255, 255, 255, 255),\n"));
        assert!(out.contains("    gsDPSetPrimColor(0, 0, 255, 255, 255, 255),\n"));
        assert!(out.contains("    gsDPSetEnvColor(255, 255, 255, 255),\n"));
        assert!(out.contains("    gsSPClearGeometryMode(G_LIGHTING),\n"));
        assert!(out.ends_with("    gsSPEndDisplayList(),\n};\n"));
    }

    #[test]
    fn test_textured_tile_load_block() {
        let mut mat = Material::new("tex");
        mat.tiles[0].image = Some(Arc::new(Image {
            c_identifier: "image_c_identifier".to_string(),
            width: 32,
            height: 32,
        }));
        mat.tiles[0].mask_s = 5;
        mat.tiles[0].mask_t = 5;
        mat.tiles[0].line = 0x40;
        mat.tiles[0].lower_right_s = 31.0;
        mat.tiles[0].lower_right_t = 31.0;

        let mut out = String::new();
        write_material(&mut out, &mat, "mesh_tex");

        assert!(out.contains(
            "    gsDPLoadMultiBlock(image_c_identifier, 0x000, 0, \
             G_IM_FMT_RGBA, G_IM_SIZ_16b, 32, 32, 0, \
             G_TX_NOMIRROR | G_TX_WRAP, G_TX_NOMIRROR | G_TX_WRAP, 5, 5, 0, 0),\n"
        ));
        assert!(out.contains(
            "    gsDPSetTile(G_IM_FMT_RGBA, G_IM_SIZ_16b, 0x40, 0x000, 0, 0, \
             G_TX_NOMIRROR | G_TX_WRAP, 5, 0, G_TX_NOMIRROR | G_TX_WRAP, 5, 0),\n"
        ));
        assert!(out.contains(
            "    gsDPSetTileSize(0, (int)(0.00 * 4), (int)(0.00 * 4), \
             (int)(31.00 * 4), (int)(31.00 * 4)),\n"
        ));
        // Only the one tile has an image.
        assert_eq!(out.matches("gsDPLoadMultiBlock").count(), 1);
    }

    #[test]
    fn test_lit_material_sets_lighting() {
        let mut out = String::new();
        write_material(&mut out, &lit_material("m"), "mesh_m");
        assert!(out.contains("    gsSPSetGeometryMode(G_LIGHTING),\n"));
        assert!(!out.contains("gsSPClearGeometryMode"));
    }

    #[test]
    fn test_geometry_output() {
        let mat = lit_material("m");
        let mesh = single_triangle(&mat);
        let packed = pack_mesh(&mesh, 32, 32, Shading::Normals);

        let mut out = String::new();
        write_geometry(&mut out, &packed, "mesh_m");

        assert!(out.starts_with("Vtx mesh_m_mesh_vtx[] = {\n"));
        // Normal (1,0,0) packs to 0x7F with opaque alpha.
        assert!(out.contains("    {{ { 0, 0, 0 }, 0, { 0, 1024 }, { 0x7F, 0x0, 0x0, 255 } }},\n"));
        assert!(out.contains("Gfx mesh_m_mesh_dl[] = {\n"));
        assert!(out.contains("    gsSPVertex(&mesh_m_mesh_vtx[0], 3, 0),\n"));
        assert!(out.contains("    gsSP1Triangle(0, 1, 2, 0),\n"));
        assert!(out.ends_with("    gsSPEndDisplayList(),\n};\n"));
    }

    #[test]
    fn test_triangles_emitted_in_pairs() {
        // Two triangles over four shared-position vertices with distinct
        // normals so they stay in one load entry.
        let buffers = MeshBuffers {
            positions: &[
                0.0, 0.0, 0.0, //
                10.0, 0.0, 0.0, //
                0.0, 10.0, 0.0, //
                10.0, 10.0, 0.0,
            ],
            triangle_loops: &[0, 1, 2, 3, 4, 5],
            triangle_materials: &[0, 0],
            loop_vertex_indices: &[0, 1, 2, 1, 3, 2],
            loop_normals: &[
                1.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, //
                0.0, 0.0, 1.0, //
                -1.0, 0.0, 0.0, //
                0.0, -1.0, 0.0, //
                0.0, 0.0, -1.0,
            ],
            ..Default::default()
        };
        let mesh = Mesh::from_buffers("mesh", &buffers, &[], &Material::new("default")).unwrap();
        let packed = pack_mesh(&mesh, 32, 32, Shading::Normals);

        let mut out = String::new();
        write_geometry(&mut out, &packed, "mesh_default");
        assert_eq!(out.matches("gsSP2Triangles(").count(), 1);
        assert!(!out.contains("gsSP1Triangle("));
    }

    #[test]
    fn test_export_top_level_list() {
        let mat = lit_material("mymaterial");
        let mesh = single_triangle(&mat);
        let export = export_f3d(&mesh).unwrap();

        assert_eq!(export.dl_name, "mesh_dl");
        assert!(export.source.contains("Gfx mesh_mymaterial_mat_dl[] = {"));
        assert!(export.source.contains("Vtx mesh_mymaterial_mesh_vtx[] = {"));
        assert!(export.source.contains("Gfx mesh_mymaterial_mesh_dl[] = {"));
        let tail = export
            .source
            .split("Gfx mesh_dl[] = {\n")
            .nth(1)
            .expect("top-level list present");
        assert!(tail.contains("    gsSPDisplayList(mesh_mymaterial_mat_dl),\n"));
        assert!(tail.contains("    gsSPDisplayList(mesh_mymaterial_mesh_dl),\n"));
        assert!(tail.contains("    gsSPEndDisplayList(),\n"));
    }
}
