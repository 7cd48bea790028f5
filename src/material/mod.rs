//! Render material model.
//!
//! A [`Material`] carries the full fixed-function pipeline state emitted in
//! front of each sub-mesh: other-modes flags, up to 8 texture [`Tile`]s,
//! the color [`Combiner`], scalar/color [`Vals`], and the geometry mode.
//! [`Image`]s are shared between tiles and materials by reference and never
//! mutated after construction.

mod combiner;
mod other_modes;

pub use combiner::{
    Combiner, CombinerAlpha, CombinerAlphaC, CombinerRgbA, CombinerRgbB, CombinerRgbC,
    CombinerRgbD,
};
pub use other_modes::{
    AlphaDither, BlenderAInput, BlenderBInput, BlenderPmInput, CvgDest, CycleType, OtherModes,
    RgbDither, ZMode,
};

use crate::types::Rgba;
use serde::Deserialize;
use std::sync::Arc;

/// Number of texture tile descriptors per material.
pub const TILE_COUNT: usize = 8;

/// A texture image referenced from tiles.
///
/// The exporter never touches pixel data; an image is just the C symbol the
/// downstream toolchain links against, plus its dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Image {
    /// C identifier of the texture data array.
    pub c_identifier: String,
    pub width: u32,
    pub height: u32,
}

/// Texel format of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileFormat {
    #[default]
    Rgba,
    Yuv,
    Ci,
    Ia,
    I,
}

impl TileFormat {
    pub fn gbi_name(self) -> &'static str {
        match self {
            TileFormat::Rgba => "G_IM_FMT_RGBA",
            TileFormat::Yuv => "G_IM_FMT_YUV",
            TileFormat::Ci => "G_IM_FMT_CI",
            TileFormat::Ia => "G_IM_FMT_IA",
            TileFormat::I => "G_IM_FMT_I",
        }
    }
}

/// Texel size of a tile in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileSize {
    Bits4,
    Bits8,
    #[default]
    Bits16,
    Bits32,
}

impl TileSize {
    pub fn gbi_name(self) -> &'static str {
        match self {
            TileSize::Bits4 => "G_IM_SIZ_4b",
            TileSize::Bits8 => "G_IM_SIZ_8b",
            TileSize::Bits16 => "G_IM_SIZ_16b",
            TileSize::Bits32 => "G_IM_SIZ_32b",
        }
    }
}

/// One of the 8 texture tile descriptors.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tile {
    /// Image loaded into this tile, if any. Shared, not owned.
    pub image: Option<Arc<Image>>,
    pub format: TileFormat,
    pub size: TileSize,
    /// TMEM line stride in 64-bit words.
    pub line: u32,
    /// TMEM address in 64-bit words.
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
    /// Clamp rectangle in texel units.
    pub upper_left_s: f32,
    pub upper_left_t: f32,
    pub lower_right_s: f32,
    pub lower_right_t: f32,
}

/// Scalar and color values of a material.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Vals {
    pub primitive_depth_z: i32,
    pub primitive_depth_dz: i32,
    pub fog_color: Rgba,
    pub blend_color: Rgba,
    pub min_level: u32,
    pub prim_lod_frac: u32,
    pub primitive_color: Rgba,
    pub environment_color: Rgba,
}

impl Default for Vals {
    fn default() -> Self {
        Self {
            primitive_depth_z: 0,
            primitive_depth_dz: 0,
            fog_color: Rgba::WHITE,
            blend_color: Rgba::WHITE,
            min_level: 0,
            prim_lod_frac: 0,
            primitive_color: Rgba::WHITE,
            environment_color: Rgba::WHITE,
        }
    }
}

/// Geometry mode flags relevant to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct GeometryMode {
    /// Lighting enabled: shading comes from vertex normals instead of
    /// vertex colors.
    pub lighting: bool,
}

/// A render material: name plus the full pipeline state.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// UV basis scale, typically the texture dimensions.
    pub uv_basis_s: i32,
    pub uv_basis_t: i32,
    pub other_modes: OtherModes,
    pub tiles: [Tile; TILE_COUNT],
    pub combiner: Combiner,
    pub vals: Vals,
    pub geometry_mode: GeometryMode,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uv_basis_s: 32,
            uv_basis_t: 32,
            other_modes: OtherModes::default(),
            tiles: Default::default(),
            combiner: Combiner::default(),
            vals: Vals::default(),
            geometry_mode: GeometryMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_clone_shares_images() {
        let image = Arc::new(Image {
            c_identifier: "tex_rock".to_string(),
            width: 32,
            height: 32,
        });
        let mut mat = Material::new("rock");
        mat.tiles[0].image = Some(image.clone());

        let copy = mat.clone();
        // Both tiles point at the same shared image record.
        assert!(Arc::ptr_eq(
            copy.tiles[0].image.as_ref().unwrap(),
            mat.tiles[0].image.as_ref().unwrap(),
        ));
        assert_eq!(copy.name, "rock");
    }

    #[test]
    fn test_tile_default_has_no_image() {
        let tile = Tile::default();
        assert!(tile.image.is_none());
        assert_eq!(tile.format.gbi_name(), "G_IM_FMT_RGBA");
        assert_eq!(tile.size.gbi_name(), "G_IM_SIZ_16b");
    }
}
