//! RDP "other modes" state: cycle type, texture sampling, dithering and the
//! blender configuration, mirroring the hardware register fields.

use serde::Deserialize;

/// Pipeline cycle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleType {
    #[default]
    OneCycle,
    TwoCycle,
    Copy,
    Fill,
}

impl CycleType {
    pub fn gbi_name(self) -> &'static str {
        match self {
            CycleType::OneCycle => "G_CYC_1CYCLE",
            CycleType::TwoCycle => "G_CYC_2CYCLE",
            CycleType::Copy => "G_CYC_COPY",
            CycleType::Fill => "G_CYC_FILL",
        }
    }
}

/// RGB dither pattern selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RgbDither {
    #[default]
    MagicSquare,
    Bayer,
    Noise,
    None,
}

impl RgbDither {
    pub fn gbi_name(self) -> &'static str {
        match self {
            RgbDither::MagicSquare => "G_CD_MAGICSQ",
            RgbDither::Bayer => "G_CD_BAYER",
            RgbDither::Noise => "G_CD_NOISE",
            RgbDither::None => "G_CD_DISABLE",
        }
    }
}

/// Alpha dither pattern selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlphaDither {
    SameAsRgb,
    InverseOfRgb,
    Noise,
    #[default]
    None,
}

impl AlphaDither {
    pub fn gbi_name(self) -> &'static str {
        match self {
            AlphaDither::SameAsRgb => "G_AD_PATTERN",
            AlphaDither::InverseOfRgb => "G_AD_NOTPATTERN",
            AlphaDither::Noise => "G_AD_NOISE",
            AlphaDither::None => "G_AD_DISABLE",
        }
    }
}

/// Blender P/M multiplexer inputs (color sources).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlenderPmInput {
    #[default]
    Input,
    Memory,
    BlendColor,
    FogColor,
}

impl BlenderPmInput {
    pub fn gbi_name(self) -> &'static str {
        match self {
            BlenderPmInput::Input => "G_BL_CLR_IN",
            BlenderPmInput::Memory => "G_BL_CLR_MEM",
            BlenderPmInput::BlendColor => "G_BL_CLR_BL",
            BlenderPmInput::FogColor => "G_BL_CLR_FOG",
        }
    }
}

/// Blender A multiplexer inputs (first-cycle alpha sources).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlenderAInput {
    InputAlpha,
    FogAlpha,
    ShadeAlpha,
    #[default]
    Zero,
}

impl BlenderAInput {
    pub fn gbi_name(self) -> &'static str {
        match self {
            BlenderAInput::InputAlpha => "G_BL_A_IN",
            BlenderAInput::FogAlpha => "G_BL_A_FOG",
            BlenderAInput::ShadeAlpha => "G_BL_A_SHADE",
            BlenderAInput::Zero => "G_BL_0",
        }
    }
}

/// Blender B multiplexer inputs (second-cycle alpha sources).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlenderBInput {
    OneMinusA,
    MemoryCoverage,
    #[default]
    One,
    Zero,
}

impl BlenderBInput {
    pub fn gbi_name(self) -> &'static str {
        match self {
            BlenderBInput::OneMinusA => "G_BL_1MA",
            BlenderBInput::MemoryCoverage => "G_BL_A_MEM",
            BlenderBInput::One => "G_BL_1",
            BlenderBInput::Zero => "G_BL_0",
        }
    }
}

/// Depth comparison mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZMode {
    #[default]
    Opaque,
    Interpenetrating,
    Transparent,
    Decal,
}

impl ZMode {
    pub fn gbi_name(self) -> &'static str {
        match self {
            ZMode::Opaque => "ZMODE_OPA",
            ZMode::Interpenetrating => "ZMODE_INTER",
            ZMode::Transparent => "ZMODE_XLU",
            ZMode::Decal => "ZMODE_DEC",
        }
    }
}

/// Coverage destination mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvgDest {
    #[default]
    Clamp,
    Wrap,
    Full,
    Save,
}

impl CvgDest {
    pub fn gbi_name(self) -> &'static str {
        match self {
            CvgDest::Clamp => "CVG_DST_CLAMP",
            CvgDest::Wrap => "CVG_DST_WRAP",
            CvgDest::Full => "CVG_DST_FULL",
            CvgDest::Save => "CVG_DST_SAVE",
        }
    }
}

/// The full "other modes" record of a material.
///
/// Defaults give an opaque, unlit, point-sampled single-cycle pipeline,
/// matching the engine's idle state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct OtherModes {
    pub atomic_prim: bool,
    pub cycle_type: CycleType,
    pub persp_tex_en: bool,
    pub detail_tex_en: bool,
    pub sharpen_tex_en: bool,
    pub tex_lod_en: bool,
    pub tlut_en: bool,
    /// false = RGBA16 palette, true = IA16 palette.
    pub tlut_type: bool,
    /// false = point sampling, true = bilinear.
    pub sample_type: bool,
    pub mid_texel: bool,
    pub bi_lerp_0: bool,
    pub bi_lerp_1: bool,
    pub convert_one: bool,
    pub key_en: bool,
    pub rgb_dither: RgbDither,
    pub alpha_dither: AlphaDither,

    // Blend cycle 0
    pub bl_m1a_0: BlenderPmInput,
    pub bl_m1b_0: BlenderAInput,
    pub bl_m2a_0: BlenderPmInput,
    pub bl_m2b_0: BlenderBInput,
    // Blend cycle 1
    pub bl_m1a_1: BlenderPmInput,
    pub bl_m1b_1: BlenderAInput,
    pub bl_m2a_1: BlenderPmInput,
    pub bl_m2b_1: BlenderBInput,

    pub antialias_en: bool,
    pub z_compare_en: bool,
    pub z_update_en: bool,
    pub image_read_en: bool,
    pub color_on_cvg: bool,
    pub cvg_dest: CvgDest,
    pub z_mode: ZMode,
    pub cvg_x_alpha: bool,
    pub alpha_cvg_select: bool,
    pub force_blend: bool,
    /// false = per-pixel depth, true = primitive depth.
    pub z_source_prim: bool,
    pub alpha_compare_en: bool,
    pub dither_alpha_en: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle_pipeline() {
        let om = OtherModes::default();
        assert_eq!(om.cycle_type.gbi_name(), "G_CYC_1CYCLE");
        assert_eq!(om.rgb_dither.gbi_name(), "G_CD_MAGICSQ");
        assert_eq!(om.alpha_dither.gbi_name(), "G_AD_DISABLE");
        assert_eq!(om.bl_m1a_0.gbi_name(), "G_BL_CLR_IN");
        assert_eq!(om.bl_m1b_0.gbi_name(), "G_BL_0");
        assert_eq!(om.bl_m2b_0.gbi_name(), "G_BL_1");
        assert_eq!(om.cvg_dest.gbi_name(), "CVG_DST_CLAMP");
        assert_eq!(om.z_mode.gbi_name(), "ZMODE_OPA");
        assert!(!om.sample_type);
    }

    #[test]
    fn test_deserialize_snake_case() {
        let om: OtherModes =
            serde_json::from_str(r#"{"cycle_type": "two_cycle", "z_mode": "decal"}"#).unwrap();
        assert_eq!(om.cycle_type, CycleType::TwoCycle);
        assert_eq!(om.z_mode, ZMode::Decal);
        assert!(!om.force_blend);
    }
}
