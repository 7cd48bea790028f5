//! Color combiner configuration: the (A - B) * C + D input selections for
//! the RGB and alpha channels of both cycles.

use serde::Deserialize;

/// RGB combiner "A" input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinerRgbA {
    Combined,
    Texel0,
    Texel1,
    Primitive,
    Shade,
    Environment,
    One,
    Noise,
    #[default]
    Zero,
}

impl CombinerRgbA {
    pub fn gbi_name(self) -> &'static str {
        match self {
            CombinerRgbA::Combined => "COMBINED",
            CombinerRgbA::Texel0 => "TEXEL0",
            CombinerRgbA::Texel1 => "TEXEL1",
            CombinerRgbA::Primitive => "PRIMITIVE",
            CombinerRgbA::Shade => "SHADE",
            CombinerRgbA::Environment => "ENVIRONMENT",
            CombinerRgbA::One => "1",
            CombinerRgbA::Noise => "NOISE",
            CombinerRgbA::Zero => "0",
        }
    }
}

/// RGB combiner "B" input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinerRgbB {
    Combined,
    Texel0,
    Texel1,
    Primitive,
    Shade,
    Environment,
    Center,
    K4,
    #[default]
    Zero,
}

impl CombinerRgbB {
    pub fn gbi_name(self) -> &'static str {
        match self {
            CombinerRgbB::Combined => "COMBINED",
            CombinerRgbB::Texel0 => "TEXEL0",
            CombinerRgbB::Texel1 => "TEXEL1",
            CombinerRgbB::Primitive => "PRIMITIVE",
            CombinerRgbB::Shade => "SHADE",
            CombinerRgbB::Environment => "ENVIRONMENT",
            CombinerRgbB::Center => "CENTER",
            CombinerRgbB::K4 => "K4",
            CombinerRgbB::Zero => "0",
        }
    }
}

/// RGB combiner "C" input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinerRgbC {
    Combined,
    Texel0,
    Texel1,
    Primitive,
    Shade,
    Environment,
    Scale,
    CombinedAlpha,
    Texel0Alpha,
    Texel1Alpha,
    PrimitiveAlpha,
    ShadeAlpha,
    EnvironmentAlpha,
    LodFraction,
    PrimLodFrac,
    K5,
    #[default]
    Zero,
}

impl CombinerRgbC {
    pub fn gbi_name(self) -> &'static str {
        match self {
            CombinerRgbC::Combined => "COMBINED",
            CombinerRgbC::Texel0 => "TEXEL0",
            CombinerRgbC::Texel1 => "TEXEL1",
            CombinerRgbC::Primitive => "PRIMITIVE",
            CombinerRgbC::Shade => "SHADE",
            CombinerRgbC::Environment => "ENVIRONMENT",
            CombinerRgbC::Scale => "SCALE",
            CombinerRgbC::CombinedAlpha => "COMBINED_ALPHA",
            CombinerRgbC::Texel0Alpha => "TEXEL0_ALPHA",
            CombinerRgbC::Texel1Alpha => "TEXEL1_ALPHA",
            CombinerRgbC::PrimitiveAlpha => "PRIMITIVE_ALPHA",
            CombinerRgbC::ShadeAlpha => "SHADE_ALPHA",
            CombinerRgbC::EnvironmentAlpha => "ENVIRONMENT_ALPHA",
            CombinerRgbC::LodFraction => "LOD_FRACTION",
            CombinerRgbC::PrimLodFrac => "PRIM_LOD_FRAC",
            CombinerRgbC::K5 => "K5",
            CombinerRgbC::Zero => "0",
        }
    }
}

/// RGB combiner "D" input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinerRgbD {
    Combined,
    #[default]
    Texel0,
    Texel1,
    Primitive,
    Shade,
    Environment,
    One,
    Zero,
}

impl CombinerRgbD {
    pub fn gbi_name(self) -> &'static str {
        match self {
            CombinerRgbD::Combined => "COMBINED",
            CombinerRgbD::Texel0 => "TEXEL0",
            CombinerRgbD::Texel1 => "TEXEL1",
            CombinerRgbD::Primitive => "PRIMITIVE",
            CombinerRgbD::Shade => "SHADE",
            CombinerRgbD::Environment => "ENVIRONMENT",
            CombinerRgbD::One => "1",
            CombinerRgbD::Zero => "0",
        }
    }
}

/// Alpha combiner "A"/"B"/"D" input sources (same selection set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinerAlpha {
    Combined,
    Texel0,
    Texel1,
    Primitive,
    Shade,
    Environment,
    One,
    #[default]
    Zero,
}

impl CombinerAlpha {
    pub fn gbi_name(self) -> &'static str {
        match self {
            CombinerAlpha::Combined => "COMBINED",
            CombinerAlpha::Texel0 => "TEXEL0",
            CombinerAlpha::Texel1 => "TEXEL1",
            CombinerAlpha::Primitive => "PRIMITIVE",
            CombinerAlpha::Shade => "SHADE",
            CombinerAlpha::Environment => "ENVIRONMENT",
            CombinerAlpha::One => "1",
            CombinerAlpha::Zero => "0",
        }
    }
}

/// Alpha combiner "C" input sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinerAlphaC {
    LodFraction,
    Texel0,
    Texel1,
    Primitive,
    Shade,
    Environment,
    PrimLodFrac,
    #[default]
    Zero,
}

impl CombinerAlphaC {
    pub fn gbi_name(self) -> &'static str {
        match self {
            CombinerAlphaC::LodFraction => "LOD_FRACTION",
            CombinerAlphaC::Texel0 => "TEXEL0",
            CombinerAlphaC::Texel1 => "TEXEL1",
            CombinerAlphaC::Primitive => "PRIMITIVE",
            CombinerAlphaC::Shade => "SHADE",
            CombinerAlphaC::Environment => "ENVIRONMENT",
            CombinerAlphaC::PrimLodFrac => "PRIM_LOD_FRAC",
            CombinerAlphaC::Zero => "0",
        }
    }
}

/// Both combiner cycles, 16 input slots.
///
/// The default computes `TEXEL0` in RGB and a constant full alpha, a
/// texture-only passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Combiner {
    pub rgb_a_0: CombinerRgbA,
    pub rgb_b_0: CombinerRgbB,
    pub rgb_c_0: CombinerRgbC,
    pub rgb_d_0: CombinerRgbD,
    pub alpha_a_0: CombinerAlpha,
    pub alpha_b_0: CombinerAlpha,
    pub alpha_c_0: CombinerAlphaC,
    pub alpha_d_0: CombinerAlpha,
    pub rgb_a_1: CombinerRgbA,
    pub rgb_b_1: CombinerRgbB,
    pub rgb_c_1: CombinerRgbC,
    pub rgb_d_1: CombinerRgbD,
    pub alpha_a_1: CombinerAlpha,
    pub alpha_b_1: CombinerAlpha,
    pub alpha_c_1: CombinerAlphaC,
    pub alpha_d_1: CombinerAlpha,
}

impl Default for Combiner {
    fn default() -> Self {
        Self {
            rgb_a_0: CombinerRgbA::Zero,
            rgb_b_0: CombinerRgbB::Zero,
            rgb_c_0: CombinerRgbC::Zero,
            rgb_d_0: CombinerRgbD::Texel0,
            alpha_a_0: CombinerAlpha::Zero,
            alpha_b_0: CombinerAlpha::Zero,
            alpha_c_0: CombinerAlphaC::Zero,
            alpha_d_0: CombinerAlpha::One,
            rgb_a_1: CombinerRgbA::Zero,
            rgb_b_1: CombinerRgbB::Zero,
            rgb_c_1: CombinerRgbC::Zero,
            rgb_d_1: CombinerRgbD::Texel0,
            alpha_a_1: CombinerAlpha::Zero,
            alpha_b_1: CombinerAlpha::Zero,
            alpha_c_1: CombinerAlphaC::Zero,
            alpha_d_1: CombinerAlpha::One,
        }
    }
}
