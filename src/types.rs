//! Small shared types used throughout the library.

use serde::Deserialize;

/// An RGBA color with float channels in the 0..1 range.
///
/// Emission converts to 0..255 bytes; out-of-range channels are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to 0..255 bytes, clamping each channel.
    pub fn to_u8(self) -> [u8; 4] {
        [
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        ]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Scale a 0..1 channel to a clamped 0..255 byte.
pub(crate) fn channel_to_u8(c: f32) -> u8 {
    (c * 255.0).clamp(0.0, 255.0) as u8
}

/// An axis-aligned bounding box in engine units (post int16 truncation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: [i16; 3],
    pub max: [i16; 3],
}

impl Bounds {
    /// Grow the box to contain `p`.
    pub fn extend(&mut self, p: [i16; 3]) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(p[i]);
            self.max[i] = self.max[i].max(p[i]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_to_u8_clamps() {
        assert_eq!(Rgba::WHITE.to_u8(), [255, 255, 255, 255]);
        assert_eq!(Rgba::new(0.0, 0.5, 2.0, -1.0).to_u8(), [0, 127, 255, 0]);
    }

    #[test]
    fn test_bounds_extend() {
        let mut b = Bounds {
            min: [1, -2, 300],
            max: [1, -2, 300],
        };
        b.extend([-5, 0, 400]);
        assert_eq!(b.min, [-5, -2, 300]);
        assert_eq!(b.max, [1, 0, 400]);
    }
}
