// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};
use peniko::Color;

/// RGBA color with the RGB channels pre-scaled by alpha.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PremulColor(pub [f32; 4]);

impl PremulColor {
    pub const TRANSPARENT: Self = Self([0.0; 4]);
    pub const WHITE: Self = Self([1.0; 4]);

    /// Premultiplies a straight-alpha color.
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self([r * a, g * a, b * a, a])
    }

    /// Recovers the straight-alpha color. Fully transparent colors return zero.
    pub fn to_straight(self) -> [f32; 4] {
        let [r, g, b, a] = self.0;
        if a <= 0.0 {
            return [0.0; 4];
        }
        [r / a, g / a, b / a, a]
    }

    pub fn alpha(self) -> f32 {
        self.0[3]
    }

    pub fn is_finite(self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }

    /// Linear interpolation; only meaningful because both inputs are premultiplied.
    pub fn mix(self, other: Self, t: f32) -> Self {
        let a = self.0;
        let b = other.0;
        Self([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ])
    }

    pub fn scale(self, s: f32) -> Self {
        let c = self.0;
        Self([c[0] * s, c[1] * s, c[2] * s, c[3] * s])
    }
}

impl From<Color> for PremulColor {
    fn from(color: Color) -> Self {
        let unit = |c: u8| c as f32 / 255.0;
        Self::from_straight(unit(color.r), unit(color.g), unit(color.b), unit(color.a))
    }
}

/// Colors of the three lanes across a stroke at one of its ends.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct LaneColors {
    pub center: PremulColor,
    pub outer_left: PremulColor,
    pub outer_right: PremulColor,
}

impl LaneColors {
    /// All three lanes share one color.
    pub fn uniform(color: PremulColor) -> Self {
        Self {
            center: color,
            outer_left: color,
            outer_right: color,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.outer_left.is_finite() && self.outer_right.is_finite()
    }
}

impl From<Color> for LaneColors {
    fn from(color: Color) -> Self {
        Self::uniform(color.into())
    }
}

impl From<PremulColor> for LaneColors {
    fn from(color: PremulColor) -> Self {
        Self::uniform(color)
    }
}

#[cfg(test)]
mod tests {
    use super::{LaneColors, PremulColor};
    use peniko::Color;

    #[test]
    fn peniko_colors_are_premultiplied() {
        let c = PremulColor::from(Color::rgba8(255, 0, 0, 51));
        assert!((c.0[0] - 0.2).abs() < 1e-6);
        assert_eq!(c.0[1], 0.0);
        assert!((c.alpha() - 0.2).abs() < 1e-6);
        let straight = c.to_straight();
        assert!((straight[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn uniform_lanes() {
        let lanes = LaneColors::from(PremulColor::WHITE);
        assert_eq!(lanes.outer_left, lanes.center);
        assert_eq!(lanes.outer_right, lanes.center);
    }
}
