// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert;

/// Log2 of the bin edge length in pixels.
pub const BIN_POW: u32 = 7;

/// Edge length of a square bin, in pixels.
pub const BIN_SIZE: u32 = 1 << BIN_POW;

/// Maximum number of segment references a single bin retains.
pub const KMAX_PER_BIN: u32 = 16;

/// Number of samples in a curve's arc-length table.
pub const ARC_LUT_SAMPLES: usize = 32;

/// Maximum number of entries in a dash pattern.
pub const MAX_DASH_SEGMENTS: usize = 8;

/// Clip-space `w` at or below this value marks a point as behind the camera.
pub const W_EPSILON: f32 = 1e-5;

const_assert!(BIN_SIZE.is_power_of_two());
const_assert!(KMAX_PER_BIN > 0);
const_assert!(ARC_LUT_SAMPLES >= 2);
const_assert!(MAX_DASH_SEGMENTS % 2 == 0);

/// Constants shared between the binning stages and the consumer of their output.
///
/// These are baked into the layout of [`ScreenSegment`](crate::ScreenSegment),
/// [`ArcLengthLut`](crate::ArcLengthLut) and the bin buffers. The rasterizer declares the
/// values it was compiled with and the renderer refuses to start when they disagree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StageContract {
    pub bin_size: u32,
    pub kmax_per_bin: u32,
    pub lut_samples: u32,
    pub max_dash_segments: u32,
}

impl StageContract {
    /// The contract this build of the stages was compiled with.
    pub const CURRENT: Self = Self {
        bin_size: BIN_SIZE,
        kmax_per_bin: KMAX_PER_BIN,
        lut_samples: ARC_LUT_SAMPLES as u32,
        max_dash_segments: MAX_DASH_SEGMENTS as u32,
    };

    /// Returns the names of the fields that differ between `self` and `other`.
    pub fn mismatches(&self, other: &Self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.bin_size != other.bin_size {
            fields.push("bin_size");
        }
        if self.kmax_per_bin != other.kmax_per_bin {
            fields.push("kmax_per_bin");
        }
        if self.lut_samples != other.lut_samples {
            fields.push("lut_samples");
        }
        if self.max_dash_segments != other.max_dash_segments {
            fields.push("max_dash_segments");
        }
        fields
    }
}

impl Default for StageContract {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Frame-global configuration shared by every stage and the rasterizer.
///
/// The host replaces this wholesale every frame. This data structure must be kept in sync
/// with the `Uniforms` struct in the rasterizer's shader header; the three-component colors
/// are padded to four floats to match its alignment.
#[derive(Clone, Copy, Debug, Zeroable, Pod, PartialEq)]
#[repr(C)]
pub struct Uniforms {
    /// Width of the target in pixels.
    pub view_width: i32,
    /// Height of the target in pixels.
    pub view_height: i32,
    /// Anti-alias ramp width in pixels.
    pub anti_alias_px: f32,
    pub _pad0: f32,
    /// Background color, straight alpha. The fourth lane is ignored.
    pub background_color: [f32; 4],

    /// Opacity of the bin occupancy heat map overlay.
    pub debug_bins: f32,
    /// Opacity of the bin grid lines.
    pub bin_visibility: f32,
    /// Opacity of the per-segment bounding box overlay.
    pub bounding_box_visibility: f32,

    /// Scales the authored segment colors.
    pub line_color_strength: f32,
    /// Mix factor of the debug gradient over the authored colors.
    pub line_debug_gradient_strength: f32,
    pub _pad1: [f32; 3],
    pub line_debug_gradient_start_color: [f32; 4],
    pub line_debug_gradient_end_color: [f32; 4],

    pub blend_radius: f32,
    pub blend_intensity: f32,
    /// Weight of the previous frame when blending over it.
    pub previous_color_visibility: f32,
    pub _pad2: f32,
}

impl Uniforms {
    /// Creates uniforms for a viewport with every debug overlay disabled.
    pub fn new(view_width: u32, view_height: u32) -> Self {
        Self {
            view_width: view_width.min(i32::MAX as u32) as i32,
            view_height: view_height.min(i32::MAX as u32) as i32,
            ..Self::default()
        }
    }

    /// Viewport size in pixels, with negative sizes treated as empty.
    pub fn viewport(&self) -> (u32, u32) {
        (self.view_width.max(0) as u32, self.view_height.max(0) as u32)
    }

    /// Sets the overlay opacities from a set of debug layers.
    pub fn with_debug_layers(mut self, layers: DebugLayers) -> Self {
        let on = |mask| if layers.contains(mask) { 1.0 } else { 0.0 };
        self.debug_bins = on(DebugLayers::BIN_OCCUPANCY);
        self.bin_visibility = on(DebugLayers::BIN_GRID);
        self.bounding_box_visibility = on(DebugLayers::BOUNDING_BOXES);
        self
    }

    /// The overlays whose opacity is non-zero.
    pub fn debug_layers(&self) -> DebugLayers {
        let mut layers = DebugLayers::none();
        if self.debug_bins > 0.0 {
            layers = layers | DebugLayers::BIN_OCCUPANCY;
        }
        if self.bin_visibility > 0.0 {
            layers = layers | DebugLayers::BIN_GRID;
        }
        if self.bounding_box_visibility > 0.0 {
            layers = layers | DebugLayers::BOUNDING_BOXES;
        }
        layers
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            view_width: 0,
            view_height: 0,
            anti_alias_px: 1.0,
            _pad0: 0.0,
            background_color: [0.0, 0.0, 0.0, 1.0],
            debug_bins: 0.0,
            bin_visibility: 0.0,
            bounding_box_visibility: 0.0,
            line_color_strength: 1.0,
            line_debug_gradient_strength: 0.0,
            _pad1: [0.0; 3],
            line_debug_gradient_start_color: [1.0, 0.0, 0.0, 1.0],
            line_debug_gradient_end_color: [0.0, 0.0, 1.0, 1.0],
            blend_radius: 0.0,
            blend_intensity: 0.0,
            previous_color_visibility: 0.0,
            _pad2: 0.0,
        }
    }
}

/// Bitflags for the debug overlays drawn by the rasterizer.
///
/// These only select visualizations; no stage changes its output based on them.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct DebugLayers(u8);

impl std::fmt::Debug for DebugLayers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tuple = f.debug_tuple("DebugLayers");
        if self.contains(Self::BIN_OCCUPANCY) {
            tuple.field(&"BIN_OCCUPANCY");
        }
        if self.contains(Self::BIN_GRID) {
            tuple.field(&"BIN_GRID");
        }
        if self.contains(Self::BOUNDING_BOXES) {
            tuple.field(&"BOUNDING_BOXES");
        }
        tuple.finish()
    }
}

impl DebugLayers {
    /// Tint every bin by its occupancy.
    pub const BIN_OCCUPANCY: Self = Self(1 << 0);

    /// Draw the bin grid.
    pub const BIN_GRID: Self = Self(1 << 1);

    /// Outline the inflated bounding box of every binned segment.
    pub const BOUNDING_BOXES: Self = Self(1 << 2);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn none() -> Self {
        Self(0)
    }

    pub const fn all() -> Self {
        Self(Self::BIN_OCCUPANCY.0 | Self::BIN_GRID.0 | Self::BOUNDING_BOXES.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Determine whether `self` is a superset of `mask`.
    pub const fn contains(self, mask: Self) -> bool {
        self.0 & mask.0 == mask.0
    }

    /// Toggle the value of the layers specified in mask.
    pub fn toggle(&mut self, mask: Self) {
        self.0 ^= mask.0;
    }
}

impl std::ops::BitOr for DebugLayers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{DebugLayers, StageContract, Uniforms};

    #[test]
    fn uniforms_have_no_padding_surprises() {
        assert_eq!(size_of::<Uniforms>(), 112);
        assert_eq!(size_of::<Uniforms>() % 16, 0);
    }

    #[test]
    fn debug_layers_round_trip_through_uniforms() {
        let layers = DebugLayers::BIN_GRID | DebugLayers::BOUNDING_BOXES;
        let uniforms = Uniforms::new(640, 480).with_debug_layers(layers);
        assert_eq!(uniforms.debug_bins, 0.0);
        assert_eq!(uniforms.bin_visibility, 1.0);
        assert_eq!(uniforms.debug_layers(), layers);
    }

    #[test]
    fn contract_mismatch_names_fields() {
        let other = StageContract {
            lut_samples: 64,
            bin_size: 64,
            ..StageContract::CURRENT
        };
        assert!(StageContract::CURRENT
            .mismatches(&StageContract::CURRENT)
            .is_empty());
        assert_eq!(
            StageContract::CURRENT.mismatches(&other),
            vec!["bin_size", "lut_samples"]
        );
    }
}
