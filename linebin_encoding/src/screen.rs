// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};

use crate::{DashPattern, Degree, LaneColors, PathId, PremulColor, Sigmoid, ARC_LUT_SAMPLES};

/// A segment after projection to screen space.
///
/// This is the per-segment record read by the rasterizer. It must be kept in sync with the
/// segment struct in the rasterizer's shader header.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ScreenSegment {
    /// Projected control points in pixels; entries past `degree` are zero.
    pub p_screen: [[f32; 2]; 4],
    pub bbox_min: [f32; 2],
    pub bbox_max: [f32; 2],
    pub degree: u32,
    pub path_id: u32,
    pub seg_index: u16,
    pub total_segs: u16,
    pub half_width_start: f32,
    pub half_width_end: f32,
    pub anti_alias_px: f32,
    pub noise_floor: f32,

    /// Clip-space z per control point.
    pub z_clip: [f32; 4],
    /// Clip-space w per control point.
    pub w_clip: [f32; 4],
    /// `1 / w` per control point, for perspective-correct interpolation.
    pub inv_w: [f32; 4],
    /// Normalized depth divided by w per control point.
    pub depth_over_w: [f32; 4],

    pub colors_start: LaneColors,
    pub colors_end: LaneColors,
    pub sigmoid_start: Sigmoid,
    pub sigmoid_end: Sigmoid,
    /// Left and right edge translations at the start.
    pub offsets_start: [[f32; 2]; 2],
    /// Left and right edge translations at the end.
    pub offsets_end: [[f32; 2]; 2],

    pub dash: DashPattern,
    /// Arc length already travelled along the path when this segment starts, if dashes
    /// accumulate per path; zero otherwise.
    pub dash_offset: f32,
    /// Screen-space arc length of the segment, in pixels.
    pub seg_length: f32,
}

impl ScreenSegment {
    pub fn degree(&self) -> Degree {
        Degree::from_u32(self.degree).unwrap_or_default()
    }

    pub fn path_id(&self) -> PathId {
        PathId(self.path_id)
    }

    pub fn control_points(&self) -> &[[f32; 2]] {
        &self.p_screen[..self.degree().n_points()]
    }

    pub fn start_point(&self) -> [f32; 2] {
        self.p_screen[0]
    }

    pub fn end_point(&self) -> [f32; 2] {
        self.p_screen[self.degree() as usize]
    }

    /// Premultiplied center color at the start.
    pub fn start_color(&self) -> PremulColor {
        self.colors_start.center
    }

    /// Premultiplied center color at the end.
    pub fn end_color(&self) -> PremulColor {
        self.colors_end.center
    }

    /// Whether the point lies inside the inflated bounding box.
    pub fn bbox_contains(&self, p: [f32; 2]) -> bool {
        p[0] >= self.bbox_min[0]
            && p[0] <= self.bbox_max[0]
            && p[1] >= self.bbox_min[1]
            && p[1] <= self.bbox_max[1]
    }
}

/// Result of an arc-length query.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LutSample {
    /// Curve parameter in `[0, 1]`.
    pub t: f32,
    pub position: [f32; 2],
    /// Unit tangent.
    pub tangent: [f32; 2],
}

/// Cumulative arc length, position and tangent sampled along a projected segment.
///
/// Lines use the first two samples only. `lengths` starts at zero, never decreases and ends
/// at `total_length`.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ArcLengthLut {
    pub lengths: [f32; ARC_LUT_SAMPLES],
    pub positions: [[f32; 2]; ARC_LUT_SAMPLES],
    pub tangents: [[f32; 2]; ARC_LUT_SAMPLES],
    /// Number of meaningful samples.
    pub count: u32,
    pub total_length: f32,
}

impl Default for ArcLengthLut {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl ArcLengthLut {
    pub fn len(&self) -> usize {
        (self.count as usize).min(ARC_LUT_SAMPLES)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The meaningful part of the cumulative length table.
    pub fn lengths(&self) -> &[f32] {
        &self.lengths[..self.len()]
    }

    /// Maps an arc length to the curve parameter, position and tangent there.
    ///
    /// Finds the bracketing samples by binary search and interpolates linearly between them.
    /// `s` is clamped to the segment.
    pub fn param_at_length(&self, s: f32) -> LutSample {
        let n = self.len();
        if n < 2 {
            return LutSample::default();
        }
        let s = s.clamp(0.0, self.total_length);
        let hi = self.lengths[..n].partition_point(|&l| l < s).clamp(1, n - 1);
        let lo = hi - 1;
        let span = self.lengths[hi] - self.lengths[lo];
        let f = if span > 0.0 {
            ((s - self.lengths[lo]) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let tangent = normalize_or(
            mix2(self.tangents[lo], self.tangents[hi], f),
            self.tangents[lo],
        );
        LutSample {
            t: (lo as f32 + f) / (n - 1) as f32,
            position: mix2(self.positions[lo], self.positions[hi], f),
            tangent,
        }
    }

    /// Maps a curve parameter to the arc length travelled to reach it.
    pub fn length_at_param(&self, t: f32) -> f32 {
        let n = self.len();
        if n < 2 {
            return 0.0;
        }
        let x = t.clamp(0.0, 1.0) * (n - 1) as f32;
        let lo = (x.floor() as usize).min(n - 2);
        let f = x - lo as f32;
        self.lengths[lo] + (self.lengths[lo + 1] - self.lengths[lo]) * f
    }

    /// Interpolates the stroke half-width by arc-length fraction.
    pub fn half_width_at(&self, s: f32, start: f32, end: f32) -> f32 {
        if self.total_length <= 0.0 {
            return start;
        }
        let f = (s / self.total_length).clamp(0.0, 1.0);
        start + (end - start) * f
    }
}

fn mix2(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [a[0] + (b[0] - a[0]) * t, a[1] + (b[1] - a[1]) * t]
}

fn normalize_or(v: [f32; 2], fallback: [f32; 2]) -> [f32; 2] {
    let len = v[0].hypot(v[1]);
    if len > 0.0 {
        [v[0] / len, v[1] / len]
    } else {
        fallback
    }
}
