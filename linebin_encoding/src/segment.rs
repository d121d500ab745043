// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};
use thiserror::Error;

use crate::{DashPattern, LaneColors, Vec4};

/// Control points closer than this along every axis are considered coincident.
const EPSILON: f32 = 1e-12;

/// Identifies the authored path a segment belongs to.
///
/// Segments of one path share dash phase continuity and are excluded from joining with
/// themselves by the rasterizer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct PathId(pub u32);

/// Degree of a segment's Bézier curve.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Degree {
    #[default]
    Linear = 1,
    Quadratic = 2,
    Cubic = 3,
}

impl Degree {
    /// Number of control points including both endpoints.
    pub const fn n_points(self) -> usize {
        self as usize + 1
    }

    pub const fn is_curve(self) -> bool {
        !matches!(self, Self::Linear)
    }

    pub fn from_u32(degree: u32) -> Option<Self> {
        match degree {
            1 => Some(Self::Linear),
            2 => Some(Self::Quadratic),
            3 => Some(Self::Cubic),
            _ => None,
        }
    }
}

/// Soft-edge falloff across the stroke width at one end of a segment.
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Sigmoid {
    pub steepness: f32,
    pub midpoint: f32,
}

impl Default for Sigmoid {
    fn default() -> Self {
        Self {
            steepness: 6.0,
            midpoint: 0.5,
        }
    }
}

/// Per-vertex stroke attributes. A segment takes its start attributes from the vertex it
/// leaves and its end attributes from the vertex it reaches.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VertexStyle {
    /// Half of the stroke width, in pixels.
    pub half_width: f32,
    pub colors: LaneColors,
    pub sigmoid: Sigmoid,
    /// Screen-space translation of the left outer edge, in pixels.
    pub offset_left: [f32; 2],
    /// Screen-space translation of the right outer edge, in pixels.
    pub offset_right: [f32; 2],
}

impl Default for VertexStyle {
    fn default() -> Self {
        Self {
            half_width: 0.6,
            colors: LaneColors::uniform(crate::PremulColor::WHITE),
            sigmoid: Sigmoid::default(),
            offset_left: [0.0; 2],
            offset_right: [0.0; 2],
        }
    }
}

impl VertexStyle {
    pub fn new(half_width: f32, colors: impl Into<LaneColors>) -> Self {
        Self {
            half_width,
            colors: colors.into(),
            ..Self::default()
        }
    }

    pub fn with_sigmoid(mut self, steepness: f32, midpoint: f32) -> Self {
        self.sigmoid = Sigmoid {
            steepness,
            midpoint,
        };
        self
    }

    pub fn with_offsets(mut self, left: [f32; 2], right: [f32; 2]) -> Self {
        self.offset_left = left;
        self.offset_right = right;
        self
    }

    /// Length of the larger edge translation.
    pub fn max_offset(&self) -> f32 {
        let len = |v: [f32; 2]| v[0].hypot(v[1]);
        len(self.offset_left).max(len(self.offset_right))
    }

    pub fn is_finite(&self) -> bool {
        self.half_width.is_finite()
            && self.colors.is_finite()
            && self.sigmoid.steepness.is_finite()
            && self.sigmoid.midpoint.is_finite()
            && self.offset_left.iter().chain(&self.offset_right).all(|v| v.is_finite())
    }
}

/// A world-space path segment.
///
/// The curve is stored as a fixed array of homogeneous control points sized for the largest
/// degree; only the first `degree.n_points()` entries are meaningful.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub path_id: PathId,
    pub degree: Degree,
    pub points: [Vec4; 4],
    pub start: VertexStyle,
    pub end: VertexStyle,
    /// Width of the anti-alias ramp, in pixels.
    pub anti_alias_px: f32,
    pub noise_floor: f32,
    pub dash: DashPattern,
    /// Position of this segment within its path.
    pub seg_index: u16,
    /// Number of accepted segments in the path.
    pub total_segs: u16,
}

impl Segment {
    /// Creates a segment from its control points, including both endpoints.
    ///
    /// # Panics
    ///
    /// Panics if `points` has fewer than 2 or more than 4 entries.
    pub fn new(path_id: PathId, points: &[Vec4], start: VertexStyle, end: VertexStyle) -> Self {
        let degree = Degree::from_u32((points.len() as u32).wrapping_sub(1))
            .expect("2 to 4 control points");
        let mut pts = [Vec4::ZERO; 4];
        pts[..points.len()].copy_from_slice(points);
        Self {
            path_id,
            degree,
            points: pts,
            start,
            end,
            anti_alias_px: 0.7,
            noise_floor: 1.0,
            dash: DashPattern::default(),
            seg_index: 0,
            total_segs: 1,
        }
    }

    pub fn control_points(&self) -> &[Vec4] {
        &self.points[..self.degree.n_points()]
    }

    pub fn start_point(&self) -> Vec4 {
        self.points[0]
    }

    pub fn end_point(&self) -> Vec4 {
        self.points[self.degree as usize]
    }

    pub fn max_half_width(&self) -> f32 {
        self.start.half_width.max(self.end.half_width)
    }

    /// Classifies the segment as renderable or not.
    pub fn validate(&self) -> Result<(), Rejection> {
        let finite = self.control_points().iter().all(|p| p.is_finite())
            && self.start.is_finite()
            && self.end.is_finite()
            && self.anti_alias_px.is_finite()
            && self.noise_floor.is_finite();
        if !finite {
            return Err(Rejection::NonFinite);
        }
        let p0 = self.points[0];
        let (mut lo, mut hi) = (p0, p0);
        for p in &self.control_points()[1..] {
            lo = Vec4::new(lo.x.min(p.x), lo.y.min(p.y), lo.z.min(p.z), lo.w.min(p.w));
            hi = Vec4::new(hi.x.max(p.x), hi.y.max(p.y), hi.z.max(p.z), hi.w.max(p.w));
        }
        let extent = hi - lo;
        if extent.x <= EPSILON
            && extent.y <= EPSILON
            && extent.z <= EPSILON
            && extent.w <= EPSILON
        {
            return Err(Rejection::ZeroLength);
        }
        Ok(())
    }
}

/// Why a segment was excluded from the frame.
///
/// Rejections are per-item classifications and never abort a frame.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    #[error("all control points coincide")]
    ZeroLength,
    #[error("non-finite coordinate or attribute")]
    NonFinite,
    #[error("control point at or behind the camera plane")]
    ClipDegenerate,
}

/// Number of segments rejected for each reason.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    pub zero_length: u32,
    pub non_finite: u32,
    pub clip_degenerate: u32,
}

impl RejectionCounts {
    pub fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::ZeroLength => self.zero_length += 1,
            Rejection::NonFinite => self.non_finite += 1,
            Rejection::ClipDegenerate => self.clip_degenerate += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.zero_length + self.non_finite + self.clip_degenerate
    }
}

impl std::ops::AddAssign for RejectionCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.zero_length += rhs.zero_length;
        self.non_finite += rhs.non_finite;
        self.clip_degenerate += rhs.clip_degenerate;
    }
}
