// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use smallvec::SmallVec;

use crate::smooth::smooth_polyline;
use crate::{DashPattern, PathId, Rejection, RejectionCounts, Segment, Vec4, VertexStyle};

/// Attributes shared by every segment of a path.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PathStyle {
    /// Width of the anti-alias ramp, in pixels.
    pub anti_alias_px: f32,
    pub noise_floor: f32,
    pub dash: DashPattern,
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            anti_alias_px: 0.7,
            noise_floor: 1.0,
            dash: DashPattern::SOLID,
        }
    }
}

impl PathStyle {
    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = dash;
        self
    }

    pub fn with_anti_alias(mut self, anti_alias_px: f32) -> Self {
        self.anti_alias_px = anti_alias_px;
        self
    }
}

/// Counters describing the last encoded frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodeStats {
    pub paths: u32,
    /// Accepted segments.
    pub segments: u32,
    pub rejected: RejectionCounts,
}

/// Flat, build-ordered list of the segments authored for one frame.
#[derive(Clone, Debug, Default)]
pub struct SceneEncoder {
    segments: Vec<Segment>,
    stats: EncodeStats,
}

impl SceneEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the encoding for the next frame, keeping the allocation.
    pub fn reset(&mut self) {
        self.segments.clear();
        self.stats = EncodeStats::default();
    }

    /// Starts encoding a path. Segments are appended to the scene in command order.
    pub fn path(&mut self, path_id: PathId, style: PathStyle) -> PathBuilder<'_> {
        self.stats.paths += 1;
        let first_index = self.segments.len();
        PathBuilder {
            segments: &mut self.segments,
            stats: &mut self.stats,
            path_id,
            style,
            first: None,
            current: None,
            first_index,
            finished: false,
        }
    }

    /// Appends a prebuilt segment after validating it.
    pub fn push_segment(&mut self, segment: Segment) -> Result<(), Rejection> {
        match segment.validate() {
            Ok(()) => {
                self.segments.push(segment);
                self.stats.segments += 1;
                Ok(())
            }
            Err(rejection) => {
                self.stats.rejected.record(rejection);
                log::debug!("rejected segment of path {:?}: {rejection}", segment.path_id);
                Err(rejection)
            }
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn stats(&self) -> EncodeStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Encodes the commands of a single path.
///
/// Each point-producing command carries the style of the vertex it ends on. Malformed
/// segments are skipped and counted; they never abort the path.
pub struct PathBuilder<'a> {
    segments: &'a mut Vec<Segment>,
    stats: &'a mut EncodeStats,
    path_id: PathId,
    style: PathStyle,
    first: Option<(Vec4, VertexStyle)>,
    current: Option<(Vec4, VertexStyle)>,
    first_index: usize,
    finished: bool,
}

impl PathBuilder<'_> {
    /// Starts a new subpath.
    pub fn move_to(&mut self, p: impl Into<Vec4>, style: VertexStyle) -> &mut Self {
        let vertex = (p.into(), style);
        self.first = Some(vertex);
        self.current = Some(vertex);
        self
    }

    /// Encodes a line.
    pub fn line_to(&mut self, p: impl Into<Vec4>, style: VertexStyle) -> &mut Self {
        self.push(&[], p.into(), style);
        self
    }

    /// Encodes a quadratic Bézier.
    pub fn quad_to(
        &mut self,
        c: impl Into<Vec4>,
        p: impl Into<Vec4>,
        style: VertexStyle,
    ) -> &mut Self {
        self.push(&[c.into()], p.into(), style);
        self
    }

    /// Encodes a cubic Bézier.
    pub fn cubic_to(
        &mut self,
        c1: impl Into<Vec4>,
        c2: impl Into<Vec4>,
        p: impl Into<Vec4>,
        style: VertexStyle,
    ) -> &mut Self {
        self.push(&[c1.into(), c2.into()], p.into(), style);
        self
    }

    /// Closes the current subpath with a line back to its start.
    pub fn close(&mut self) -> &mut Self {
        if let (Some(first), Some(current)) = (self.first, self.current) {
            if first.0 != current.0 {
                self.push(&[], first.0, first.1);
            }
            self.current = Some(first);
        }
        self
    }

    /// Appends a smooth cubic chain through `points`.
    ///
    /// The polyline is simplified to within `tolerance` first. See [`smooth_polyline`].
    pub fn smooth_through(
        &mut self,
        points: &[[f32; 3]],
        tolerance: f32,
        style: VertexStyle,
    ) -> &mut Self {
        let cubics = smooth_polyline(points, tolerance);
        let Some(first) = cubics.first() else {
            return self;
        };
        match self.current {
            Some((p, _)) if p == first[0] => {}
            Some(_) => {
                self.line_to(first[0], style);
            }
            None => {
                self.move_to(first[0], style);
            }
        }
        for c in &cubics {
            self.cubic_to(c[1], c[2], c[3], style);
        }
        self
    }

    /// Completes the path, assigning each accepted segment its index within the path.
    ///
    /// Returns the number of accepted segments. Dropping the builder has the same effect.
    pub fn finish(mut self) -> usize {
        self.finish_inner()
    }

    fn finish_inner(&mut self) -> usize {
        self.finished = true;
        let segments = &mut self.segments[self.first_index..];
        let total = u16::try_from(segments.len()).unwrap_or_else(|_| {
            log::warn!(
                "path {:?} has {} segments, indices saturate at {}",
                self.path_id,
                segments.len(),
                u16::MAX
            );
            u16::MAX
        });
        for (i, segment) in segments.iter_mut().enumerate() {
            segment.seg_index = i.min(u16::MAX as usize) as u16;
            segment.total_segs = total;
        }
        segments.len()
    }

    fn push(&mut self, ctrl: &[Vec4], end: Vec4, style: VertexStyle) {
        let Some((start, start_style)) = self.current else {
            // An initial line, quad or curve acts as a move.
            self.move_to(end, style);
            return;
        };
        let mut points: SmallVec<[Vec4; 4]> = SmallVec::new();
        points.push(start);
        points.extend_from_slice(ctrl);
        points.push(end);
        let mut segment = Segment::new(self.path_id, &points, start_style, style);
        segment.anti_alias_px = self.style.anti_alias_px;
        segment.noise_floor = self.style.noise_floor;
        segment.dash = self.style.dash;
        match segment.validate() {
            Ok(()) => {
                self.segments.push(segment);
                self.stats.segments += 1;
            }
            Err(rejection) => {
                self.stats.rejected.record(rejection);
                log::debug!("rejected segment of path {:?}: {rejection}", self.path_id);
            }
        }
        if end.is_finite() {
            self.current = Some((end, style));
        }
    }
}

impl Drop for PathBuilder<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.finish_inner();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PathStyle, SceneEncoder};
    use crate::{DashPattern, Degree, PathId, Vec4, VertexStyle};

    #[test]
    fn commands_become_segments_in_order() {
        let mut encoder = SceneEncoder::new();
        let style = VertexStyle::default();
        let mut path = encoder.path(PathId(7), PathStyle::default());
        path.move_to([0.0, 0.0], style)
            .line_to([10.0, 0.0], style)
            .quad_to([15.0, 5.0], [10.0, 10.0], style)
            .cubic_to([5.0, 15.0], [0.0, 15.0], [0.0, 10.0], style)
            .close();
        assert_eq!(path.finish(), 4);

        let segments = encoder.segments();
        let degrees: Vec<_> = segments.iter().map(|s| s.degree).collect();
        assert_eq!(
            degrees,
            [Degree::Linear, Degree::Quadratic, Degree::Cubic, Degree::Linear]
        );
        assert!(segments.iter().all(|s| s.path_id == PathId(7) && s.total_segs == 4));
        assert_eq!(segments[3].seg_index, 3);
        assert_eq!(segments[3].end_point(), Vec4::point(0.0, 0.0, 0.0));
        assert_eq!(segments[1].start_point(), segments[0].end_point());
    }

    #[test]
    fn malformed_segments_are_skipped() {
        let mut encoder = SceneEncoder::new();
        let style = VertexStyle::default();
        {
            let mut path = encoder.path(PathId(1), PathStyle::default());
            path.move_to([1.0, 1.0], style)
                .line_to([1.0, 1.0], style)
                .line_to([f32::NAN, 1.0], style)
                .line_to([5.0, 1.0], style);
        }
        let stats = encoder.stats();
        assert_eq!(stats.segments, 1);
        assert_eq!(stats.rejected.zero_length, 1);
        assert_eq!(stats.rejected.non_finite, 1);
        assert_eq!(encoder.segments()[0].start_point(), Vec4::point(1.0, 1.0, 0.0));
        assert_eq!(encoder.segments()[0].total_segs, 1);
    }

    #[test]
    fn path_attributes_reach_segments() {
        let dash = DashPattern::new(&[6.0, 2.0], 1.0).unwrap();
        let mut encoder = SceneEncoder::new();
        let start = VertexStyle::default();
        let end = VertexStyle {
            half_width: 3.0,
            ..VertexStyle::default()
        };
        encoder
            .path(PathId(2), PathStyle::default().with_dash(dash).with_anti_alias(1.5))
            .move_to([0.0, 0.0], start)
            .line_to([0.0, 30.0], end);
        let seg = encoder.segments()[0];
        assert_eq!(seg.dash, dash);
        assert_eq!(seg.anti_alias_px, 1.5);
        assert_eq!(seg.start.half_width, 0.6);
        assert_eq!(seg.end.half_width, 3.0);
    }

    #[test]
    fn smooth_through_appends_cubics() {
        let mut encoder = SceneEncoder::new();
        let points = [[0.0, 0.0, 0.0], [50.0, 40.0, 0.0], [100.0, 0.0, 0.0]];
        encoder
            .path(PathId(4), PathStyle::default())
            .smooth_through(&points, 0.5, VertexStyle::default());
        let segments = encoder.segments();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.degree == Degree::Cubic));
        assert_eq!(segments[1].end_point(), Vec4::point(100.0, 0.0, 0.0));
    }

    #[test]
    fn reset_clears_the_frame() {
        let mut encoder = SceneEncoder::new();
        encoder
            .path(PathId(0), PathStyle::default())
            .move_to([0.0, 0.0], VertexStyle::default())
            .line_to([1.0, 0.0], VertexStyle::default());
        assert_eq!(encoder.len(), 1);
        encoder.reset();
        assert!(encoder.is_empty());
        assert_eq!(encoder.stats().paths, 0);
    }
}
