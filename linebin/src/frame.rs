// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use linebin_cpu::{
    apply_line_uniforms, blend_color, dash_visibility, BinArena, BinBuffers, BinGrid,
};
use linebin_encoding::{ArcLengthLut, PremulColor, RejectionCounts, ScreenSegment, Uniforms};

/// Counters describing one rendered frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Segments handed to the renderer.
    pub segments_in: u32,
    /// Segments that survived validation and projection.
    pub accepted: u32,
    pub rejected: RejectionCounts,
    /// Accepted segments whose bounding box misses the viewport.
    pub culled: u32,
    /// Accepted segments stored in at least one bin attempt.
    pub binned: u32,
    /// Segment references stored across all bins.
    pub refs: u32,
    /// Segment references dropped because their bin was full.
    pub overflow: u32,
}

/// The output of [`Renderer::render_frame`](crate::Renderer::render_frame).
///
/// Bin entries are indices into [`Frame::segments`] and [`Frame::luts`].
pub struct Frame<'a> {
    uniforms: Uniforms,
    segments: &'a [ScreenSegment],
    luts: &'a [ArcLengthLut],
    arena: &'a BinArena,
    stats: FrameStats,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(
        uniforms: Uniforms,
        segments: &'a [ScreenSegment],
        luts: &'a [ArcLengthLut],
        arena: &'a BinArena,
        stats: FrameStats,
    ) -> Self {
        Self {
            uniforms,
            segments,
            luts,
            arena,
            stats,
        }
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn segments(&self) -> &'a [ScreenSegment] {
        self.segments
    }

    pub fn luts(&self) -> &'a [ArcLengthLut] {
        self.luts
    }

    pub fn grid(&self) -> BinGrid {
        self.arena.grid()
    }

    /// Segment indices stored in the bin at `(x, y)`, in build order.
    ///
    /// # Panics
    ///
    /// Panics if the bin is outside the grid.
    pub fn bin(&self, x: u32, y: u32) -> Vec<u32> {
        let grid = self.grid();
        assert!(x < grid.width_in_bins && y < grid.height_in_bins);
        self.arena.bin(grid.bin_index(x, y))
    }

    /// Number of segments that tried to enter the bin at `(x, y)`, including dropped ones.
    pub fn bin_demand(&self, x: u32, y: u32) -> u32 {
        let grid = self.grid();
        self.arena.demand(grid.bin_index(x, y))
    }

    /// The bins in their upload layout.
    pub fn bin_buffers(&self) -> BinBuffers {
        self.arena.to_buffers()
    }

    pub fn segments_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.segments)
    }

    pub fn luts_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.luts)
    }

    pub fn uniforms_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.uniforms)
    }

    /// Evaluates the color of segment `index` at arc length `s` and across-width position
    /// `u`, the way the rasterizer does for a covered sample.
    ///
    /// Coverage of the stroke shape itself is not included.
    pub fn shade(&self, index: usize, s: f32, u: f32) -> Option<PremulColor> {
        let segment = self.segments.get(index)?;
        let lut = self.luts.get(index)?;
        let t = lut.param_at_length(s).t;
        let color = blend_color(segment, t, u);
        let visibility =
            dash_visibility(&segment.dash, s + segment.dash_offset, segment.anti_alias_px);
        Some(apply_line_uniforms(color, t, &self.uniforms).scale(visibility))
    }
}

#[cfg(test)]
mod tests {
    use crate::{Renderer, RendererOptions};
    use linebin_encoding::{
        Camera, DashPattern, PathId, PathStyle, PremulColor, SceneEncoder, Uniforms,
        VertexStyle,
    };

    #[test]
    fn shading_combines_gradient_and_dashes() {
        let mut scene = SceneEncoder::new();
        let red = VertexStyle::new(3.0, PremulColor([1.0, 0.0, 0.0, 1.0]));
        let blue = VertexStyle::new(3.0, PremulColor([0.0, 0.0, 1.0, 1.0]));
        let dash = DashPattern::new(&[10.0, 10.0], 0.0).unwrap();
        scene
            .path(PathId(1), PathStyle::default().with_dash(dash).with_anti_alias(1.0))
            .move_to([0.0, 20.0], red)
            .line_to([100.0, 20.0], blue);

        let mut renderer = Renderer::new(RendererOptions::default()).unwrap();
        let frame = renderer
            .render_frame(&Uniforms::new(128, 128), &Camera::screen_space(128, 128), &scene)
            .unwrap();
        let on = frame.shade(0, 5.0, 0.0).unwrap();
        assert!((on.0[0] - 0.95).abs() < 1e-3);
        assert!((on.0[2] - 0.05).abs() < 1e-3);
        assert_eq!(frame.shade(0, 15.0, 0.0).unwrap(), PremulColor::TRANSPARENT);
        assert_eq!(frame.shade(1, 0.0, 0.0), None);
        assert_eq!(
            frame.segments_bytes().len(),
            size_of::<linebin_encoding::ScreenSegment>()
        );
        assert_eq!(frame.uniforms_bytes().len(), 112);
    }
}
