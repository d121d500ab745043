// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-segment preparation: everything that happens to one segment before binning.

use linebin_encoding::{ArcLengthLut, Mat4, Rejection, ScreenSegment, Segment};

use crate::bbox::segment_bbox;
use crate::lut::build_lut;
use crate::transform::project_segment;

/// A segment ready for binning and rasterization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Prepared {
    pub record: ScreenSegment,
    pub lut: ArcLengthLut,
}

/// Validates, projects and measures one segment.
///
/// The bounding box is inflated by the larger end half-width, the anti-alias ramp and the
/// larger edge offset, so it covers every pixel the rasterizer may touch for the segment.
pub fn prepare_segment(
    segment: &Segment,
    view_projection: &Mat4,
    viewport: (u32, u32),
) -> Result<Prepared, Rejection> {
    segment.validate()?;
    let projected = project_segment(segment, view_projection, viewport)?;
    let degree = segment.degree;
    let lut = build_lut(degree, &projected.screen);
    if !lut.total_length.is_finite() {
        return Err(Rejection::NonFinite);
    }

    let margin = segment.max_half_width().max(0.0)
        + segment.anti_alias_px.max(0.0)
        + segment.start.max_offset().max(segment.end.max_offset());
    let (bbox_min, bbox_max) = segment_bbox(&projected.screen[..degree.n_points()], margin);

    let record = ScreenSegment {
        p_screen: projected.screen.map(|p| p.to_array()),
        bbox_min: bbox_min.to_array(),
        bbox_max: bbox_max.to_array(),
        degree: degree as u32,
        path_id: segment.path_id.0,
        seg_index: segment.seg_index,
        total_segs: segment.total_segs,
        half_width_start: segment.start.half_width,
        half_width_end: segment.end.half_width,
        anti_alias_px: segment.anti_alias_px,
        noise_floor: segment.noise_floor,
        z_clip: projected.z_clip,
        w_clip: projected.w_clip,
        inv_w: projected.inv_w,
        depth_over_w: projected.depth_over_w,
        colors_start: segment.start.colors,
        colors_end: segment.end.colors,
        sigmoid_start: segment.start.sigmoid,
        sigmoid_end: segment.end.sigmoid,
        offsets_start: [segment.start.offset_left, segment.start.offset_right],
        offsets_end: [segment.end.offset_left, segment.end.offset_right],
        dash: segment.dash,
        dash_offset: 0.0,
        seg_length: lut.total_length,
    };
    Ok(Prepared { record, lut })
}

#[cfg(test)]
mod tests {
    use super::prepare_segment;
    use linebin_encoding::{Camera, PathId, Rejection, Segment, Vec4, VertexStyle};

    #[test]
    fn line_record() {
        let camera = Camera::screen_space(512, 512);
        let style = VertexStyle::new(2.0, peniko_red()).with_offsets([0.0, -1.0], [0.0, 1.5]);
        let mut seg = Segment::new(
            PathId(9),
            &[Vec4::point(20.0, 30.0, 0.0), Vec4::point(120.0, 30.0, 0.0)],
            style,
            VertexStyle::new(1.0, peniko_red()),
        );
        seg.anti_alias_px = 1.0;
        let prepared = prepare_segment(&seg, &camera.view_projection(), (512, 512)).unwrap();
        let record = prepared.record;
        assert_eq!(record.path_id, 9);
        assert_eq!(record.degree, 1);
        assert!((record.seg_length - 100.0).abs() < 1e-3);
        assert_eq!(prepared.lut.len(), 2);
        // Half-width 2, anti-alias 1 and offset 1.5.
        assert!((record.bbox_min[0] - 15.5).abs() < 1e-3);
        assert!((record.bbox_max[1] - 34.5).abs() < 1e-3);
        assert_eq!(record.half_width_end, 1.0);
        assert_eq!(record.offsets_start[1], [0.0, 1.5]);
    }

    #[test]
    fn rejections_are_classified() {
        let vp = Camera::screen_space(64, 64).view_projection();
        let style = VertexStyle::default();
        let p = Vec4::point(1.0, 1.0, 0.0);
        let zero = Segment::new(PathId(0), &[p, p], style, style);
        assert_eq!(prepare_segment(&zero, &vp, (64, 64)), Err(Rejection::ZeroLength));
        let behind = Segment::new(PathId(0), &[p, Vec4::new(2.0, 2.0, 0.0, 0.0)], style, style);
        assert_eq!(
            prepare_segment(&behind, &vp, (64, 64)),
            Err(Rejection::ClipDegenerate)
        );
    }

    fn peniko_red() -> linebin_encoding::peniko::Color {
        linebin_encoding::peniko::Color::rgba8(255, 0, 0, 255)
    }
}
