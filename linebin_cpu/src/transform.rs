// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Perspective projection of segment control points.

use linebin_encoding::{Mat4, Rejection, Segment, W_EPSILON};

use crate::util::Vec2;

/// Control points of a segment after projection. Entries past the segment's degree are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Projected {
    /// Pixel coordinates, y down.
    pub screen: [Vec2; 4],
    pub z_clip: [f32; 4],
    pub w_clip: [f32; 4],
    pub inv_w: [f32; 4],
    /// Normalized device depth divided by w.
    pub depth_over_w: [f32; 4],
}

/// Projects every control point of `segment` into a `width` x `height` viewport.
///
/// A control point with `w <= W_EPSILON` lies on or behind the camera plane and makes the
/// whole segment clip-degenerate.
pub fn project_segment(
    segment: &Segment,
    view_projection: &Mat4,
    (width, height): (u32, u32),
) -> Result<Projected, Rejection> {
    let mut out = Projected::default();
    let (width, height) = (width as f32, height as f32);
    for (i, p) in segment.control_points().iter().enumerate() {
        let clip = view_projection.transform(*p);
        if !clip.is_finite() {
            return Err(Rejection::NonFinite);
        }
        if clip.w <= W_EPSILON {
            return Err(Rejection::ClipDegenerate);
        }
        let inv_w = 1.0 / clip.w;
        let ndc_x = clip.x * inv_w;
        let ndc_y = clip.y * inv_w;
        let depth = clip.z * inv_w;
        let screen = Vec2::new(
            (ndc_x * 0.5 + 0.5) * width,
            (0.5 - ndc_y * 0.5) * height,
        );
        if !screen.is_finite() || !depth.is_finite() {
            return Err(Rejection::NonFinite);
        }
        out.screen[i] = screen;
        out.z_clip[i] = clip.z;
        out.w_clip[i] = clip.w;
        out.inv_w[i] = inv_w;
        out.depth_over_w[i] = depth * inv_w;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::project_segment;
    use crate::util::Vec2;
    use linebin_encoding::{Camera, PathId, Rejection, Segment, Vec4, VertexStyle};

    fn line(p0: Vec4, p1: Vec4) -> Segment {
        Segment::new(PathId(0), &[p0, p1], VertexStyle::default(), VertexStyle::default())
    }

    #[test]
    fn screen_space_camera_is_identity_on_pixels() {
        let camera = Camera::screen_space(320, 240);
        let seg = line(Vec4::point(10.0, 20.0, 0.0), Vec4::point(300.0, 200.0, 0.0));
        let projected = project_segment(&seg, &camera.view_projection(), (320, 240)).unwrap();
        assert!(projected.screen[0].distance(Vec2::new(10.0, 20.0)) < 1e-3);
        assert!(projected.screen[1].distance(Vec2::new(300.0, 200.0)) < 1e-3);
        assert_eq!(projected.w_clip[0], 1.0);
        assert_eq!(projected.inv_w[1], 1.0);
    }

    #[test]
    fn perspective_depth_and_foreshortening() {
        let camera = Camera::look_at([0.0, 0.0, 10.0], [0.0; 3], std::f32::consts::FRAC_PI_2, 1.0);
        let vp = camera.view_projection();
        let near = line(Vec4::point(-1.0, 0.0, 0.0), Vec4::point(1.0, 0.0, 0.0));
        let far = line(Vec4::point(-1.0, 0.0, -10.0), Vec4::point(1.0, 0.0, -10.0));
        let a = project_segment(&near, &vp, (200, 200)).unwrap();
        let b = project_segment(&far, &vp, (200, 200)).unwrap();
        let len_a = a.screen[0].distance(a.screen[1]);
        let len_b = b.screen[0].distance(b.screen[1]);
        assert!((len_a - 2.0 * len_b).abs() < 1e-2, "{len_a} vs {len_b}");
        assert!((a.w_clip[0] - 10.0).abs() < 1e-4);
        assert!((b.inv_w[0] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn points_behind_the_camera_are_clip_degenerate() {
        let camera = Camera::look_at([0.0, 0.0, 10.0], [0.0; 3], 1.0, 1.0);
        let seg = line(Vec4::point(0.0, 0.0, 0.0), Vec4::point(0.0, 0.0, 20.0));
        assert_eq!(
            project_segment(&seg, &camera.view_projection(), (100, 100)),
            Err(Rejection::ClipDegenerate)
        );
    }
}
