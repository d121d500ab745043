// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arc-length tables for projected segments.

use linebin_encoding::{ArcLengthLut, Degree, ARC_LUT_SAMPLES};

use crate::util::{eval_bezier, eval_bezier_deriv, Vec2};

/// Builds the arc-length table of a projected segment.
///
/// Curves are sampled at `t_i = i / (ARC_LUT_SAMPLES - 1)` in screen space, so the lengths
/// include perspective foreshortening. Lines only need their two endpoints.
pub fn build_lut(degree: Degree, screen: &[Vec2; 4]) -> ArcLengthLut {
    let n = if degree.is_curve() { ARC_LUT_SAMPLES } else { 2 };
    let chord = (screen[degree as usize] - screen[0])
        .try_normalize()
        .unwrap_or(Vec2::new(1.0, 0.0));
    let mut lut = ArcLengthLut {
        count: n as u32,
        ..ArcLengthLut::default()
    };
    let step = 1.0 / (n - 1) as f32;
    let mut prev = screen[0];
    let mut total = 0.0;
    for i in 0..n {
        let t = if i == n - 1 { 1.0 } else { i as f32 * step };
        let p = eval_bezier(degree, screen, t);
        if i > 0 {
            total += p.distance(prev);
        }
        let tangent = eval_bezier_deriv(degree, screen, t)
            .try_normalize()
            .or_else(|| (p - prev).try_normalize())
            .unwrap_or(chord);
        lut.lengths[i] = total;
        lut.positions[i] = p.to_array();
        lut.tangents[i] = tangent.to_array();
        prev = p;
    }
    lut.total_length = total;
    lut
}
