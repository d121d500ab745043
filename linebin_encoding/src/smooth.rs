// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smoothing of sampled polylines into cubic Bézier chains.

use crate::Vec4;

/// Converts a sampled polyline into a chain of cubic Béziers passing through a simplified
/// subset of its points.
///
/// The polyline is first simplified with Douglas-Peucker using `tolerance`, then each span
/// of the simplified polyline becomes the cubic equivalent of a uniform Catmull-Rom segment,
/// with the end points duplicated as phantom neighbors. Two points produce a single straight
/// cubic. Fewer than two points produce nothing.
pub fn smooth_polyline(points: &[[f32; 3]], tolerance: f32) -> Vec<[Vec4; 4]> {
    if points.len() < 2 {
        return Vec::new();
    }
    let simplified = douglas_peucker(points, tolerance);
    if simplified.len() == 2 {
        let (p0, p1) = (simplified[0], simplified[1]);
        let d = sub(p1, p0);
        let c1 = add(p0, scale(d, 1.0 / 3.0));
        let c2 = add(p0, scale(d, 2.0 / 3.0));
        return vec![[p0.into(), c1.into(), c2.into(), p1.into()]];
    }
    let n = simplified.len();
    let at = |i: isize| simplified[i.clamp(0, n as isize - 1) as usize];
    (0..n as isize - 1)
        .map(|i| -> [Vec4; 4] {
            let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
            let b1 = add(p1, scale(sub(p2, p0), 1.0 / 6.0));
            let b2 = sub(p2, scale(sub(p3, p1), 1.0 / 6.0));
            [p1.into(), b1.into(), b2.into(), p2.into()]
        })
        .collect()
}

fn douglas_peucker(points: &[[f32; 3]], epsilon: f32) -> Vec<[f32; 3]> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let first = points[0];
    let last = points[points.len() - 1];
    let mut max_dist = 0.0;
    let mut index = 0;
    for (i, &p) in points.iter().enumerate().take(points.len() - 1).skip(1) {
        let d = distance_to_segment(p, first, last);
        if d > max_dist {
            max_dist = d;
            index = i;
        }
    }
    if max_dist > epsilon {
        let mut left = douglas_peucker(&points[..=index], epsilon);
        let right = douglas_peucker(&points[index..], epsilon);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

fn distance_to_segment(p: [f32; 3], a: [f32; 3], b: [f32; 3]) -> f32 {
    let v = sub(b, a);
    let w = sub(p, a);
    let c1 = dot(w, v);
    if c1 <= 0.0 {
        return length(w);
    }
    let c2 = dot(v, v);
    if c2 <= c1 {
        return length(sub(p, b));
    }
    length(sub(p, add(a, scale(v, c1 / c2))))
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: [f32; 3], s: f32) -> [f32; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn length(a: [f32; 3]) -> f32 {
    dot(a, a).sqrt()
}
