// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use linebin_encoding::{DashPattern, MAX_DASH_SEGMENTS};

/// Visibility of the stroke at arc length `s` along a dashed segment.
///
/// The pattern is shifted by its phase and wrapped at its total length. The weight ramps
/// linearly over `anti_alias_px` centered on each dash edge: `0.5 + d / aa`, clamped to
/// `[0, 1]`, where `d` is the distance to the nearest edge, negative inside a gap. Edges are
/// measured cyclically so the wrap point is as smooth as any other edge. Zero-length entries
/// do not create edges.
pub fn dash_visibility(pattern: &DashPattern, s: f32, anti_alias_px: f32) -> f32 {
    if pattern.is_solid() {
        return 1.0;
    }
    let entries = pattern.entries();
    let total = pattern.total;
    let mut pos = (s + pattern.phase).rem_euclid(total);
    if !(pos < total) {
        pos = 0.0;
    }

    // The dash state in effect just before the start of the pattern.
    let mut prev_on = match entries.iter().rposition(|&len| len > 0.0) {
        Some(k) => k % 2 == 0,
        None => return 1.0,
    };
    let mut edges = [0.0; MAX_DASH_SEGMENTS];
    let mut n_edges = 0;
    let mut on = prev_on;
    let mut start = 0.0;
    for (k, &len) in entries.iter().enumerate() {
        if len <= 0.0 {
            continue;
        }
        let is_on = k % 2 == 0;
        if is_on != prev_on {
            edges[n_edges] = start;
            n_edges += 1;
            prev_on = is_on;
        }
        if pos >= start && pos < start + len {
            on = is_on;
        }
        start += len;
    }
    if n_edges == 0 || anti_alias_px <= 0.0 {
        return if on { 1.0 } else { 0.0 };
    }
    let d = edges[..n_edges]
        .iter()
        .map(|&edge| {
            let d = (pos - edge).abs();
            d.min(total - d)
        })
        .fold(f32::INFINITY, f32::min);
    let signed = if on { d } else { -d };
    (0.5 + signed / anti_alias_px).clamp(0.0, 1.0)
}
