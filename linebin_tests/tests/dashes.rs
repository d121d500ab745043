// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dash visibility as seen through rendered frames.

use linebin::{dash_visibility, DashAccumulation, DashPattern, PathId, PathStyle, RendererOptions};
use linebin::SceneEncoder;
use linebin_tests::{render, white, TestParams};

#[test]
fn visibility_is_periodic() {
    let pattern = DashPattern::new(&[6.0, 3.0, 1.0, 3.0], 2.0).unwrap();
    for i in 0..500 {
        let s = i as f32 * 0.113;
        let a = dash_visibility(&pattern, s, 0.75);
        let b = dash_visibility(&pattern, s + pattern.total, 0.75);
        let c = dash_visibility(&pattern, s + 3.0 * pattern.total, 0.75);
        assert!((a - b).abs() < 1e-3 && (a - c).abs() < 1e-3, "s = {s}");
    }
}

#[test]
fn visibility_has_no_jumps_at_edges() {
    let aa = 0.5;
    let pattern = DashPattern::new(&[4.0, 2.0, 0.5, 1.5], 0.0).unwrap();
    // Slope is bounded by 1 / aa, so a small step can only move the weight a little.
    let step = 0.01;
    let mut prev = dash_visibility(&pattern, -1.0, aa);
    let mut s = -1.0 + step;
    while s < 2.0 * pattern.total {
        let v = dash_visibility(&pattern, s, aa);
        assert!((v - prev).abs() <= step / aa + 1e-3, "jump at s = {s}: {prev} -> {v}");
        assert!((0.0..=1.0).contains(&v));
        prev = v;
        s += step;
    }
}

#[test]
fn per_path_accumulation_continues_the_pattern() {
    // Two 7px segments with a 5px on, 5px off pattern. Continuing across the join, the
    // second segment starts 2px into the gap.
    let dash = DashPattern::new(&[5.0, 5.0], 0.0).unwrap();
    let mut scene = SceneEncoder::new();
    scene
        .path(PathId(0), PathStyle::default().with_dash(dash).with_anti_alias(0.5))
        .move_to([10.0, 10.0], white(1.0))
        .line_to([17.0, 10.0], white(1.0))
        .line_to([24.0, 10.0], white(1.0));

    let params = TestParams {
        options: RendererOptions {
            dash_accumulation: DashAccumulation::PerPath,
            ..RendererOptions::default()
        },
        ..TestParams::new(64, 64)
    };
    let snapshot = render(&scene, &params).unwrap();
    let second = &snapshot.segments[1];
    assert!((second.dash_offset - 7.0).abs() < 1e-3);
    let at_join = dash_visibility(&second.dash, second.dash_offset, second.anti_alias_px);
    assert_eq!(at_join, 0.0);

    let restarted = render(&scene, &TestParams::new(64, 64)).unwrap();
    let second = &restarted.segments[1];
    assert_eq!(second.dash_offset, 0.0);
    assert_eq!(dash_visibility(&second.dash, 1.0, second.anti_alias_px), 1.0);
}
