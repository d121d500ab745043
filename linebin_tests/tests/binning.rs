// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bin assignment of rendered frames.

use std::num::NonZeroUsize;

use linebin::{PathId, PathStyle, RendererOptions, SceneEncoder, KMAX_PER_BIN};
use linebin_tests::{render, white, Lcg, TestParams};

#[test]
fn single_line_lands_in_one_bin() {
    let mut scene = SceneEncoder::new();
    scene
        .path(PathId(0), PathStyle::default().with_anti_alias(1.0))
        .move_to([10.0, 60.0], white(2.0))
        .line_to([110.0, 60.0], white(2.0));
    let snapshot = render(&scene, &TestParams::new(512, 512)).unwrap();

    assert_eq!(snapshot.stats.refs, 1);
    assert_eq!(snapshot.occupied_bins(), [(0, 0)]);
    assert_eq!(snapshot.bin(0, 0), [0]);
    let record = &snapshot.segments[0];
    let expect_min = [7.0, 57.0];
    let expect_max = [113.0, 63.0];
    for i in 0..2 {
        assert!((record.bbox_min[i] - expect_min[i]).abs() < 1e-3);
        assert!((record.bbox_max[i] - expect_max[i]).abs() < 1e-3);
    }
}

#[test]
fn cubic_bulge_reaches_every_touched_bin() {
    // Endpoints sit in bins (0, 0) and (1, 0); the control points pull the curve about
    // 50 pixels below the endpoint box, into the second row of bins.
    let mut scene = SceneEncoder::new();
    scene
        .path(PathId(0), PathStyle::default())
        .move_to([40.0, 100.0], white(1.0))
        .cubic_to([60.0, 167.0], [200.0, 167.0], [220.0, 100.0], white(1.0));
    let snapshot = render(&scene, &TestParams::new(512, 512)).unwrap();

    let record = &snapshot.segments[0];
    let lowest = (0..=100)
        .map(|i| linebin_tests::point_on(record, i as f32 / 100.0)[1])
        .fold(f32::MIN, f32::max);
    assert!(lowest > 140.0, "{lowest}");
    assert_eq!(snapshot.occupied_bins(), [(0, 0), (1, 0), (0, 1), (1, 1)]);
}

#[test]
fn full_bin_keeps_build_order_and_counts_overflow() {
    let mut scene = SceneEncoder::new();
    for i in 0..20 {
        let y = 10.0 + i as f32 * 5.0;
        scene
            .path(PathId(i), PathStyle::default())
            .move_to([10.0, y], white(1.0))
            .line_to([100.0, y], white(1.0));
    }
    let snapshot = render(&scene, &TestParams::new(128, 128)).unwrap();

    let kept: Vec<u32> = (0..KMAX_PER_BIN).collect();
    assert_eq!(snapshot.bin(0, 0), kept);
    assert_eq!(snapshot.stats.overflow, 4);
    assert_eq!(snapshot.stats.refs, KMAX_PER_BIN);
    assert_eq!(snapshot.stats.binned, 20);
}

#[test]
fn dense_bins_stay_within_capacity() {
    let mut rng = Lcg::new(7);
    let mut scene = SceneEncoder::new();
    for i in 0..10 * KMAX_PER_BIN * 4 {
        let mut path = scene.path(PathId(i), PathStyle::default());
        path.move_to([rng.range(0.0, 256.0), rng.range(0.0, 256.0)], white(1.5));
        path.quad_to(
            [rng.range(0.0, 256.0), rng.range(0.0, 256.0)],
            [rng.range(0.0, 256.0), rng.range(0.0, 256.0)],
            white(1.5),
        );
    }
    let snapshot = render(&scene, &TestParams::new(256, 256)).unwrap();

    let mut stored = 0;
    for (i, &count) in snapshot.bins.counts.iter().enumerate() {
        assert!(count <= KMAX_PER_BIN);
        let refs = snapshot.bins.bin(i);
        assert!(refs.windows(2).all(|w| w[0] < w[1]), "bin {i} out of order");
        stored += count;
    }
    assert_eq!(stored, snapshot.stats.refs);
    assert!(snapshot.stats.overflow > 0);
}

#[test]
fn binning_is_deterministic_across_thread_counts() {
    let mut rng = Lcg::new(42);
    let mut scene = SceneEncoder::new();
    for i in 0..400 {
        scene
            .path(PathId(i), PathStyle::default())
            .move_to([rng.range(-50.0, 700.0), rng.range(-50.0, 500.0)], white(2.0))
            .line_to([rng.range(-50.0, 700.0), rng.range(-50.0, 500.0)], white(3.0));
    }
    let single = TestParams {
        options: RendererOptions {
            num_threads: NonZeroUsize::new(1),
            ..RendererOptions::default()
        },
        ..TestParams::new(640, 480)
    };
    let many = TestParams {
        options: RendererOptions {
            num_threads: NonZeroUsize::new(4),
            ..RendererOptions::default()
        },
        ..TestParams::new(640, 480)
    };

    let a = render(&scene, &single).unwrap();
    let b = render(&scene, &single).unwrap();
    let c = render(&scene, &many).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn offscreen_segments_are_culled() {
    let mut scene = SceneEncoder::new();
    scene
        .path(PathId(0), PathStyle::default())
        .move_to([-300.0, -300.0], white(1.0))
        .line_to([-200.0, -250.0], white(1.0))
        .line_to([50.0, 50.0], white(1.0));
    let snapshot = render(&scene, &TestParams::new(256, 256)).unwrap();

    assert_eq!(snapshot.stats.accepted, 2);
    assert_eq!(snapshot.stats.culled, 1);
    assert_eq!(snapshot.stats.binned, 1);
    assert_eq!(snapshot.bin(0, 0), [1]);
}
