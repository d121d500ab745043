// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linebin tests.

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
// Feel free to send a PR that solves one or more of these.
#![allow(
    missing_debug_implementations,
    unreachable_pub,
    missing_docs,
    clippy::missing_assert_message,
    clippy::allow_attributes_without_reason
)]

use anyhow::Result;
use linebin::peniko::Color;
use linebin::{
    ArcLengthLut, BinBuffers, Camera, FrameStats, Renderer, RendererOptions, SceneEncoder,
    ScreenSegment, Uniforms, VertexStyle,
};

pub struct TestParams {
    pub width: u32,
    pub height: u32,
    /// Defaults to a camera mapping world units onto pixels.
    pub camera: Option<Camera>,
    pub options: RendererOptions,
}

impl TestParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            camera: None,
            options: RendererOptions::default(),
        }
    }
}

/// An owned copy of everything a frame exposes.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub stats: FrameStats,
    pub segments: Vec<ScreenSegment>,
    pub luts: Vec<ArcLengthLut>,
    pub bins: BinBuffers,
}

impl Snapshot {
    pub fn bin(&self, x: u32, y: u32) -> &[u32] {
        self.bins.bin(self.bins.grid.bin_index(x, y))
    }

    /// Coordinates of every bin holding at least one reference.
    pub fn occupied_bins(&self) -> Vec<(u32, u32)> {
        let grid = self.bins.grid;
        (0..grid.height_in_bins)
            .flat_map(|y| (0..grid.width_in_bins).map(move |x| (x, y)))
            .filter(|&(x, y)| !self.bin(x, y).is_empty())
            .collect()
    }
}

/// Renders one frame with a fresh renderer.
pub fn render(scene: &SceneEncoder, params: &TestParams) -> Result<Snapshot> {
    let mut renderer = Renderer::new(params.options.clone())?;
    let camera = params
        .camera
        .unwrap_or_else(|| Camera::screen_space(params.width, params.height));
    let frame = renderer.render_frame(
        &Uniforms::new(params.width, params.height),
        &camera,
        scene,
    )?;
    Ok(Snapshot {
        stats: frame.stats(),
        segments: frame.segments().to_vec(),
        luts: frame.luts().to_vec(),
        bins: frame.bin_buffers(),
    })
}

/// An opaque white vertex of the given half-width.
pub fn white(half_width: f32) -> VertexStyle {
    VertexStyle::new(half_width, Color::rgba8(255, 255, 255, 255))
}

/// Evaluates the projected curve of a segment at `t` by de Casteljau subdivision.
pub fn point_on(segment: &ScreenSegment, t: f32) -> [f32; 2] {
    let mut pts: Vec<[f32; 2]> = segment.control_points().to_vec();
    while pts.len() > 1 {
        pts = pts
            .windows(2)
            .map(|w| {
                [
                    w[0][0] + (w[1][0] - w[0][0]) * t,
                    w[0][1] + (w[1][1] - w[0][1]) * t,
                ]
            })
            .collect();
    }
    pts[0]
}

/// A small deterministic generator for scattering test geometry.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 40) as f32 / (1u64 << 24) as f32
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }
}
