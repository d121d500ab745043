// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linebin stages a frame of stroked, possibly perspective-projected path segments for a
//! tile-binned line rasterizer.
//!
//! A frame flows through the following steps:
//!
//! - The host authors paths into a [`SceneEncoder`], which flattens them into build-ordered
//!   [`Segment`]s and rejects degenerate ones.
//! - [`Renderer::render_frame`] projects every segment with the frame's [`Camera`], builds
//!   its arc-length table and inflated bounding box, then records it into at most
//!   [`KMAX_PER_BIN`] slots of every [`BIN_SIZE`] pixel bin it may cover.
//! - The resulting [`Frame`] exposes the [`ScreenSegment`] records, their
//!   [`ArcLengthLut`]s and the per-bin reference lists in the layout the rasterizer reads,
//!   along with the per-sample evaluators it runs.
//!
//! Invalid input never fails a frame: each segment is classified as accepted or rejected
//! and the counts are reported in [`FrameStats`]. Bins that run out of room drop the excess
//! references and count them instead.
//!
//! ```
//! use linebin::{Camera, PathId, PathStyle, Renderer, RendererOptions, SceneEncoder};
//! use linebin::{Uniforms, VertexStyle};
//! use linebin::peniko::Color;
//!
//! let mut scene = SceneEncoder::new();
//! let style = VertexStyle::new(2.0, Color::rgba8(255, 255, 255, 255));
//! scene
//!     .path(PathId(0), PathStyle::default())
//!     .move_to([10.0, 10.0], style)
//!     .line_to([110.0, 10.0], style);
//!
//! let mut renderer = Renderer::new(RendererOptions::default())?;
//! let frame = renderer.render_frame(
//!     &Uniforms::new(256, 256),
//!     &Camera::screen_space(256, 256),
//!     &scene,
//! )?;
//! assert_eq!(frame.stats().refs, 1);
//! assert_eq!(frame.bin(0, 0), [0]);
//! # Ok::<(), linebin::Error>(())
//! ```

// LINEBENDER LINT SET - lib.rs - v2
// See https://linebender.org/wiki/canonical-lints/
// These lints aren't included in Cargo.toml because they
// shouldn't apply to examples and tests
#![warn(unused_crate_dependencies)]
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
// Feel free to send a PR that solves one or more of these.
#![allow(
    missing_debug_implementations,
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    reason = "Deferred"
)]

mod frame;

use std::collections::HashMap;
#[cfg(feature = "multithreading")]
use std::num::NonZeroUsize;

use linebin_cpu::{bin_segments, prepare_segment, BinArena, Prepared, TileRange, Vec2};
use thiserror::Error;

pub use frame::{Frame, FrameStats};

// Re-exports
pub use linebin_cpu::{
    apply_line_uniforms, blend_color, dash_visibility, sigmoid_weight, BinBuffers, BinGrid,
};
pub use linebin_encoding::{
    peniko, smooth, ArcLengthLut, Camera, DashError, DashPattern, DebugLayers, Degree,
    EncodeStats, LaneColors, LutSample, Mat4, PathBuilder, PathId, PathStyle, PremulColor,
    Rejection, RejectionCounts, SceneEncoder, ScreenSegment, Segment, Sigmoid, StageContract,
    Uniforms, Vec4, VertexStyle, ARC_LUT_SAMPLES, BIN_POW, BIN_SIZE, KMAX_PER_BIN,
    MAX_DASH_SEGMENTS, W_EPSILON,
};

/// Errors that can occur in Linebin.
///
/// Per-segment problems are never errors; see [`Rejection`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The rasterizer was built against different stage constants.
    #[error("stage contract mismatch in {}", .fields.join(", "))]
    ContractMismatch {
        /// Names of the [`StageContract`] fields that disagree.
        fields: Vec<&'static str>,
    },
    /// The viewport has no pixels.
    #[error("viewport {width}x{height} is empty")]
    EmptyViewport { width: i32, height: i32 },
    /// Failed to build the worker thread pool.
    #[cfg(feature = "multithreading")]
    #[error("couldn't build thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

/// How dash patterns measure arc length.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DashAccumulation {
    /// Every segment starts its dash pattern afresh.
    #[default]
    PerSegment,
    /// The pattern continues across the segments of a path, so
    /// [`ScreenSegment::dash_offset`] holds the screen length of the path's earlier segments.
    PerPath,
}

/// Options which are set at renderer creation time, used in [`Renderer::new`].
#[derive(Clone, Debug, Default)]
pub struct RendererOptions {
    pub dash_accumulation: DashAccumulation,

    /// The stage constants the consuming rasterizer was compiled with.
    pub contract: StageContract,

    /// How many threads to use for preparing and binning segments.
    ///
    /// Set to `None` to use rayon's global thread pool.
    #[cfg(feature = "multithreading")]
    pub num_threads: Option<NonZeroUsize>,
}

/// Turns encoded scenes into binned frames.
///
/// The bin storage and per-segment buffers are allocated for the first frame and reused
/// afterwards; only a viewport size change reallocates the bins.
pub struct Renderer {
    options: RendererOptions,
    arena: BinArena,
    segments: Vec<ScreenSegment>,
    luts: Vec<ArcLengthLut>,
    ranges: Vec<Option<TileRange>>,
    #[cfg(feature = "multithreading")]
    thread_pool: Option<rayon::ThreadPool>,
}

impl Renderer {
    /// Creates a new renderer, checking that the rasterizer agrees on the stage constants.
    pub fn new(options: RendererOptions) -> Result<Self> {
        let fields = StageContract::CURRENT.mismatches(&options.contract);
        if !fields.is_empty() {
            return Err(Error::ContractMismatch { fields });
        }
        #[cfg(feature = "multithreading")]
        let thread_pool = match options.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n.get())
                    .build()?,
            ),
            None => None,
        };
        Ok(Self {
            options,
            arena: BinArena::default(),
            segments: Vec::new(),
            luts: Vec::new(),
            ranges: Vec::new(),
            #[cfg(feature = "multithreading")]
            thread_pool,
        })
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Prepares and bins every segment of `scene` for one frame.
    ///
    /// Whatever the previous frame left behind is discarded first.
    pub fn render_frame(
        &mut self,
        uniforms: &Uniforms,
        camera: &Camera,
        scene: &SceneEncoder,
    ) -> Result<Frame<'_>> {
        let (width, height) = uniforms.viewport();
        if width == 0 || height == 0 {
            return Err(Error::EmptyViewport {
                width: uniforms.view_width,
                height: uniforms.view_height,
            });
        }
        self.arena.resize(width, height);
        self.segments.clear();
        self.luts.clear();
        self.ranges.clear();

        let view_projection = camera.view_projection();
        let prepared =
            self.run(|| prepare_all(scene.segments(), &view_projection, (width, height)));

        let mut stats = FrameStats {
            segments_in: scene.len() as u32,
            ..FrameStats::default()
        };
        let mut path_lengths: HashMap<PathId, f32> = HashMap::new();
        let grid = self.arena.grid();
        for (ix, result) in prepared.into_iter().enumerate() {
            let Prepared { mut record, lut } = match result {
                Ok(prepared) => prepared,
                Err(rejection) => {
                    log::debug!("segment {ix} rejected: {rejection}");
                    stats.rejected.record(rejection);
                    continue;
                }
            };
            if self.options.dash_accumulation == DashAccumulation::PerPath {
                let travelled = path_lengths.entry(record.path_id()).or_insert(0.0);
                record.dash_offset = *travelled;
                *travelled += record.seg_length;
            }
            let range = grid.tile_range(
                Vec2::from_array(record.bbox_min),
                Vec2::from_array(record.bbox_max),
            );
            self.segments.push(record);
            self.luts.push(lut);
            self.ranges.push(range);
        }
        stats.accepted = self.segments.len() as u32;

        let arena = &mut self.arena;
        let ranges = &self.ranges;
        #[cfg(feature = "multithreading")]
        let bins = match &self.thread_pool {
            Some(pool) => pool.install(|| bin_segments(arena, ranges)),
            None => bin_segments(arena, ranges),
        };
        #[cfg(not(feature = "multithreading"))]
        let bins = bin_segments(arena, ranges);
        stats.culled = bins.culled;
        stats.binned = bins.binned;
        stats.refs = bins.refs;
        stats.overflow = bins.overflow;
        log::trace!("frame {width}x{height}: {stats:?}");

        Ok(Frame::new(
            *uniforms,
            &self.segments,
            &self.luts,
            &self.arena,
            stats,
        ))
    }

    #[cfg(feature = "multithreading")]
    fn run<T: Send>(&self, f: impl FnOnce() -> T + Send) -> T {
        match &self.thread_pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }

    #[cfg(not(feature = "multithreading"))]
    fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        f()
    }
}

fn prepare_all(
    segments: &[Segment],
    view_projection: &Mat4,
    viewport: (u32, u32),
) -> Vec<Result<Prepared, Rejection>> {
    #[cfg(feature = "multithreading")]
    {
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

        segments
            .par_iter()
            .map(|segment| prepare_segment(segment, view_projection, viewport))
            .collect()
    }
    #[cfg(not(feature = "multithreading"))]
    segments
        .iter()
        .map(|segment| prepare_segment(segment, view_projection, viewport))
        .collect()
}
