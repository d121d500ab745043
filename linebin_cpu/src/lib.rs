// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CPU implementations of the Linebin stages.
//!
//! Each module is one stage of the pipeline that runs between scene encoding and
//! rasterization:
//!
//! - [`project_segment`] maps world-space control points to pixels.
//! - [`build_lut`] samples cumulative arc length along the projected curve.
//! - [`segment_bbox`] and [`BinGrid`] find the tiles a segment may cover.
//! - [`BinArena`] stores at most [`KMAX_PER_BIN`](linebin_encoding::KMAX_PER_BIN) segment
//!   references per tile, counting the ones it drops.
//! - [`dash_visibility`] and [`blend_color`] are the per-sample evaluators the rasterizer
//!   runs for every covered pixel.

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
#![allow(missing_docs, reason = "We have many as-yet undocumented items.")]
#![allow(
    missing_debug_implementations,
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    clippy::missing_panics_doc,
    reason = "Deferred"
)]
// Allow un-idiomatic Rust to more closely match shaders
#![allow(
    clippy::needless_range_loop,
    reason = "Keeps code easily comparable to GPU shaders"
)]

mod bbox;
mod binning;
mod blend;
mod dash;
mod lut;
mod prepare;
mod transform;
mod util;

pub use bbox::{segment_bbox, BinGrid, TileRange};
pub use binning::{bin_segments, BinArena, BinBuffers, BinOutcome, BinStats};
pub use blend::{apply_line_uniforms, blend_color, sigmoid_weight};
pub use dash::dash_visibility;
pub use lut::build_lut;
pub use prepare::{prepare_segment, Prepared};
pub use transform::{project_segment, Projected};
pub use util::Vec2;

pub use linebin_encoding::Rejection;
