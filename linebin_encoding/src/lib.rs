// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segment encoding for Linebin.
//!
//! This crate holds everything that crosses the boundary between the host, the CPU stages
//! and the rasterizer: the contract constants, frame [`Uniforms`], the world-space
//! [`Segment`] produced by the [`SceneEncoder`], and the GPU-layout records
//! [`ScreenSegment`] and [`ArcLengthLut`].

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
#![allow(missing_docs, reason = "We have many as-yet undocumented items.")]
#![allow(
    missing_debug_implementations,
    clippy::cast_possible_truncation,
    clippy::missing_assert_message,
    clippy::missing_panics_doc,
    clippy::exhaustive_enums,
    reason = "Deferred"
)]

mod color;
mod config;
mod dash;
pub mod math;
mod path;
mod screen;
mod segment;
pub mod smooth;

pub use color::{LaneColors, PremulColor};
pub use config::{
    DebugLayers, StageContract, Uniforms, ARC_LUT_SAMPLES, BIN_POW, BIN_SIZE, KMAX_PER_BIN,
    MAX_DASH_SEGMENTS, W_EPSILON,
};
pub use dash::{DashError, DashPattern};
pub use math::{Camera, Mat4, Vec4};
pub use path::{EncodeStats, PathBuilder, PathStyle, SceneEncoder};
pub use screen::{ArcLengthLut, LutSample, ScreenSegment};
pub use segment::{Degree, PathId, Rejection, RejectionCounts, Segment, Sigmoid, VertexStyle};

/// Re-export of the color crate accepted at the authoring boundary.
pub use peniko;
