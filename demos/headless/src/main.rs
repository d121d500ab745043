// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless

// The following lints are part of the Linebender standard set,
// but resolving them has been deferred for now.
// Feel free to send a PR that solves one or more of these.
#![allow(
    clippy::cast_possible_truncation,
    clippy::print_stdout,
    clippy::allow_attributes_without_reason
)]

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use linebin::peniko::Color;
use linebin::{
    Camera, DashAccumulation, DashPattern, DebugLayers, Frame, LaneColors, PathId, PathStyle,
    PremulColor, Renderer, RendererOptions, SceneEncoder, Uniforms, VertexStyle,
};

/// A named scene builder. Returns the camera the scene is meant to be seen through.
struct ExampleScene {
    name: &'static str,
    build: fn(&mut SceneEncoder, &Args, u32, u32) -> Result<Camera>,
}

const SCENES: &[ExampleScene] = &[
    ExampleScene {
        name: "grid",
        build: grid,
    },
    ExampleScene {
        name: "helix",
        build: helix,
    },
    ExampleScene {
        name: "dense",
        build: dense,
    },
];

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.print_scenes {
        println!("Available scenes:");
        for (idx, scene) in SCENES.iter().enumerate() {
            println!("{idx}: {}", scene.name);
        }
        return Ok(());
    }
    let scene = match SCENES
        .iter()
        .find(|s| s.name.eq_ignore_ascii_case(&args.scene))
    {
        Some(scene) => scene,
        None => {
            let parsed = args.scene.parse::<usize>().context(format!(
                "'{}' didn't match any scene, trying to parse as index",
                args.scene
            ))?;
            match SCENES.get(parsed) {
                Some(scene) => scene,
                None => bail!("{parsed} doesn't fit in scenes (len {})", SCENES.len()),
            }
        }
    };
    render(scene, &args)
}

fn render(example: &ExampleScene, args: &Args) -> Result<()> {
    let width = args.x_resolution;
    let height = args.y_resolution;
    let mut encoder = SceneEncoder::new();
    let camera = (example.build)(&mut encoder, args, width, height)?;
    let encoded = encoder.stats();
    log::info!(
        "encoded {} paths into {} segments ({} rejected)",
        encoded.paths,
        encoded.segments,
        encoded.rejected.total()
    );

    let mut renderer = Renderer::new(RendererOptions {
        dash_accumulation: if args.per_path_dashes {
            DashAccumulation::PerPath
        } else {
            DashAccumulation::PerSegment
        },
        num_threads: args.threads.and_then(NonZeroUsize::new),
        ..Default::default()
    })?;
    let mut uniforms = Uniforms::new(width, height);
    if args.debug {
        uniforms = uniforms.with_debug_layers(DebugLayers::all());
    }
    let frame = renderer.render_frame(&uniforms, &camera, &encoder)?;
    report(example.name, &frame);

    if let Some(dir) = &args.out_directory {
        std::fs::create_dir_all(dir)?;
        let buffers = frame.bin_buffers();
        let outputs: [(&str, &[u8]); 5] = [
            ("uniforms", frame.uniforms_bytes()),
            ("segments", frame.segments_bytes()),
            ("luts", frame.luts_bytes()),
            ("bin_counts", buffers.counts_bytes()),
            ("bin_slots", buffers.slots_bytes()),
        ];
        for (name, bytes) in outputs {
            let path = dir.join(format!("{}_{name}", example.name)).with_extension("bin");
            std::fs::write(&path, bytes).with_context(|| format!("writing {path:?}"))?;
        }
        println!("Wrote buffers to {dir:?}");
    }
    Ok(())
}

fn report(name: &str, frame: &Frame<'_>) {
    let stats = frame.stats();
    let grid = frame.grid();
    println!(
        "{name}: {} segments in, {} accepted, {} rejected, {} culled",
        stats.segments_in,
        stats.accepted,
        stats.rejected.total(),
        stats.culled
    );
    println!(
        "{}x{} bins, {} references stored, {} dropped",
        grid.width_in_bins, grid.height_in_bins, stats.refs, stats.overflow
    );
    // One character per bin: '.' empty, a hex digit for partial occupancy, '#' full.
    let buffers = frame.bin_buffers();
    for y in 0..grid.height_in_bins {
        let row: String = (0..grid.width_in_bins)
            .map(|x| match buffers.counts[grid.bin_index(x, y)] {
                0 => '.',
                n if n >= linebin::KMAX_PER_BIN => '#',
                n => char::from_digit(n, 16).unwrap_or('?'),
            })
            .collect();
        println!("  {row}");
    }
}

fn path_style(args: &Args) -> Result<PathStyle> {
    let mut style = PathStyle::default().with_anti_alias(args.anti_alias);
    if !args.dash.is_empty() {
        style = style.with_dash(DashPattern::new(&args.dash, 0.0)?);
    }
    Ok(style)
}

/// Straight lines in a screen-space lattice, widening toward the bottom right.
fn grid(encoder: &mut SceneEncoder, args: &Args, width: u32, height: u32) -> Result<Camera> {
    let style = path_style(args)?;
    let (w, h) = (width as f32, height as f32);
    let step = 48.0;
    let mut id = 0;
    let mut x = step;
    while x < w {
        let top = VertexStyle::new(0.5, Color::rgba8(255, 255, 255, 255));
        let bottom = VertexStyle::new(0.5 + 3.0 * x / w, Color::rgba8(80, 160, 255, 255));
        encoder
            .path(PathId(id), style)
            .move_to([x, 0.0], top)
            .line_to([x, h], bottom);
        id += 1;
        x += step;
    }
    let mut y = step;
    while y < h {
        let left = VertexStyle::new(0.5, Color::rgba8(255, 255, 255, 255));
        let right = VertexStyle::new(0.5 + 3.0 * y / h, Color::rgba8(255, 120, 80, 255));
        encoder
            .path(PathId(id), style)
            .move_to([0.0, y], left)
            .line_to([w, y], right);
        id += 1;
        y += step;
    }
    Ok(Camera::screen_space(width, height))
}

/// A smoothed 3D helix seen in perspective, with soft outer lanes.
fn helix(encoder: &mut SceneEncoder, args: &Args, width: u32, height: u32) -> Result<Camera> {
    let style = path_style(args)?;
    let points: Vec<[f32; 3]> = (0..400)
        .map(|i| {
            let a = i as f32 * 0.08;
            [a.cos() * 2.0, i as f32 * 0.01 - 2.0, a.sin() * 2.0]
        })
        .collect();
    let lanes = LaneColors {
        center: Color::rgba8(255, 220, 120, 255).into(),
        outer_left: PremulColor::TRANSPARENT,
        outer_right: PremulColor::TRANSPARENT,
    };
    let vertex = VertexStyle::new(3.0, lanes).with_sigmoid(8.0, 0.6);
    encoder
        .path(PathId(0), style)
        .smooth_through(&points, 0.01, vertex);
    let aspect = width as f32 / height as f32;
    Ok(Camera::look_at([0.0, 1.0, 8.0], [0.0; 3], 0.9, aspect))
}

/// Many short crossing strokes packed into the top-left bins to exercise overflow.
fn dense(encoder: &mut SceneEncoder, args: &Args, width: u32, height: u32) -> Result<Camera> {
    let style = path_style(args)?;
    let vertex = VertexStyle::new(1.0, Color::rgba8(200, 255, 200, 255));
    for i in 0..64u32 {
        let t = i as f32 / 64.0;
        encoder
            .path(PathId(i), style)
            .move_to([10.0 + 200.0 * t, 10.0], vertex)
            .quad_to([120.0, 260.0 * t], [240.0 - 200.0 * t, 240.0], vertex);
    }
    Ok(Camera::screen_space(width, height))
}

#[derive(Parser, Debug)]
#[command(about, long_about = None, bin_name = "cargo run -p headless --")]
struct Args {
    #[arg(long, short, default_value_t = 1024)]
    x_resolution: u32,
    #[arg(long, short, default_value_t = 768)]
    y_resolution: u32,
    /// Which scene (name) to render
    /// If no scenes have that name, an index can be specified instead
    #[arg(long, short, default_value = "0")]
    scene: String,
    /// Display a list of all scene names
    #[arg(long, short)]
    print_scenes: bool,
    /// Dash pattern lengths in pixels, e.g. `--dash 8,4`
    #[arg(long, value_delimiter = ',')]
    dash: Vec<f32>,
    /// Continue dash patterns across the segments of a path
    #[arg(long)]
    per_path_dashes: bool,
    /// Width of the anti-alias ramp in pixels
    #[arg(long, default_value_t = 0.7)]
    anti_alias: f32,
    /// Number of worker threads; defaults to the global pool
    #[arg(long)]
    threads: Option<usize>,
    /// Enable every debug overlay in the uniforms
    #[arg(long)]
    debug: bool,
    /// Directory to write the GPU buffers into
    #[arg(long)]
    out_directory: Option<PathBuf>,
}
