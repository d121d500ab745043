// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding boxes and the tile grid.

use linebin_encoding::{BIN_POW, BIN_SIZE};

use crate::util::Vec2;

/// Inflated axis-aligned bounding box of a projected segment.
///
/// The box covers every control point, which bounds the curve since a Bézier lies inside
/// the convex hull of its control points. It is then grown by `margin` on every side.
pub fn segment_bbox(points: &[Vec2], margin: f32) -> (Vec2, Vec2) {
    let Some((&first, rest)) = points.split_first() else {
        return (Vec2::ZERO, Vec2::ZERO);
    };
    let (min, max) = rest
        .iter()
        .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
    let m = Vec2::new(margin, margin);
    (min - m, max + m)
}

/// The grid of square bins covering a viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinGrid {
    pub width_in_bins: u32,
    pub height_in_bins: u32,
}

impl BinGrid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width_in_bins: width.div_ceil(BIN_SIZE),
            height_in_bins: height.div_ceil(BIN_SIZE),
        }
    }

    pub fn bin_count(&self) -> usize {
        self.width_in_bins as usize * self.height_in_bins as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bin_count() == 0
    }

    /// Row-major index of the bin at `(x, y)`.
    pub fn bin_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width_in_bins as usize + x as usize
    }

    /// The bins touched by a pixel-space box, clamped to the grid.
    ///
    /// Returns `None` when the box lies entirely outside the viewport or is not finite.
    pub fn tile_range(&self, min: Vec2, max: Vec2) -> Option<TileRange> {
        if self.is_empty() || !min.is_finite() || !max.is_finite() {
            return None;
        }
        let extent = Vec2::new(
            (self.width_in_bins << BIN_POW) as f32,
            (self.height_in_bins << BIN_POW) as f32,
        );
        if max.x < 0.0 || max.y < 0.0 || min.x >= extent.x || min.y >= extent.y {
            return None;
        }
        let bin = |v: f32, bins: u32| ((v / BIN_SIZE as f32).floor().max(0.0) as u32).min(bins - 1);
        Some(TileRange {
            x0: bin(min.x, self.width_in_bins),
            y0: bin(min.y, self.height_in_bins),
            x1: bin(max.x, self.width_in_bins),
            y1: bin(max.y, self.height_in_bins),
        })
    }
}

/// An inclusive rectangle of bin coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileRange {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl TileRange {
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Number of bins in the range; never zero.
    pub fn tile_count(&self) -> usize {
        (self.x1 - self.x0 + 1) as usize * (self.y1 - self.y0 + 1) as usize
    }

    /// Bin coordinates in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (u32, u32)> {
        let Self { x0, y0, x1, y1 } = *self;
        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::{segment_bbox, BinGrid, TileRange};
    use crate::util::{eval_bezier, Vec2};
    use linebin_encoding::Degree;

    #[test]
    fn grid_rounds_up() {
        let grid = BinGrid::new(300, 128);
        assert_eq!(grid.width_in_bins, 3);
        assert_eq!(grid.height_in_bins, 1);
        assert_eq!(grid.bin_count(), 3);
        assert!(BinGrid::new(0, 100).is_empty());
    }

    #[test]
    fn ranges_are_clamped_and_culled() {
        let grid = BinGrid::new(256, 256);
        let r = grid
            .tile_range(Vec2::new(-50.0, 100.0), Vec2::new(130.0, 1000.0))
            .unwrap();
        assert_eq!(r, TileRange { x0: 0, y0: 0, x1: 1, y1: 1 });
        assert_eq!(r.tile_count(), 4);
        assert_eq!(r.tiles().collect::<Vec<_>>(), [(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(grid.tile_range(Vec2::new(-20.0, 0.0), Vec2::new(-1.0, 10.0)), None);
        assert_eq!(grid.tile_range(Vec2::new(256.0, 0.0), Vec2::new(300.0, 10.0)), None);
        let nan = Vec2::new(f32::NAN, 0.0);
        assert_eq!(grid.tile_range(nan, Vec2::new(1.0, 1.0)), None);
    }

    #[test]
    fn box_contains_curve_samples() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(-80.0, 200.0),
            Vec2::new(180.0, -150.0),
            Vec2::new(100.0, 0.0),
        ];
        let (min, max) = segment_bbox(&pts, 1.5);
        for i in 0..=64 {
            let p = eval_bezier(Degree::Cubic, &pts, i as f32 / 64.0);
            assert!(p.x >= min.x && p.y >= min.y && p.x <= max.x && p.y <= max.y);
        }
        assert_eq!(min, Vec2::new(-81.5, -151.5));
    }
}
