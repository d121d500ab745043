// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded per-tile segment lists.

use std::sync::atomic::{AtomicU32, Ordering};

use linebin_encoding::KMAX_PER_BIN;

use crate::bbox::{BinGrid, TileRange};

/// Result of reserving a slot in a bin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOutcome {
    /// The reference was written at this position within the bin.
    Stored(u32),
    /// The bin was full and the reference was dropped.
    Overflow,
}

/// Fixed-capacity storage for the segment references of every bin in a viewport.
///
/// Storage is allocated once per grid size and holds `KMAX_PER_BIN` slots per bin. A bin's
/// counter is advanced with an atomic fetch-add and the returned value is the write slot if
/// it is below capacity; otherwise the reference is dropped and the overflow counter
/// incremented. Abandoning a frame only needs [`BinArena::reset`].
#[derive(Debug, Default)]
pub struct BinArena {
    grid: BinGrid,
    /// Number of reservations attempted per bin. May exceed capacity.
    counts: Vec<AtomicU32>,
    slots: Vec<AtomicU32>,
    overflow: AtomicU32,
}

impl BinArena {
    pub fn new(width: u32, height: u32) -> Self {
        let mut arena = Self::default();
        arena.resize(width, height);
        arena
    }

    /// Adapts the arena to a new viewport, clearing it.
    ///
    /// Storage is only reallocated if the bin grid changes.
    pub fn resize(&mut self, width: u32, height: u32) {
        let grid = BinGrid::new(width, height);
        if grid != self.grid || self.counts.len() != grid.bin_count() {
            let bins = grid.bin_count();
            self.grid = grid;
            self.counts = (0..bins).map(|_| AtomicU32::new(0)).collect();
            self.slots = (0..bins * KMAX_PER_BIN as usize)
                .map(|_| AtomicU32::new(0))
                .collect();
            self.overflow = AtomicU32::new(0);
        } else {
            self.reset();
        }
    }

    /// Empties every bin and clears the overflow counter.
    pub fn reset(&mut self) {
        for count in &mut self.counts {
            *count.get_mut() = 0;
        }
        *self.overflow.get_mut() = 0;
    }

    pub fn grid(&self) -> BinGrid {
        self.grid
    }

    /// Attempts to append `segment` to bin `bin`.
    pub fn try_push(&self, bin: usize, segment: u32) -> BinOutcome {
        let ix = self.counts[bin].fetch_add(1, Ordering::Relaxed);
        if ix < KMAX_PER_BIN {
            self.slots[bin * KMAX_PER_BIN as usize + ix as usize].store(segment, Ordering::Relaxed);
            BinOutcome::Stored(ix)
        } else {
            self.overflow.fetch_add(1, Ordering::Relaxed);
            BinOutcome::Overflow
        }
    }

    /// Number of references stored in a bin; never more than `KMAX_PER_BIN`.
    pub fn occupancy(&self, bin: usize) -> u32 {
        self.counts[bin].load(Ordering::Relaxed).min(KMAX_PER_BIN)
    }

    /// Number of references that were offered to a bin, including dropped ones.
    pub fn demand(&self, bin: usize) -> u32 {
        self.counts[bin].load(Ordering::Relaxed)
    }

    /// The segment references stored in a bin, in insertion order.
    pub fn bin(&self, bin: usize) -> Vec<u32> {
        let base = bin * KMAX_PER_BIN as usize;
        self.slots[base..base + self.occupancy(bin) as usize]
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect()
    }

    /// Total number of dropped references since the last reset.
    pub fn overflow_count(&self) -> u32 {
        self.overflow.load(Ordering::Relaxed)
    }

    /// Total number of stored references.
    pub fn stored_count(&self) -> u32 {
        (0..self.counts.len()).map(|bin| self.occupancy(bin)).sum()
    }

    /// Copies the bins into the flat layout read by the rasterizer.
    pub fn to_buffers(&self) -> BinBuffers {
        BinBuffers {
            grid: self.grid,
            counts: (0..self.counts.len()).map(|bin| self.occupancy(bin)).collect(),
            slots: self.slots.iter().map(|s| s.load(Ordering::Relaxed)).collect(),
        }
    }
}

/// Bin contents laid out for upload: one clamped count per bin, and `KMAX_PER_BIN` slots
/// per bin of which the first `count` are meaningful.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BinBuffers {
    pub grid: BinGrid,
    pub counts: Vec<u32>,
    pub slots: Vec<u32>,
}

impl BinBuffers {
    pub fn counts_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.counts)
    }

    pub fn slots_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.slots)
    }

    /// The stored references of a bin.
    pub fn bin(&self, bin: usize) -> &[u32] {
        let base = bin * KMAX_PER_BIN as usize;
        &self.slots[base..base + self.counts[bin] as usize]
    }
}

/// Summary of one binning pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BinStats {
    /// Segments that touched at least one bin.
    pub binned: u32,
    /// Segments whose box missed the viewport.
    pub culled: u32,
    /// Stored references.
    pub refs: u32,
    /// Dropped references.
    pub overflow: u32,
}

/// Bins every segment into the arena, after clearing it.
///
/// `ranges[i]` is the tile range of segment `i`, or `None` if it was culled; the reference
/// stored for it is `i`. Each row of bins is filled by a single worker walking the segments
/// in order, so every bin lists its segments in build order no matter how rows are
/// scheduled.
pub fn bin_segments(arena: &mut BinArena, ranges: &[Option<TileRange>]) -> BinStats {
    arena.reset();
    let grid = arena.grid();
    let arena = &*arena;
    let fill_row = |y: u32| {
        for (ix, range) in ranges.iter().enumerate() {
            let Some(range) = range else {
                continue;
            };
            if y < range.y0 || y > range.y1 {
                continue;
            }
            for x in range.x0..=range.x1 {
                arena.try_push(grid.bin_index(x, y), ix as u32);
            }
        }
    };

    #[cfg(feature = "multithreading")]
    {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        (0..grid.height_in_bins).into_par_iter().for_each(fill_row);
    }
    #[cfg(not(feature = "multithreading"))]
    (0..grid.height_in_bins).for_each(fill_row);

    let culled = ranges.iter().filter(|r| r.is_none()).count() as u32;
    let stats = BinStats {
        binned: ranges.len() as u32 - culled,
        culled,
        refs: arena.stored_count(),
        overflow: arena.overflow_count(),
    };
    if stats.overflow > 0 {
        log::warn!(
            "{} segment references dropped from full bins (capacity {KMAX_PER_BIN})",
            stats.overflow
        );
    }
    log::trace!("binning: {stats:?}");
    stats
}
