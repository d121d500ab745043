// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use bytemuck::{Pod, Zeroable};
use smallvec::SmallVec;
use thiserror::Error;

use crate::MAX_DASH_SEGMENTS;

/// Errors from constructing a [`DashPattern`].
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DashError {
    #[error("dash pattern has {count} entries, at most {} are supported", MAX_DASH_SEGMENTS)]
    TooManyEntries { count: usize },
    #[error("dash entry {index} has invalid length {value}")]
    InvalidLength { index: usize, value: f32 },
    #[error("dash pattern has zero total length")]
    ZeroTotal,
    #[error("dash phase {0} is not finite")]
    NonFinitePhase(f32),
}

/// Alternating on/off lengths along a path, in pixels.
///
/// Even entries are dashes, odd entries are gaps. The layout matches the dash fields of the
/// rasterizer's segment record. The default pattern is solid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct DashPattern {
    pub lengths: [f32; MAX_DASH_SEGMENTS],
    pub count: u32,
    pub total: f32,
    pub phase: f32,
}

impl DashPattern {
    /// A solid stroke.
    pub const SOLID: Self = Self {
        lengths: [0.0; MAX_DASH_SEGMENTS],
        count: 0,
        total: 0.0,
        phase: 0.0,
    };

    /// Creates a dash pattern.
    ///
    /// An odd number of entries is repeated once so that dashes and gaps alternate; the
    /// repeated list must still fit in [`MAX_DASH_SEGMENTS`].
    pub fn new(lengths: &[f32], phase: f32) -> Result<Self, DashError> {
        if let Some((index, &value)) = lengths
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(DashError::InvalidLength { index, value });
        }
        if !phase.is_finite() {
            return Err(DashError::NonFinitePhase(phase));
        }
        let mut entries: SmallVec<[f32; MAX_DASH_SEGMENTS]> = lengths.iter().copied().collect();
        if entries.len() % 2 == 1 {
            entries.extend_from_slice(lengths);
        }
        if entries.len() > MAX_DASH_SEGMENTS {
            return Err(DashError::TooManyEntries {
                count: entries.len(),
            });
        }
        let total: f32 = entries.iter().sum();
        if total <= 0.0 {
            return Err(DashError::ZeroTotal);
        }
        let mut pattern = Self {
            count: entries.len() as u32,
            total,
            phase,
            ..Self::SOLID
        };
        pattern.lengths[..entries.len()].copy_from_slice(&entries);
        Ok(pattern)
    }

    pub fn is_solid(&self) -> bool {
        self.count == 0 || self.total <= 0.0
    }

    pub fn entries(&self) -> &[f32] {
        &self.lengths[..(self.count as usize).min(MAX_DASH_SEGMENTS)]
    }
}

#[cfg(test)]
mod tests {
    use super::{DashError, DashPattern};

    #[test]
    fn odd_patterns_repeat() {
        let pattern = DashPattern::new(&[4.0, 2.0, 1.0], 0.5).unwrap();
        assert_eq!(pattern.entries(), &[4.0, 2.0, 1.0, 4.0, 2.0, 1.0]);
        assert_eq!(pattern.total, 14.0);
        assert!(!pattern.is_solid());
    }

    #[test]
    fn invalid_patterns() {
        assert_eq!(
            DashPattern::new(&[1.0; 5], 0.0),
            Err(DashError::TooManyEntries { count: 10 })
        );
        assert_eq!(DashPattern::new(&[0.0, 0.0], 0.0), Err(DashError::ZeroTotal));
        assert!(matches!(
            DashPattern::new(&[1.0, -1.0], 0.0),
            Err(DashError::InvalidLength { index: 1, .. })
        ));
        assert!(DashPattern::default().is_solid());
    }
}
