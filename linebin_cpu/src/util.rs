// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility types

use std::ops::Mul;

use linebin_encoding::Degree;

#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[repr(C)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;

    fn mul(self, rhs: Vec2) -> Self::Output {
        rhs * self
    }
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    pub fn from_array(a: [f32; 2]) -> Self {
        Self { x: a[0], y: a[1] }
    }

    pub fn mix(self, other: Self, t: f32) -> Self {
        let x = self.x + (other.x - self.x) * t;
        let y = self.y + (other.y - self.y) * t;
        Self { x, y }
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        (len > 0.0 && len.is_finite()).then(|| Self::new(self.x / len, self.y / len))
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

/// Evaluates a Bézier of the given degree at `t`.
pub fn eval_bezier(degree: Degree, p: &[Vec2; 4], t: f32) -> Vec2 {
    let mt = 1.0 - t;
    match degree {
        Degree::Linear => p[0].mix(p[1], t),
        Degree::Quadratic => (mt * mt) * p[0] + (2.0 * mt * t) * p[1] + (t * t) * p[2],
        Degree::Cubic => {
            (mt * mt * mt) * p[0]
                + (3.0 * mt * mt * t) * p[1]
                + (3.0 * mt * t * t) * p[2]
                + (t * t * t) * p[3]
        }
    }
}

/// Derivative of a Bézier of the given degree at `t`.
pub fn eval_bezier_deriv(degree: Degree, p: &[Vec2; 4], t: f32) -> Vec2 {
    let mt = 1.0 - t;
    match degree {
        Degree::Linear => p[1] - p[0],
        Degree::Quadratic => (2.0 * mt) * (p[1] - p[0]) + (2.0 * t) * (p[2] - p[1]),
        Degree::Cubic => {
            (3.0 * mt * mt) * (p[1] - p[0])
                + (6.0 * mt * t) * (p[2] - p[1])
                + (3.0 * t * t) * (p[3] - p[2])
        }
    }
}
