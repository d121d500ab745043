// Copyright 2026 the Linebin Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color evaluation along and across a stroke.

use linebin_encoding::{LaneColors, PremulColor, ScreenSegment, Sigmoid, Uniforms};

/// Below this the sigmoid is too flat to normalize and a linear ramp is used instead.
const FLAT_SIGMOID: f32 = 1e-6;

/// Weight of the outer lane color at across-width position `u`.
///
/// This is the logistic `1 / (1 + exp(-k (|u| - m)))`, rescaled so the stroke center has
/// weight 0 and the outer edge weight 1. `|u|` is clamped to `[0, 1]`.
pub fn sigmoid_weight(u: f32, sigmoid: Sigmoid) -> f32 {
    let x = u.abs().clamp(0.0, 1.0);
    let logistic = |x: f32| 1.0 / (1.0 + (-sigmoid.steepness * (x - sigmoid.midpoint)).exp());
    let lo = logistic(0.0);
    let hi = logistic(1.0);
    let range = hi - lo;
    if !(range.abs() > FLAT_SIGMOID) {
        return x;
    }
    ((logistic(x) - lo) / range).clamp(0.0, 1.0)
}

fn lane_color(lanes: &LaneColors, sigmoid: Sigmoid, u: f32) -> PremulColor {
    let outer = if u < 0.0 {
        lanes.outer_left
    } else {
        lanes.outer_right
    };
    lanes.center.mix(outer, sigmoid_weight(u, sigmoid))
}

/// Premultiplied stroke color at along-segment parameter `t` and across-width position `u`.
///
/// `u` runs from -1 on the left edge through 0 at the center to 1 on the right edge. Each end
/// of the segment blends its center and outer lane colors through its own sigmoid, then the
/// two ends are mixed by `t`.
pub fn blend_color(segment: &ScreenSegment, t: f32, u: f32) -> PremulColor {
    let start = lane_color(&segment.colors_start, segment.sigmoid_start, u);
    let end = lane_color(&segment.colors_end, segment.sigmoid_end, u);
    start.mix(end, t.clamp(0.0, 1.0))
}

/// Applies the frame's line color strength and debug gradient to a blended color.
pub fn apply_line_uniforms(color: PremulColor, t: f32, uniforms: &Uniforms) -> PremulColor {
    let [r, g, b, a] = color.0;
    let k = uniforms.line_color_strength;
    let color = PremulColor([r * k, g * k, b * k, a]);
    let strength = uniforms.line_debug_gradient_strength.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return color;
    }
    let [sr, sg, sb, sa] = uniforms.line_debug_gradient_start_color;
    let [er, eg, eb, ea] = uniforms.line_debug_gradient_end_color;
    let gradient = PremulColor::from_straight(sr, sg, sb, sa)
        .mix(PremulColor::from_straight(er, eg, eb, ea), t.clamp(0.0, 1.0));
    color.mix(gradient, strength)
}

#[cfg(test)]
mod tests {
    use super::{apply_line_uniforms, blend_color, sigmoid_weight};
    use linebin_encoding::{LaneColors, PremulColor, ScreenSegment, Sigmoid, Uniforms};

    const RED: PremulColor = PremulColor([1.0, 0.0, 0.0, 1.0]);
    const BLUE: PremulColor = PremulColor([0.0, 0.0, 1.0, 1.0]);
    const CLEAR: PremulColor = PremulColor::TRANSPARENT;

    fn close(a: PremulColor, b: PremulColor) -> bool {
        a.0.iter().zip(b.0).all(|(x, y)| (x - y).abs() < 1e-5)
    }

    #[test]
    fn sigmoid_is_normalized_and_monotonic() {
        let s = Sigmoid::default();
        assert_eq!(sigmoid_weight(0.0, s), 0.0);
        assert!((sigmoid_weight(1.0, s) - 1.0).abs() < 1e-6);
        assert!((sigmoid_weight(-0.5, s) - 0.5).abs() < 1e-5);
        assert_eq!(sigmoid_weight(3.0, s), sigmoid_weight(1.0, s));
        let mut last = 0.0;
        for i in 1..=20 {
            let w = sigmoid_weight(i as f32 / 20.0, s);
            assert!(w >= last);
            last = w;
        }
        let flat = Sigmoid {
            steepness: 0.0,
            midpoint: 0.5,
        };
        assert_eq!(sigmoid_weight(0.25, flat), 0.25);
    }

    #[test]
    fn asymmetric_lanes_and_ends() {
        let seg = ScreenSegment {
            colors_start: LaneColors {
                center: RED,
                outer_left: CLEAR,
                outer_right: RED,
            },
            colors_end: LaneColors::uniform(BLUE),
            sigmoid_start: Sigmoid::default(),
            sigmoid_end: Sigmoid::default(),
            ..ScreenSegment::default()
        };
        assert!(close(blend_color(&seg, 0.0, 0.0), RED));
        assert!(close(blend_color(&seg, 0.0, 1.0), RED));
        assert!(close(blend_color(&seg, 0.0, -1.0), CLEAR));
        assert!(close(blend_color(&seg, 1.0, -1.0), BLUE));
        let mid = blend_color(&seg, 0.5, 0.0);
        assert!(close(mid, PremulColor([0.5, 0.0, 0.5, 1.0])));
    }

    #[test]
    fn premultiplied_fade_has_no_dark_fringe() {
        // Fading white to transparent keeps the unpremultiplied color white.
        let seg = ScreenSegment {
            colors_start: LaneColors {
                center: PremulColor::WHITE,
                outer_left: CLEAR,
                outer_right: CLEAR,
            },
            colors_end: LaneColors::uniform(PremulColor::WHITE),
            sigmoid_start: Sigmoid::default(),
            sigmoid_end: Sigmoid::default(),
            ..ScreenSegment::default()
        };
        let c = blend_color(&seg, 0.0, 0.7);
        let straight = c.to_straight();
        assert!(c.alpha() > 0.0 && c.alpha() < 1.0);
        assert!((straight[0] - 1.0).abs() < 1e-5);
    }

    #[test]
    fn debug_gradient_overrides_by_strength() {
        let mut uniforms = Uniforms::default();
        assert_eq!(apply_line_uniforms(BLUE, 0.3, &uniforms), BLUE);
        uniforms.line_color_strength = 0.5;
        assert!(close(
            apply_line_uniforms(BLUE, 0.3, &uniforms),
            PremulColor([0.0, 0.0, 0.5, 1.0])
        ));
        uniforms.line_color_strength = 1.0;
        uniforms.line_debug_gradient_strength = 1.0;
        assert!(close(apply_line_uniforms(BLUE, 0.0, &uniforms), RED));
        assert!(close(apply_line_uniforms(RED, 1.0, &uniforms), BLUE));
    }
}
