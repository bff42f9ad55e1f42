//! Rose-curve geometry for the bloom shape.
//!
//! `r = a * cos(k * theta)`. Points are always returned with a non-negative
//! radius; a negative radius is folded onto the opposite direction.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RosePoint {
    pub r: f32,
    pub theta: f32,
}

/// Sample `segments + 1` points along the rose `r = a * cos(k * theta)`.
///
/// Integer `k` (within 0.01) closes over `[0, 2pi]`; any other `k` is sampled
/// over `[0, 4pi]`.
pub fn calculate_curve(a: f32, k: f32, segments: usize) -> Vec<RosePoint> {
    let range = if (k - k.round()).abs() < 0.01 {
        TAU
    } else {
        2.0 * TAU
    };
    let step = if segments == 0 {
        0.0
    } else {
        range / segments as f32
    };
    (0..=segments)
        .map(|i| {
            let theta = i as f32 * step;
            let r = a * (k * theta).cos();
            if r < 0.0 {
                RosePoint {
                    r: -r,
                    theta: theta + PI,
                }
            } else {
                RosePoint { r, theta }
            }
        })
        .collect()
}

pub fn polar_to_cartesian(r: f32, theta: f32, cx: f32, cy: f32) -> Vec2 {
    Vec2::new(cx + r * theta.cos(), cy + r * theta.sin())
}

/// Inverse of [`polar_to_cartesian`]; `theta` is reported in `[0, 2pi)`.
pub fn cartesian_to_polar(x: f32, y: f32, cx: f32, cy: f32) -> RosePoint {
    let d = Vec2::new(x - cx, y - cy);
    RosePoint {
        r: d.length(),
        theta: d.y.atan2(d.x).rem_euclid(TAU),
    }
}

/// Map a pitch onto a petal count `k`, clamping outside `[min_pitch, max_pitch]`.
pub fn calculate_k_from_pitch(
    pitch: f32,
    min_k: f32,
    max_k: f32,
    min_pitch: f32,
    max_pitch: f32,
) -> f32 {
    let span = max_pitch - min_pitch;
    let t = if span.abs() <= f32::EPSILON || !pitch.is_finite() {
        0.0
    } else {
        ((pitch - min_pitch) / span).clamp(0.0, 1.0)
    };
    min_k + t * (max_k - min_k)
}

/// Convenience: the curve as cartesian points around `center`.
pub fn curve_points(a: f32, k: f32, segments: usize, center: Vec2) -> Vec<Vec2> {
    calculate_curve(a, k, segments)
        .into_iter()
        .map(|p| polar_to_cartesian(p.r, p.theta, center.x, center.y))
        .collect()
}
