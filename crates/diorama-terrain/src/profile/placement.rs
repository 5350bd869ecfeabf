//! Bounded rejection sampling for layout objects.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::rng::Mulberry32;
use crate::seed::{det_cos, det_sin, det_sqrt};

/// Result of a placement search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placed<T> {
    /// The accepted candidate, or the fallback when the budget ran out.
    pub value: T,
    /// Number of candidates drawn.
    pub attempts: u32,
    /// `true` when no candidate passed and the fallback was used.
    pub degraded: bool,
}

/// Draw candidates until one is accepted or `attempts` is exhausted.
///
/// Never fails: an exhausted budget returns `fallback()` flagged as degraded
/// and logs a warning naming `label`.
pub fn place<T>(
    rng: &mut Mulberry32,
    attempts: u32,
    label: &str,
    mut candidate: impl FnMut(&mut Mulberry32) -> T,
    mut accept: impl FnMut(&T) -> bool,
    fallback: impl FnOnce() -> T,
) -> Placed<T> {
    for attempt in 1..=attempts {
        let value = candidate(rng);
        if accept(&value) {
            return Placed {
                value,
                attempts: attempt,
                degraded: false,
            };
        }
    }

    tracing::warn!(label, attempts, "placement budget exhausted, using fallback");
    Placed {
        value: fallback(),
        attempts,
        degraded: true,
    }
}

/// Uniform point inside a disc of `radius` around the origin.
pub fn point_in_disk(rng: &mut Mulberry32, radius: f64) -> DVec2 {
    let angle = rng.range(0.0, TAU);
    let r = radius * det_sqrt(rng.next_f64());
    DVec2::new(r * det_cos(angle), r * det_sin(angle))
}

/// Uniform angle, radius drawn from `[inner, outer)`.
pub fn point_in_annulus(rng: &mut Mulberry32, inner: f64, outer: f64) -> DVec2 {
    let angle = rng.range(0.0, TAU);
    let r = rng.range(inner, outer);
    DVec2::new(r * det_cos(angle), r * det_sin(angle))
}

/// Deterministic spiral spot used when placement gives up.
pub fn fallback_ring(index: usize, radius: f64) -> DVec2 {
    // Golden angle keeps successive fallbacks apart.
    let angle = index as f64 * 2.399_963_229_728_653;
    DVec2::new(radius * det_cos(angle), radius * det_sin(angle))
}

/// Distance from `p` to the segment `a..b` and the clamped parameter along it.
pub fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> (f64, f64) {
    let seg = b - a;
    let len2 = seg.length_squared();
    if len2 <= f64::EPSILON {
        return (p.distance(a), 0.0);
    }
    let t = ((p - a).dot(seg) / len2).clamp(0.0, 1.0);
    (p.distance(a + seg * t), t)
}
