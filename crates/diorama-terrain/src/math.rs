//! Scalar blending helpers shared by the samplers.

/// Hermite smoothstep between `edge0` and `edge1`.
///
/// Reversed edges (`edge0 > edge1`) give a falling curve, which the height
/// and ecology code use for "1 inside, 0 outside" masks.
#[inline]
pub fn smoothstep(edge0: f64, edge1: f64, x: f64) -> f64 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn clamp01(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

/// Soft quantization of `h` onto multiples of `step`.
///
/// Each step keeps a flat tread and a smooth riser, so the result stays
/// continuous where a hard `floor` would jump.
pub fn soft_terrace(h: f64, step: f64) -> f64 {
    if step <= 0.0 {
        return h;
    }
    let t = h / step;
    let base = t.floor();
    let frac = t - base;
    (base + smoothstep(0.3, 0.7, frac)) * step
}
