//! Pond water levels, computed after the height field exists.

use std::f64::consts::TAU;

use glam::DVec2;

use crate::profile::Pond;
use crate::seed::{det_cos, det_sin};

/// Rim samples taken around each pond.
pub const RIM_SAMPLES: usize = 16;
/// Rim sampling radius as a multiple of the pond radius.
pub const RIM_RADIUS: f64 = 1.05;
/// Water always sits at least this far below the lowest rim point.
pub const RIM_FREEBOARD: f64 = 0.15;
/// Minimum water depth above the basin bottom.
pub const MIN_DEPTH: f64 = 0.2;

/// Lowest terrain height on the ring around `pond`.
pub fn rim_minimum(pond: &Pond, height: impl Fn(f64, f64) -> f64) -> f64 {
    (0..RIM_SAMPLES)
        .map(|i| {
            let a = i as f64 / RIM_SAMPLES as f64 * TAU;
            let p = pond.center + DVec2::new(det_cos(a), det_sin(a)) * (RIM_RADIUS * pond.radius);
            height(p.x, p.y)
        })
        .fold(f64::INFINITY, f64::min)
}

/// Water level for one pond given the terrain height function.
pub fn pond_level(pond: &Pond, height: impl Fn(f64, f64) -> f64) -> f64 {
    let bottom = height(pond.center.x, pond.center.y);
    let rim = rim_minimum(pond, &height);
    let filled = bottom + (rim - bottom) * pond.fill;
    filled.min(rim - RIM_FREEBOARD).max(bottom + MIN_DEPTH)
}

/// Fill in `water_level` for every pond. Safe to re-run with a new height function.
pub fn compute_pond_levels(ponds: &mut [Pond], height: impl Fn(f64, f64) -> f64) {
    for pond in ponds.iter_mut() {
        let level = pond_level(pond, &height);
        tracing::trace!(center = ?pond.center, level, "pond level");
        pond.water_level = Some(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pond(fill: f64) -> Pond {
        Pond {
            center: DVec2::new(10.0, -5.0),
            radius: 6.0,
            depth: 2.0,
            fill,
            water_level: None,
            degraded: false,
        }
    }

    /// Bowl with bottom 0 at the pond center, rising with distance.
    fn bowl(x: f64, z: f64) -> f64 {
        let d = DVec2::new(x, z).distance(DVec2::new(10.0, -5.0));
        0.1 * d * d
    }

    #[test]
    fn test_level_between_bottom_and_rim() {
        let mut ponds = vec![pond(0.7)];
        compute_pond_levels(&mut ponds, bowl);
        let level = ponds[0].water_level.expect("level computed");
        let rim = 0.1 * (6.0 * RIM_RADIUS).powi(2);
        assert!((level - 0.7 * rim).abs() < 1e-9, "level {level}, rim {rim}");
    }

    #[test]
    fn test_level_stays_below_rim() {
        let level = pond_level(&pond(1.0), bowl);
        let rim = 0.1 * (6.0 * RIM_RADIUS).powi(2);
        assert!((level - (rim - RIM_FREEBOARD)).abs() < 1e-9);
    }

    #[test]
    fn test_shallow_basin_keeps_minimum_depth() {
        let level = pond_level(&pond(0.7), |_, _| 3.0);
        assert!((level - 3.2).abs() < 1e-12);
    }

    #[test]
    fn test_tilted_rim_uses_lowest_point() {
        let p = pond(0.5);
        let tilted = |x: f64, _z: f64| x - 10.0;
        let rim = rim_minimum(&p, tilted);
        assert!((rim + 6.0 * RIM_RADIUS).abs() < 1e-9);
        // Bottom above the lowest rim point: water clamps to the minimum depth.
        assert!((pond_level(&p, tilted) - MIN_DEPTH).abs() < 1e-9);
    }

    #[test]
    fn test_recompute_overwrites_levels() {
        let mut ponds = vec![pond(0.6)];
        compute_pond_levels(&mut ponds, bowl);
        let first = ponds[0].water_level;
        compute_pond_levels(&mut ponds, |x, z| bowl(x, z) + 5.0);
        let second = ponds[0].water_level.expect("level computed");
        assert!((second - first.expect("level computed") - 5.0).abs() < 1e-9);
    }
}
