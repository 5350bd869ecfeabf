//! Vegetation and rock scatter.
//!
//! Candidate points come from Mitchell's best-candidate sampling over the
//! world disc, drawn from the seed's scatter stream so scatter never shifts
//! the world layout. Each point is filtered by water, slope, ponds and the
//! river channel, then assigned a kind weighted by the local ecology.

use std::f64::consts::TAU;

use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::ecology::EcologySample;
use crate::math::smoothstep;
use crate::profile::point_in_disk;
use crate::rng::Mulberry32;
use crate::world::WorldGenerator;

/// What to place at a scatter point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScatterKind {
    Conifer,
    Broadleaf,
    Shrub,
    Reed,
    Boulder,
    Cactus,
}

impl ScatterKind {
    pub const ALL: [ScatterKind; 6] = [
        ScatterKind::Conifer,
        ScatterKind::Broadleaf,
        ScatterKind::Shrub,
        ScatterKind::Reed,
        ScatterKind::Boulder,
        ScatterKind::Cactus,
    ];

    /// Minimum distance to another instance of the same kind.
    pub fn spacing(self) -> f64 {
        match self {
            Self::Conifer => 4.5,
            Self::Broadleaf => 6.0,
            Self::Shrub => 2.5,
            Self::Reed => 1.2,
            Self::Boulder => 5.0,
            Self::Cactus => 7.0,
        }
    }

    /// Inclusive `(min, max)` scale multiplier.
    pub fn scale_range(self) -> (f64, f64) {
        match self {
            Self::Conifer => (0.8, 1.5),
            Self::Broadleaf => (0.9, 1.6),
            Self::Shrub => (0.6, 1.1),
            Self::Reed => (0.7, 1.0),
            Self::Boulder => (0.5, 1.8),
            Self::Cactus => (0.7, 1.3),
        }
    }

    /// Steepest surface (lowest normal y) this kind tolerates.
    pub fn min_normal_y(self) -> f64 {
        match self {
            Self::Boulder => 0.55,
            Self::Shrub | Self::Conifer => 0.72,
            Self::Broadleaf | Self::Cactus => 0.8,
            Self::Reed => 0.9,
        }
    }

    fn weight(self, s: &EcologySample) -> f64 {
        match self {
            Self::Conifer => (0.3 + 0.7 * s.alpine) * (1.0 - s.temperature) * (1.0 - s.volcanic),
            Self::Broadleaf => {
                1.2 * s.moisture * s.temperature * (1.0 - s.alpine) * (1.0 - s.dryness)
            }
            Self::Shrub => 0.25 + 0.3 * s.dryness,
            Self::Reed => 2.0 * s.wetland.max(0.8 * s.riparian),
            Self::Boulder => 0.1 + s.scree + 0.6 * s.volcanic,
            Self::Cactus => 1.5 * smoothstep(0.6, 0.9, s.dryness) * s.temperature,
        }
    }
}

/// One placed object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterInstance {
    pub kind: ScatterKind,
    /// Base position on the terrain surface.
    pub position: DVec3,
    /// Yaw in radians, in `[0, TAU)`.
    pub rotation: f64,
    pub scale: f64,
}

/// Tunables for [`scatter_vegetation`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    /// Minimum distance between any two candidate points.
    pub min_spacing: f64,
    /// Candidates tested per accepted point.
    pub candidates: u32,
    /// Upper bound on candidate points.
    pub max_points: usize,
    /// Radius of the scattered disc as a fraction of the half extent.
    pub coverage: f64,
    /// Clearance above the water surface.
    pub shore_clearance: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            min_spacing: 2.0,
            candidates: 12,
            max_points: 1500,
            coverage: 0.82,
            shore_clearance: 0.4,
        }
    }
}

/// Scatter objects over `world`. Same seed and config give the same list.
pub fn scatter_vegetation(world: &WorldGenerator, config: &ScatterConfig) -> Vec<ScatterInstance> {
    let mut rng = world.seed().scatter_rng();
    let radius = config.coverage * world.params().half_extent;
    let points = best_candidate_points(&mut rng, radius, config);

    let mut placed: Vec<ScatterInstance> = Vec::new();
    for p in points {
        let Some(instance) = scatter_at(world, &mut rng, p, config, &placed) else {
            continue;
        };
        placed.push(instance);
    }

    tracing::debug!(
        seed = %world.seed(),
        instances = placed.len(),
        "scattered vegetation"
    );
    placed
}

/// Mitchell's best-candidate sampling inside a disc of `radius`.
fn best_candidate_points(rng: &mut Mulberry32, radius: f64, config: &ScatterConfig) -> Vec<DVec2> {
    let spacing = config.min_spacing.max(f64::EPSILON);
    let area = std::f64::consts::PI * radius * radius;
    let max_points = ((area / (spacing * spacing * 0.7)) as usize).min(config.max_points);
    let mut points: Vec<DVec2> = Vec::with_capacity(max_points);

    for _ in 0..max_points {
        let mut best: Option<(DVec2, f64)> = None;
        for _ in 0..config.candidates {
            let c = point_in_disk(rng, radius);
            let nearest = points
                .iter()
                .map(|p| p.distance(c))
                .fold(f64::INFINITY, f64::min);
            if nearest >= spacing && best.is_none_or(|(_, d)| nearest > d) {
                best = Some((c, nearest));
            }
        }
        match best {
            Some((p, _)) => points.push(p),
            // Saturated.
            None => break,
        }
    }
    points
}

fn scatter_at(
    world: &WorldGenerator,
    rng: &mut Mulberry32,
    p: DVec2,
    config: &ScatterConfig,
    placed: &[ScatterInstance],
) -> Option<ScatterInstance> {
    let y = world.height(p.x, p.y);
    if y < world.sea_level() + config.shore_clearance {
        return None;
    }
    if in_pond(world, p) || in_river_channel(world, p) {
        return None;
    }

    let normal = world.surface_normal(p.x, p.y);
    let sample = world.classify(p.x, p.y, y, normal.y);

    let density =
        (0.3 + 0.55 * sample.moisture + 0.3 * sample.wetland - 0.25 * sample.volcanic).clamp(0.15, 1.0);
    if !rng.chance(density) {
        return None;
    }

    let kind = pick_kind(rng, &sample)?;
    if normal.y < kind.min_normal_y() {
        return None;
    }
    let crowded = placed
        .iter()
        .filter(|i| i.kind == kind)
        .any(|i| DVec2::new(i.position.x, i.position.z).distance(p) < kind.spacing());
    if crowded {
        return None;
    }

    let (lo, hi) = kind.scale_range();
    Some(ScatterInstance {
        kind,
        position: DVec3::new(p.x, y, p.y),
        rotation: rng.range(0.0, TAU),
        scale: rng.range(lo, hi),
    })
}

fn pick_kind(rng: &mut Mulberry32, sample: &EcologySample) -> Option<ScatterKind> {
    let weights = ScatterKind::ALL.map(|k| k.weight(sample).max(0.0));
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.range(0.0, total);
    for (kind, w) in ScatterKind::ALL.into_iter().zip(weights) {
        if roll < w {
            return Some(kind);
        }
        roll -= w;
    }
    ScatterKind::ALL.last().copied()
}

fn in_pond(world: &WorldGenerator, p: DVec2) -> bool {
    world
        .biome()
        .ponds()
        .iter()
        .any(|pond| p.distance(pond.center) < 1.1 * pond.radius)
}

fn in_river_channel(world: &WorldGenerator, p: DVec2) -> bool {
    let Some(center) = world.river_center_x(p.y) else {
        return false;
    };
    let river = &world.biome().mainland.river;
    (p.x - center).abs() < 0.5 * river.width + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::BiomeMode;
    use crate::seed::WorldSeed;

    fn small_config() -> ScatterConfig {
        ScatterConfig {
            min_spacing: 4.0,
            max_points: 400,
            ..Default::default()
        }
    }

    #[test]
    fn test_scatter_deterministic() {
        let world = WorldGenerator::from_seed(WorldSeed(12345), BiomeMode::Mainland);
        let a = scatter_vegetation(&world, &small_config());
        let b = scatter_vegetation(&world, &small_config());
        assert!(!a.is_empty(), "Expected some scatter on a mainland world");
        assert_eq!(a, b);
    }

    #[test]
    fn test_scatter_varies_with_seed() {
        let a = WorldGenerator::from_seed(WorldSeed(1), BiomeMode::Mainland);
        let b = WorldGenerator::from_seed(WorldSeed(2), BiomeMode::Mainland);
        assert_ne!(
            scatter_vegetation(&a, &small_config()),
            scatter_vegetation(&b, &small_config())
        );
    }

    #[test]
    fn test_scatter_respects_water_and_spacing() {
        for mode in [BiomeMode::Mainland, BiomeMode::MiniIslands] {
            let world = WorldGenerator::from_seed(WorldSeed(2024), mode);
            let config = small_config();
            let instances = scatter_vegetation(&world, &config);
            assert!(instances.len() <= config.max_points);
            for (i, a) in instances.iter().enumerate() {
                let p = DVec2::new(a.position.x, a.position.z);
                assert!(a.position.y >= world.sea_level() + config.shore_clearance);
                assert!(!in_pond(&world, p));
                assert!(!in_river_channel(&world, p));
                assert!((0.0..TAU).contains(&a.rotation));
                let (lo, hi) = a.kind.scale_range();
                assert!((lo..=hi).contains(&a.scale));
                for b in &instances[i + 1..] {
                    let q = DVec2::new(b.position.x, b.position.z);
                    assert!(p.distance(q) >= config.min_spacing);
                }
            }
        }
    }

    #[test]
    fn test_scatter_leaves_layout_stream_alone() {
        let seed = WorldSeed(99);
        let world = WorldGenerator::from_seed(seed, BiomeMode::Mainland);
        let _ = scatter_vegetation(&world, &small_config());
        let fresh = WorldGenerator::from_seed(seed, BiomeMode::Mainland);
        assert_eq!(world.biome(), fresh.biome());
        assert_eq!(world.terrain(), fresh.terrain());
    }

    #[test]
    fn test_pick_kind_follows_ecology() {
        let mut rng = Mulberry32::new(3);
        let marsh = EcologySample {
            wetland: 1.0,
            riparian: 1.0,
            temperature: 1.0,
            ..Default::default()
        };
        let reeds = (0..200)
            .filter(|_| pick_kind(&mut rng, &marsh) == Some(ScatterKind::Reed))
            .count();
        assert!(reeds > 100, "Reeds should dominate a marsh, got {reeds}/200");
    }
}
