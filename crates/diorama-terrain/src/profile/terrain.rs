//! Terrain profile: landform style and the macro shapes layered on the noise.

use std::f64::consts::PI;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::biome::{BiomeMode, BiomeProfile, PointOfInterest};
use super::placement::{fallback_ring, place, point_in_disk};
use crate::params::WorldParams;
use crate::rng::Mulberry32;
use crate::seed::{det_cos, det_sin};
use crate::value_noise::ValueNoise;

/// Macro landform style.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandformStyle {
    Alpine,
    Plateau,
    Canyon,
    Rolling,
    Islands,
}

impl LandformStyle {
    /// Styles available to mainland worlds.
    pub const MAINLAND: [LandformStyle; 4] = [
        LandformStyle::Alpine,
        LandformStyle::Plateau,
        LandformStyle::Canyon,
        LandformStyle::Rolling,
    ];

    /// Tuning table for this style.
    pub fn tuning(self) -> StyleTuning {
        match self {
            Self::Alpine => StyleTuning {
                relief: 8.0,
                base_lift: 3.0,
                ridge_amp: 6.0,
                warp: (7.0, 11.0),
                terrace_step: 2.4,
                terrace_strength: 0.12,
                feature_count: (3, 5),
                feature_amp: (5.0, 9.0),
                bowl_chance: 0.0,
                ridge_count: (2, 3),
                ridge_height: (2.5, 4.5),
            },
            Self::Plateau => StyleTuning {
                relief: 5.0,
                base_lift: 5.0,
                ridge_amp: 3.0,
                warp: (4.0, 7.0),
                terrace_step: 1.6,
                terrace_strength: 0.55,
                feature_count: (2, 4),
                feature_amp: (3.0, 6.0),
                bowl_chance: 0.25,
                ridge_count: (1, 2),
                ridge_height: (1.5, 3.0),
            },
            Self::Canyon => StyleTuning {
                relief: 6.0,
                base_lift: 4.5,
                ridge_amp: 4.0,
                warp: (5.0, 9.0),
                terrace_step: 1.3,
                terrace_strength: 0.4,
                feature_count: (3, 5),
                feature_amp: (3.0, 6.0),
                bowl_chance: 0.6,
                ridge_count: (2, 3),
                ridge_height: (2.0, 3.5),
            },
            Self::Rolling => StyleTuning {
                relief: 4.0,
                base_lift: 2.0,
                ridge_amp: 2.0,
                warp: (6.0, 10.0),
                terrace_step: 2.0,
                terrace_strength: 0.06,
                feature_count: (3, 6),
                feature_amp: (2.0, 5.0),
                bowl_chance: 0.2,
                ridge_count: (1, 1),
                ridge_height: (1.0, 2.0),
            },
            Self::Islands => StyleTuning {
                relief: 1.5,
                base_lift: 0.0,
                ridge_amp: 0.8,
                warp: (3.0, 5.0),
                terrace_step: 1.0,
                terrace_strength: 0.0,
                feature_count: (0, 0),
                feature_amp: (0.0, 0.0),
                bowl_chance: 0.0,
                ridge_count: (0, 0),
                ridge_height: (0.0, 0.0),
            },
        }
    }
}

/// Per-style constants. Pairs are inclusive `(min, max)` ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StyleTuning {
    pub relief: f64,
    pub base_lift: f64,
    pub ridge_amp: f64,
    pub warp: (f64, f64),
    pub terrace_step: f64,
    pub terrace_strength: f64,
    pub feature_count: (usize, usize),
    pub feature_amp: (f64, f64),
    pub bowl_chance: f64,
    pub ridge_count: (usize, usize),
    pub ridge_height: (f64, f64),
}

/// Radial Gaussian bump. Negative amplitude carves a bowl.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MacroFeature {
    pub center: DVec2,
    pub radius: f64,
    pub amplitude: f64,
}

/// Linear escarpment with a Gaussian cross-section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RidgeLine {
    pub center: DVec2,
    /// Unit direction along the ridge.
    pub dir: DVec2,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

/// Immutable per-seed landform description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainProfile {
    pub style: LandformStyle,
    pub warp_amp: f64,
    pub warp_freq: f64,
    pub relief: f64,
    pub base_lift: f64,
    pub ridge_amp: f64,
    pub features: Vec<MacroFeature>,
    pub ridges: Vec<RidgeLine>,
    pub terrace_step: f64,
    pub terrace_strength: f64,
    /// Highest designated landmark, used for snow and camera framing.
    pub peak: PointOfInterest,
}

const FEATURE_DISK: f64 = 0.7;
const RIDGE_DISK: f64 = 0.55;

/// Generate the terrain profile, continuing the layout stream after the biome profile.
pub fn generate_terrain_profile(
    rng: &mut Mulberry32,
    params: &WorldParams,
    noise: &ValueNoise,
    biome: &BiomeProfile,
) -> TerrainProfile {
    let style = match biome.mode {
        BiomeMode::MiniIslands => LandformStyle::Islands,
        BiomeMode::Mainland => {
            LandformStyle::MAINLAND[rng.pick_index(LandformStyle::MAINLAND.len())]
        }
    };
    let tuning = style.tuning();

    let warp_amp = rng.range(tuning.warp.0, tuning.warp.1);
    let warp_freq = rng.range(0.008, 0.014);

    let features = place_features(rng, params, noise, biome, &tuning);
    let ridges = draw_ridges(rng, params, &tuning);
    let peak = choose_peak(biome, &features);

    tracing::debug!(
        ?style,
        features = features.len(),
        ridges = ridges.len(),
        "generated terrain profile"
    );

    TerrainProfile {
        style,
        warp_amp,
        warp_freq,
        relief: tuning.relief,
        base_lift: tuning.base_lift,
        ridge_amp: tuning.ridge_amp,
        features,
        ridges,
        terrace_step: tuning.terrace_step,
        terrace_strength: tuning.terrace_strength,
        peak,
    }
}

fn count_in(rng: &mut Mulberry32, range: (usize, usize)) -> usize {
    range.0 + rng.pick_index(range.1 - range.0 + 1)
}

fn place_features(
    rng: &mut Mulberry32,
    params: &WorldParams,
    noise: &ValueNoise,
    biome: &BiomeProfile,
    tuning: &StyleTuning,
) -> Vec<MacroFeature> {
    let count = count_in(rng, tuning.feature_count);
    let mut features: Vec<MacroFeature> = Vec::with_capacity(count);
    let river = (biome.mode == BiomeMode::Mainland).then_some(&biome.mainland.river);

    for index in 0..count {
        let radius = rng.range(10.0, 24.0);
        let magnitude = rng.range(tuning.feature_amp.0, tuning.feature_amp.1);
        let amplitude = if rng.chance(tuning.bowl_chance) { -magnitude } else { magnitude };

        let placed = place(
            rng,
            params.placement_attempts,
            "macro feature",
            |rng| point_in_disk(rng, FEATURE_DISK * params.half_extent),
            |&c| {
                let spaced = features
                    .iter()
                    .all(|f| c.distance(f.center) >= (radius + f.radius) * 0.7);
                let off_river =
                    river.is_none_or(|r| r.distance(c, noise) >= 0.5 * radius + r.width);
                spaced && off_river
            },
            || fallback_ring(index + 3, 0.5 * params.half_extent),
        );

        features.push(MacroFeature {
            center: placed.value,
            radius,
            amplitude,
        });
    }

    features
}

fn draw_ridges(rng: &mut Mulberry32, params: &WorldParams, tuning: &StyleTuning) -> Vec<RidgeLine> {
    let count = count_in(rng, tuning.ridge_count);
    (0..count)
        .map(|_| {
            let center = point_in_disk(rng, RIDGE_DISK * params.half_extent);
            let angle = rng.range(0.0, PI);
            RidgeLine {
                center,
                dir: DVec2::new(det_cos(angle), det_sin(angle)),
                length: rng.range(25.0, 55.0),
                width: rng.range(3.0, 7.0),
                height: rng.range(tuning.ridge_height.0, tuning.ridge_height.1),
            }
        })
        .collect()
}

fn choose_peak(biome: &BiomeProfile, features: &[MacroFeature]) -> PointOfInterest {
    if biome.mode == BiomeMode::MiniIslands
        && let Some(island) = biome
            .islands
            .islands
            .iter()
            .max_by(|a, b| a.height.total_cmp(&b.height))
    {
        return PointOfInterest {
            position: island.center,
            radius: island.radius * 0.4,
            degraded: false,
        };
    }

    features
        .iter()
        .filter(|f| f.amplitude > 0.0)
        .max_by(|a, b| a.amplitude.total_cmp(&b.amplitude))
        .map(|f| PointOfInterest {
            position: f.center,
            radius: f.radius,
            degraded: false,
        })
        .unwrap_or(PointOfInterest {
            position: DVec2::ZERO,
            radius: 12.0,
            degraded: true,
        })
}
