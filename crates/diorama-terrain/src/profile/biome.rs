//! Biome profile: the seed's large-scale layout.
//!
//! Mainland worlds get a meandering river, a coastline, ponds (one of them a
//! spring feeding a waterfall down to the river) and two points of interest.
//! Mini-island worlds get a sea level and a scatter of islands instead. Both
//! layouts are always present; only the one matching [`BiomeMode`] is read.

use std::f64::consts::PI;
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::placement::{fallback_ring, place, point_in_annulus, point_in_disk, segment_distance};
use crate::math::smoothstep;
use crate::params::WorldParams;
use crate::rng::Mulberry32;
use crate::seed::{det_cos, det_sin};
use crate::value_noise::ValueNoise;

/// Which layout a world uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeMode {
    /// River valley with a coastline and ponds.
    #[default]
    Mainland,
    /// Scattered islands in a shallow sea.
    MiniIslands,
}

/// Fraction of the beach width the sea blend starts ahead of the shore.
const SHORE_LEAD: f64 = 0.35;

/// Error returned when a biome mode string is not recognized.
#[derive(Debug, thiserror::Error)]
#[error("unknown biome mode: {0:?} (expected \"mainland\" or \"miniIslands\")")]
pub struct ParseBiomeModeError(pub String);

impl FromStr for BiomeMode {
    type Err = ParseBiomeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainland" => Ok(Self::Mainland),
            "miniislands" | "mini-islands" | "mini_islands" | "islands" => Ok(Self::MiniIslands),
            _ => Err(ParseBiomeModeError(s.to_string())),
        }
    }
}

impl std::fmt::Display for BiomeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mainland => f.write_str("mainland"),
            Self::MiniIslands => f.write_str("miniIslands"),
        }
    }
}

/// Coefficients of the river centerline `x = f(z)`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiverPath {
    pub offset: f64,
    pub amp1: f64,
    pub freq1: f64,
    pub phase1: f64,
    pub amp2: f64,
    pub freq2: f64,
    pub phase2: f64,
    /// Amplitude of the low-frequency noise wobble.
    pub wobble: f64,
    pub width: f64,
    pub depth: f64,
}

impl RiverPath {
    /// Centerline x at `z`: two sine harmonics plus a noise wobble.
    ///
    /// Continuous in `z` and bounded by `|offset| + amp1 + amp2 + wobble`.
    pub fn center_x(&self, z: f64, noise: &ValueNoise) -> f64 {
        self.offset
            + self.amp1 * det_sin(z * self.freq1 + self.phase1)
            + self.amp2 * det_sin(z * self.freq2 + self.phase2)
            + self.wobble * noise.sample(3.7, z * 0.031, 91.0)
    }

    /// Largest possible `|center_x|`.
    pub fn max_excursion(&self) -> f64 {
        self.offset.abs() + self.amp1.abs() + self.amp2.abs() + self.wobble.abs()
    }

    /// Horizontal distance from `p` to the centerline at `p.y`.
    pub fn distance(&self, p: DVec2, noise: &ValueNoise) -> f64 {
        (p.x - self.center_x(p.y, noise)).abs()
    }
}

/// A straight coastline. Land lies on the side where `project < offset`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coastline {
    /// Unit vector pointing out to sea.
    pub dir: DVec2,
    /// Projected distance of the shore from the world center.
    pub offset: f64,
    /// Width of the beach-to-sea transition.
    pub width: f64,
}

impl Coastline {
    /// Signed distance of `(x, z)` along the seaward direction.
    pub fn project(&self, x: f64, z: f64) -> f64 {
        self.dir.dot(DVec2::new(x, z))
    }

    /// 0 on the land side, rising to 1 one beach width past the shore.
    pub fn sea_factor(&self, x: f64, z: f64) -> f64 {
        let threshold = self.offset - SHORE_LEAD * self.width;
        smoothstep(threshold, self.offset + self.width, self.project(x, z))
    }
}

/// A pond basin. `water_level` is filled in after the height field exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pond {
    pub center: DVec2,
    pub radius: f64,
    pub depth: f64,
    /// Fraction of the basin (bottom to rim) that holds water.
    pub fill: f64,
    pub water_level: Option<f64>,
    /// Placed by fallback after the rejection budget ran out.
    pub degraded: bool,
}

/// Straight ravine from the spring pond down to the river.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaterfallPath {
    pub source: DVec2,
    pub target: DVec2,
    pub width: f64,
    pub depth: f64,
    /// Extra drop at the lip near the source.
    pub drop: f64,
}

/// An island in mini-island mode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Island {
    pub center: DVec2,
    /// Footprint radius, in `[10, 26]`.
    pub radius: f64,
    /// Summit height above sea level, in `[3.8, 14.5]`.
    pub height: f64,
    /// Shoreline irregularity, in `[0.4, 1.0]`.
    pub detail: f64,
    pub degraded: bool,
}

/// A designated location (volcano, ruins, peak).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub position: DVec2,
    pub radius: f64,
    pub degraded: bool,
}

/// Mainland-only layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MainlandLayout {
    pub river: RiverPath,
    pub coast: Coastline,
    pub ponds: Vec<Pond>,
    /// Index into `ponds` of the spring.
    pub spring: Option<usize>,
    pub fall: Option<WaterfallPath>,
}

/// Island-only layout.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IslandLayout {
    pub sea_level: f64,
    pub islands: Vec<Island>,
}

/// Immutable per-seed layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeProfile {
    pub mode: BiomeMode,
    pub mainland: MainlandLayout,
    pub islands: IslandLayout,
    pub volcano: PointOfInterest,
    pub ruins: PointOfInterest,
}

impl BiomeProfile {
    /// Water surface height for this world.
    pub fn sea_level(&self, params: &WorldParams) -> f64 {
        match self.mode {
            BiomeMode::Mainland => params.water_level,
            BiomeMode::MiniIslands => self.islands.sea_level,
        }
    }

    /// Ponds of the active layout (empty in island mode).
    pub fn ponds(&self) -> &[Pond] {
        match self.mode {
            BiomeMode::Mainland => &self.mainland.ponds,
            BiomeMode::MiniIslands => &[],
        }
    }

    /// Number of layout objects that fell back to a default position.
    pub fn degraded_count(&self) -> usize {
        let ponds = self.mainland.ponds.iter().filter(|p| p.degraded).count();
        let islands = self.islands.islands.iter().filter(|i| i.degraded).count();
        ponds + islands + usize::from(self.volcano.degraded) + usize::from(self.ruins.degraded)
    }
}

const POND_DISK: f64 = 0.72;
const ISLAND_DISK: f64 = 0.68;
const RUINS_RADIUS: f64 = 7.0;

/// Generate the biome profile from the layout stream.
pub fn generate_biome_profile(
    rng: &mut Mulberry32,
    params: &WorldParams,
    noise: &ValueNoise,
    mode: BiomeMode,
) -> BiomeProfile {
    let profile = match mode {
        BiomeMode::Mainland => generate_mainland(rng, params, noise),
        BiomeMode::MiniIslands => generate_islands(rng, params),
    };
    tracing::debug!(
        %mode,
        ponds = profile.mainland.ponds.len(),
        islands = profile.islands.islands.len(),
        degraded = profile.degraded_count(),
        "generated biome profile"
    );
    profile
}

fn generate_mainland(rng: &mut Mulberry32, params: &WorldParams, noise: &ValueNoise) -> BiomeProfile {
    let half = params.half_extent;

    let river = RiverPath {
        offset: rng.range(-0.15, 0.15) * half,
        amp1: rng.range(6.0, 14.0),
        freq1: rng.range(0.018, 0.03),
        phase1: rng.range(0.0, 2.0 * PI),
        amp2: rng.range(2.0, 5.0),
        freq2: rng.range(0.05, 0.08),
        phase2: rng.range(0.0, 2.0 * PI),
        wobble: rng.range(2.0, 4.0),
        width: rng.range(params.river_width.0, params.river_width.1),
        depth: rng.range(params.river_depth.0, params.river_depth.1),
    };

    let side = if rng.chance(0.5) { 0.0 } else { PI };
    let angle = side + rng.range(-0.45, 0.45);
    let coast = Coastline {
        dir: DVec2::new(det_cos(angle), det_sin(angle)),
        offset: rng.range(0.48, 0.62) * half,
        width: rng.range(14.0, 22.0),
    };

    let ponds = place_ponds(rng, params, noise, &river, &coast);

    let spring = ponds
        .iter()
        .enumerate()
        .map(|(i, p)| (i, river.distance(p.center, noise)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i);

    let fall = spring.and_then(|index| {
        let source = ponds[index].center;
        let z = source.y + rng.range(-10.0, 10.0);
        let width = rng.range(2.2, 3.4);
        let depth = rng.range(1.4, 2.2);
        let drop = rng.range(2.5, 4.0);
        let target = DVec2::new(river.center_x(z, noise), z);
        let length = source.distance(target);
        (12.0..=0.9 * half).contains(&length).then_some(WaterfallPath {
            source,
            target,
            width,
            depth,
            drop,
        })
    });

    let volcano = place_volcano(rng, params, noise, &river, &coast, &ponds, fall.as_ref());
    let ruins = place_ruins(rng, params, noise, &river, &coast, &ponds, &volcano);

    BiomeProfile {
        mode: BiomeMode::Mainland,
        mainland: MainlandLayout {
            river,
            coast,
            ponds,
            spring,
            fall,
        },
        islands: IslandLayout::default(),
        volcano,
        ruins,
    }
}

fn place_ponds(
    rng: &mut Mulberry32,
    params: &WorldParams,
    noise: &ValueNoise,
    river: &RiverPath,
    coast: &Coastline,
) -> Vec<Pond> {
    let count = 3 + rng.pick_index(3);
    let mut ponds: Vec<Pond> = Vec::with_capacity(count);

    for index in 0..count {
        let radius = rng.range(4.5, 8.5);
        let depth = rng.range(1.6, 3.0);
        let fill = rng.range(0.55, 0.85);

        let placed = place(
            rng,
            params.placement_attempts,
            "pond",
            |rng| point_in_disk(rng, POND_DISK * params.half_extent),
            |&c| {
                let clear_of_ponds = ponds
                    .iter()
                    .all(|p| c.distance(p.center) >= (radius + p.radius) * params.pond_margin);
                let clear_of_river = river.distance(c, noise) >= radius + river.width + 6.0;
                let inland = coast.project(c.x, c.y) <= coast.offset - 0.6 * coast.width - radius;
                clear_of_ponds && clear_of_river && inland
            },
            || fallback_ring(index, 0.3 * params.half_extent),
        );

        ponds.push(Pond {
            center: placed.value,
            radius,
            depth,
            fill,
            water_level: None,
            degraded: placed.degraded,
        });
    }

    ponds
}

fn place_volcano(
    rng: &mut Mulberry32,
    params: &WorldParams,
    noise: &ValueNoise,
    river: &RiverPath,
    coast: &Coastline,
    ponds: &[Pond],
    fall: Option<&WaterfallPath>,
) -> PointOfInterest {
    let half = params.half_extent;
    let radius = params.volcano_radius;

    let placed = place(
        rng,
        params.placement_attempts,
        "volcano",
        |rng| point_in_annulus(rng, 0.35 * half, 0.7 * half),
        |&c| {
            let clear_of_river = river.distance(c, noise) >= radius + river.width + 6.0;
            let inland = coast.project(c.x, c.y) <= coast.offset - 0.5 * coast.width - 0.5 * radius;
            let clear_of_ponds = ponds
                .iter()
                .all(|p| c.distance(p.center) >= radius + p.radius + 8.0);
            let clear_of_fall = fall.is_none_or(|f| {
                segment_distance(c, f.source, f.target).0 >= radius + f.width + 4.0
            });
            clear_of_river && inland && clear_of_ponds && clear_of_fall
        },
        || -coast.dir * (0.5 * half),
    );

    PointOfInterest {
        position: placed.value,
        radius,
        degraded: placed.degraded,
    }
}

fn place_ruins(
    rng: &mut Mulberry32,
    params: &WorldParams,
    noise: &ValueNoise,
    river: &RiverPath,
    coast: &Coastline,
    ponds: &[Pond],
    volcano: &PointOfInterest,
) -> PointOfInterest {
    let half = params.half_extent;

    let placed = place(
        rng,
        params.placement_attempts,
        "ruins",
        |rng| point_in_annulus(rng, 0.2 * half, 0.75 * half),
        |&c| {
            let clear_of_river = river.distance(c, noise) >= RUINS_RADIUS + river.width + 8.0;
            let inland = coast.project(c.x, c.y) <= coast.offset - coast.width;
            let clear_of_ponds = ponds
                .iter()
                .all(|p| c.distance(p.center) >= RUINS_RADIUS + p.radius + 6.0);
            let clear_of_volcano = c.distance(volcano.position) >= volcano.radius + RUINS_RADIUS + 14.0;
            clear_of_river && inland && clear_of_ponds && clear_of_volcano
        },
        || coast.dir.perp() * (0.4 * half),
    );

    PointOfInterest {
        position: placed.value,
        radius: RUINS_RADIUS,
        degraded: placed.degraded,
    }
}

fn generate_islands(rng: &mut Mulberry32, params: &WorldParams) -> BiomeProfile {
    let half = params.half_extent;
    let sea_level = params.water_level + rng.range(0.0, 0.5);

    let count = 4 + rng.pick_index(4);
    let mut islands: Vec<Island> = Vec::with_capacity(count);

    for index in 0..count {
        let radius = rng.range(10.0, 26.0);
        let height = rng.range(3.8, 14.5);
        let detail = rng.range(0.4, 1.0);

        let placed = place(
            rng,
            params.placement_attempts,
            "island",
            |rng| point_in_disk(rng, ISLAND_DISK * half),
            |&c| {
                let inside = c.length() + 0.6 * radius <= 0.78 * half;
                let clear = islands
                    .iter()
                    .all(|i| c.distance(i.center) >= (radius + i.radius) * params.island_margin);
                inside && clear
            },
            || fallback_ring(index, 0.45 * half),
        );

        islands.push(Island {
            center: placed.value,
            radius,
            height,
            detail,
            degraded: placed.degraded,
        });
    }

    // Volcano crowns the tallest island; ruins sit on the broadest other one.
    let tallest = islands
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.height.total_cmp(&b.1.height))
        .map(|(i, _)| i);

    let volcano = match tallest {
        Some(i) => PointOfInterest {
            position: islands[i].center,
            radius: islands[i].radius * 0.5,
            degraded: false,
        },
        None => PointOfInterest {
            position: DVec2::ZERO,
            radius: params.volcano_radius,
            degraded: true,
        },
    };

    let angle = rng.range(0.0, 2.0 * PI);
    let broadest_other = islands
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != tallest)
        .max_by(|a, b| a.1.radius.total_cmp(&b.1.radius));

    let ruins = match broadest_other {
        Some((_, island)) => PointOfInterest {
            position: island.center
                + DVec2::new(det_cos(angle), det_sin(angle)) * (island.radius * 0.3),
            radius: RUINS_RADIUS,
            degraded: false,
        },
        None => PointOfInterest {
            position: fallback_ring(count, 0.3 * half),
            radius: RUINS_RADIUS,
            degraded: true,
        },
    };

    BiomeProfile {
        mode: BiomeMode::MiniIslands,
        mainland: MainlandLayout::default(),
        islands: IslandLayout { sea_level, islands },
        volcano,
        ruins,
    }
}
