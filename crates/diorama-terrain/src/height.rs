//! Terrain height composition.
//!
//! [`TerrainSampler`] borrows the noise table, world constants and both
//! profiles, and evaluates `height(x, z)` as a pure function of those.
//! Mainland terrain layers, in order: domain warp, octave blend, ridge noise,
//! macro bumps, ridge lines, soft terracing, coastal shaping, the volcanic
//! crater, the waterfall ravine, pond basins, the rim fade, and finally river
//! carving. Island terrain uses a sea floor raised by per-island shapes.
//! Every blend is a smoothstep, so the field has no seams.

use glam::{DVec2, DVec3};

use crate::math::{lerp, smoothstep, soft_terrace};
use crate::params::WorldParams;
use crate::profile::{BiomeMode, BiomeProfile, TerrainProfile, segment_distance};
use crate::seed::{det_exp, det_hypot, det_pow};
use crate::value_noise::ValueNoise;

/// `(frequency, weight, noise offset)` for the four blended octaves.
const OCTAVES: [(f64, f64, f64); 4] = [
    (0.018, 1.25, 1.7),
    (0.042, 0.75, 5.1),
    (0.088, 0.35, 9.4),
    (0.25, 0.12, 13.2),
];
const OCTAVE_WEIGHT_SUM: f64 = 1.25 + 0.75 + 0.35 + 0.12;

const RIDGE_FREQ: f64 = 0.011;
const RIDGE_EXPONENT: f64 = 1.85;

const VOLCANO_CONE: f64 = 5.5;
const VOLCANO_BOWL: f64 = 4.0;
const VOLCANO_RIM: f64 = 2.2;
const VOLCANO_RIM_AT: f64 = 0.55;
const BASALT_STEP: f64 = 1.1;

const POND_RIM: f64 = 0.45;

/// Step used for central-difference normals.
pub const NORMAL_STEP: f64 = 0.35;

/// Read-only view over everything `height` depends on.
#[derive(Clone, Copy, Debug)]
pub struct TerrainSampler<'a> {
    noise: &'a ValueNoise,
    params: &'a WorldParams,
    biome: &'a BiomeProfile,
    terrain: &'a TerrainProfile,
}

impl<'a> TerrainSampler<'a> {
    pub fn new(
        noise: &'a ValueNoise,
        params: &'a WorldParams,
        biome: &'a BiomeProfile,
        terrain: &'a TerrainProfile,
    ) -> Self {
        Self {
            noise,
            params,
            biome,
            terrain,
        }
    }

    /// Terrain height at `(x, z)`. Total over all finite inputs.
    pub fn height(&self, x: f64, z: f64) -> f64 {
        match self.biome.mode {
            BiomeMode::Mainland => self.mainland_height(x, z),
            BiomeMode::MiniIslands => self.island_height(x, z),
        }
    }

    /// River centerline x at `z`, or `None` in island mode.
    pub fn river_center_x(&self, z: f64) -> Option<f64> {
        match self.biome.mode {
            BiomeMode::Mainland => Some(self.biome.mainland.river.center_x(z, self.noise)),
            BiomeMode::MiniIslands => None,
        }
    }

    /// Unit surface normal from central differences.
    pub fn surface_normal(&self, x: f64, z: f64) -> DVec3 {
        let e = NORMAL_STEP;
        let dx = (self.height(x + e, z) - self.height(x - e, z)) / (2.0 * e);
        let dz = (self.height(x, z + e) - self.height(x, z - e)) / (2.0 * e);
        DVec3::new(-dx, 1.0, -dz).normalize()
    }

    /// Slope angle in radians, 0 on flat ground.
    pub fn slope(&self, x: f64, z: f64) -> f64 {
        let n = self.surface_normal(x, z);
        n.y.clamp(-1.0, 1.0).acos()
    }

    /// Rim fade weight: 0 inside the fade radius, 1 at and beyond the rim.
    pub fn edge_fade(&self, x: f64, z: f64) -> f64 {
        let r = det_hypot(x, z) / self.params.half_extent;
        smoothstep(self.params.edge_fade_start, 1.0, r)
    }

    fn mainland_height(&self, x: f64, z: f64) -> f64 {
        let t = self.terrain;
        let (wx, wz) = self.warp(x, z);

        let mut h = self.octave_blend(wx, wz) * t.relief + t.base_lift;
        h += self.ridge_noise(wx, wz) * t.ridge_amp;
        h += self.macro_features(x, z);
        h += self.ridge_lines(x, z);
        h = lerp(h, soft_terrace(h, t.terrace_step), t.terrace_strength);
        h = self.coastal_shaping(x, z, h);
        h = self.volcanic_crater(x, z, h);
        h = self.waterfall_ravine(x, z, h);
        h = self.pond_basins(x, z, h);

        let fade = self.edge_fade(x, z);
        h = lerp(h, self.params.void_height, fade);

        self.carve_river(x, z, h, fade)
    }

    fn island_height(&self, x: f64, z: f64) -> f64 {
        let layout = &self.biome.islands;
        let (wx, wz) = self.warp(x, z);

        let floor = layout.sea_level - 3.2
            + 0.8 * self.noise.sample(wx * 0.05, wz * 0.05, 71.0)
            + 0.45 * self.noise.sample(wx * 0.13, wz * 0.13, 73.0);
        let relief = self.octave_blend(wx, wz) * self.terrain.relief;

        let mut h = floor;
        let p = DVec2::new(x, z);
        for (i, island) in layout.islands.iter().enumerate() {
            let detail = 1.0
                + island.detail * 0.3 * self.noise.sample(x * 0.08, z * 0.08, 80.0 + i as f64 * 7.1);
            let u = p.distance(island.center) / (island.radius * detail);
            let reach = smoothstep(1.3, 0.9, u);
            if reach <= 0.0 {
                continue;
            }
            let body = det_pow(smoothstep(1.0, 0.0, u), 1.3);
            // Beach shelf just below the waterline around the shore.
            let shelf = 0.5 * smoothstep(1.15, 0.95, u);
            let target = layout.sea_level + shelf + island.height * body + relief * body;
            h = h.max(lerp(h, target, reach));
        }

        h += self.ridge_noise(wx, wz) * self.terrain.ridge_amp * 0.5;

        let fade = self.edge_fade(x, z);
        lerp(h, self.params.void_height, fade)
    }

    /// Step 1: offset the sample point by two noise fields.
    fn warp(&self, x: f64, z: f64) -> (f64, f64) {
        let f = self.terrain.warp_freq;
        let a = self.terrain.warp_amp;
        (
            x + a * self.noise.sample(x * f, z * f, 11.3),
            z + a * self.noise.sample(x * f, z * f, 47.9),
        )
    }

    /// Step 2: weighted octave sum, normalized to `[-1, 1]`.
    fn octave_blend(&self, x: f64, z: f64) -> f64 {
        OCTAVES
            .iter()
            .map(|&(freq, weight, offset)| weight * self.noise.sample(x * freq, z * freq, offset))
            .sum::<f64>()
            / OCTAVE_WEIGHT_SUM
    }

    /// Step 3: `|noise|^1.85` at low frequency, in `[0, 1]`.
    fn ridge_noise(&self, x: f64, z: f64) -> f64 {
        let n = self.noise.sample(x * RIDGE_FREQ, z * RIDGE_FREQ, 21.5);
        det_pow(n.abs(), RIDGE_EXPONENT)
    }

    /// Step 4: radial Gaussian bumps and bowls.
    fn macro_features(&self, x: f64, z: f64) -> f64 {
        let p = DVec2::new(x, z);
        self.terrain
            .features
            .iter()
            .map(|f| {
                let d2 = p.distance_squared(f.center);
                f.amplitude * det_exp(-d2 / (2.0 * f.radius * f.radius))
            })
            .sum()
    }

    /// Step 5: Gaussian cross-section around each ridge axis, tapered at the ends.
    fn ridge_lines(&self, x: f64, z: f64) -> f64 {
        let p = DVec2::new(x, z);
        self.terrain
            .ridges
            .iter()
            .map(|r| {
                let rel = p - r.center;
                let along = rel.dot(r.dir);
                let across = rel.perp_dot(r.dir);
                let half_len = 0.5 * r.length;
                let taper = smoothstep(half_len, 0.6 * half_len, along.abs());
                r.height * det_exp(-(across * across) / (2.0 * r.width * r.width)) * taper
            })
            .sum()
    }

    /// Step 7: pull the sea side of the coastline down to a dune-rippled floor.
    fn coastal_shaping(&self, x: f64, z: f64, h: f64) -> f64 {
        let coast = &self.biome.mainland.coast;
        let t = coast.sea_factor(x, z);
        if t <= 0.0 {
            return h;
        }
        let dune = 0.6 * self.noise.sample(x * 0.09, z * 0.09, 61.0);
        let target = self.params.water_level - 1.2 - 2.8 * t + dune;
        lerp(h, target, t) - 1.8 * t * t
    }

    /// Step 8: cone, crater bowl and rim around the volcano, with basalt steps.
    fn volcanic_crater(&self, x: f64, z: f64, h: f64) -> f64 {
        let volcano = &self.biome.volcano;
        let radius = volcano.radius;
        let d = DVec2::new(x, z).distance(volcano.position);
        if d >= radius {
            return h;
        }
        let u = d / radius;
        let influence = smoothstep(1.0, 0.8, u);

        let cone = VOLCANO_CONE * smoothstep(1.0, 0.25, u);
        let inner = (u / VOLCANO_RIM_AT).min(1.0);
        let bowl = VOLCANO_BOWL * (1.0 - inner * inner).powi(2);
        let rim_dist = (u - VOLCANO_RIM_AT) / 0.14;
        let rim = VOLCANO_RIM * det_exp(-rim_dist * rim_dist);

        let shaped = h + cone + rim - bowl;
        let stepped = lerp(shaped, soft_terrace(shaped, BASALT_STEP), 0.3);
        lerp(h, stepped, influence)
    }

    /// Step 9: narrow channel from the spring pond to the river with a lip drop.
    fn waterfall_ravine(&self, x: f64, z: f64, h: f64) -> f64 {
        let Some(fall) = &self.biome.mainland.fall else {
            return h;
        };
        let (d, t) = segment_distance(DVec2::new(x, z), fall.source, fall.target);
        let sigma = 0.5 * fall.width;
        let g = det_exp(-(d * d) / (2.0 * sigma * sigma));
        let lip = fall.drop * smoothstep(0.04, 0.16, t);
        h - (fall.depth + lip) * g
    }

    /// Step 10: Gaussian basin and thin rim for each pond.
    fn pond_basins(&self, x: f64, z: f64, h: f64) -> f64 {
        let p = DVec2::new(x, z);
        self.biome.mainland.ponds.iter().fold(h, |h, pond| {
            let d = p.distance(pond.center);
            let sigma = 0.55 * pond.radius;
            let basin = pond.depth * det_exp(-(d * d) / (2.0 * sigma * sigma));
            let rim_dist = (d - pond.radius) / (0.18 * pond.radius);
            h - basin + POND_RIM * det_exp(-rim_dist * rim_dist)
        })
    }

    /// Step 12: quadratic channel along the river, bed pulled to channel height.
    ///
    /// Scaled by `1 - fade` so the rim still reaches the void height exactly.
    fn carve_river(&self, x: f64, z: f64, h: f64, fade: f64) -> f64 {
        let river = &self.biome.mainland.river;
        let dx = (x - river.center_x(z, self.noise)).abs();
        let half_width = 0.5 * river.width;
        let reach = 1.6 * half_width;
        if dx >= reach {
            return h;
        }
        let k = 1.0 - (dx / reach).powi(2);
        let carved = h - river.depth * k;
        let core = smoothstep(half_width, 0.35 * half_width, dx);
        let bedded = lerp(carved, carved.min(self.params.channel_height), core);
        lerp(h, bedded, 1.0 - fade)
    }
}
