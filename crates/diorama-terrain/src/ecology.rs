//! Ecology classifier: climate-style weights per surface point.
//!
//! The classifier never feeds back into the height field. It combines a
//! latitude gradient, a few low-frequency noise fields (decorrelated by fixed
//! offsets), proximity to water and an altitude lapse rate into ten weights in
//! `[0, 1]`, which scatter and the preview renderers read.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::math::{clamp01, smoothstep};
use crate::params::WorldParams;
use crate::profile::{BiomeMode, BiomeProfile};
use crate::value_noise::ValueNoise;

/// Temperature drop per unit of altitude above the water.
const LAPSE_RATE: f64 = 0.022;

/// Classification weights at one point. Every field lies in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EcologySample {
    pub temperature: f64,
    pub moisture: f64,
    pub geology: f64,
    pub dryness: f64,
    pub wetland: f64,
    pub alpine: f64,
    pub volcanic: f64,
    pub clay: f64,
    pub riparian: f64,
    pub scree: f64,
}

/// Coarse habitat label derived from an [`EcologySample`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Habitat {
    Wetland,
    Alpine,
    Volcanic,
    Riparian,
    Scree,
    Clay,
    Meadow,
    Dryland,
}

impl Habitat {
    pub const ALL: [Habitat; 8] = [
        Habitat::Wetland,
        Habitat::Alpine,
        Habitat::Volcanic,
        Habitat::Riparian,
        Habitat::Scree,
        Habitat::Clay,
        Habitat::Meadow,
        Habitat::Dryland,
    ];
}

impl EcologySample {
    /// Strongest habitat signal. Hard features win over climate.
    pub fn dominant(&self) -> Habitat {
        if self.volcanic > 0.6 {
            Habitat::Volcanic
        } else if self.wetland > 0.5 {
            Habitat::Wetland
        } else if self.alpine > 0.55 {
            Habitat::Alpine
        } else if self.scree > 0.55 {
            Habitat::Scree
        } else if self.riparian > 0.45 {
            Habitat::Riparian
        } else if self.clay > 0.5 {
            Habitat::Clay
        } else if self.dryness > 0.62 {
            Habitat::Dryland
        } else {
            Habitat::Meadow
        }
    }

    /// Iterate `(name, value)` pairs, in declaration order.
    pub fn fields(&self) -> [(&'static str, f64); 10] {
        [
            ("temperature", self.temperature),
            ("moisture", self.moisture),
            ("geology", self.geology),
            ("dryness", self.dryness),
            ("wetland", self.wetland),
            ("alpine", self.alpine),
            ("volcanic", self.volcanic),
            ("clay", self.clay),
            ("riparian", self.riparian),
            ("scree", self.scree),
        ]
    }
}

/// Proximity to each kind of water, each in `[0, 1]` (1 = on the water).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaterProximity {
    pub river: f64,
    pub coast: f64,
    pub pond: f64,
}

impl WaterProximity {
    /// Combined wetness signal; the open coast counts for less than fresh water.
    pub fn combined(&self) -> f64 {
        self.river.max(self.pond).max(0.7 * self.coast)
    }
}

/// Read-only classifier over a world's noise, constants and layout.
#[derive(Clone, Copy, Debug)]
pub struct EcologySampler<'a> {
    noise: &'a ValueNoise,
    params: &'a WorldParams,
    biome: &'a BiomeProfile,
}

impl<'a> EcologySampler<'a> {
    pub fn new(noise: &'a ValueNoise, params: &'a WorldParams, biome: &'a BiomeProfile) -> Self {
        Self {
            noise,
            params,
            biome,
        }
    }

    /// Classify the surface point `(x, y, z)` whose normal has vertical component `normal_y`.
    pub fn classify(&self, x: f64, z: f64, y: f64, normal_y: f64) -> EcologySample {
        let n = self.noise;
        let altitude = y - self.biome.sea_level(self.params);
        let uplift = altitude.max(0.0);
        let slope = clamp01(1.0 - normal_y);
        let flat = smoothstep(0.25, 0.05, slope);
        let water = self.water_proximity(x, z, altitude);
        let wet = water.combined();

        let lat = (z / self.params.half_extent).clamp(-1.0, 1.0);
        let broad = n.sample(x * 0.012, z * 0.012, 101.0);
        let fine = n.sample(x * 0.05, z * 0.05, 107.0);
        let temperature =
            clamp01(0.58 - 0.2 * lat + 0.16 * broad + 0.05 * fine - LAPSE_RATE * uplift);

        let moisture = clamp01(
            0.45 + 0.22 * n.sample(x * 0.015, z * 0.015, 131.0)
                + 0.08 * n.sample(x * 0.06, z * 0.06, 137.0)
                + 0.35 * wet
                - 0.12 * slope
                - 0.008 * uplift,
        );

        let geology = clamp01(0.5 + 0.6 * n.sample(x * 0.02, z * 0.02, 151.0));
        let dryness = clamp01(0.5 + 0.8 * (temperature - moisture) + 0.2 * slope - 0.3 * wet);

        let lowland = smoothstep(3.5, 0.2, altitude);
        let wetland = clamp01(
            (smoothstep(0.55, 0.9, moisture) * lowland + 0.7 * water.pond * lowland) * flat,
        );

        let alpine = clamp01(
            smoothstep(16.0, 26.0, altitude + 4.0 * broad)
                + 0.5 * smoothstep(0.35, 0.15, temperature),
        );

        let volcano = &self.biome.volcano;
        let d = DVec2::new(x, z).distance(volcano.position);
        let volcanic = clamp01(
            smoothstep(1.6 * volcano.radius, 0.6 * volcano.radius, d)
                + 0.2 * smoothstep(0.75, 0.95, geology),
        );

        let clay = clamp01(
            smoothstep(0.35, 0.75, geology)
                * smoothstep(8.0, 1.0, altitude)
                * (0.4 + 0.6 * moisture)
                * flat,
        );
        let riparian = clamp01(water.river.max(water.pond) * smoothstep(4.0, 0.5, altitude));
        let scree = clamp01(smoothstep(0.25, 0.55, slope) * (0.5 + 0.5 * smoothstep(8.0, 20.0, altitude)));

        EcologySample {
            temperature,
            moisture,
            geology,
            dryness,
            wetland,
            alpine,
            volcanic,
            clay,
            riparian,
            scree,
        }
    }

    /// Falloffs toward the river centerline, the shore and every pond.
    pub fn water_proximity(&self, x: f64, z: f64, altitude: f64) -> WaterProximity {
        let p = DVec2::new(x, z);
        match self.biome.mode {
            BiomeMode::Mainland => {
                let layout = &self.biome.mainland;
                let river = &layout.river;
                let half_width = 0.5 * river.width;
                let dx = river.distance(p, self.noise);
                let coast = &layout.coast;
                WaterProximity {
                    river: smoothstep(half_width + 22.0, half_width, dx),
                    coast: smoothstep(coast.offset - 30.0, coast.offset, coast.project(x, z)),
                    pond: layout
                        .ponds
                        .iter()
                        .map(|pond| smoothstep(2.2 * pond.radius, pond.radius, p.distance(pond.center)))
                        .fold(0.0, f64::max),
                }
            }
            // Islands have no fresh water; the shore is everything close to sea level.
            BiomeMode::MiniIslands => WaterProximity {
                river: 0.0,
                coast: smoothstep(5.0, 0.0, altitude),
                pond: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::generate_biome_profile;
    use crate::rng::Mulberry32;
    use crate::seed::WorldSeed;

    fn setup(seed: u32, mode: BiomeMode) -> (ValueNoise, WorldParams, BiomeProfile) {
        let params = WorldParams::default();
        let world_seed = WorldSeed(seed);
        let noise = ValueNoise::new(world_seed.noise_seed());
        let biome = generate_biome_profile(&mut world_seed.layout_rng(), &params, &noise, mode);
        (noise, params, biome)
    }

    #[test]
    fn test_all_fields_in_unit_range() {
        for mode in [BiomeMode::Mainland, BiomeMode::MiniIslands] {
            let (noise, params, biome) = setup(31337, mode);
            let sampler = EcologySampler::new(&noise, &params, &biome);
            let mut rng = Mulberry32::new(9);
            for _ in 0..4000 {
                let x = rng.range(-150.0, 150.0);
                let z = rng.range(-150.0, 150.0);
                let y = rng.range(-20.0, 60.0);
                let ny = rng.range(0.0, 1.0);
                let s = sampler.classify(x, z, y, ny);
                for (name, v) in s.fields() {
                    assert!((0.0..=1.0).contains(&v), "{mode}: {name} = {v} at ({x}, {z})");
                }
            }
        }
    }

    #[test]
    fn test_classify_deterministic() {
        let (noise_a, params, biome_a) = setup(42, BiomeMode::Mainland);
        let (noise_b, _, biome_b) = setup(42, BiomeMode::Mainland);
        let a = EcologySampler::new(&noise_a, &params, &biome_a);
        let b = EcologySampler::new(&noise_b, &params, &biome_b);
        for i in 0..100 {
            let x = i as f64 * 1.7 - 80.0;
            let z = i as f64 * -0.9 + 40.0;
            assert_eq!(a.classify(x, z, 3.0, 0.9), b.classify(x, z, 3.0, 0.9));
        }
    }

    #[test]
    fn test_volcano_center_is_volcanic() {
        let (noise, params, biome) = setup(12345, BiomeMode::Mainland);
        let sampler = EcologySampler::new(&noise, &params, &biome);
        let v = biome.volcano.position;
        let s = sampler.classify(v.x, v.y, 6.0, 0.95);
        assert_eq!(s.volcanic, 1.0);
        assert_eq!(s.dominant(), Habitat::Volcanic);
    }

    #[test]
    fn test_altitude_cools_and_raises_alpine() {
        let (noise, params, biome) = setup(7, BiomeMode::Mainland);
        let sampler = EcologySampler::new(&noise, &params, &biome);
        let low = sampler.classify(10.0, 10.0, 2.0, 1.0);
        let high = sampler.classify(10.0, 10.0, 34.0, 1.0);
        assert!(high.temperature < low.temperature);
        assert!(high.alpine > low.alpine);
        assert!(high.alpine > 0.9, "alpine {} at high altitude", high.alpine);
    }

    #[test]
    fn test_steep_slopes_are_scree() {
        let (noise, params, biome) = setup(7, BiomeMode::Mainland);
        let sampler = EcologySampler::new(&noise, &params, &biome);
        let flat = sampler.classify(-20.0, 5.0, 12.0, 1.0);
        let steep = sampler.classify(-20.0, 5.0, 12.0, 0.3);
        assert_eq!(flat.scree, 0.0);
        assert!(steep.scree > 0.5);
    }

    #[test]
    fn test_river_bank_is_riparian() {
        let (noise, params, biome) = setup(12345, BiomeMode::Mainland);
        let sampler = EcologySampler::new(&noise, &params, &biome);
        let z = 0.0;
        let x = biome.mainland.river.center_x(z, &noise);
        let prox = sampler.water_proximity(x, z, 0.0);
        assert_eq!(prox.river, 1.0);
        let s = sampler.classify(x, z, params.water_level + 0.3, 0.98);
        assert!(s.riparian > 0.9);
    }

    #[test]
    fn test_island_mode_has_only_shore_water() {
        let (noise, params, biome) = setup(777, BiomeMode::MiniIslands);
        let sampler = EcologySampler::new(&noise, &params, &biome);
        let prox = sampler.water_proximity(0.0, 0.0, 10.0);
        assert_eq!(prox.river, 0.0);
        assert_eq!(prox.pond, 0.0);
        assert_eq!(prox.coast, 0.0);
        assert_eq!(sampler.water_proximity(0.0, 0.0, -1.0).coast, 1.0);
    }

    #[test]
    fn test_dominant_habitat_priorities() {
        let base = EcologySample {
            dryness: 0.3,
            ..Default::default()
        };
        assert_eq!(base.dominant(), Habitat::Meadow);
        assert_eq!(
            EcologySample {
                dryness: 0.9,
                ..base
            }
            .dominant(),
            Habitat::Dryland
        );
        assert_eq!(
            EcologySample {
                wetland: 0.8,
                alpine: 0.8,
                ..base
            }
            .dominant(),
            Habitat::Wetland
        );
        assert_eq!(
            EcologySample {
                volcanic: 0.9,
                wetland: 0.9,
                ..base
            }
            .dominant(),
            Habitat::Volcanic
        );
    }
}
