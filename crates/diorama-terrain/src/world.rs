//! World generator: one seed, one set of immutable profiles, pure queries.

use glam::DVec3;

use crate::ecology::{EcologySample, EcologySampler};
use crate::height::TerrainSampler;
use crate::params::WorldParams;
use crate::profile::{
    BiomeMode, BiomeProfile, TerrainProfile, generate_biome_profile, generate_terrain_profile,
};
use crate::rng::Mulberry32;
use crate::seed::WorldSeed;
use crate::value_noise::ValueNoise;
use crate::water::compute_pond_levels;

/// Owns everything a world's queries read.
///
/// After construction nothing is mutated except by [`recompute_pond_levels`],
/// so `&WorldGenerator` can be shared freely across worker threads.
///
/// [`recompute_pond_levels`]: WorldGenerator::recompute_pond_levels
#[derive(Clone, Debug)]
pub struct WorldGenerator {
    seed: WorldSeed,
    params: WorldParams,
    noise: ValueNoise,
    biome: BiomeProfile,
    terrain: TerrainProfile,
}

impl WorldGenerator {
    /// Build a world, drawing both profiles from `rng`.
    ///
    /// `rng` is normally `seed.layout_rng()`; passing a different stream lets
    /// callers decouple layout from the seed used for the noise tables.
    pub fn new(seed: WorldSeed, rng: &mut Mulberry32, mode: BiomeMode) -> Self {
        Self::with_params(seed, rng, mode, WorldParams::default())
    }

    /// Build a world from the seed's own layout stream.
    pub fn from_seed(seed: WorldSeed, mode: BiomeMode) -> Self {
        Self::new(seed, &mut seed.layout_rng(), mode)
    }

    /// Build a world with custom constants.
    pub fn with_params(
        seed: WorldSeed,
        rng: &mut Mulberry32,
        mode: BiomeMode,
        params: WorldParams,
    ) -> Self {
        let noise = ValueNoise::new(seed.noise_seed());
        let biome = generate_biome_profile(rng, &params, &noise, mode);
        let terrain = generate_terrain_profile(rng, &params, &noise, &biome);

        let mut world = Self {
            seed,
            params,
            noise,
            biome,
            terrain,
        };
        world.recompute_pond_levels();

        tracing::info!(
            %seed,
            %mode,
            style = ?world.terrain.style,
            degraded = world.biome.degraded_count(),
            "world generated"
        );
        world
    }

    fn sampler(&self) -> TerrainSampler<'_> {
        TerrainSampler::new(&self.noise, &self.params, &self.biome, &self.terrain)
    }

    fn ecology(&self) -> EcologySampler<'_> {
        EcologySampler::new(&self.noise, &self.params, &self.biome)
    }

    /// Terrain height at `(x, z)`.
    pub fn height(&self, x: f64, z: f64) -> f64 {
        self.sampler().height(x, z)
    }

    /// Ecology weights for the surface point `(x, y, z)`.
    pub fn classify(&self, x: f64, z: f64, y: f64, normal_y: f64) -> EcologySample {
        self.ecology().classify(x, z, y, normal_y)
    }

    /// Sample height and normal at `(x, z)`, then classify that surface point.
    pub fn classify_surface(&self, x: f64, z: f64) -> EcologySample {
        let y = self.height(x, z);
        let normal = self.surface_normal(x, z);
        self.classify(x, z, y, normal.y)
    }

    /// River centerline x at `z`. `None` in island mode.
    pub fn river_center_x(&self, z: f64) -> Option<f64> {
        self.sampler().river_center_x(z)
    }

    /// Unit surface normal at `(x, z)`.
    pub fn surface_normal(&self, x: f64, z: f64) -> DVec3 {
        self.sampler().surface_normal(x, z)
    }

    /// Seed this world was built from.
    pub fn seed(&self) -> WorldSeed {
        self.seed
    }

    /// Active biome layout.
    pub fn mode(&self) -> BiomeMode {
        self.biome.mode
    }

    /// Fixed world constants.
    pub fn params(&self) -> &WorldParams {
        &self.params
    }

    /// Large-scale layout: river, coast, ponds, islands and points of interest.
    pub fn biome(&self) -> &BiomeProfile {
        &self.biome
    }

    /// Landform style and macro shapes.
    pub fn terrain(&self) -> &TerrainProfile {
        &self.terrain
    }

    /// Noise field shared by the height and ecology samplers.
    pub fn noise(&self) -> &ValueNoise {
        &self.noise
    }

    /// Water surface height of the open sea.
    pub fn sea_level(&self) -> f64 {
        self.biome.sea_level(&self.params)
    }

    /// Refill every pond against the current height field.
    pub fn recompute_pond_levels(&mut self) {
        let mut ponds = self.biome.mainland.ponds.clone();
        compute_pond_levels(&mut ponds, |x, z| self.height(x, z));
        self.biome.mainland.ponds = ponds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_world_is_send_sync() {
        assert_send_sync::<WorldGenerator>();
    }

    #[test]
    fn test_independent_generators_agree_bitwise() {
        for mode in [BiomeMode::Mainland, BiomeMode::MiniIslands] {
            let a = WorldGenerator::from_seed(WorldSeed(90210), mode);
            let b = WorldGenerator::from_seed(WorldSeed(90210), mode);
            let mut rng = Mulberry32::new(4);
            for _ in 0..500 {
                let x = rng.range(-130.0, 130.0);
                let z = rng.range(-130.0, 130.0);
                let ha = a.height(x, z);
                assert_eq!(ha.to_bits(), b.height(x, z).to_bits());
                assert_eq!(a.classify(x, z, ha, 0.9), b.classify(x, z, ha, 0.9));
            }
        }
    }

    #[test]
    fn test_seed_12345_center_height() {
        let world = WorldGenerator::from_seed(WorldSeed(12345), BiomeMode::Mainland);
        let h = world.height(0.0, 0.0);
        assert!(h.is_finite());
        assert!((-12.0..=35.0).contains(&h), "height(0,0) = {h}");

        let again = WorldGenerator::from_seed(WorldSeed(12345), BiomeMode::Mainland);
        assert_eq!(h.to_bits(), again.height(0.0, 0.0).to_bits());
    }

    #[test]
    fn test_neighbouring_seeds_differ() {
        let a = WorldGenerator::from_seed(WorldSeed(12345), BiomeMode::Mainland);
        let b = WorldGenerator::from_seed(WorldSeed(12346), BiomeMode::Mainland);
        assert_ne!(a.height(0.0, 0.0), b.height(0.0, 0.0));
    }

    #[test]
    fn test_finite_difference_slope_bounded() {
        for seed in [1, 12345, 4242] {
            let world = WorldGenerator::from_seed(WorldSeed(seed), BiomeMode::Mainland);
            let eps = 1e-3;
            let mut rng = Mulberry32::new(seed);
            for _ in 0..2000 {
                let x = rng.range(-125.0, 125.0);
                let z = rng.range(-125.0, 125.0);
                let slope = (world.height(x + eps, z) - world.height(x, z)).abs() / eps;
                assert!(slope < 40.0, "seed {seed}: slope {slope} at ({x}, {z})");
            }
        }
    }

    #[test]
    fn test_river_center_continuous_and_bounded() {
        let world = WorldGenerator::from_seed(WorldSeed(12345), BiomeMode::Mainland);
        let half = world.params().half_extent;
        let mut prev = world.river_center_x(-200.0).expect("mainland river");
        let mut z = -200.0;
        while z < 200.0 {
            z += 0.02;
            let x = world.river_center_x(z).expect("mainland river");
            assert!(x.abs() < 0.5 * half);
            assert!((x - prev).abs() < 0.1, "river jumped at z={z}");
            prev = x;
        }
    }

    #[test]
    fn test_island_world_has_no_river() {
        let world = WorldGenerator::from_seed(WorldSeed(777), BiomeMode::MiniIslands);
        assert_eq!(world.river_center_x(0.0), None);
        assert!(world.biome().ponds().is_empty());
        assert!(world.sea_level() >= world.params().water_level);
    }

    #[test]
    fn test_pond_levels_filled_on_construction() {
        let world = WorldGenerator::from_seed(WorldSeed(2024), BiomeMode::Mainland);
        for pond in &world.biome().mainland.ponds {
            let level = pond.water_level.expect("levels computed at construction");
            let bottom = world.height(pond.center.x, pond.center.y);
            assert!(level >= bottom + 0.2 - 1e-9);
        }
    }

    #[test]
    fn test_explicit_stream_matches_from_seed() {
        let seed = WorldSeed(55);
        let a = WorldGenerator::new(seed, &mut seed.layout_rng(), BiomeMode::Mainland);
        let b = WorldGenerator::from_seed(seed, BiomeMode::Mainland);
        assert_eq!(a.biome(), b.biome());
        assert_eq!(a.terrain(), b.terrain());
    }

    #[test]
    fn test_accessors_expose_construction_inputs() {
        let world = WorldGenerator::from_seed(WorldSeed(31), BiomeMode::MiniIslands);
        assert_eq!(world.seed(), WorldSeed(31));
        assert_eq!(world.mode(), BiomeMode::MiniIslands);
        assert_eq!(world.params(), &WorldParams::default());
        assert_eq!(world.biome().mode, world.mode());
        assert_eq!(world.terrain().style, crate::profile::LandformStyle::Islands);
        let expected = ValueNoise::new(WorldSeed(31).noise_seed());
        assert_eq!(world.noise().table_seed(), expected.table_seed());
        let n = world.surface_normal(0.0, 0.0);
        assert!((n.length() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_classify_surface_in_range() {
        let world = WorldGenerator::from_seed(WorldSeed(8), BiomeMode::Mainland);
        for i in 0..40 {
            let s = world.classify_surface(i as f64 * 5.0 - 100.0, 17.0);
            for (name, v) in s.fields() {
                assert!((0.0..=1.0).contains(&v), "{name} = {v}");
            }
        }
    }
}
