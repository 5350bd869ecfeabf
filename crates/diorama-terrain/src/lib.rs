//! Deterministic diorama terrain: seeded profiles, height composition, and ecology classification.
//!
//! A [`WorldGenerator`] is built once from a [`WorldSeed`] and a [`BiomeMode`];
//! afterwards `height`, `classify` and `river_center_x` are pure queries that
//! may be called from any thread in any order.

mod ecology;
mod grid;
mod height;
mod math;
mod params;
mod rng;
mod scatter;
mod seed;
mod value_noise;
mod water;
mod world;

pub mod debug_viz;
pub mod profile;

pub use ecology::{EcologySample, EcologySampler, Habitat, WaterProximity};
pub use grid::{GridError, GridSpec, HeightGrid};
pub use height::{NORMAL_STEP, TerrainSampler};
pub use math::{clamp01, lerp, smoothstep, soft_terrace};
pub use params::WorldParams;
pub use profile::{
    BiomeMode, BiomeProfile, LandformStyle, ParseBiomeModeError, Pond, TerrainProfile,
    generate_biome_profile, generate_terrain_profile,
};
pub use rng::Mulberry32;
pub use scatter::{ScatterConfig, ScatterInstance, ScatterKind, scatter_vegetation};
pub use seed::{
    WorldSeed, det_atan2, det_cos, det_exp, det_hypot, det_pow, det_sin, det_sqrt, hash_heights,
};
pub use value_noise::ValueNoise;
pub use water::{compute_pond_levels, pond_level, rim_minimum};
pub use world::WorldGenerator;
