//! Per-seed world profiles: the large-scale layout and the landform style.
//!
//! Both profiles are drawn once from the layout stream, biome first, and are
//! read-only afterwards (pond water levels are the one second-pass field).

mod biome;
mod placement;
mod terrain;

pub use biome::{
    BiomeMode, BiomeProfile, Coastline, Island, IslandLayout, MainlandLayout, ParseBiomeModeError,
    PointOfInterest, Pond, RiverPath, WaterfallPath, generate_biome_profile,
};
pub use placement::{
    Placed, fallback_ring, place, point_in_annulus, point_in_disk, segment_distance,
};
pub use terrain::{
    LandformStyle, MacroFeature, RidgeLine, StyleTuning, TerrainProfile, generate_terrain_profile,
};
