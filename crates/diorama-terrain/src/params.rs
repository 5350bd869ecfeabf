//! Fixed world constants shared by every seed.

use serde::{Deserialize, Serialize};

/// Scalar constants describing the diorama's extent and water.
///
/// These never depend on the seed; every world is built inside the same disc.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldParams {
    /// Distance from the world center to the rim, in world units.
    pub half_extent: f64,
    /// Number of terrain mesh cells along one side.
    pub mesh_resolution: usize,
    /// Base water surface height.
    pub water_level: f64,
    /// Height the terrain fades to at the rim.
    pub void_height: f64,
    /// River width bounds: `[min, max]`.
    pub river_width: (f64, f64),
    /// River channel depth bounds: `[min, max]`.
    pub river_depth: (f64, f64),
    /// Height the river bed is pulled toward near its centerline.
    pub channel_height: f64,
    /// Fraction of `half_extent` where the rim fade begins.
    pub edge_fade_start: f64,
    /// Radius of the volcanic crater.
    pub volcano_radius: f64,
    /// Rejection-sampling budget per placed object.
    pub placement_attempts: u32,
    /// Minimum pond separation as a multiple of the summed radii.
    pub pond_margin: f64,
    /// Minimum island separation as a multiple of the summed radii.
    pub island_margin: f64,
}

impl Default for WorldParams {
    fn default() -> Self {
        let water_level = -1.2;
        Self {
            half_extent: 120.0,
            mesh_resolution: 220,
            water_level,
            void_height: -14.0,
            river_width: (5.0, 9.0),
            river_depth: (2.2, 3.4),
            channel_height: water_level - 1.6,
            edge_fade_start: 0.84,
            volcano_radius: 18.0,
            placement_attempts: 240,
            pond_margin: 1.6,
            island_margin: 1.08,
        }
    }
}

impl WorldParams {
    /// Distance from the center where terrain reaches `void_height`.
    pub fn rim_radius(&self) -> f64 {
        self.half_extent
    }

    /// Distance from the center where the rim fade starts.
    pub fn fade_radius(&self) -> f64 {
        self.half_extent * self.edge_fade_start
    }
}
