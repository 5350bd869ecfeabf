//! Preview renderers: shaded elevation and habitat maps from a baked grid.

use glam::DVec3;

use super::image::DebugImage;
use crate::ecology::Habitat;
use crate::grid::HeightGrid;
use crate::math::lerp;
use crate::params::WorldParams;
use crate::world::WorldGenerator;

/// Height above sea level where snow starts in previews.
pub const SNOW_LINE: f64 = 22.0;

const DEEP_WATER: [u8; 3] = [18, 52, 120];
const SHALLOW_WATER: [u8; 3] = [48, 110, 170];

/// Map a height to the elevation ramp: water, beach, grass, rock, snow.
pub fn height_color(h: f64, sea_level: f64) -> [u8; 3] {
    let above = h - sea_level;
    if above < -3.0 {
        DEEP_WATER
    } else if above < 0.0 {
        mix(DEEP_WATER, SHALLOW_WATER, (above + 3.0) / 3.0)
    } else if above < 0.8 {
        [214, 200, 150]
    } else if above < 0.55 * SNOW_LINE {
        mix([74, 140, 62], [120, 150, 80], (above - 0.8) / (0.55 * SNOW_LINE - 0.8))
    } else if above < SNOW_LINE {
        mix([128, 112, 96], [150, 145, 140], (above / SNOW_LINE - 0.55) / 0.45)
    } else {
        [238, 240, 245]
    }
}

/// Flat color for each habitat.
pub fn habitat_color(habitat: Habitat) -> [u8; 3] {
    match habitat {
        Habitat::Wetland => [60, 120, 110],
        Habitat::Alpine => [225, 230, 235],
        Habitat::Volcanic => [70, 45, 40],
        Habitat::Riparian => [90, 160, 90],
        Habitat::Scree => [140, 130, 120],
        Habitat::Clay => [175, 110, 70],
        Habitat::Meadow => [130, 180, 70],
        Habitat::Dryland => [205, 180, 110],
    }
}

/// Shaded elevation map, one pixel per grid sample. Outside the rim is transparent.
pub fn render_height_preview(grid: &HeightGrid, params: &WorldParams, sea_level: f64) -> DebugImage {
    render(grid, params.half_extent, |ix, iz, h| {
        let base = height_color(h, sea_level);
        if h < sea_level {
            base
        } else {
            shade(base, hillshade(grid, ix, iz))
        }
    })
}

/// Dominant habitat per grid sample, hill-shaded; water stays flat blue.
pub fn render_habitat_preview(world: &WorldGenerator, grid: &HeightGrid) -> DebugImage {
    let sea_level = world.sea_level();
    render(grid, world.params().half_extent, |ix, iz, h| {
        if h < sea_level {
            return height_color(h, sea_level);
        }
        let p = grid.world_pos(ix, iz);
        let normal = grid_normal(grid, ix, iz);
        let habitat = world.classify(p.x, p.y, h, normal.y).dominant();
        shade(habitat_color(habitat), hillshade(grid, ix, iz))
    })
}

fn render(
    grid: &HeightGrid,
    rim: f64,
    mut color: impl FnMut(usize, usize, f64) -> [u8; 3],
) -> DebugImage {
    let n = grid.resolution();
    let mut image = DebugImage::new(n as u32, n as u32);
    for iz in 0..n {
        for ix in 0..n {
            if grid.world_pos(ix, iz).length() > rim {
                continue;
            }
            let Some(h) = grid.get(ix, iz) else {
                continue;
            };
            let [r, g, b] = color(ix, iz, h);
            image.set_pixel(ix as u32, iz as u32, [r, g, b, 255]);
        }
    }
    image
}

/// Surface normal from central differences on the grid, one-sided at the border.
pub fn grid_normal(grid: &HeightGrid, ix: usize, iz: usize) -> DVec3 {
    let n = grid.resolution();
    let step = grid.spec().spacing();
    let sample = |x: usize, z: usize| grid.get(x, z).unwrap_or(0.0);

    let (x0, x1) = (ix.saturating_sub(1), (ix + 1).min(n - 1));
    let (z0, z1) = (iz.saturating_sub(1), (iz + 1).min(n - 1));
    let dx = (sample(x1, iz) - sample(x0, iz)) / ((x1 - x0) as f64 * step);
    let dz = (sample(ix, z1) - sample(ix, z0)) / ((z1 - z0) as f64 * step);
    DVec3::new(-dx, 1.0, -dz).normalize()
}

/// Lambert term against a low north-west sun, in `[0, 1]`.
pub fn hillshade(grid: &HeightGrid, ix: usize, iz: usize) -> f64 {
    let light = DVec3::new(-1.0, 1.4, -0.8).normalize();
    grid_normal(grid, ix, iz).dot(light).max(0.0)
}

fn shade(rgb: [u8; 3], light: f64) -> [u8; 3] {
    let k = 0.55 + 0.45 * light;
    rgb.map(|c| (c as f64 * k).round().clamp(0.0, 255.0) as u8)
}

fn mix(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    [0, 1, 2].map(|i| lerp(a[i] as f64, b[i] as f64, t).round() as u8)
}
