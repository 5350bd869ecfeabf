//! Preview rendering of baked terrain.
//!
//! Provides [`DebugImage`] and renderers for shaded elevation and habitat
//! maps. The demo writes these out as PNGs to eyeball a seed quickly.

mod image;
mod renderers;

pub use self::image::DebugImage;
pub use renderers::{
    SNOW_LINE, grid_normal, habitat_color, height_color, hillshade, render_habitat_preview,
    render_height_preview,
};
