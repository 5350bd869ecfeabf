//! Preview tool: builds a diorama world from a seed and writes previews.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p diorama-demo -- --seed 12345` for a mainland world, or
//! `cargo run -p diorama-demo -- --mode miniIslands --new-seed` for a fresh island one.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use diorama_config::{CliArgs, Config, ConfigError, default_config_dir, resolve_world_seed};
use diorama_terrain::debug_viz::{DebugImage, render_habitat_preview, render_height_preview};
use diorama_terrain::{
    BiomeMode, BiomeProfile, GridError, GridSpec, HeightGrid, ParseBiomeModeError, ScatterConfig,
    ScatterKind, TerrainProfile, WorldGenerator, WorldSeed, scatter_vegetation,
};
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mode(#[from] ParseBiomeModeError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("preview buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
    #[error("failed to write {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to serialize profile: {0}")]
    Serialize(#[from] ron::Error),
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything needed to reproduce or inspect a world, written next to the previews.
#[derive(Serialize)]
struct ProfileDump<'a> {
    seed: u32,
    mode: BiomeMode,
    grid_digest: String,
    biome: &'a BiomeProfile,
    terrain: &'a TerrainProfile,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".diorama"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    diorama_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match run(&args, &config, &config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs, config: &Config, config_dir: &Path) -> Result<(), DemoError> {
    let mode: BiomeMode = config.world.biome_mode.parse()?;
    let resolved = resolve_world_seed(args, config, config_dir)?;
    let seed = WorldSeed(resolved.seed);

    let world = WorldGenerator::from_seed(seed, mode);
    log_summary(&world);

    let spec = GridSpec::new(config.preview.resolution as usize, world.params().half_extent)?;
    let grid = HeightGrid::bake(&world, spec, config.preview.threads)?;
    let (lowest, highest) = grid.min_max();
    let digest = format!("{:016x}", grid.digest());
    info!(%digest, lowest, highest, "height grid baked");

    let prefix = &config.preview.output;
    write_png(
        Path::new(&format!("{prefix}-height.png")),
        render_height_preview(&grid, world.params(), world.sea_level()),
    )?;
    write_png(
        Path::new(&format!("{prefix}-habitat.png")),
        render_habitat_preview(&world, &grid),
    )?;

    let dump = ProfileDump {
        seed: seed.value(),
        mode,
        grid_digest: digest,
        biome: world.biome(),
        terrain: world.terrain(),
    };
    write_profile(Path::new(&format!("{prefix}-profile.ron")), &dump)?;

    if config.preview.scatter {
        let instances = scatter_vegetation(&world, &ScatterConfig::default());
        info!(total = instances.len(), "vegetation scattered");
        for kind in ScatterKind::ALL {
            let count = instances.iter().filter(|i| i.kind == kind).count();
            info!(?kind, count, "scatter kind");
        }
    }

    Ok(())
}

fn log_summary(world: &WorldGenerator) {
    let biome = world.biome();
    let terrain = world.terrain();
    info!(
        seed = %world.seed(),
        mode = %world.mode(),
        style = ?terrain.style,
        sea_level = world.sea_level(),
        "world ready"
    );
    match world.mode() {
        BiomeMode::Mainland => {
            let layout = &biome.mainland;
            info!(
                ponds = layout.ponds.len(),
                waterfall = layout.fall.is_some(),
                river_width = layout.river.width,
                "mainland layout"
            );
        }
        BiomeMode::MiniIslands => {
            info!(islands = biome.islands.islands.len(), "island layout");
        }
    }

    let degraded = biome.degraded_count();
    if degraded > 0 {
        warn!(degraded, "some layout objects fell back to default positions");
    }
}

fn write_png(path: &Path, preview: DebugImage) -> Result<(), DemoError> {
    let (width, height) = preview.dimensions();
    let buffer = image::RgbaImage::from_raw(width, height, preview.into_raw())
        .ok_or(DemoError::Buffer { width, height })?;
    buffer.save(path).map_err(|source| DemoError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote preview");
    Ok(())
}

fn write_profile(path: &Path, dump: &ProfileDump<'_>) -> Result<(), DemoError> {
    let pretty = ron::ser::PrettyConfig::new().depth_limit(4);
    let serialized = ron::ser::to_string_pretty(dump, pretty)?;
    std::fs::write(path, serialized).map_err(|source| DemoError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote profile");
    Ok(())
}
