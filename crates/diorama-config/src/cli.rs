//! Command-line argument parsing for the diorama preview tool.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Diorama command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "diorama", about = "Deterministic diorama terrain previews")]
pub struct CliArgs {
    /// World seed: decimal, 0x-prefixed hex, or any phrase.
    #[arg(long)]
    pub seed: Option<String>,

    /// Ignore pinned and remembered seeds and roll a fresh one.
    #[arg(long)]
    pub new_seed: bool,

    /// Biome mode (mainland, miniIslands).
    #[arg(long)]
    pub mode: Option<String>,

    /// Samples per side of the preview grid.
    #[arg(long)]
    pub resolution: Option<u32>,

    /// Bake worker threads (0 = one per CPU).
    #[arg(long)]
    pub threads: Option<usize>,

    /// Output file name prefix.
    #[arg(long)]
    pub output: Option<String>,

    /// Compute vegetation scatter.
    #[arg(long)]
    pub scatter: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config. The seed is left to the resolver.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref mode) = args.mode {
            self.world.biome_mode = mode.clone();
        }
        if let Some(resolution) = args.resolution {
            self.preview.resolution = resolution;
        }
        if let Some(threads) = args.threads {
            self.preview.threads = threads;
        }
        if let Some(ref output) = args.output {
            self.preview.output = output.clone();
        }
        if let Some(scatter) = args.scatter {
            self.preview.scatter = scatter;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            mode: Some("miniIslands".to_string()),
            resolution: Some(128),
            log_level: Some("debug".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.biome_mode, "miniIslands");
        assert_eq!(config.preview.resolution, 128);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.preview.output, "diorama");
        assert_eq!(config.preview.threads, 0);
    }

    #[test]
    fn test_cli_no_override() {
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_seed_is_not_written_to_config() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some("12345".to_string()),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, None);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::parse_from([
            "diorama",
            "--seed",
            "0xBEEF",
            "--mode",
            "mainland",
            "--threads",
            "4",
            "--new-seed",
        ]);
        assert_eq!(args.seed.as_deref(), Some("0xBEEF"));
        assert_eq!(args.threads, Some(4));
        assert!(args.new_seed);
    }
}
