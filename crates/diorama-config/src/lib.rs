//! Configuration for the diorama tools.
//!
//! Settings persist to disk as RON, CLI flags override them, and the world
//! seed is resolved from the CLI, the config, the last session, or fresh
//! entropy, in that order.

mod cli;
mod config;
mod error;
mod seed;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, PreviewConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;
pub use seed::{ResolvedSeed, SeedSource, SessionState, fnv1a_32, parse_seed, resolve_world_seed};
