//! World seed resolution and the remembered session seed.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CliArgs, Config, ConfigError};

const SESSION_FILE: &str = "session.ron";

const FNV_OFFSET: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Where a resolved seed came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedSource {
    Cli,
    Config,
    Session,
    Fresh,
}

/// A seed together with its origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedSeed {
    pub seed: u32,
    pub source: SeedSource,
}

/// Last world built, persisted between runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub seed: u32,
}

impl SessionState {
    /// Read `session.ron`. A missing file is `Ok(None)`.
    pub fn load(dir: &Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(SESSION_FILE);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::ReadError(e)),
        };
        let state = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        Ok(Some(state))
    }

    pub fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(dir).map_err(ConfigError::WriteError)?;
        let serialized = ron::to_string(self).map_err(ConfigError::SerializeError)?;
        std::fs::write(dir.join(SESSION_FILE), serialized).map_err(ConfigError::WriteError)
    }
}

/// 32-bit FNV-1a hash.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |hash, &b| (hash ^ u32::from(b)).wrapping_mul(FNV_PRIME))
}

/// Interpret seed text: decimal `u32`, `0x`-prefixed hex `u32`, or else the
/// FNV-1a hash of the trimmed text.
pub fn parse_seed(text: &str) -> Result<u32, ConfigError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ConfigError::InvalidSeed(text.to_string()));
    }
    if let Ok(value) = text.parse::<u32>() {
        return Ok(value);
    }
    let hex = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"));
    if let Some(value) = hex.and_then(|h| u32::from_str_radix(h, 16).ok()) {
        return Ok(value);
    }
    Ok(fnv1a_32(text.as_bytes()))
}

/// Pick the world seed: CLI, then config, then the session file, then fresh entropy.
///
/// `--new-seed` skips the config and session. When `remember_seed` is set the
/// result is written back to the session file.
pub fn resolve_world_seed(
    cli: &CliArgs,
    config: &Config,
    session_dir: &Path,
) -> Result<ResolvedSeed, ConfigError> {
    let resolved = pick_seed(cli, config, session_dir)?;

    if config.world.remember_seed && resolved.source != SeedSource::Session {
        SessionState {
            seed: resolved.seed,
        }
        .save(session_dir)?;
    }

    log::info!("World seed {} ({:?})", resolved.seed, resolved.source);
    Ok(resolved)
}

fn pick_seed(cli: &CliArgs, config: &Config, session_dir: &Path) -> Result<ResolvedSeed, ConfigError> {
    if let Some(ref text) = cli.seed {
        return Ok(ResolvedSeed {
            seed: parse_seed(text)?,
            source: SeedSource::Cli,
        });
    }

    if !cli.new_seed {
        if let Some(ref text) = config.world.seed {
            return Ok(ResolvedSeed {
                seed: parse_seed(text)?,
                source: SeedSource::Config,
            });
        }

        if config.world.remember_seed {
            match SessionState::load(session_dir) {
                Ok(Some(state)) => {
                    return Ok(ResolvedSeed {
                        seed: state.seed,
                        source: SeedSource::Session,
                    });
                }
                Ok(None) => {}
                Err(e) => log::warn!("Ignoring unreadable session file: {e}"),
            }
        }
    }

    Ok(ResolvedSeed {
        seed: rand::random::<u32>(),
        source: SeedSource::Fresh,
    })
}
