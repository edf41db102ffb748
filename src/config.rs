use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::world::GeneratorParams;

/// Runtime settings, read from a TOML file:
///
/// ```toml
/// state_dir = "state"
/// seed = 42
///
/// [generator]
/// width = 11
/// height = 9
/// monster_count = 6
/// item_count = 6
/// wall_chance = 0.18
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub state_dir: PathBuf,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    pub generator: GeneratorParams,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            state_dir: PathBuf::from("state"),
            seed: None,
            generator: GeneratorParams::default(),
        }
    }
}

impl GameConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config = Self::from_toml_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.generator;
        if g.width < 3 || g.height < 3 {
            return Err(ConfigError::Invalid(format!(
                "generator size {}x{} is below the 3x3 minimum",
                g.width, g.height
            )));
        }
        if !(0.0..1.0).contains(&g.wall_chance) {
            return Err(ConfigError::Invalid(format!(
                "wall_chance {} must be in 0.0..1.0",
                g.wall_chance
            )));
        }
        Ok(())
    }
}
