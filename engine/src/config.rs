use std::{
    fs, io,
    path::{Path, PathBuf},
};

use ball_drop_core::{BoardSizing, DEFAULT_COLOR_VARIANTS, DEFAULT_GRID_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Engine, EngineError};

const DEFAULT_BOARD_PIXELS: u32 = 600;
const DEFAULT_SEED: &str = "ball-drop";

/// Errors raised while loading an engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read engine config at {}", path.display())]
    Read {
        /// Location of the configuration file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration is not valid TOML for [`EngineConfig`].
    #[error("failed to parse engine config")]
    Parse {
        /// Underlying TOML failure.
        #[from]
        source: toml::de::Error,
    },
}

/// Parameters required to construct an [`Engine`].
///
/// Every field is optional in TOML and falls back to the default board:
///
/// ```toml
/// grid_size = 15
/// color_variants = 5
/// board_pixels = 600
/// standard_margin = true
/// seed = "2024-4-9"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Rows and columns of the board.
    pub grid_size: u32,
    /// Number of distinct token colors.
    pub color_variants: u32,
    /// Side length of the square board in pixels.
    pub board_pixels: u32,
    /// Reserves a half-cell margin around the board.
    pub standard_margin: bool,
    /// Seed the column generators are derived from, `ball-drop` when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            color_variants: DEFAULT_COLOR_VARIANTS,
            board_pixels: DEFAULT_BOARD_PIXELS,
            standard_margin: true,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, mistyped values, or unknown keys.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Board geometry described by this configuration.
    #[must_use]
    pub const fn sizing(&self) -> BoardSizing {
        BoardSizing::new(self.grid_size, self.board_pixels, self.standard_margin)
    }

    /// Constructs an engine from this configuration.
    ///
    /// # Errors
    ///
    /// See [`Engine::new`].
    pub fn build(&self) -> Result<Engine, EngineError> {
        Engine::new(
            self.grid_size,
            self.color_variants,
            self.sizing(),
            self.seed.as_deref().unwrap_or(DEFAULT_SEED),
        )
    }
}
