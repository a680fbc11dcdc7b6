// src/engine_lib/config.rs

use std::path::{Path, PathBuf};
use serde::Deserialize;
use thiserror::Error;
use crate::engine_lib::movement::DEFAULT_PROBE_LENGTH;

pub const DEFAULT_CONFIG_FILE: &str = "walkthrough.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("probe_length must be a finite distance >= 0, got {0}")]
    InvalidProbeLength(f32),
    #[error("mouse_sensitivity must be finite, got {0}")]
    InvalidMouseSensitivity(f32),
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    TerrorHouse,
    Casa,
    Final,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub variant: Variant,
    pub asset_root: PathBuf,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub probe_length: f32,
    pub mouse_sensitivity: f32,
    pub play_music: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Final,
            asset_root: PathBuf::from("assets"),
            window_width: None,
            window_height: None,
            probe_length: DEFAULT_PROBE_LENGTH,
            mouse_sensitivity: 0.1,
            play_music: true,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.validate()
    }

    // A negative or NaN probe length never reports a hit, which would let the camera through every wall.
    fn validate(self) -> Result<Self, ConfigError> {
        if !self.probe_length.is_finite() || self.probe_length < 0.0 {
            return Err(ConfigError::InvalidProbeLength(self.probe_length));
        }
        if !self.mouse_sensitivity.is_finite() {
            return Err(ConfigError::InvalidMouseSensitivity(self.mouse_sensitivity));
        }
        Ok(self)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&contents, path)
    }

    /// Explicit path if given, else `walkthrough.toml` when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    log::info!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn asset_path(&self, relative: &str) -> PathBuf {
        self.asset_root.join(relative)
    }
}
