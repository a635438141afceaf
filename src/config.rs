use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::pip::{LoadOptions, RingClosure};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// Shapefile base name; `.shp` and `.dbf` are appended
    pub path: PathBuf,
    /// Test the last->first edge of rings that are stored open
    #[serde(default)]
    pub close_rings: bool,
}

impl DatasetConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            closure: if self.close_rings {
                RingClosure::Implicit
            } else {
                RingClosure::Stored
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GeocoderBackend {
    #[default]
    GeocoderUs,
    GoogleMaps,
}

impl FromStr for GeocoderBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "geocoder_us" => Ok(Self::GeocoderUs),
            "google_maps" => Ok(Self::GoogleMaps),
            other => Err(format!("unknown geocoder backend: {}", other)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default)]
    pub backend: GeocoderBackend,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            backend: GeocoderBackend::default(),
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dataset: Option<PathBuf>,
    pub close_rings: bool,
    pub geocoder: Option<GeocoderBackend>,
    pub api_key: Option<String>,
    pub listen: Option<String>,
}

impl Config {
    /// Load `path` if given, then apply the overrides. Without a file the
    /// dataset must come from the overrides.
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Config {
                dataset: DatasetConfig {
                    path: overrides
                        .dataset
                        .clone()
                        .context("either --config or --dataset is required")?,
                    close_rings: false,
                },
                geocoder: GeocoderConfig::default(),
                server: ServerConfig::default(),
            },
        };

        if let Some(path) = overrides.dataset {
            config.dataset.path = path;
        }
        if overrides.close_rings {
            config.dataset.close_rings = true;
        }
        if let Some(backend) = overrides.geocoder {
            config.geocoder.backend = backend;
        }
        if let Some(key) = overrides.api_key {
            config.geocoder.api_key = Some(key);
        }
        if let Some(listen) = overrides.listen {
            config.server.listen = listen;
        }
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}
