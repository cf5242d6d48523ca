use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Largest drawn polygon accepted by the area filter
    #[serde(default = "default_max_vertices")]
    pub max_vertices: usize,
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_data_file() -> PathBuf {
    PathBuf::from("listings.json")
}

fn default_max_vertices() -> usize {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            data_file: default_data_file(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_vertices: default_max_vertices(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
