use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Command-line arguments for the glass dashboard.
#[derive(Parser, Debug, Default)]
#[command(name = "glass-dashboard")]
#[command(about = "Explore glass products by solar factor, transmittance and cost")]
#[command(version)]
pub struct Args {
    /// Catalog file (.csv, .json or .parquet)
    #[arg(short, long, env = "GLASS_DASHBOARD_DATA")]
    pub data: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long, env = "GLASS_DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Configuration file
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from the optional TOML file. Every key may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub data_path: Option<PathBuf>,
    pub currency_symbol: Option<String>,
    pub window_width: Option<f32>,
    pub window_height: Option<f32>,
}

impl TomlConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Effective settings: command line over config file over defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub currency_symbol: String,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("vid_input.csv"),
            currency_symbol: "R$".to_string(),
            window_size: [1400.0, 850.0],
        }
    }
}

impl DashboardConfig {
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => TomlConfig::load(path)?,
            None => TomlConfig::default(),
        };
        Ok(Self::merge(args, file))
    }

    fn merge(args: &Args, file: TomlConfig) -> Self {
        let defaults = Self::default();
        Self {
            data_path: args
                .data
                .clone()
                .or(file.data_path)
                .unwrap_or(defaults.data_path),
            currency_symbol: file.currency_symbol.unwrap_or(defaults.currency_symbol),
            window_size: [
                file.window_width.unwrap_or(defaults.window_size[0]),
                file.window_height.unwrap_or(defaults.window_size[1]),
            ],
        }
    }
}
