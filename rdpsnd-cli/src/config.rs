//! Configuration file support

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::{Encoding, OutputFormat};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default stream encoding (pcm, alaw or adpcm)
    pub default_format: Option<String>,

    /// Default channel count
    pub default_channels: Option<u16>,

    /// Default sample rate in Hz
    pub default_rate: Option<u32>,

    /// Default ADPCM block size in bytes
    pub default_block_align: Option<u16>,

    /// Default output format (text or json)
    pub default_output: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: Some("adpcm".to_string()),
            default_channels: Some(2),
            default_rate: Some(22050),
            default_block_align: Some(1024),
            default_output: Some("text".to_string()),
        }
    }
}

impl Config {
    /// Configured stream encoding
    pub fn encoding(&self) -> Result<Encoding> {
        parse_value("default_format", self.default_format.as_deref().unwrap_or("adpcm"))
    }

    /// Configured output format
    pub fn output_format(&self) -> Result<OutputFormat> {
        parse_value("default_output", self.default_output.as_deref().unwrap_or("text"))
    }
}

fn parse_value<T: ValueEnum>(key: &str, value: &str) -> Result<T> {
    match T::from_str(value, true) {
        Ok(parsed) => Ok(parsed),
        Err(_) => bail!("Invalid value '{}' for {} in configuration", value, key),
    }
}

/// Load configuration from file or defaults
pub fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config_path = if let Some(p) = path {
        p.clone()
    } else {
        // Try default locations
        if let Some(home) = dirs::home_dir() {
            let rdpsnd_config = home.join(".rdpsnd-cli").join("config.toml");
            if rdpsnd_config.exists() {
                rdpsnd_config
            } else {
                let config_dir = home.join(".config").join("rdpsnd-cli").join("config.toml");
                if config_dir.exists() {
                    config_dir
                } else {
                    // Return default config if no file found
                    return Ok(Config::default());
                }
            }
        } else {
            return Ok(Config::default());
        }
    };

    if config_path.exists() {
        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(config)
    } else if path.is_some() {
        bail!("Configuration file {} not found", config_path.display())
    } else {
        Ok(Config::default())
    }
}
