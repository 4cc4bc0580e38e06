use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::GatewayMode;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Data source: live backend or pre-generated snapshot documents
  #[serde(default)]
  pub mode: GatewayMode,
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub snapshot: SnapshotConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the dynamic backend
  #[serde(default = "default_api_base")]
  pub base_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: default_api_base(),
    }
  }
}

fn default_api_base() -> String {
  "http://localhost:3001/".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
  /// Base URL serving the pre-generated collection documents
  #[serde(default = "default_snapshot_base")]
  pub base_url: String,
}

impl Default for SnapshotConfig {
  fn default() -> Self {
    Self {
      base_url: default_snapshot_base(),
    }
  }
}

fn default_snapshot_base() -> String {
  "http://localhost:3001/api/".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Disable to skip durable caching entirely
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Override the cache database location
  #[serde(default)]
  pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      path: None,
    }
  }
}

fn default_true() -> bool {
  true
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./boardsync.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/boardsync/config.yaml
  ///
  /// Falls back to defaults (live mode against a local dev backend) when no
  /// file exists.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("boardsync.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("boardsync").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }
}
