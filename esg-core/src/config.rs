//! Configuration loading and data folder resolution

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Console configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Folder for CSV exports and other console output
    pub data_dir: PathBuf,
    /// Debounce window for search-term change notification (milliseconds)
    pub debounce_ms: u64,
    /// Rows per page in the assignment review listing
    pub page_size: i64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            debounce_ms: 300,
            page_size: 50,
        }
    }
}

/// Resolve the data folder with the priority order:
/// 1. Command-line argument (highest priority)
/// 2. `ESG_ADMIN_DATA_DIR` environment variable
/// 3. `data_dir` key in the TOML config file
/// 4. OS-dependent default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("ESG_ADMIN_DATA_DIR") {
        return PathBuf::from(path);
    }

    if let Ok(config) = load_config() {
        return config.data_dir;
    }

    default_data_dir()
}

/// Load configuration from the platform config file, falling back to
/// defaults when the file does not exist
pub fn load_config() -> Result<ConsoleConfig> {
    let path = config_file_path()?;
    if !path.exists() {
        return Ok(ConsoleConfig::default());
    }

    let content = std::fs::read_to_string(&path)?;
    parse_config(&content).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
}

/// Parse and validate configuration TOML
fn parse_config(content: &str) -> Result<ConsoleConfig> {
    let config: ConsoleConfig =
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
    if config.page_size < 1 {
        return Err(Error::Config(format!(
            "page_size must be at least 1 (got {})",
            config.page_size
        )));
    }
    Ok(config)
}

/// Platform config file path: `<config dir>/esg-admin/config.toml`
fn config_file_path() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("esg-admin").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
}

/// OS-dependent default data folder
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("esg-admin"))
        .unwrap_or_else(|| PathBuf::from("./esg-admin-data"))
}
