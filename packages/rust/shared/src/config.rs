//! Application configuration for landeval.
//!
//! User config lives at `~/.landeval/landeval.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LandEvalError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "landeval.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".landeval";

// ---------------------------------------------------------------------------
// Config structs (matching landeval.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Dataset and staging settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report output settings.
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Analysis engine bridge settings.
    #[serde(default)]
    pub engine: EngineConfig,
}

/// `[data]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the master dataset CSV.
    #[serde(default = "default_master_path")]
    pub master_path: String,

    /// Staging directory for per-run extracts.
    #[serde(default = "default_staging_dir")]
    pub staging_dir: String,

    /// Column name used as the record identifier.
    #[serde(default = "default_identifier_field")]
    pub identifier_field: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            master_path: default_master_path(),
            staging_dir: default_staging_dir(),
            identifier_field: default_identifier_field(),
        }
    }
}

fn default_master_path() -> String {
    "database/master.csv".into()
}
fn default_staging_dir() -> String {
    "database/cork".into()
}
fn default_identifier_field() -> String {
    crate::types::DEFAULT_IDENTIFIER_FIELD.into()
}

/// `[reports]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Directory where rendered reports are written.
    #[serde(default = "default_reports_dir")]
    pub output_dir: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_reports_dir(),
        }
    }
}

fn default_reports_dir() -> String {
    "reports".into()
}

/// `[engine]` section — how to reach the external analysis engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bridge command (e.g., "python").
    #[serde(default = "default_bridge_cmd")]
    pub bridge_cmd: String,

    /// Bridge script path handed to the command.
    #[serde(default = "default_bridge_script")]
    pub bridge_script: String,

    /// Working directory for the bridge subprocess. Empty = current dir.
    #[serde(default)]
    pub working_dir: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bridge_cmd: default_bridge_cmd(),
            bridge_script: default_bridge_script(),
            working_dir: String::new(),
        }
    }
}

fn default_bridge_cmd() -> String {
    "python".into()
}
fn default_bridge_script() -> String {
    "bridge/engine_bridge.py".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.landeval/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| LandEvalError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.landeval/landeval.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| LandEvalError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        LandEvalError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| LandEvalError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| LandEvalError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| LandEvalError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_expected_layout() {
        let config = AppConfig::default();
        assert_eq!(config.data.master_path, "database/master.csv");
        assert_eq!(config.data.staging_dir, "database/cork");
        assert_eq!(config.data.identifier_field, "StockNumber");
        assert_eq!(config.reports.output_dir, "reports");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [data]
            master_path = "custom/master.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.data.master_path, "custom/master.csv");
        assert_eq!(config.data.identifier_field, "StockNumber");
        assert_eq!(config.reports.output_dir, "reports");
    }

    #[test]
    fn roundtrip_through_toml() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.data.staging_dir, config.data.staging_dir);
    }
}
