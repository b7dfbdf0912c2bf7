use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::DEFAULT_LOG_FILTER;

pub const CONFIG_FILE_NAME: &str = "alsd.config.toml";
pub const CONFIG_PATH_ENV: &str = "ALSD_CONFIG_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlsdConfig {
    pub diagnostics: DiagnosticsConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub rust_log_filter: String,
    pub trace_file_prefix: String,
    pub log_dir: Option<PathBuf>,
}

/// Defaults for the dump flags; command-line flags can only switch them on.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub show_devices: bool,
    pub show_clips: bool,
    pub show_master: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            rust_log_filter: DEFAULT_LOG_FILTER.to_string(),
            trace_file_prefix: "alsd".to_string(),
            log_dir: None,
        }
    }
}

impl AlsdConfig {
    pub fn load() -> Result<Self> {
        match discover_config_path()? {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no {CONFIG_FILE_NAME} found; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("failed to parse config TOML from {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

fn discover_config_path() -> Result<Option<PathBuf>> {
    if let Some(path) = env::var_os(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Ok(Some(path));
        }
        anyhow::bail!("{CONFIG_PATH_ENV} points at a missing file: {}", path.display());
    }

    let cwd = env::current_dir().context("failed to resolve current directory")?;
    let candidates = [cwd.join(CONFIG_FILE_NAME), cwd.join("..").join(CONFIG_FILE_NAME)];
    Ok(candidates.into_iter().find(|path| path.is_file()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = AlsdConfig::from_toml_str(
            r#"
            [report]
            show_devices = true
            "#,
        )
        .expect("partial config should parse");
        assert!(config.report.show_devices);
        assert!(!config.report.show_clips);
        assert_eq!(config.diagnostics, DiagnosticsConfig::default());
    }

    #[test]
    fn diagnostics_section_overrides_filter_and_log_dir() {
        let config = AlsdConfig::from_toml_str(
            r#"
            [diagnostics]
            rust_log_filter = "debug"
            log_dir = "logs"
            "#,
        )
        .expect("diagnostics config should parse");
        assert_eq!(config.diagnostics.rust_log_filter, "debug");
        assert_eq!(config.diagnostics.log_dir, Some(PathBuf::from("logs")));
        assert_eq!(config.diagnostics.trace_file_prefix, "alsd");
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(AlsdConfig::from_toml_str("[report\nshow_devices = ").is_err());
    }

    #[test]
    fn load_from_reads_file() {
        let temp = tempfile::tempdir().expect("tempdir should be creatable");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[report]\nshow_master = true\n").expect("config should be writable");
        let config = AlsdConfig::load_from(&path).expect("config file should load");
        assert!(config.report.show_master);
    }
}
