//! Configuration loading from TOML files

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use citeline_core::{ClientIdentity, RetryPolicy};
use citeline_crossref::config::MAX_ROWS;
use serde::Deserialize;

use crate::output::OutputFormat;

/// Global configuration for citeline
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub crossref: CrossrefConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrossrefConfig {
    pub base_url: String,
    pub app_name: String,
    pub app_version: String,
    pub app_url: Option<String>,
    /// Contact address for the polite pool
    #[serde(deserialize_with = "deserialize_env_var")]
    pub mailto: Option<String>,
    pub rows: usize,
}

impl Default for CrossrefConfig {
    fn default() -> Self {
        let identity = ClientIdentity::default();
        Self {
            base_url: citeline_crossref::config::DEFAULT_BASE_URL.to_string(),
            app_name: identity.name,
            app_version: identity.version,
            app_url: None,
            mailto: std::env::var("CITELINE_MAILTO").ok(),
            rows: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Total attempts per remote call, first one included
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub page_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 5,
            base_delay_ms: 2000,
            page_delay_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub default_dir: PathBuf,
    pub format: OutputFormat,
    pub compression_level: i32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_dir: PathBuf::from("./data"),
            format: OutputFormat::Parquet,
            compression_level: 3,
        }
    }
}

/// Page size must be positive (an empty page ends a walk) and within the API cap
pub fn check_rows(rows: usize) -> Result<usize> {
    if !(1..=MAX_ROWS).contains(&rows) {
        anyhow::bail!("rows must be between 1 and {MAX_ROWS}, got {rows}");
    }
    Ok(rows)
}

/// Deserialize a string that may contain environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./citeline.toml (current directory)
    /// 2. ~/.config/citeline/config.toml
    ///
    /// If no config file found, returns default config.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("citeline.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "citeline") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_rows(self.crossref.rows)?;
        Ok(())
    }

    /// Retrieval settings for the Crossref pipeline
    pub fn retrieval(&self) -> citeline_crossref::Config {
        citeline_crossref::Config {
            base_url: self.crossref.base_url.clone(),
            identity: ClientIdentity {
                name: self.crossref.app_name.clone(),
                version: self.crossref.app_version.clone(),
                url: self.crossref.app_url.clone(),
                mailto: self.crossref.mailto.clone(),
            },
            rows: self.crossref.rows,
            timeout: Duration::from_secs(self.http.timeout_secs),
            retry: RetryPolicy::new(
                self.http.max_retries,
                Duration::from_millis(self.http.base_delay_ms),
            ),
            page_delay: Duration::from_millis(self.http.page_delay_ms),
        }
    }
}
