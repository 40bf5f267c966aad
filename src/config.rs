//! Configuration management for procsnap.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use clap::ValueEnum;
use procsnap::process::{ScanOptions, Units, DEFAULT_APP_FAMILY, DEFAULT_PROC_ROOT};
use procsnap::Pid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file locations tried when `--config` is not given.
pub const DEFAULT_CONFIG_PATHS: [&str; 4] = [
    "/etc/procsnap/procsnap.yaml",
    "./procsnap.yaml",
    "./procsnap.json",
    "./procsnap.toml",
];

/// Effective configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Process-table root
    #[serde(alias = "proc-root")]
    pub proc_root: Option<PathBuf>,

    /// Command substring marking application processes
    #[serde(alias = "app-family")]
    pub app_family: Option<String>,

    /// Page size override in bytes (None = ask the host)
    #[serde(alias = "page-size")]
    pub page_size: Option<u64>,

    /// Clock ticks per second override (None = ask the host)
    #[serde(alias = "clock-ticks")]
    pub clock_ticks: Option<f64>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proc_root: Some(PathBuf::from(DEFAULT_PROC_ROOT)),
            app_family: Some(DEFAULT_APP_FAMILY.to_string()),
            page_size: None,
            clock_ticks: None,
            log_level: Some("warn".into()),
        }
    }
}

impl Config {
    pub fn proc_root(&self) -> PathBuf {
        self.proc_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROC_ROOT))
    }

    /// Host units with any configured overrides applied.
    pub fn units(&self) -> Units {
        let host = Units::host();
        Units {
            page_size: self.page_size.unwrap_or(host.page_size),
            clock_ticks: self.clock_ticks.unwrap_or(host.clock_ticks),
        }
    }

    /// Effective log level; unset means warn.
    pub fn log_level(&self) -> Result<LogLevel, String> {
        match self.log_level.as_deref() {
            Some(level) => LogLevel::from_str(level.trim(), true)
                .map_err(|_| format!("invalid log_level '{}'", level)),
            None => Ok(LogLevel::Warn),
        }
    }

    pub fn scan_options(&self, own_pid: Pid) -> ScanOptions {
        ScanOptions {
            own_pid,
            app_family: self
                .app_family
                .clone()
                .unwrap_or_else(|| DEFAULT_APP_FAMILY.to_string()),
            units: self.units(),
        }
    }
}

/// Validate effective config (used at startup and by `check`)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(family) = cfg.app_family.as_deref() {
        if family.trim().is_empty() {
            return Err("app_family must not be empty".into());
        }
    }

    cfg.log_level()?;

    if cfg.page_size == Some(0) {
        return Err("page_size must be greater than 0".into());
    }

    if let Some(ticks) = cfg.clock_ticks {
        if !(ticks.is_finite() && ticks > 0.0) {
            return Err(format!("clock_ticks must be a positive number, got {}", ticks).into());
        }
    }

    if let Some(root) = cfg.proc_root.as_deref() {
        if root.as_os_str().is_empty() {
            return Err("proc_root must not be empty".into());
        }
    }

    Ok(())
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    if let Some(root) = &args.proc_root {
        config.proc_root = Some(root.clone());
    }
    if let Some(family) = &args.app_family {
        config.app_family = Some(family.clone());
    }
    if args.page_size.is_some() {
        config.page_size = args.page_size;
    }
    if args.clock_ticks.is_some() {
        config.clock_ticks = args.clock_ticks;
    }
    if let Some(level) = &args.log_level {
        config.log_level = Some(format!("{:?}", level).to_lowercase());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => match DEFAULT_CONFIG_PATHS.iter().find(|p| Path::new(p).exists()) {
            Some(p) => PathBuf::from(p),
            None => return Ok(Config::default()),
        },
    };

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, &path)?;
    info!("Loaded configuration from: {}", path.display());
    Ok(merge_defaults(config))
}

/// Parses `content` in the format implied by the extension of `path`.
pub fn parse_config(content: &str, path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => Ok(serde_json::from_str(content)?),
        Some("toml") => Ok(toml::from_str(content)?),
        // Default to YAML
        _ => Ok(serde_yaml::from_str(content)?),
    }
}

/// Fills fields a config file left unset with the built-in defaults.
fn merge_defaults(cfg: Config) -> Config {
    let defaults = Config::default();
    Config {
        proc_root: cfg.proc_root.or(defaults.proc_root),
        app_family: cfg.app_family.or(defaults.app_family),
        page_size: cfg.page_size.or(defaults.page_size),
        clock_ticks: cfg.clock_ticks.or(defaults.clock_ticks),
        log_level: cfg.log_level.or(defaults.log_level),
    }
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    let output = match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    };
    println!("{output}");
    Ok(())
}
