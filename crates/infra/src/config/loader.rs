//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the required variables are missing, falls back to a config file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! The result is validated before it is returned.
//!
//! ## Environment Variables
//! Required:
//! - `ORDERSYNC_DB_PATH`: Database file path
//! - `ORDERSYNC_ADAPTER_URL`: Channel adapter endpoint
//!
//! Optional (defaults from [`Config::default`]):
//! - `ORDERSYNC_DB_POOL_SIZE`
//! - `ORDERSYNC_ADAPTER_API_KEY`, `ORDERSYNC_ADAPTER_TIMEOUT` (seconds),
//!   `ORDERSYNC_ADAPTER_MAX_ATTEMPTS`
//! - `ORDERSYNC_SYNC_ENABLED`, `ORDERSYNC_SYNC_CRON`, `ORDERSYNC_SYNC_TIMEZONE`
//! - `ORDERSYNC_AUTO_SYNC_CHANNEL`, `ORDERSYNC_AUTO_SYNC_STATE_DIR`
//! - `ORDERSYNC_LOG_LEVEL`, `ORDERSYNC_LOG_JSON`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.{json,toml}` then `./ordersync.{json,toml}`
//! 2. The same names in the parent and grandparent directories
//! 3. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ordersync_domain::{Channel, Config, OrderSyncError, Result};

const CONFIG_STEMS: [&str; 2] = ["config", "ordersync"];
const CONFIG_EXTENSIONS: [&str; 2] = ["json", "toml"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `OrderSyncError::Config` if configuration cannot be loaded from
/// either source, a file is malformed, or validation fails.
pub fn load() -> Result<Config> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `OrderSyncError::Config` if a required variable is missing or any
/// variable holds an unparseable value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("ORDERSYNC_DB_PATH")?;
    config.adapter.endpoint_url = env_var("ORDERSYNC_ADAPTER_URL")?;

    if let Some(size) = env_parse::<u32>("ORDERSYNC_DB_POOL_SIZE")? {
        config.database.pool_size = size;
    }

    config.adapter.api_key = std::env::var("ORDERSYNC_ADAPTER_API_KEY").ok();
    if let Some(timeout) = env_parse::<u64>("ORDERSYNC_ADAPTER_TIMEOUT")? {
        config.adapter.timeout_secs = timeout;
    }
    if let Some(attempts) = env_parse::<u32>("ORDERSYNC_ADAPTER_MAX_ATTEMPTS")? {
        config.adapter.max_attempts = attempts;
    }

    config.sync.enabled = env_bool("ORDERSYNC_SYNC_ENABLED", config.sync.enabled);
    if let Ok(cron) = std::env::var("ORDERSYNC_SYNC_CRON") {
        config.sync.cron_expression = cron;
    }
    if let Ok(timezone) = std::env::var("ORDERSYNC_SYNC_TIMEZONE") {
        config.sync.timezone = timezone;
    }

    if let Some(channel) = env_parse::<Channel>("ORDERSYNC_AUTO_SYNC_CHANNEL")? {
        config.auto_sync.channel = channel;
    }
    if let Ok(dir) = std::env::var("ORDERSYNC_AUTO_SYNC_STATE_DIR") {
        config.auto_sync.state_dir = dir;
    }

    if let Ok(level) = std::env::var("ORDERSYNC_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("ORDERSYNC_LOG_JSON", config.logging.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// file extension.
///
/// # Errors
/// Returns `OrderSyncError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(OrderSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            OrderSyncError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| OrderSyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| OrderSyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| OrderSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(OrderSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    let exe_dir = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf));
    if let Some(exe_dir) = exe_dir {
        roots.extend([exe_dir.clone(), exe_dir.join(".."), exe_dir.join("../..")]);
    }

    roots
        .iter()
        .flat_map(|root| candidate_files(root))
        .find(|path| path.exists())
}

fn candidate_files(root: &Path) -> Vec<PathBuf> {
    CONFIG_STEMS
        .iter()
        .flat_map(|stem| {
            CONFIG_EXTENSIONS.iter().map(move |ext| root.join(format!("{stem}.{ext}")))
        })
        .collect()
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        OrderSyncError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional environment variable; unset yields `Ok(None)`.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| OrderSyncError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
