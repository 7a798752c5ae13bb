//! Configuration loader
//!
//! Loads service configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. If `PLAY_SERVICE_NAME` or `PLAY_BIND_ADDR` is set, the environment is
//!    the only source
//! 2. Otherwise the first config file found in the standard locations is
//!    layered over the calling service's defaults
//! 3. With neither, the calling service's defaults are used
//!
//! A source that exists but does not parse is an error; it never falls back.
//!
//! ## Environment Variables
//! - `PLAY_SERVICE_NAME` (required): service name, also the default database name
//! - `PLAY_BIND_ADDR` (required): listen address, e.g. `127.0.0.1:5001`
//! - `PLAY_STORE_BACKEND`: `memory` or `sqlite`
//! - `PLAY_STORE_PATH`: SQLite database file
//! - `PLAY_STORE_POOL_SIZE`: SQLite connection pool size
//! - `PLAY_CATALOG_URL`: base address of the catalog service
//! - `PLAY_CATALOG_TIMEOUT_SECS`: per-attempt timeout for catalog calls
//!
//! Resilience tuning and fault injection are file-only; the environment
//! path keeps their defaults.
//!
//! ## File Locations
//! The loader probes, in order, the working directory, its parent and the
//! executable's directory for `play.toml`, `play.json`, `config.toml` and
//! `config.json`. Keys the file leaves out, `[service]` ones included, keep
//! the calling service's defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use play_domain::{Config, PlayError, Result, StoreBackend};
use serde_json::Value;

const CONFIG_FILE_NAMES: [&str; 4] = ["play.toml", "play.json", "config.toml", "config.json"];

const IDENTITY_VARS: [&str; 2] = ["PLAY_SERVICE_NAME", "PLAY_BIND_ADDR"];

/// Load the configuration of `service_name`, which listens on `bind_addr`
/// unless a source says otherwise.
///
/// # Errors
/// Returns `PlayError::Config` if the environment or the probed file holds an
/// invalid value.
pub fn load(service_name: &str, bind_addr: &str) -> Result<Config> {
    load_with(probe_config_paths, service_name, bind_addr)
}

fn load_with(
    probe: impl FnOnce() -> Option<PathBuf>,
    service_name: &str,
    bind_addr: &str,
) -> Result<Config> {
    if IDENTITY_VARS.iter().any(|key| std::env::var_os(key).is_some()) {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    let defaults = Config::for_service(service_name, bind_addr);
    match probe() {
        Some(path) => load_from_file(&path, defaults),
        None => {
            tracing::info!(service = service_name, "No configuration source, using defaults");
            Ok(defaults)
        }
    }
}

/// Load configuration from environment variables
///
/// `PLAY_SERVICE_NAME` and `PLAY_BIND_ADDR` must be set; everything else
/// falls back to defaults.
///
/// # Errors
/// Returns `PlayError::Config` if a required variable is missing or a value
/// is invalid.
pub fn load_from_env() -> Result<Config> {
    let service_name = env_var("PLAY_SERVICE_NAME")?;
    let bind_addr = env_var("PLAY_BIND_ADDR")?;
    let mut config = Config::for_service(&service_name, &bind_addr);

    if let Some(backend) = env_parse::<StoreBackend>("PLAY_STORE_BACKEND")? {
        config.store.backend = backend;
    }
    if let Ok(path) = std::env::var("PLAY_STORE_PATH") {
        config.store.path = Some(path);
    }
    if let Some(pool_size) = env_parse::<u32>("PLAY_STORE_POOL_SIZE")? {
        config.store.pool_size = pool_size;
    }
    if let Ok(url) = std::env::var("PLAY_CATALOG_URL") {
        config.inventory.catalog_service.url = url;
    }
    if let Some(timeout) = env_parse::<u64>("PLAY_CATALOG_TIMEOUT_SECS")? {
        config.inventory.catalog_service.timeout_secs = timeout;
    }

    Ok(config)
}

/// Load the file at `path` on top of `defaults`. Format follows the file
/// extension.
///
/// # Errors
/// Returns `PlayError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: &Path, defaults: Config) -> Result<Config> {
    if !path.exists() {
        return Err(PlayError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| PlayError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, path, defaults)
}

/// Parse `contents` and layer it over `defaults`, choosing the format by the
/// extension of `path`.
fn parse_config(contents: &str, path: &Path, defaults: Config) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let overrides: Value = match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| PlayError::Config(format!("Invalid TOML format: {}", e)))?,
        "json" => serde_json::from_str(contents)
            .map_err(|e| PlayError::Config(format!("Invalid JSON format: {}", e)))?,
        _ => return Err(PlayError::Config(format!("Unsupported config format: {}", extension))),
    };

    let mut merged = serde_json::to_value(defaults)
        .map_err(|e| PlayError::Config(format!("Failed to encode defaults: {}", e)))?;
    overlay(&mut merged, overrides);

    serde_json::from_value(merged)
        .map_err(|e| PlayError::Config(format!("Invalid configuration in {}: {}", path.display(), e)))
}

/// Recursively replace values in `base` with those present in `overrides`.
fn overlay(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                overlay(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, value) => *base = value,
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join(".."));
        dirs.insert(0, cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| PlayError::Config(format!("Missing required environment variable: {}", key)))
}

/// Parse an optional environment variable; unset is `Ok(None)`.
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
            .map_err(|e| PlayError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}
