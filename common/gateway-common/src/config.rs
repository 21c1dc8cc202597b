//! TOML configuration shared by the tool servers
//!
//! All servers read the same `gateway.toml`; each picks the sections it
//! cares about and ignores the rest.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::allowlist::{expand_home, normalize_path};

/// Env var pointing at an explicit config file
pub const CONFIG_ENV: &str = "GATEWAY_CONFIG_PATH";

/// Env var overriding the allow-list file location
pub const ALLOWED_DIRS_ENV: &str = "ALLOWED_DIRS_PATH";

/// Host application directory under the per-user config dir
pub const HOST_APP_DIR: &str = "Claude";

/// Host application install directory under the per-user local data dir
pub const HOST_INSTALL_DIR: &str = "AnthropicClaude";

/// Directory holding the installed scripts and the allow-list file
pub const SCRIPTS_DIR: &str = "mcp_scripts";

pub const ALLOWED_DIRS_FILE: &str = "allowed_dirs.json";

/// Configuration consumed by every server that touches the allow-list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub allowlist: AllowlistConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllowlistConfig {
    /// Location of the allow-list JSON document
    #[serde(default)]
    pub path: Option<String>,
    /// Entries that can never be removed (defaults to the host app's own dirs)
    #[serde(default)]
    pub protected: Option<Vec<String>>,
}

impl AllowlistConfig {
    /// `ALLOWED_DIRS_PATH`, then the configured path, then the default location
    pub fn store_path(&self) -> PathBuf {
        if let Ok(env_path) = std::env::var(ALLOWED_DIRS_ENV) {
            if !env_path.trim().is_empty() {
                return expand_home(&env_path);
            }
        }
        match &self.path {
            Some(path) => expand_home(path),
            None => default_store_path(),
        }
    }

    pub fn protected_dirs(&self) -> Vec<PathBuf> {
        match &self.protected {
            Some(dirs) => dirs.iter().map(normalize_path).collect(),
            None => default_protected_dirs(),
        }
    }
}

/// `<config_dir>/Claude/mcp_scripts/allowed_dirs.json`
pub fn default_store_path() -> PathBuf {
    host_config_dir()
        .join(SCRIPTS_DIR)
        .join(ALLOWED_DIRS_FILE)
}

/// The host application's config and install directories
pub fn default_protected_dirs() -> Vec<PathBuf> {
    let install_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HOST_INSTALL_DIR);
    vec![normalize_path(install_dir), normalize_path(host_config_dir())]
}

fn host_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(HOST_APP_DIR)
}

/// Candidate config files, in search order
///
/// 1. `GATEWAY_CONFIG_PATH` env var
/// 2. `./gateway.toml`
/// 3. `$XDG_CONFIG_HOME/mcp-gateway/config.toml`
/// 4. `~/.mcp-gateway.toml`
pub fn config_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        paths.push(expand_home(&env_path));
    }

    paths.push(PathBuf::from("gateway.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("mcp-gateway").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".mcp-gateway.toml"));
    }

    paths
}

/// Load the first parseable config file, falling back to defaults
pub fn load_config<T>() -> T
where
    T: DeserializeOwned + Default,
{
    for path in config_search_paths() {
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<T>(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config {}: {}", path.display(), e);
            }
        }
    }

    tracing::info!("Using default configuration");
    T::default()
}
