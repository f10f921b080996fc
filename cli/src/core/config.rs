//! # IDSR Chat Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads, merges and validates the configuration shared by the
//! `serve` and `ask` commands. It supports a multi-level approach that combines
//! defaults, user settings and project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.idsr-chat.toml` in current directory or ancestors
//! 2. User-specific `<config dir>/idsr-chat/config.toml`
//! 3. Default values defined in the code
//!
//! Command-line flags are applied on top of the merged result by each command
//! (see `commands::serve::config` and `commands::ask`). Each command then
//! validates only the section it uses (`validate_server`, `validate_client`),
//! so a broken `[client]` entry never stops the server from starting.
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! [server]
//! port = 9000
//! host = "0.0.0.0"
//! enable_cors = false
//!
//! [client]
//! api_url = "http://192.168.1.20:9000"
//! context = "IDSR and Measles Detection Guidelines"
//! max_tokens = 256
//! temperature = 0.7
//! ```
//!
//! Loading:
//!
//! ```rust
//! let cfg = config::load_config()?;
//! config::validate_server(&cfg.server)?;
//! let port = cfg.server.port;
//! let url = &cfg.client.api_url;
//! ```
//!
use crate::core::error::{ChatError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Name of the project-level configuration file.
pub const PROJECT_CONFIG_FILENAME: &str = ".idsr-chat.toml";

/// Context label sent by clients and echoed by the server when none is given.
pub const DEFAULT_CONTEXT: &str = "IDSR and Measles Detection Guidelines";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub client: ClientSection,
}

/// Settings for `idsr-chat serve`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Port the API listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Address the API binds to.
    #[serde(default = "default_host")]
    pub host: IpAddr,
    /// Send permissive CORS headers so browser UIs on other origins can call the API.
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

/// Settings for `idsr-chat ask`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Base URL of a running server, without the `/chat` suffix.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_context")]
    pub context: String,
    /// Forwarded to the server, which ignores it.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Forwarded to the server, which ignores it.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            context: default_context(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

pub fn default_port() -> u16 {
    8000
}
pub fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}
fn default_enable_cors() -> bool {
    true
}
pub fn default_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}
fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}
pub fn default_max_tokens() -> u32 {
    256
}
pub fn default_temperature() -> f64 {
    0.7
}

/// Loads the effective configuration for the current working directory.
pub fn load_config() -> Result<Config> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    load_config_from(user_config_path().as_deref(), &current_dir)
}

/// Loads, merges and normalizes configuration from an explicit user config
/// path and a directory to start the project config search in. Values are
/// not validated here.
pub fn load_config_from(user_config: Option<&Path>, start_dir: &Path) -> Result<Config> {
    let user_config = match user_config {
        Some(path) if path.is_file() => {
            info!("Loading user configuration from: {}", path.display());
            Some(load_config_from_path(path)?)
        }
        Some(path) => {
            debug!("User configuration file not found at {}", path.display());
            None
        }
        None => None,
    };
    let project_config = match find_project_config_path(start_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            Some(load_config_from_path(&path)?)
        }
        None => {
            debug!("No project configuration file ({}) found.", PROJECT_CONFIG_FILENAME);
            None
        }
    };
    let mut merged = merge_configs(user_config.unwrap_or_default(), project_config);
    normalize_config(&mut merged);
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn user_config_path() -> Option<PathBuf> {
    match ProjectDirs::from("org", "ZNPHI", "idsr-chat") {
        Some(proj_dirs) => Some(proj_dirs.config_dir().join("config.toml")),
        None => {
            warn!("Could not determine user config directory.");
            None
        }
    }
}

/// Walks from `start_dir` towards the filesystem root looking for
/// `.idsr-chat.toml`. The walk stops at the first directory holding `.git`.
fn find_project_config_path(start_dir: &Path) -> Option<PathBuf> {
    let mut path = start_dir;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the built-in default.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project = match project {
        Some(p) => p,
        None => return user,
    };
    let server_defaults = ServerSection::default();
    let client_defaults = ClientSection::default();

    fn pick<T: PartialEq>(project: T, user: T, default: &T) -> T {
        if project != *default {
            project
        } else {
            user
        }
    }

    Config {
        server: ServerSection {
            port: pick(project.server.port, user.server.port, &server_defaults.port),
            host: pick(project.server.host, user.server.host, &server_defaults.host),
            enable_cors: pick(
                project.server.enable_cors,
                user.server.enable_cors,
                &server_defaults.enable_cors,
            ),
        },
        client: ClientSection {
            api_url: pick(
                project.client.api_url,
                user.client.api_url,
                &client_defaults.api_url,
            ),
            context: pick(
                project.client.context,
                user.client.context,
                &client_defaults.context,
            ),
            max_tokens: pick(
                project.client.max_tokens,
                user.client.max_tokens,
                &client_defaults.max_tokens,
            ),
            temperature: pick(
                project.client.temperature,
                user.client.temperature,
                &client_defaults.temperature,
            ),
        },
    }
}

fn normalize_config(config: &mut Config) {
    let trimmed = config.client.api_url.trim().trim_end_matches('/');
    if trimmed != config.client.api_url {
        debug!("Normalized api_url '{}' to '{}'", config.client.api_url, trimmed);
        config.client.api_url = trimmed.to_string();
    }
}

/// Checks the settings `serve` runs with.
pub fn validate_server(server: &ServerSection) -> Result<()> {
    debug!("Validating server configuration...");
    if server.port == 0 {
        return Err(anyhow!(ChatError::Config(
            "server.port must be between 1 and 65535".to_string()
        )));
    }
    Ok(())
}

/// Checks the settings `ask` runs with, after command-line overrides.
pub fn validate_client(client: &ClientSection) -> Result<()> {
    debug!("Validating client configuration...");
    validate_api_url(&client.api_url)?;
    if !client.temperature.is_finite() || client.temperature < 0.0 {
        return Err(anyhow!(ChatError::Config(format!(
            "temperature must be a non-negative number, got {}",
            client.temperature
        ))));
    }
    Ok(())
}

/// Only plain `http://` and `https://` base URLs are accepted.
fn validate_api_url(url: &str) -> Result<()> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(anyhow!(ChatError::Config(format!(
            "Invalid API URL '{}'. Expected it to start with http:// or https://",
            url
        ))));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [server]
            port = 9000
            host = "0.0.0.0"

            [client]
            api_url = "http://10.0.0.5:9000"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert!(config.server.enable_cors); // Default
        assert_eq!(config.client.api_url, "http://10.0.0.5:9000");
        assert_eq!(config.client.context, DEFAULT_CONTEXT); // Default
        assert_eq!(config.client.max_tokens, 256);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[server]\nportt = 1\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_project_overrides_user() {
        let user: Config = toml::from_str(
            "[server]\nport = 9100\n[client]\napi_url = \"http://user:1\"\n",
        )
        .unwrap();
        let project: Config = toml::from_str("[client]\napi_url = \"http://project:2\"\n").unwrap();

        let merged = merge_configs(user, Some(project));

        // Project left the port at its default, so the user's value survives.
        assert_eq!(merged.server.port, 9100);
        assert_eq!(merged.client.api_url, "http://project:2");
    }

    #[test]
    fn test_load_config_from_files() {
        let temp_dir = tempdir().unwrap();
        let user_path = temp_dir.path().join("user.toml");
        fs::write(&user_path, "[server]\nenable_cors = false\n").unwrap();

        let project_root = temp_dir.path().join("project");
        let nested = project_root.join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            project_root.join(PROJECT_CONFIG_FILENAME),
            "[client]\napi_url = \"http://example.org:8000/\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&user_path), &nested).unwrap();

        assert!(!config.server.enable_cors);
        // Trailing slash is stripped during normalization.
        assert_eq!(config.client.api_url, "http://example.org:8000");
    }

    #[test]
    fn test_project_search_stops_at_git_root() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILENAME),
            "[server]\nport = 9999\n",
        )
        .unwrap();
        let repo = temp_dir.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert_eq!(find_project_config_path(&repo), None);
        let config = load_config_from(None, &repo).unwrap();
        assert_eq!(config.server.port, default_port());
    }

    #[test]
    fn test_validate_client_invalid_url() {
        let mut config = Config::default();
        config.client.api_url = "localhost:8000".to_string();
        let result = validate_client(&config.client);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid API URL"));
    }

    #[test]
    fn test_validate_server_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(validate_server(&config.server).is_err());
    }

    #[test]
    fn test_validate_client_negative_temperature() {
        let mut config = Config::default();
        config.client.temperature = -1.0;
        assert!(validate_client(&config.client)
            .unwrap_err()
            .to_string()
            .contains("temperature must be a non-negative number"));
    }

    #[test]
    fn test_broken_client_section_leaves_server_usable() {
        let temp_dir = tempdir().unwrap();
        fs::create_dir(temp_dir.path().join(".git")).unwrap();
        fs::write(
            temp_dir.path().join(PROJECT_CONFIG_FILENAME),
            "[server]\nport = 9100\n[client]\napi_url = \"localhost:8000\"\ntemperature = -1.0\n",
        )
        .unwrap();

        let config = load_config_from(None, temp_dir.path()).unwrap();

        assert!(validate_server(&config.server).is_ok());
        assert_eq!(config.server.port, 9100);
        assert!(validate_client(&config.client).is_err());
    }
}
