//! # Chat Server Configuration
//!
//! File: cli/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! This module turns `idsr-chat serve` arguments into the effective
//! `ServerConfig`. It combines settings from:
//! 1. Command-line arguments (highest priority)
//! 2. The `[server]` section of the loaded configuration files
//! 3. Default values (lowest priority)
//!
//! A command-line value only overrides the file when it differs from the
//! argument's default, i.e. when the user actually typed it. `--no-cors`
//! always wins when present.
//!
//! ## Examples
//!
//! ```rust
//! let file_cfg = crate::core::config::load_config()?;
//! let config = merge_config(&args, &file_cfg.server);
//! println!("Listening on: {}:{}", config.host, config.port);
//! ```
//!
use crate::core::config::{default_host, default_port, ServerSection};
use clap::Parser;
use std::net::IpAddr;
use tracing::debug;

/// # Serve Command Arguments (`ServeArgs`)
///
/// Command-line arguments accepted by `idsr-chat serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Network port the API listens on. If it is busy, the next free port
    /// (up to 10 attempts) is used instead.
    #[arg(long, short, default_value_t = 8000)]
    pub port: u16,

    /// IP address to bind to. Use `0.0.0.0` to accept connections from other
    /// machines; the default only accepts local connections.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Do not send CORS headers. By default CORS is permissive so a browser
    /// chat page served from another origin can call the API.
    #[arg(long)]
    pub no_cors: bool,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// The consolidated settings `server_logic::run_server` runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_section(&ServerSection::default())
    }
}

impl ServerConfig {
    fn from_section(section: &ServerSection) -> Self {
        Self {
            port: section.port,
            host: section.host,
            enable_cors: section.enable_cors,
        }
    }
}

/// Applies explicitly given command-line arguments on top of the file settings.
pub fn merge_config(args: &ServeArgs, file: &ServerSection) -> ServerConfig {
    let mut effective = ServerConfig::from_section(file);

    if args.port != default_port() {
        effective.port = args.port;
    }
    if args.host != default_host() {
        effective.host = args.host;
    }
    if args.no_cors {
        effective.enable_cors = false;
    }

    debug!("Merged server config: {:?}", effective);
    effective
}
