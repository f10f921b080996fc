//! # Chat API Server Command
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `idsr-chat serve` runs the HTTP API that answers guideline questions:
//! - `GET /health` liveness and version
//! - `POST /chat` one question in, one canned answer out
//! - `GET /examples` and `POST /batch` convenience endpoints
//!
//! ## Architecture
//!
//! - `config.rs`: Merging command-line arguments with the `[server]` config section
//! - `handlers.rs`: Request handlers, JSON bodies and the `{error, message}` rendering
//! - `server_logic.rs`: Router, middleware, port selection and shutdown
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the default port (8000) on localhost
//! idsr-chat serve
//!
//! # Expose on the network without CORS headers
//! idsr-chat serve --host 0.0.0.0 --port 9000 --no-cors
//! ```
//!
use crate::core::error::Result;
use anyhow::Context;
use crate::guidelines::Responder;
use tracing::info;

pub use self::config::ServeArgs;

/// Merging of CLI flags with file settings.
pub mod config;

/// Request handlers and wire bodies.
pub mod handlers;

/// The Axum server itself.
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Loads configuration, builds the responder once and runs the server until
/// it is shut down.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    let file_config = crate::core::config::load_config()?;
    crate::core::config::validate_server(&file_config.server)
        .context("Configuration validation failed")?;
    let server_config = config::merge_config(&args, &file_config.server);
    info!("Effective server config: {:?}", server_config);

    let responder = Responder::default();
    info!("Loaded {} guideline match rules", responder.rules().len());

    server_logic::run_server(server_config, responder).await
}
