//! # Chat API Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! This module wires the chat handlers into an Axum server:
//! - Route table (`/health`, `/chat`, `/examples`, `/batch`, 404 fallback)
//! - Middleware: request tracing, optional permissive CORS, panic catching
//! - Port availability checking with automatic fallback
//! - Graceful shutdown on Ctrl+C / SIGTERM
//!
//! ## Architecture
//!
//! 1. Build the shared `AppState` around the `Responder`
//! 2. Find an available port if the requested one is in use
//! 3. Start the server with graceful shutdown handlers
//! 4. Display connection information
//!
//! ## Examples
//!
//! ```rust
//! let config = config::merge_config(&args, &file_cfg.server);
//! server_logic::run_server(config, Responder::default()).await?;
//! ```
//!
use super::config::ServerConfig;
use super::handlers::{self, AppState};
use crate::core::error::Result;
use crate::guidelines::Responder;
use anyhow::Context;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// How many consecutive ports `run_server` tries before giving up.
const MAX_PORT_ATTEMPTS: u8 = 10;

/// # Run HTTP Server (`run_server`)
///
/// Binds the first free port starting at `config.port`, prints the startup
/// banner and serves the chat API until a shutdown signal arrives.
///
/// ## Errors
///
/// - No available port within `MAX_PORT_ATTEMPTS`.
/// - Binding the `TcpListener` fails.
/// - The Axum server itself fails.
pub async fn run_server(config: ServerConfig, responder: Responder) -> Result<()> {
    let addr = find_available_port(config.host, config.port, MAX_PORT_ATTEMPTS).await?;

    let app = create_app(&config, AppState::new(responder));

    println!("\n=================================================================");
    println!("✅ ZNPHI Measles Chatbot API is running");
    println!("🌐 Server:  http://{}", addr);
    println!("📊 Health:  http://{}/health", addr);
    println!("💬 Chat:    POST http://{}/chat", addr);
    println!("🔒 CORS enabled: {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting chat API on {}", addr);
    println!("Ready to receive questions! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// # Handle Shutdown Signal (`shutdown_signal`)
///
/// Resolves when Ctrl+C or (on Unix) SIGTERM is received. If a handler cannot
/// be installed, that branch stays pending instead of shutting down.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// # Find Available Port (`find_available_port`)
///
/// Tries `start_port`, then each following port, up to `max_attempts` ports
/// in total. Returns the first address that could be bound.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// The bare route table, without middleware.
fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/chat", post(handlers::chat))
        .route("/examples", get(handlers::examples))
        .route("/batch", post(handlers::batch))
        .fallback(handlers::not_found)
}

/// Adds tracing, CORS and panic catching around `router` and attaches state.
fn with_layers(router: Router<AppState>, config: &ServerConfig, state: AppState) -> Router {
    let cors_layer = if config.enable_cors {
        info!("CORS middleware enabled (permissive).");
        CorsLayer::permissive()
    } else {
        info!("CORS middleware disabled.");
        CorsLayer::new()
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    router
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(cors_layer)
                .layer(CatchPanicLayer::custom(handlers::handle_panic)),
        )
        .with_state(state)
}

/// # Create Axum Application (`create_app`)
///
/// The fully configured router, ready to be served.
pub fn create_app(config: &ServerConfig, state: AppState) -> Router {
    with_layers(routes(), config, state)
}

/// Serves `app` on an ephemeral localhost port in the background and returns
/// the bound address.
#[cfg(test)]
pub async fn spawn_test_server(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    addr
}

// --- Unit Tests ---
