//! # IDSR Chat Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the application.
//! Domain failures that callers may want to match on are variants of
//! `ChatError`; everything else travels as `anyhow::Error` with context.
//!
//! ## Architecture
//!
//! - `ChatError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! HTTP-facing errors (status code + `{error, message}` body) live next to the
//! handlers in `commands::serve::handlers::ApiError`; they are a rendering of
//! request failures, not application errors.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if port == 0 {
//!     return Err(ChatError::Config("port must be non-zero".into()))?;
//! }
//!
//! // Pattern matching on error types
//! match result {
//!     Err(e) if e.downcast_ref::<ChatError>().map_or(false, |ce| matches!(ce, ChatError::Exchange { .. })) => {
//!         println!("{}", e);
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the application.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server answered with a non-success status code.
    #[error("API error: {status}")]
    ApiStatus { status: reqwest::StatusCode },

    /// A single question/answer exchange with the server failed. The message
    /// is what the chat client shows to the end user.
    #[error("Sorry, I encountered an error: {cause}. Make sure the backend server is running at {endpoint}")]
    Exchange { endpoint: String, cause: String },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
