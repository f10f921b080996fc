//! # IDSR Chat Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the top-level commands of the CLI. Each command
//! defines its own arguments structure and a `handle_*` function that
//! `main.rs` dispatches to.
//!
//! ## Commands
//!
//! - `serve`: HTTP chat API
//! - `ask`: Client for a running chat API
//! - `answer`: Offline, in-process answer for one question
//! - `topics`: Lists the topic table and match rule order
//!

/// Offline answer for a single question.
pub mod answer;
/// Client that sends questions to a running server.
pub mod ask;
/// The HTTP chat API.
pub mod serve;
/// Lists topics and their trigger substrings.
pub mod topics;
