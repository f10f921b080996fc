//! # IDSR Chat Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files in `cli/tests/`. Each test
//! file is compiled as its own crate and runs the compiled `idsr-chat` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

/// # Get IDSR Chat Command (`chat_cmd`)
///
/// An `assert_cmd::Command` for the `idsr-chat` binary built for this test
/// run, with `IDSR_CHAT_URL` and `RUST_LOG` cleared so the caller's
/// environment cannot change the outcome.
pub fn chat_cmd() -> Command {
    let mut cmd = Command::cargo_bin("idsr-chat").expect("Failed to find idsr-chat binary for testing");
    cmd.env_remove("IDSR_CHAT_URL").env_remove("RUST_LOG");
    cmd
}

/// Path of the compiled binary, for tests that need a long-running child.
pub fn chat_bin() -> std::path::PathBuf {
    assert_cmd::cargo::cargo_bin("idsr-chat")
}

/// Returns a localhost port that was free a moment ago.
pub fn free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind probe port");
    listener.local_addr().expect("Probe listener has no address").port()
}
