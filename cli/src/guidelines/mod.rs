//! # Guideline Knowledge
//!
//! File: cli/src/guidelines/mod.rs
//!
//! ## Overview
//!
//! The question-answering core: a fixed topic table (`topics`) and the ordered
//! keyword matcher that selects one topic per question (`responder`).
//! Everything here is pure and compiled in; the HTTP server and the offline
//! commands are thin shells around `Responder::answer`.
//!
//! ```rust
//! use crate::guidelines::Responder;
//!
//! let responder = Responder::default();
//! let answer = responder.answer("What is the Alert Threshold for measles?");
//! ```
//!

/// The ten canned answers and their topic identifiers.
pub mod topics;

/// Ordered substring rules and the matcher that applies them.
pub mod responder;

pub use responder::Responder;
pub use topics::Topic;

/// Example questions advertised by `GET /examples` and the interactive client.
pub const EXAMPLE_QUESTIONS: [&str; 6] = [
    "What is the standard case definition for a suspected measles case?",
    "How should serum samples be stored for measles testing?",
    "What is the Alert Threshold for measles?",
    "What is the recommended Vitamin A dose for children aged 12 months and older?",
    "How do you prepare the wash buffer for the Measles ELISA test?",
    "What should be done if a sample yields an equivocal result?",
];
