//! # Offline Answer Command
//!
//! File: cli/src/commands/answer/mod.rs
//!
//! ## Overview
//!
//! `idsr-chat answer` runs the keyword responder in-process, without a
//! server. Handy for checking which topic a phrasing lands on before relying
//! on it over HTTP.
//!
//! ```bash
//! idsr-chat answer "How do I report a confirmed outbreak?"
//! idsr-chat answer --topic "borderline results"
//! ```
//!
use crate::core::error::{ChatError, Result};
use crate::guidelines::Responder;
use clap::Parser;
use tracing::info;

/// Label printed by `--topic` when no rule matches.
const FALLBACK_LABEL: &str = "fallback";

#[derive(Parser, Debug)]
pub struct AnswerArgs {
    /// The question to answer.
    pub question: String,

    /// Print the matched topic identifier before the answer.
    #[arg(long, short)]
    pub topic: bool,
}

/// Builds the text printed for `args` by `responder`.
fn render(responder: &Responder, args: &AnswerArgs) -> Result<String> {
    let question = args.question.trim();
    if question.is_empty() {
        return Err(ChatError::ArgumentParsing("question must not be empty".into()).into());
    }

    let topic = responder.match_topic(question);
    info!(
        "Question {:?} matched {}",
        question,
        topic.map_or(FALLBACK_LABEL, |t| t.id())
    );

    let answer = responder.answer(question);
    Ok(if args.topic {
        format!("[{}]\n{}", topic.map_or(FALLBACK_LABEL, |t| t.id()), answer)
    } else {
        answer.to_string()
    })
}

/// # Handle Answer Command (`handle_answer`)
pub async fn handle_answer(args: AnswerArgs) -> Result<()> {
    let responder = Responder::default();
    println!("{}", render(&responder, &args)?);
    Ok(())
}
