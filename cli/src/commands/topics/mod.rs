//! # Topics Command
//!
//! File: cli/src/commands/topics/mod.rs
//!
//! ## Overview
//!
//! `idsr-chat topics` prints the match rules in priority order, one line per
//! rule, with the trigger substrings that select each topic. Earlier lines win
//! when a question contains triggers from several rules.
//!
//! `--answers` also prints each topic's canned answer. Passing a topic
//! identifier (e.g. `idsr-chat topics "alert threshold"`) limits the listing
//! to that topic and always includes its answer.
//!
use crate::core::error::{ChatError, Result};
use crate::guidelines::{Responder, Topic};
use clap::Parser;

#[derive(Parser, Debug)]
pub struct TopicsArgs {
    /// Only show this topic (exact identifier, as listed).
    pub topic: Option<String>,

    /// Also print the answer text of every topic.
    #[arg(long, short)]
    pub answers: bool,
}

fn render(responder: &Responder, only: Option<Topic>, with_answers: bool) -> String {
    let mut out = String::new();
    let rules = responder.rules().iter().enumerate();
    for (position, rule) in rules.filter(|(_, r)| only.map_or(true, |t| t == r.topic)) {
        let triggers = rule
            .triggers
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("{:>2}. {:<18} <- {}\n", position + 1, rule.topic, triggers));
        if with_answers || only.is_some() {
            for line in rule.topic.answer().lines() {
                out.push_str(&format!("      {}\n", line));
            }
        }
    }
    out
}

/// # Handle Topics Command (`handle_topics`)
pub async fn handle_topics(args: TopicsArgs) -> Result<()> {
    let only = match args.topic.as_deref() {
        Some(id) => Some(Topic::from_id(id).ok_or_else(|| {
            let known: Vec<_> = Topic::ALL.iter().map(|t| t.id()).collect();
            ChatError::ArgumentParsing(format!(
                "unknown topic '{}'. Known topics: {}",
                id,
                known.join(", ")
            ))
        })?),
        None => None,
    };
    print!("{}", render(&Responder::default(), only, args.answers));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_rules_in_order() {
        let out = render(&Responder::default(), None, false);
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[0].contains("case definition"));
        assert!(lines[0].contains("\"suspected measles\""));
        assert!(lines[9].starts_with("10. outbreak"));
    }

    #[test]
    fn test_render_with_answers() {
        let out = render(&Responder::default(), None, true);
        assert!(out.contains("      - Ratio ≥ 1.1: Positive"));
    }

    #[test]
    fn test_render_single_topic() {
        let out = render(&Responder::default(), Some(Topic::AlertThreshold), false);
        assert!(out.starts_with(" 6. alert threshold"));
        assert!(out.contains(Topic::AlertThreshold.answer()));
        assert!(!out.contains("10. outbreak"));
    }
}
