//! # IDSR Chat Offline Command Integration Tests
//!
//! File: cli/tests/answer.rs
//!
//! ## Overview
//!
//! Runs `idsr-chat answer` and `idsr-chat topics`, which need no server.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_answer_case_definition() {
    chat_cmd()
        .args(["answer", "What is the standard case definition?"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "A suspected measles case is defined as any person with fever",
        ));
}

#[test]
fn test_answer_fallback_for_unknown_question() {
    chat_cmd()
        .args(["answer", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "I'm an AI assistant trained on IDSR and Measles Detection Guidelines.",
        ));
}

#[test]
fn test_answer_topic_flag_shows_earlier_rule_winning() {
    chat_cmd()
        .args(["answer", "--topic", "Should I REPORT this alert?"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[reporting]\n"));
}

#[test]
fn test_answer_blank_question_fails() {
    chat_cmd()
        .args(["answer", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("question must not be empty"));
}

#[test]
fn test_topics_lists_rules() {
    chat_cmd()
        .arg("topics")
        .assert()
        .success()
        .stdout(
            predicate::str::contains(" 1. case definition")
                .and(predicate::str::contains("10. outbreak"))
                .and(predicate::str::contains("\"6 months\"")),
        );
}

#[test]
fn test_topics_unknown_topic_fails() {
    chat_cmd()
        .args(["topics", "wash buffer"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown topic 'wash buffer'"));
}
