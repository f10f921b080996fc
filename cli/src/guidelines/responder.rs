//! # Keyword Responder
//!
//! File: cli/src/guidelines/responder.rs
//!
//! ## Overview
//!
//! Maps a free-text question to one canned answer. The question is lower-cased
//! once, then an ordered list of match rules is scanned top to bottom; the
//! first rule with any trigger substring contained in the question wins. When
//! nothing matches, a fixed fallback describing the supported topics is
//! returned.
//!
//! Rule order is the only tie-break. "How do I report a confirmed outbreak?"
//! answers with the reporting topic because that rule comes before the
//! outbreak rule, even though both match.
//!
//! No tokenization, stemming or scoring happens here: triggers are plain
//! substrings, so "report" also matches "reports" and "reporter".
//!
use super::topics::Topic;
use tracing::trace;

/// Answer returned when no rule matches.
pub const FALLBACK_ANSWER: &str = "I'm an AI assistant trained on IDSR and Measles Detection Guidelines. I can help answer questions about case definitions, reporting requirements, ELISA testing procedures, sample storage, result interpretation, alert thresholds, vitamin A dosing, and outbreak definitions. Please ask me a specific question about these topics.";

/// One ordered rule: if any trigger occurs in the lower-cased question, the
/// rule's topic is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRule {
    /// Lower-case substrings; any one of them is enough.
    pub triggers: &'static [&'static str],
    pub topic: Topic,
}

impl MatchRule {
    /// `lowered` must already be lower-cased.
    fn hits(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|trigger| lowered.contains(trigger))
    }
}

/// The guideline rules in priority order.
pub const GUIDELINE_RULES: [MatchRule; 10] = [
    MatchRule {
        triggers: &["case definition", "suspected measles"],
        topic: Topic::CaseDefinition,
    },
    MatchRule {
        triggers: &["reporting", "report"],
        topic: Topic::Reporting,
    },
    MatchRule {
        triggers: &["storage", "store"],
        topic: Topic::SampleStorage,
    },
    MatchRule {
        triggers: &["dilution", "ratio"],
        topic: Topic::Dilution,
    },
    MatchRule {
        triggers: &["interpret", "results"],
        topic: Topic::Interpretation,
    },
    MatchRule {
        triggers: &["alert", "threshold"],
        topic: Topic::AlertThreshold,
    },
    MatchRule {
        triggers: &["infant", "6 months"],
        topic: Topic::VitaminAInfant,
    },
    MatchRule {
        triggers: &["12 months", "older"],
        topic: Topic::VitaminAChild,
    },
    MatchRule {
        triggers: &["equivocal", "borderline"],
        topic: Topic::Equivocal,
    },
    MatchRule {
        triggers: &["outbreak", "confirmed"],
        topic: Topic::Outbreak,
    },
];

/// Ordered keyword matcher over the topic table.
///
/// Built once at startup and shared read-only (the server wraps it in an
/// `Arc`). Matching takes `&self` and touches no state, so the same input
/// always yields the same answer.
#[derive(Debug, Clone)]
pub struct Responder {
    rules: Vec<MatchRule>,
}

impl Default for Responder {
    fn default() -> Self {
        Self::with_rules(GUIDELINE_RULES.to_vec())
    }
}

impl Responder {
    /// Builds a responder from rules already in priority order. No
    /// deduplication or overlap detection is done.
    pub fn with_rules(rules: Vec<MatchRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    /// Returns the topic of the first matching rule, if any.
    pub fn match_topic(&self, question: &str) -> Option<Topic> {
        let lowered = question.to_lowercase();
        let topic = self
            .rules
            .iter()
            .find(|rule| rule.hits(&lowered))
            .map(|rule| rule.topic);
        trace!(?topic, "Matched question against {} rules", self.rules.len());
        topic
    }

    /// Returns the matched topic's answer, or `FALLBACK_ANSWER`.
    pub fn answer(&self, question: &str) -> &'static str {
        self.match_topic(question)
            .map_or(FALLBACK_ANSWER, Topic::answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_definition_question() {
        let responder = Responder::default();
        let answer = responder.answer("What is the standard case definition?");
        assert_eq!(answer, Topic::CaseDefinition.answer());
        assert!(answer.contains("suspected measles case is defined"));
    }

    #[test]
    fn test_interpretation_question() {
        let responder = Responder::default();
        assert_eq!(
            responder.match_topic("How are results interpreted?"),
            Some(Topic::Interpretation)
        );
    }

    #[test]
    fn test_no_match_returns_fallback() {
        let responder = Responder::default();
        assert_eq!(responder.answer("hello"), FALLBACK_ANSWER);
        assert_eq!(responder.match_topic(""), None);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let responder = Responder::default();
        assert_eq!(
            responder.match_topic("What is the ALERT Threshold for measles?"),
            Some(Topic::AlertThreshold)
        );
        assert_eq!(
            responder.match_topic("SUSPECTED MEASLES in a clinic"),
            Some(Topic::CaseDefinition)
        );
    }

    #[test]
    fn test_alert_triggers_unless_earlier_rule_matches() {
        let responder = Responder::default();
        assert_eq!(
            responder.match_topic("what threshold applies?"),
            Some(Topic::AlertThreshold)
        );
        // "report" belongs to an earlier rule, so it wins over "alert".
        assert_eq!(
            responder.match_topic("Should I report an alert?"),
            Some(Topic::Reporting)
        );
        // "ratio" (dilution) precedes "threshold".
        assert_eq!(
            responder.match_topic("threshold ratio"),
            Some(Topic::Dilution)
        );
    }

    #[test]
    fn test_rule_order_is_the_only_tie_break() {
        let responder = Responder::default();
        // Matches both the reporting and the outbreak rule.
        assert_eq!(
            responder.match_topic("How do I report a confirmed outbreak?"),
            Some(Topic::Reporting)
        );
        // "borderline results" hits interpretation before equivocal.
        assert_eq!(
            responder.match_topic("borderline results"),
            Some(Topic::Interpretation)
        );
    }

    #[test]
    fn test_substring_semantics() {
        let responder = Responder::default();
        // "restore" contains "store".
        assert_eq!(
            responder.match_topic("how to restore a freezer"),
            Some(Topic::SampleStorage)
        );
        // "16 months" contains "6 months" and that rule comes first.
        assert_eq!(
            responder.match_topic("dose at 16 months"),
            Some(Topic::VitaminAInfant)
        );
        assert_eq!(
            responder.match_topic("dose for children 12 months and above"),
            Some(Topic::VitaminAChild)
        );
    }

    #[test]
    fn test_every_rule_reachable_by_its_own_triggers() {
        let responder = Responder::default();
        for rule in GUIDELINE_RULES {
            for trigger in rule.triggers {
                let matched = responder.match_topic(trigger).unwrap();
                // A trigger may be captured by an earlier rule, never a later one.
                let matched_pos = GUIDELINE_RULES.iter().position(|r| r.topic == matched);
                let own_pos = GUIDELINE_RULES.iter().position(|r| r.topic == rule.topic);
                assert!(matched_pos <= own_pos, "trigger {trigger:?}");
            }
        }
    }

    #[test]
    fn test_answer_is_idempotent() {
        let responder = Responder::default();
        let question = "What should be done if a sample yields an equivocal result?";
        let first = responder.answer(question);
        let second = responder.answer(question);
        assert_eq!(first, second);
        assert_eq!(first, Topic::Equivocal.answer());
    }

    #[test]
    fn test_custom_rule_order() {
        let responder = Responder::with_rules(vec![
            MatchRule {
                triggers: &["outbreak"],
                topic: Topic::Outbreak,
            },
            MatchRule {
                triggers: &["report"],
                topic: Topic::Reporting,
            },
        ]);
        assert_eq!(
            responder.match_topic("report the outbreak"),
            Some(Topic::Outbreak)
        );
        assert_eq!(responder.rules().len(), 2);
    }

    #[test]
    fn test_guideline_rule_order() {
        let order: Vec<_> = Responder::default().rules().iter().map(|r| r.topic).collect();
        assert_eq!(order, Topic::ALL.to_vec());
    }
}
