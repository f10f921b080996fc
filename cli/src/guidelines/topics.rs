//! # Guideline Topics
//!
//! File: cli/src/guidelines/topics.rs
//!
//! The fixed topic table: every `Topic` maps to exactly one canned answer
//! taken from the IDSR and measles ELISA guidelines. The table is compiled in
//! and never changes at runtime.
//!

/// A named category of guideline content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    CaseDefinition,
    Reporting,
    SampleStorage,
    Dilution,
    Interpretation,
    AlertThreshold,
    VitaminAInfant,
    VitaminAChild,
    Equivocal,
    Outbreak,
}

impl Topic {
    /// All topics, in table order.
    pub const ALL: [Topic; 10] = [
        Topic::CaseDefinition,
        Topic::Reporting,
        Topic::SampleStorage,
        Topic::Dilution,
        Topic::Interpretation,
        Topic::AlertThreshold,
        Topic::VitaminAInfant,
        Topic::VitaminAChild,
        Topic::Equivocal,
        Topic::Outbreak,
    ];

    /// The topic identifier used as the table key.
    pub fn id(self) -> &'static str {
        match self {
            Topic::CaseDefinition => "case definition",
            Topic::Reporting => "reporting",
            Topic::SampleStorage => "sample storage",
            Topic::Dilution => "dilution",
            Topic::Interpretation => "interpretation",
            Topic::AlertThreshold => "alert threshold",
            Topic::VitaminAInfant => "vitamin a infant",
            Topic::VitaminAChild => "vitamin a child",
            Topic::Equivocal => "equivocal",
            Topic::Outbreak => "outbreak",
        }
    }

    /// Reverse lookup of `id()`. Exact, case-sensitive match.
    pub fn from_id(id: &str) -> Option<Topic> {
        Topic::ALL.into_iter().find(|topic| topic.id() == id)
    }

    /// The canned answer for this topic, returned verbatim.
    pub fn answer(self) -> &'static str {
        match self {
            Topic::CaseDefinition => "A suspected measles case is defined as any person with fever and maculopapular (non-vesicular) generalized rash and cough, coryza (runny nose), or conjunctivitis (red eyes), OR any person in whom a clinician suspects measles.",
            Topic::Reporting => "Measles is an epidemic-prone disease requiring immediate reporting. Any suspected case must be reported to the next level within 24 hours using the Case-based Reporting Form. It should also be notified via the fastest means possible (e.g., phone or SMS).",
            Topic::SampleStorage => "If testing is performed within 1 week, samples can be stored at 2°C to 8°C. For longer storage, samples must be frozen at -20°C or colder. Frost-free freezers should be avoided to prevent freeze-thaw cycles which degrade antibodies.",
            Topic::Dilution => "Patient samples must be diluted 1:101. This is achieved by mixing 10 µl of the patient sample with 1000 µl (1.0 ml) of the sample buffer containing RF-Absorbent.",
            Topic::Interpretation => "Results are interpreted using a ratio based on the calibrator:\n- Ratio < 0.8: Negative\n- Ratio ≥ 0.8 to < 1.1: Equivocal (Borderline)\n- Ratio ≥ 1.1: Positive",
            Topic::AlertThreshold => "The alert threshold for measles is a single (1) suspected case. Even one case requires immediate investigation to confirm or rule out an outbreak.",
            Topic::VitaminAInfant => "For infants less than 6 months of age, the recommended Vitamin A dose is 50,000 IU.",
            Topic::VitaminAChild => "For children aged 12 months and older, the recommended Vitamin A dose is 200,000 IU.",
            Topic::Equivocal => "If a result is equivocal (ratio between 0.8 and 1.1), the test should be repeated using a fresh sample collected 7 to 10 days later.",
            Topic::Outbreak => "A confirmed measles outbreak is typically defined as 3 or more IgM positive measles cases detected in a health facility or district within a single month.",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.id())
    }
}
