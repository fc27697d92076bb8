//! Topic detection
//!
//! Decides whether a message touches both an emotional/wellbeing theme and a
//! technical/educational theme, which is the trigger for suggesting the
//! secondary assistant. Matching is case-insensitive substring containment.

/// Affective and wellbeing terms.
pub const WELLBEING_TERMS: &[&str] = &[
    "anxious",
    "anxiety",
    "stress",
    "overwhelm",
    "worried",
    "worry",
    "nervous",
    "scared",
    "afraid",
    "sad",
    "depress",
    "lonely",
    "frustrat",
    "upset",
    "panic",
    "burnout",
    "burned out",
    "exhausted",
    "tired",
    "hopeless",
    "crying",
    "mental health",
];

/// Technical and educational terms.
pub const TECHNICAL_TERMS: &[&str] = &[
    "code",
    "coding",
    "program",
    "algorithm",
    "assignment",
    "homework",
    "math",
    "calculus",
    "physics",
    "chemistry",
    "science",
    "study",
    "exam",
    "quiz",
    "lecture",
    "debug",
    "python",
    "javascript",
    "computer",
    "software",
    "database",
    "function",
    "compile",
];

/// Result of classifying a message against both vocabularies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopicMatch {
    pub wellbeing: bool,
    pub technical: bool,
}

impl TopicMatch {
    /// Both vocabularies matched.
    pub fn is_dual(&self) -> bool {
        self.wellbeing && self.technical
    }
}

/// Classify a message against both vocabularies independently.
pub fn classify(message: &str) -> TopicMatch {
    let lowered = message.to_lowercase();
    TopicMatch {
        wellbeing: contains_any(&lowered, WELLBEING_TERMS),
        technical: contains_any(&lowered, TECHNICAL_TERMS),
    }
}

/// True iff the message contains at least one term from each vocabulary.
pub fn has_dual_topic(message: &str) -> bool {
    classify(message).is_dual()
}

fn contains_any(haystack: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| haystack.contains(term))
}
