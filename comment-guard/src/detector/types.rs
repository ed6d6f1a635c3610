//! Detector types and data structures

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierVerdict;
use crate::scorer::ScoreResult;

/// Fusion thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionThresholds {
    /// Classifier confidence at which a text is learned as a new pattern
    pub learn_confidence: u8,
    /// Classifier confidence above which a text is spam
    pub spam_confidence: u8,
    /// Classifier confidence at or below which a text is legitimate
    pub ham_confidence: u8,
    /// Pattern score at which a text is spam when the classifier cannot decide
    pub fallback_min_score: u32,
    /// Texts with no pattern signal and fewer tokens than this skip the classifier
    pub prefilter_max_tokens: usize,
    /// Texts must be longer than this (in characters) to be learned
    pub min_learn_length: usize,
}

impl Default for FusionThresholds {
    fn default() -> Self {
        Self {
            learn_confidence: 80,
            spam_confidence: 50,
            ham_confidence: 20,
            fallback_min_score: 2,
            prefilter_max_tokens: 20,
            min_learn_length: 10,
        }
    }
}

/// Result of fusing pattern and classifier evidence.
///
/// `Unknown` is resolved by the pattern score before it leaves the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationOutcome {
    Spam,
    NotSpam,
    Unknown,
}

/// Which rule settled the verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStage {
    /// No pattern signal on a short text, classifier not called
    Prefilter,
    /// No pattern signal on a long text, classifier not called
    NoPatternSignal,
    /// Classifier failed, pattern score decided
    ClassifierUnavailable,
    /// Classifier confidence decided
    Classifier,
    /// Classifier was undecided, pattern score decided
    ScoreFallback,
}

/// Full account of one classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Final boolean verdict
    pub is_spam: bool,
    /// Outcome before `Unknown` was resolved
    pub outcome: ClassificationOutcome,
    pub stage: DecisionStage,
    pub score: ScoreResult,
    /// Classifier verdict, if it was consulted and answered
    pub verdict: Option<ClassifierVerdict>,
    /// Whether the text was newly added to the pattern store
    pub learned: bool,
}
