//! Spam detection
//!
//! Runs a text through normalization and pattern scoring, consults the
//! classifier when the patterns show any signal, and fuses both into a
//! boolean verdict. Confident detections are learned back into the pattern
//! store.

pub mod types;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::classifier::{Classifier, ClassifierVerdict, EndpointDescriptor};
use crate::error::ClassifierError;
use crate::normalize::normalize;
use crate::patterns::{PatternCategory, PatternStore};
use crate::scorer::{CategoryWeights, PatternScorer, ScoreResult};

pub use types::{ClassificationOutcome, DecisionStage, Evaluation, FusionThresholds};

/// Spam detector
pub struct SpamDetector {
    store: Arc<PatternStore>,
    classifier: Arc<dyn Classifier>,
    endpoint: EndpointDescriptor,
    scorer: PatternScorer,
    thresholds: FusionThresholds,
}

impl SpamDetector {
    /// Create a detector with default weights and thresholds
    pub fn new(
        store: Arc<PatternStore>,
        classifier: Arc<dyn Classifier>,
        endpoint: EndpointDescriptor,
    ) -> Self {
        Self {
            store,
            classifier,
            endpoint,
            scorer: PatternScorer::default(),
            thresholds: FusionThresholds::default(),
        }
    }

    pub fn with_weights(mut self, weights: CategoryWeights) -> Self {
        self.scorer = PatternScorer::new(weights);
        self
    }

    pub fn with_thresholds(mut self, thresholds: FusionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn store(&self) -> &Arc<PatternStore> {
        &self.store
    }

    pub fn endpoint(&self) -> &EndpointDescriptor {
        &self.endpoint
    }

    pub fn thresholds(&self) -> &FusionThresholds {
        &self.thresholds
    }

    /// Whether `text` is spam. Never fails; every degradation resolves to
    /// a boolean.
    pub async fn is_spam(&self, text: &str) -> bool {
        self.evaluate(text).await.is_spam
    }

    /// Classify `text` and report how the verdict was reached.
    pub async fn evaluate(&self, text: &str) -> Evaluation {
        let normalized = normalize(text);
        let score = {
            let patterns = self.store.read().await;
            self.scorer.score(text, &normalized, &patterns)
        };
        let tokens = text.split_whitespace().count();

        debug!(
            "Pattern score {} ({} patterns, {} heuristics), {} tokens",
            score.total_score,
            score.matched_pattern_ids.len(),
            score.matched_builtins.len(),
            tokens
        );

        if !score.has_signal() {
            let stage = if tokens < self.thresholds.prefilter_max_tokens {
                DecisionStage::Prefilter
            } else {
                DecisionStage::NoPatternSignal
            };
            debug!("No pattern signal, not spam ({:?})", stage);
            return Evaluation {
                is_spam: false,
                outcome: ClassificationOutcome::NotSpam,
                stage,
                score,
                verdict: None,
                learned: false,
            };
        }

        let consulted = self.classifier.classify(text, &self.endpoint).await;
        let (outcome, stage, verdict) = self.fuse(&score, consulted);

        let learned = if outcome == ClassificationOutcome::Spam
            && stage == DecisionStage::Classifier
            && verdict.as_ref().is_some_and(|v| self.is_learnable(text, v))
        {
            self.store.append(text, PatternCategory::Generic).await
        } else {
            false
        };

        let is_spam = match outcome {
            ClassificationOutcome::Spam => true,
            ClassificationOutcome::NotSpam => false,
            ClassificationOutcome::Unknown => self.score_says_spam(&score),
        };

        info!(
            "Verdict: {} (score {}, {:?}{})",
            if is_spam { "spam" } else { "not spam" },
            score.total_score,
            stage,
            if learned { ", learned" } else { "" }
        );

        Evaluation {
            is_spam,
            outcome,
            stage,
            score,
            verdict,
            learned,
        }
    }

    fn fuse(
        &self,
        score: &ScoreResult,
        consulted: Result<ClassifierVerdict, ClassifierError>,
    ) -> (ClassificationOutcome, DecisionStage, Option<ClassifierVerdict>) {
        let verdict = match consulted {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!("Classifier unavailable, deciding on pattern score: {}", e);
                let outcome = if self.score_says_spam(score) {
                    ClassificationOutcome::Spam
                } else {
                    ClassificationOutcome::NotSpam
                };
                return (outcome, DecisionStage::ClassifierUnavailable, None);
            }
        };

        let t = &self.thresholds;
        let outcome = if verdict.confidence > t.spam_confidence || verdict.confidence >= t.learn_confidence {
            ClassificationOutcome::Spam
        } else if verdict.confidence <= t.ham_confidence {
            ClassificationOutcome::NotSpam
        } else {
            ClassificationOutcome::Unknown
        };

        let stage = if outcome == ClassificationOutcome::Unknown {
            DecisionStage::ScoreFallback
        } else {
            DecisionStage::Classifier
        };

        (outcome, stage, Some(verdict))
    }

    fn is_learnable(&self, text: &str, verdict: &ClassifierVerdict) -> bool {
        verdict.confidence >= self.thresholds.learn_confidence
            && text.chars().count() > self.thresholds.min_learn_length
    }

    fn score_says_spam(&self, score: &ScoreResult) -> bool {
        score.total_score >= self.thresholds.fallback_min_score
    }
}
