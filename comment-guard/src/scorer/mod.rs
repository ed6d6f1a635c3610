//! Pattern scoring
//!
//! Weighs a text against the stored patterns plus the built-in heuristics.
//! Stored patterns are matched against the raw text only; the heuristics see
//! both raw and normalized forms.

pub mod builtin;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patterns::{CompiledPattern, PatternCategory};

pub use builtin::{matching_heuristics, BUILTIN_HEURISTICS};

/// Weight added per matching pattern, by category, and once for the
/// built-in battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub site_name: u32,
    pub keywords: u32,
    pub generic: u32,
    pub builtin: u32,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            site_name: 3,
            keywords: 2,
            generic: 1,
            builtin: 2,
        }
    }
}

impl CategoryWeights {
    pub fn for_category(&self, category: PatternCategory) -> u32 {
        match category {
            PatternCategory::SiteName => self.site_name,
            PatternCategory::Keywords => self.keywords,
            PatternCategory::Generic => self.generic,
        }
    }
}

/// Pattern scoring result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Sum of all weights
    pub total_score: u32,
    /// Stored patterns that matched, in store order
    pub matched_pattern_ids: Vec<String>,
    /// Built-in heuristics that fired, in battery order
    pub matched_builtins: Vec<String>,
}

impl ScoreResult {
    pub fn has_signal(&self) -> bool {
        self.total_score > 0
    }
}

/// Pattern scorer engine
#[derive(Debug, Clone, Default)]
pub struct PatternScorer {
    weights: CategoryWeights,
}

impl PatternScorer {
    pub fn new(weights: CategoryWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CategoryWeights {
        &self.weights
    }

    /// Score `raw` (and its `normalized` form) against `patterns`.
    pub fn score(&self, raw: &str, normalized: &str, patterns: &[CompiledPattern]) -> ScoreResult {
        let mut result = ScoreResult::default();

        for pattern in patterns.iter().filter(|p| p.is_match(raw)) {
            let weight = self.weights.for_category(pattern.record.category);
            debug!("Pattern {:?} matched (+{})", pattern.record.pattern, weight);
            result.total_score += weight;
            result.matched_pattern_ids.push(pattern.record.pattern.clone());
        }

        let builtins = matching_heuristics(raw, normalized);
        if !builtins.is_empty() {
            debug!("Built-in heuristics matched: {:?} (+{})", builtins, self.weights.builtin);
            result.total_score += self.weights.builtin;
            result.matched_builtins = builtins.into_iter().map(String::from).collect();
        }

        result
    }
}
