//! Difficulty estimation.
//!
//! A question's difficulty is a composite signal of its length, its
//! subordinate clauses and punctuation, and the higher-order cognitive cues
//! it contains. Two configured thresholds cut the signal into tiers.

use crate::config::{DifficultyConfig, Lexicon};
use crate::error::AnalysisError;
use crate::model::{CognitiveLevel, DifficultyTier};
use crate::preprocess::{normalize, tokenize, Phrase};

/// Tier and the signal it was derived from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyEstimate {
    pub tier: DifficultyTier,
    pub signal: f64,
}

#[derive(Debug, Clone)]
pub struct DifficultyEstimator {
    words_per_point: f64,
    clause_weight: f64,
    comma_weight: f64,
    higher_order_weight: f64,
    medium_threshold: f64,
    hard_threshold: f64,
    connectives: Vec<Phrase>,
    higher_order: Vec<(CognitiveLevel, Vec<Phrase>)>,
}

impl DifficultyEstimator {
    pub fn new(config: &DifficultyConfig, lexicon: &Lexicon) -> Result<Self, AnalysisError> {
        let connectives = compile("difficulty.connectives", &config.connectives)?;
        let higher_order = CognitiveLevel::HIGHER_ORDER
            .into_iter()
            .map(|level| {
                compile(&format!("lexicon.{}", level.name().to_lowercase()), lexicon.cues(level))
                    .map(|cues| (level, cues))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            words_per_point: config.words_per_point,
            clause_weight: config.clause_weight,
            comma_weight: config.comma_weight,
            higher_order_weight: config.higher_order_weight,
            medium_threshold: config.medium_threshold,
            hard_threshold: config.hard_threshold,
            connectives,
            higher_order,
        })
    }

    /// Estimate from the folded text and its tokens.
    pub fn estimate(&self, folded: &str, tokens: &[&str]) -> DifficultyEstimate {
        let length = tokens.len() as f64 / self.words_per_point;

        let clauses: usize = self
            .connectives
            .iter()
            .map(|c| c.occurrences(tokens))
            .sum();

        let separators = folded.chars().filter(|c| matches!(c, ',' | ';')).count();

        let higher_levels = self
            .higher_order
            .iter()
            .filter(|(_, cues)| cues.iter().any(|cue| cue.is_in(tokens)))
            .count();

        let signal = length
            + self.clause_weight * clauses as f64
            + self.comma_weight * separators as f64
            + self.higher_order_weight * higher_levels as f64;

        DifficultyEstimate {
            tier: self.tier_for(signal),
            signal,
        }
    }

    /// Map a signal onto a tier. A signal equal to a threshold takes the upper tier.
    pub fn tier_for(&self, signal: f64) -> DifficultyTier {
        if signal >= self.hard_threshold {
            DifficultyTier::Hard
        } else if signal >= self.medium_threshold {
            DifficultyTier::Medium
        } else {
            DifficultyTier::Easy
        }
    }

    /// Estimate raw question text.
    pub fn estimate_text(&self, text: &str) -> DifficultyTier {
        let folded = normalize(text).unwrap_or_default().to_lowercase();
        self.estimate(&folded, &tokenize(&folded)).tier
    }
}

fn compile(section: &str, phrases: &[String]) -> Result<Vec<Phrase>, AnalysisError> {
    phrases
        .iter()
        .map(|raw| {
            Phrase::parse(raw).ok_or_else(|| {
                AnalysisError::Configuration(format!("{section}: '{raw}' contains no words"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> DifficultyEstimator {
        DifficultyEstimator::new(&DifficultyConfig::default(), &Lexicon::default()).unwrap()
    }

    #[test]
    fn short_recall_question_is_easy() {
        assert_eq!(estimator().estimate_text("Define algorithm."), DifficultyTier::Easy);
    }

    #[test]
    fn higher_order_cue_raises_tier() {
        let e = estimator();
        assert_eq!(e.estimate_text("Analyze sorting complexity."), DifficultyTier::Medium);
        assert_eq!(
            e.estimate_text("Create a new data structure for efficient searching."),
            DifficultyTier::Medium
        );
    }

    #[test]
    fn long_multi_clause_question_is_hard() {
        let e = estimator();
        let q = "Given that the array is sorted, however large it may be, evaluate whether \
                 binary search is optimal and justify your answer.";
        let folded = normalize(q).unwrap().to_lowercase();
        let estimate = e.estimate(&folded, &tokenize(&folded));
        assert_eq!(estimate.tier, DifficultyTier::Hard);
        // 21 words, 2 connectives, 2 commas, one higher-order level.
        assert!((estimate.signal - 6.6).abs() < 1e-9, "signal {}", estimate.signal);
    }

    #[test]
    fn threshold_is_inclusive_of_upper_tier() {
        let config = DifficultyConfig {
            words_per_point: 1.0,
            clause_weight: 0.0,
            comma_weight: 0.0,
            higher_order_weight: 0.0,
            medium_threshold: 2.0,
            hard_threshold: 4.0,
            connectives: vec![],
        };
        let e = DifficultyEstimator::new(&config, &Lexicon::default()).unwrap();
        assert_eq!(e.estimate_text("Define"), DifficultyTier::Easy);
        assert_eq!(e.estimate_text("Define algorithm"), DifficultyTier::Medium);
        assert_eq!(e.estimate_text("Define the term algorithm"), DifficultyTier::Hard);
    }

    #[test]
    fn thresholds_come_from_configuration() {
        let config = DifficultyConfig {
            medium_threshold: 0.1,
            hard_threshold: 0.2,
            ..DifficultyConfig::default()
        };
        let e = DifficultyEstimator::new(&config, &Lexicon::default()).unwrap();
        assert_eq!(e.estimate_text("Define algorithm."), DifficultyTier::Hard);
    }

    #[test]
    fn estimation_is_deterministic() {
        let e = estimator();
        let q = "Compare merge sort and quicksort, assuming random input.";
        let first = e.estimate_text(q);
        assert!((0..10).all(|_| e.estimate_text(q) == first));
    }
}
