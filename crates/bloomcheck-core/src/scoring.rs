//! Paper-level aggregation and the overall score.
//!
//! The overall score combines three sub-scores, each in `[0, 1]`:
//!
//! - **coverage**: normalized Shannon entropy of the six level counts
//! - **clarity**: share of questions without ambiguity indicators
//! - **balance**: one minus the normalized total variation distance between
//!   the actual difficulty mix and the target mix
//!
//! The mean of the per-question quality scores is reported alongside but
//! does not feed the overall score.
//!
//! Everything here is a pure function of the analysed questions.

use serde::{Deserialize, Serialize};

use crate::config::{ScoringConfig, TierTargets};
use crate::error::AnalysisError;
use crate::model::{
    BloomsDistribution, CognitiveLevel, DifficultyDistribution, DifficultyTier, OverallScore,
    Question,
};

/// Sub-scores behind the overall score, plus the grade's feedback sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub coverage: f64,
    pub clarity: f64,
    pub balance: f64,
    /// Mean per-question quality score, 0-100.
    #[serde(default)]
    pub question_quality: f64,
    pub feedback: String,
}

/// Aggregated view of one paper's questions.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub blooms: BloomsDistribution,
    pub difficulty: DifficultyDistribution,
    pub ambiguous: usize,
    pub overall: OverallScore,
    pub breakdown: ScoreBreakdown,
}

impl Aggregate {
    pub fn total(&self) -> usize {
        self.blooms.total()
    }
}

/// Aggregate a paper's questions. Fails when the records are inconsistent.
pub fn aggregate(questions: &[Question], config: &ScoringConfig) -> Result<Aggregate, AnalysisError> {
    check_records(questions)?;

    let blooms: BloomsDistribution = questions.iter().map(|q| q.level).collect();
    let difficulty: DifficultyDistribution = questions.iter().map(|q| q.difficulty).collect();
    let ambiguous = questions.iter().filter(|q| q.ambiguous).count();

    let coverage = coverage_score(&blooms);
    let clarity = 1.0 - ambiguous as f64 / questions.len() as f64;
    let balance = balance_score(&difficulty, &config.targets);
    let question_quality = questions.iter().map(|q| f64::from(q.quality_score)).sum::<f64>()
        / questions.len() as f64;

    let weight_sum = config.coverage_weight + config.clarity_weight + config.balance_weight;
    let combined = (config.coverage_weight * coverage
        + config.clarity_weight * clarity
        + config.balance_weight * balance)
        / weight_sum;
    let overall = OverallScore::new((combined * 100.0).round().clamp(0.0, 100.0) as u32);

    Ok(Aggregate {
        blooms,
        difficulty,
        ambiguous,
        overall,
        breakdown: ScoreBreakdown {
            coverage,
            clarity,
            balance,
            question_quality,
            feedback: overall.grade.feedback().to_string(),
        },
    })
}

fn check_records(questions: &[Question]) -> Result<(), AnalysisError> {
    if questions.is_empty() {
        return Err(AnalysisError::Internal("no questions to aggregate".into()));
    }
    for (index, q) in questions.iter().enumerate() {
        if q.number != index + 1 {
            return Err(AnalysisError::Internal(format!(
                "question at position {} is numbered {}",
                index + 1,
                q.number
            )));
        }
        if q.normalized_text.trim().is_empty() {
            return Err(AnalysisError::Internal(format!(
                "question {} has no text",
                q.number
            )));
        }
        if q.ambiguous == q.indicators.is_empty() {
            return Err(AnalysisError::Internal(format!(
                "question {} has ambiguous={} with {} indicators",
                q.number,
                q.ambiguous,
                q.indicators.len()
            )));
        }
        if q.quality_score > 100 {
            return Err(AnalysisError::Internal(format!(
                "question {} has quality score {} above 100",
                q.number, q.quality_score
            )));
        }
    }
    Ok(())
}

/// Shannon entropy of the level counts, divided by `ln 6`.
pub fn coverage_score(blooms: &BloomsDistribution) -> f64 {
    let total = blooms.total();
    if total == 0 {
        return 0.0;
    }
    let entropy: f64 = CognitiveLevel::ALL
        .iter()
        .map(|&level| blooms.share(level))
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum();
    (entropy / (CognitiveLevel::ALL.len() as f64).ln()).clamp(0.0, 1.0)
}

/// `1 - TVD(actual, target) / (1 - min(target))`.
///
/// The denominator is the largest distance any mix can have from `target`,
/// so an all-in-one-tier paper at the rarest target tier scores 0.
pub fn balance_score(difficulty: &DifficultyDistribution, targets: &TierTargets) -> f64 {
    if difficulty.total() == 0 {
        return 0.0;
    }
    let tvd: f64 = DifficultyTier::ALL
        .iter()
        .map(|&tier| (difficulty.share(tier) - targets.get(tier)).abs())
        .sum::<f64>()
        / 2.0;
    let min_target = DifficultyTier::ALL
        .iter()
        .map(|&tier| targets.get(tier))
        .fold(f64::INFINITY, f64::min);
    let max_distance = 1.0 - min_target;
    if max_distance <= 0.0 {
        return 1.0;
    }
    (1.0 - tvd / max_distance).clamp(0.0, 1.0)
}
