//! Cross-paper statistics.
//!
//! A pure fold over the reports the caller passes in; nothing is cached or
//! persisted.

use serde::{Deserialize, Serialize};

use crate::model::{BloomsDistribution, DifficultyDistribution};
use crate::report::Report;

/// Aggregate statistics across reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_papers: usize,
    pub total_questions: usize,
    /// Mean overall score; 0.0 when there are no papers.
    pub average_quality_score: f64,
    pub blooms_distribution: BloomsDistribution,
    pub difficulty_distribution: DifficultyDistribution,
}

/// Fold statistics over `reports`.
pub fn compute_statistics<'a, I>(reports: I) -> Statistics
where
    I: IntoIterator<Item = &'a Report>,
{
    let mut stats = Statistics::default();
    let mut score_sum = 0u64;

    for report in reports {
        stats.total_papers += 1;
        stats.total_questions += report.total_questions;
        stats.blooms_distribution += report.blooms_distribution;
        stats.difficulty_distribution += report.difficulty_distribution;
        score_sum += u64::from(report.overall_score.score);
    }

    if stats.total_papers > 0 {
        stats.average_quality_score = score_sum as f64 / stats.total_papers as f64;
    }

    stats
}
