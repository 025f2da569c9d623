//! Per-question quality score.
//!
//! Every question starts at 100 and loses configured points for being
//! ambiguous, for each ambiguity indicator or quality issue, and for a stem
//! that is too short or too long. The score never drops below zero.

use crate::config::QualityConfig;

/// Score and the non-ambiguity issues behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityAssessment {
    pub score: u32,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QualityAssessor {
    config: QualityConfig,
}

impl QualityAssessor {
    pub fn new(config: &QualityConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Assess a question from its folded text, word count and ambiguity
    /// indicators.
    pub fn assess(&self, folded: &str, word_count: usize, indicators: &[String]) -> QualityAssessment {
        let c = &self.config;

        let mut issues = Vec::new();
        let separators = folded.chars().filter(|ch| matches!(ch, ',' | ';')).count();
        if separators >= c.complex_separators {
            issues.push(format!("complex sentence ({separators} commas or semicolons)"));
        }

        let mut deduction = c.issue_penalty * (indicators.len() + issues.len()) as u32;
        if !indicators.is_empty() {
            deduction += c.ambiguous_penalty;
        }
        if word_count < c.short_words {
            deduction += c.short_penalty;
        } else if word_count > c.long_words {
            deduction += c.long_penalty;
        }

        QualityAssessment {
            score: 100u32.saturating_sub(deduction),
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assessor() -> QualityAssessor {
        QualityAssessor::new(&QualityConfig::default())
    }

    fn indicators(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn clear_question_of_moderate_length_scores_full() {
        let q = assessor().assess("explain how a hash table resolves collisions.", 7, &[]);
        assert_eq!(q.score, 100);
        assert!(q.issues.is_empty());
    }

    #[test]
    fn ambiguity_costs_a_flat_penalty_plus_one_per_indicator() {
        let found = indicators(&["vague term \"various\"", "trailing \"etc.\""]);
        let q = assessor().assess("discuss various engines in detail, etc.", 6, &found);
        // 100 - 20 - 2 * 10
        assert_eq!(q.score, 60);
    }

    #[test]
    fn short_and_long_stems_lose_points() {
        let a = assessor();
        assert_eq!(a.assess("define entropy.", 2, &[]).score, 85);
        assert_eq!(a.assess("", 41, &[]).score, 90);
        assert_eq!(a.assess("", 5, &[]).score, 100);
        assert_eq!(a.assess("", 40, &[]).score, 100);
    }

    #[test]
    fn many_separators_make_a_complex_sentence() {
        let q = assessor().assess(
            "given a, b; and c, compare the three sorting approaches carefully.",
            10,
            &[],
        );
        assert_eq!(q.issues, vec!["complex sentence (3 commas or semicolons)"]);
        assert_eq!(q.score, 90);

        let q = assessor().assess("given a and b, compare them, then explain why.", 9, &[]);
        assert!(q.issues.is_empty());
    }

    #[test]
    fn score_is_floored_at_zero() {
        let config = QualityConfig {
            ambiguous_penalty: 100,
            ..QualityConfig::default()
        };
        let q = QualityAssessor::new(&config).assess("it?", 1, &indicators(&["too short"]));
        assert_eq!(q.score, 0);
    }
}
