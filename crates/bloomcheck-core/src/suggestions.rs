//! Suggestion generation.
//!
//! Rules run in a fixed order (coverage, difficulty balance, clarity) and the
//! result is stably sorted by priority, so suggestions with equal priority
//! keep their detection order.

use crate::config::{SuggestionConfig, TierTargets};
use crate::model::{
    BloomsDistribution, CognitiveLevel, DifficultyDistribution, DifficultyTier, Priority,
    Question, Suggestion, SuggestionCategory,
};

/// Everything the rules look at.
#[derive(Debug, Clone, Copy)]
pub struct SuggestionInput<'a> {
    pub blooms: &'a BloomsDistribution,
    pub difficulty: &'a DifficultyDistribution,
    pub questions: &'a [Question],
}

/// Derive prioritized suggestions for one paper.
pub fn generate(
    input: SuggestionInput<'_>,
    config: &SuggestionConfig,
    targets: &TierTargets,
) -> Vec<Suggestion> {
    let mut out = Vec::new();
    coverage(&mut out, input.blooms, config);
    difficulty_balance(&mut out, input.difficulty, config, targets);
    clarity(&mut out, input.questions, config);
    out.sort_by_key(|s| s.priority);
    out
}

fn push(out: &mut Vec<Suggestion>, category: SuggestionCategory, priority: Priority, message: String) {
    out.push(Suggestion {
        category,
        message,
        priority,
    });
}

fn coverage(out: &mut Vec<Suggestion>, blooms: &BloomsDistribution, config: &SuggestionConfig) {
    let total = blooms.total();

    for (level, count) in blooms.iter() {
        if count == 0 {
            push(
                out,
                SuggestionCategory::Coverage,
                Priority::High,
                format!(
                    "No questions target the {level} level. Add at least one {} question.",
                    level.name().to_lowercase()
                ),
            );
        }
    }

    for (level, count) in blooms.iter() {
        let share = blooms.share(level);
        if count > 0 && share < config.min_level_share {
            push(
                out,
                SuggestionCategory::Coverage,
                Priority::Medium,
                format!(
                    "Only {count} of {total} questions ({:.0}%) target the {level} level. \
                     Consider adding more.",
                    share * 100.0
                ),
            );
        }
    }

    let levels = CognitiveLevel::ALL.len();
    if total < levels {
        push(
            out,
            SuggestionCategory::Coverage,
            Priority::Low,
            format!(
                "The paper has {total} question{}; at least {levels} are needed to cover every cognitive level.",
                if total == 1 { "" } else { "s" }
            ),
        );
    }
}

fn difficulty_balance(
    out: &mut Vec<Suggestion>,
    difficulty: &DifficultyDistribution,
    config: &SuggestionConfig,
    targets: &TierTargets,
) {
    for tier in DifficultyTier::ALL {
        let share = difficulty.share(tier);
        let target = targets.get(tier);
        let deviation = (share - target).abs();
        if deviation <= config.difficulty_tolerance {
            continue;
        }

        let absent = difficulty.get(tier) == 0;
        let priority = if absent || deviation > config.high_deviation {
            Priority::High
        } else {
            Priority::Medium
        };
        let action = if share < target { "Add more" } else { "Reduce the number of" };

        push(
            out,
            SuggestionCategory::DifficultyBalance,
            priority,
            format!(
                "{tier} questions make up {:.0}% of the paper against a target of {:.0}%. \
                 {action} {} questions.",
                share * 100.0,
                target * 100.0,
                tier.name().to_lowercase()
            ),
        );
    }
}

fn clarity(out: &mut Vec<Suggestion>, questions: &[Question], config: &SuggestionConfig) {
    for q in questions.iter().filter(|q| q.ambiguous) {
        push(
            out,
            SuggestionCategory::Clarity,
            Priority::High,
            format!(
                "Question {} is ambiguous ({}). Rephrase it.",
                q.number,
                q.indicators.join(", ")
            ),
        );
    }

    for q in questions
        .iter()
        .filter(|q| q.word_count > config.max_question_words)
    {
        push(
            out,
            SuggestionCategory::Clarity,
            Priority::Low,
            format!(
                "Question {} is {} words long. Consider splitting or shortening it.",
                q.number, q.word_count
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(number: usize, level: CognitiveLevel, difficulty: DifficultyTier) -> Question {
        Question {
            number,
            text: format!("Question {number}"),
            normalized_text: format!("Question {number}"),
            level,
            difficulty,
            ambiguous: false,
            indicators: vec![],
            word_count: 5,
            difficulty_signal: 0.5,
            cues: vec![],
            quality_score: 100,
            quality_issues: vec![],
        }
    }

    fn run(questions: &[Question]) -> Vec<Suggestion> {
        run_with(questions, &SuggestionConfig::default(), &TierTargets::default())
    }

    fn run_with(
        questions: &[Question],
        config: &SuggestionConfig,
        targets: &TierTargets,
    ) -> Vec<Suggestion> {
        let blooms: BloomsDistribution = questions.iter().map(|q| q.level).collect();
        let difficulty: DifficultyDistribution = questions.iter().map(|q| q.difficulty).collect();
        generate(
            SuggestionInput {
                blooms: &blooms,
                difficulty: &difficulty,
                questions,
            },
            config,
            targets,
        )
    }

    fn with_tiers(tiers: &[DifficultyTier]) -> Vec<Question> {
        tiers
            .iter()
            .enumerate()
            .map(|(i, &t)| question(i + 1, CognitiveLevel::ALL[i % 6], t))
            .collect()
    }

    fn balance(suggestions: &[Suggestion]) -> Vec<&Suggestion> {
        suggestions
            .iter()
            .filter(|s| s.category == SuggestionCategory::DifficultyBalance)
            .collect()
    }

    #[test]
    fn missing_levels_are_high_coverage() {
        let suggestions = run(&[
            question(1, CognitiveLevel::Knowledge, DifficultyTier::Easy),
            question(2, CognitiveLevel::Analysis, DifficultyTier::Medium),
            question(3, CognitiveLevel::Synthesis, DifficultyTier::Medium),
        ]);

        let high_coverage: Vec<&str> = suggestions
            .iter()
            .filter(|s| s.category == SuggestionCategory::Coverage && s.priority == Priority::High)
            .map(|s| s.message.as_str())
            .collect();
        assert_eq!(high_coverage.len(), 3);
        assert!(high_coverage[0].contains("Comprehension"));
        assert!(high_coverage[1].contains("Application"));
        assert!(high_coverage[2].contains("Evaluation"));

        // Hard tier absent, Medium over target.
        let balance: Vec<&Suggestion> = suggestions
            .iter()
            .filter(|s| s.category == SuggestionCategory::DifficultyBalance)
            .collect();
        assert_eq!(balance.len(), 2);
        assert!(balance.iter().any(|s| s.priority == Priority::High
            && s.message.starts_with("Hard")
            && s.message.contains("Add more hard")));
        assert!(balance.iter().any(|s| s.priority == Priority::Medium
            && s.message.contains("Reduce the number of medium")));

        assert!(suggestions
            .iter()
            .any(|s| s.priority == Priority::Low && s.message.contains("at least 6")));
    }

    #[test]
    fn ambiguous_question_gets_clarity_high() {
        let mut q = question(1, CognitiveLevel::Comprehension, DifficultyTier::Easy);
        q.ambiguous = true;
        q.indicators = vec!["vague referent \"this\"".into(), "trailing \"etc.\"".into()];
        let suggestions = run(&[q]);

        let clarity: Vec<&Suggestion> = suggestions
            .iter()
            .filter(|s| s.category == SuggestionCategory::Clarity)
            .collect();
        assert_eq!(clarity.len(), 1);
        assert_eq!(clarity[0].priority, Priority::High);
        assert!(clarity[0].message.starts_with("Question 1 is ambiguous"));
        assert!(clarity[0].message.contains("trailing \"etc.\""));
    }

    #[test]
    fn sorted_high_to_low_with_stable_ties() {
        let mut long = question(2, CognitiveLevel::Evaluation, DifficultyTier::Hard);
        long.word_count = 55;
        let suggestions = run(&[
            question(1, CognitiveLevel::Knowledge, DifficultyTier::Easy),
            long,
        ]);

        let priorities: Vec<Priority> = suggestions.iter().map(|s| s.priority).collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);

        // Detection order inside the high group: coverage before difficulty balance.
        let first_balance = suggestions
            .iter()
            .position(|s| s.category == SuggestionCategory::DifficultyBalance)
            .unwrap();
        let last_coverage_high = suggestions
            .iter()
            .rposition(|s| s.category == SuggestionCategory::Coverage && s.priority == Priority::High)
            .unwrap();
        assert!(last_coverage_high < first_balance);

        assert!(suggestions
            .iter()
            .any(|s| s.priority == Priority::Low && s.message.contains("55 words")));
    }

    #[test]
    fn underrepresented_level_is_medium_coverage() {
        let mut questions = Vec::new();
        for (i, level) in CognitiveLevel::ALL.iter().cycle().take(11).enumerate() {
            questions.push(question(i + 1, *level, DifficultyTier::Medium));
        }
        // Evaluation appears once in 11 (9%).
        let suggestions = run(&questions);
        let medium: Vec<&Suggestion> = suggestions
            .iter()
            .filter(|s| s.category == SuggestionCategory::Coverage && s.priority == Priority::Medium)
            .collect();
        assert_eq!(medium.len(), 1);
        assert!(medium[0].message.contains("Evaluation"));
        assert!(medium[0].message.contains("Only 1 of 11"));
    }

    #[test]
    fn present_tier_far_from_target_is_high() {
        let mut tiers = vec![DifficultyTier::Easy; 8];
        tiers.push(DifficultyTier::Medium);
        tiers.push(DifficultyTier::Hard);
        // Easy 80% against 30%; Medium 10% against 50%; Hard 10% against 20%.
        let suggestions = run(&with_tiers(&tiers));
        let balance = balance(&suggestions);

        assert_eq!(balance.len(), 2);
        assert_eq!(balance[0].priority, Priority::High);
        assert!(balance[0].message.starts_with("Easy questions make up 80%"));
        assert!(balance[0].message.contains("Reduce the number of easy"));
        assert_eq!(balance[1].priority, Priority::High);
        assert!(balance[1].message.contains("Add more medium"));
    }

    #[test]
    fn deviation_equal_to_tolerance_is_accepted() {
        let targets = TierTargets {
            easy: 0.25,
            medium: 0.5,
            hard: 0.25,
        };
        let questions = with_tiers(&[
            DifficultyTier::Easy,
            DifficultyTier::Easy,
            DifficultyTier::Medium,
            DifficultyTier::Hard,
        ]);
        // Easy and Medium both deviate by exactly 0.25.
        let at = SuggestionConfig {
            difficulty_tolerance: 0.25,
            ..SuggestionConfig::default()
        };
        assert!(balance(&run_with(&questions, &at, &targets)).is_empty());

        let below = SuggestionConfig {
            difficulty_tolerance: 0.24,
            ..SuggestionConfig::default()
        };
        let suggestions = run_with(&questions, &below, &targets);
        let flagged = balance(&suggestions);
        assert_eq!(flagged.len(), 2);
        assert!(flagged.iter().all(|s| s.priority == Priority::Medium));
    }

    #[test]
    fn balanced_paper_has_no_balance_suggestions() {
        let tiers = [
            DifficultyTier::Easy,
            DifficultyTier::Easy,
            DifficultyTier::Easy,
            DifficultyTier::Medium,
            DifficultyTier::Medium,
            DifficultyTier::Medium,
            DifficultyTier::Medium,
            DifficultyTier::Medium,
            DifficultyTier::Hard,
            DifficultyTier::Hard,
        ];
        let questions: Vec<Question> = tiers
            .iter()
            .enumerate()
            .map(|(i, &t)| question(i + 1, CognitiveLevel::ALL[i % 6], t))
            .collect();
        let suggestions = run(&questions);
        assert!(suggestions
            .iter()
            .all(|s| s.category != SuggestionCategory::DifficultyBalance));
    }
}
