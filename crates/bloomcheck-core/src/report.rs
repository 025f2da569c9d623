//! Report types with JSON persistence and re-analysis comparison.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{
    AmbiguousQuestion, BloomsDistribution, CognitiveLevel, DifficultyDistribution,
    DifficultyTier, Grade, OverallScore, Paper, Suggestion,
};
use crate::scoring::{Aggregate, ScoreBreakdown};

/// The quality report for one paper. Field names and layout are the
/// external contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub paper_id: Uuid,
    pub subject: String,
    pub professor_name: String,
    pub total_questions: usize,
    pub overall_score: OverallScore,
    pub blooms_distribution: BloomsDistribution,
    pub difficulty_distribution: DifficultyDistribution,
    pub ambiguous_questions: Vec<AmbiguousQuestion>,
    pub suggestions: Vec<Suggestion>,
}

impl Report {
    /// Compose a report from an analysed paper, its aggregate and suggestions.
    pub fn assemble(paper: &Paper, aggregate: &Aggregate, suggestions: Vec<Suggestion>) -> Self {
        let ambiguous_questions = paper
            .questions
            .iter()
            .filter(|q| q.ambiguous)
            .map(|q| AmbiguousQuestion {
                question_number: q.number,
                question: q.normalized_text.clone(),
                indicators: q.indicators.clone(),
            })
            .collect();

        Self {
            paper_id: paper.id,
            subject: paper.subject.clone(),
            professor_name: paper.professor_name.clone(),
            total_questions: paper.total_questions(),
            overall_score: aggregate.overall,
            blooms_distribution: aggregate.blooms,
            difficulty_distribution: aggregate.difficulty,
            ambiguous_questions,
            suggestions,
        }
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        save(self, path, "report")
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        load(path, "report")
    }

    /// Compare this report against an earlier analysis of the same paper.
    pub fn compare(&self, baseline: &Report) -> ReportComparison {
        let levels = CognitiveLevel::ALL
            .into_iter()
            .map(|level| {
                CountDelta::new(
                    level,
                    baseline.blooms_distribution.get(level),
                    self.blooms_distribution.get(level),
                )
            })
            .collect();
        let tiers = DifficultyTier::ALL
            .into_iter()
            .map(|tier| {
                CountDelta::new(
                    tier,
                    baseline.difficulty_distribution.get(tier),
                    self.difficulty_distribution.get(tier),
                )
            })
            .collect();

        ReportComparison {
            baseline_paper_id: baseline.paper_id,
            current_paper_id: self.paper_id,
            score: Change::new(
                baseline.overall_score.score as usize,
                self.overall_score.score as usize,
            ),
            baseline_grade: baseline.overall_score.grade,
            current_grade: self.overall_score.grade,
            levels,
            tiers,
            ambiguous: Change::new(
                baseline.ambiguous_questions.len(),
                self.ambiguous_questions.len(),
            ),
            questions: Change::new(baseline.total_questions, self.total_questions),
        }
    }
}

/// A paper together with its score breakdown, as stored next to its report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    pub paper: Paper,
    pub breakdown: ScoreBreakdown,
}

impl PaperRecord {
    pub fn save_json(&self, path: &Path) -> Result<()> {
        save(self, path, "paper")
    }

    pub fn load_json(path: &Path) -> Result<Self> {
        load(path, "paper")
    }
}

fn save<T: Serialize>(value: &T, path: &Path, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize {what}"))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write {what} to {}", path.display()))?;
    Ok(())
}

fn load<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what} JSON in {}", path.display()))
}

/// Baseline and current value of one count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub baseline: usize,
    pub current: usize,
}

impl Change {
    fn new(baseline: usize, current: usize) -> Self {
        Self { baseline, current }
    }

    pub fn delta(&self) -> i64 {
        self.current as i64 - self.baseline as i64
    }
}

/// A [`Change`] for one level or tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountDelta<K> {
    pub key: K,
    #[serde(flatten)]
    pub change: Change,
}

impl<K> CountDelta<K> {
    fn new(key: K, baseline: usize, current: usize) -> Self {
        Self {
            key,
            change: Change::new(baseline, current),
        }
    }

    pub fn delta(&self) -> i64 {
        self.change.delta()
    }
}

/// Result of comparing two reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportComparison {
    pub baseline_paper_id: Uuid,
    pub current_paper_id: Uuid,
    pub score: Change,
    pub baseline_grade: Grade,
    pub current_grade: Grade,
    pub levels: Vec<CountDelta<CognitiveLevel>>,
    pub tiers: Vec<CountDelta<DifficultyTier>>,
    pub ambiguous: Change,
    pub questions: Change,
}

impl ReportComparison {
    pub fn score_delta(&self) -> i64 {
        self.score.delta()
    }

    pub fn grade_changed(&self) -> bool {
        self.baseline_grade != self.current_grade
    }

    /// True when the score fell by more than `threshold` points.
    pub fn is_regression(&self, threshold: u32) -> bool {
        self.score_delta() < -(threshold as i64)
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** score {} -> {} ({:+}), grade {} -> {}, ambiguous questions {} -> {} ({:+})\n\n",
            self.score.baseline,
            self.score.current,
            self.score_delta(),
            self.baseline_grade,
            self.current_grade,
            self.ambiguous.baseline,
            self.ambiguous.current,
            self.ambiguous.delta(),
        ));

        md.push_str("### Cognitive levels\n\n");
        md.push_str("| Level | Baseline | Current | Delta |\n");
        md.push_str("|-------|----------|---------|-------|\n");
        for c in &self.levels {
            md.push_str(&format!(
                "| {} | {} | {} | {:+} |\n",
                c.key,
                c.change.baseline,
                c.change.current,
                c.delta()
            ));
        }
        md.push('\n');

        md.push_str("### Difficulty\n\n");
        md.push_str("| Tier | Baseline | Current | Delta |\n");
        md.push_str("|------|----------|---------|-------|\n");
        for c in &self.tiers {
            md.push_str(&format!(
                "| {} | {} | {} | {:+} |\n",
                c.key,
                c.change.baseline,
                c.change.current,
                c.delta()
            ));
        }

        md
    }
}
