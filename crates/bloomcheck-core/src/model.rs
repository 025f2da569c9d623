//! Core data model types for bloomcheck.
//!
//! These are the types the whole system passes around: the closed
//! classification enums, per-paper distributions, analysed questions and
//! papers, and the suggestions attached to a report.

use std::cmp::Ordering;
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bloom's taxonomy level, ordered by increasing cognitive complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CognitiveLevel {
    Knowledge,
    Comprehension,
    Application,
    Analysis,
    Synthesis,
    Evaluation,
}

impl CognitiveLevel {
    /// All levels, lowest first.
    pub const ALL: [CognitiveLevel; 6] = [
        CognitiveLevel::Knowledge,
        CognitiveLevel::Comprehension,
        CognitiveLevel::Application,
        CognitiveLevel::Analysis,
        CognitiveLevel::Synthesis,
        CognitiveLevel::Evaluation,
    ];

    /// Levels that count as higher-order thinking for difficulty estimation.
    pub const HIGHER_ORDER: [CognitiveLevel; 3] = [
        CognitiveLevel::Analysis,
        CognitiveLevel::Synthesis,
        CognitiveLevel::Evaluation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CognitiveLevel::Knowledge => "Knowledge",
            CognitiveLevel::Comprehension => "Comprehension",
            CognitiveLevel::Application => "Application",
            CognitiveLevel::Analysis => "Analysis",
            CognitiveLevel::Synthesis => "Synthesis",
            CognitiveLevel::Evaluation => "Evaluation",
        }
    }
}

impl fmt::Display for CognitiveLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CognitiveLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "knowledge" | "remember" => Ok(CognitiveLevel::Knowledge),
            "comprehension" | "understand" => Ok(CognitiveLevel::Comprehension),
            "application" | "apply" => Ok(CognitiveLevel::Application),
            "analysis" | "analyze" => Ok(CognitiveLevel::Analysis),
            "synthesis" | "create" => Ok(CognitiveLevel::Synthesis),
            "evaluation" | "evaluate" => Ok(CognitiveLevel::Evaluation),
            other => Err(format!("unknown cognitive level: {other}")),
        }
    }
}

/// Difficulty tier assigned to a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [
        DifficultyTier::Easy,
        DifficultyTier::Medium,
        DifficultyTier::Hard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DifficultyTier::Easy => "Easy",
            DifficultyTier::Medium => "Medium",
            DifficultyTier::Hard => "Hard",
        }
    }
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DifficultyTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(DifficultyTier::Easy),
            "medium" => Ok(DifficultyTier::Medium),
            "hard" => Ok(DifficultyTier::Hard),
            other => Err(format!("unknown difficulty tier: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Distributions
// ---------------------------------------------------------------------------

/// Question count per cognitive level. Every level is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloomsDistribution {
    #[serde(rename = "Knowledge")]
    pub knowledge: usize,
    #[serde(rename = "Comprehension")]
    pub comprehension: usize,
    #[serde(rename = "Application")]
    pub application: usize,
    #[serde(rename = "Analysis")]
    pub analysis: usize,
    #[serde(rename = "Synthesis")]
    pub synthesis: usize,
    #[serde(rename = "Evaluation")]
    pub evaluation: usize,
}

impl BloomsDistribution {
    pub fn get(&self, level: CognitiveLevel) -> usize {
        match level {
            CognitiveLevel::Knowledge => self.knowledge,
            CognitiveLevel::Comprehension => self.comprehension,
            CognitiveLevel::Application => self.application,
            CognitiveLevel::Analysis => self.analysis,
            CognitiveLevel::Synthesis => self.synthesis,
            CognitiveLevel::Evaluation => self.evaluation,
        }
    }

    fn slot(&mut self, level: CognitiveLevel) -> &mut usize {
        match level {
            CognitiveLevel::Knowledge => &mut self.knowledge,
            CognitiveLevel::Comprehension => &mut self.comprehension,
            CognitiveLevel::Application => &mut self.application,
            CognitiveLevel::Analysis => &mut self.analysis,
            CognitiveLevel::Synthesis => &mut self.synthesis,
            CognitiveLevel::Evaluation => &mut self.evaluation,
        }
    }

    /// Count one more question at `level`.
    pub fn record(&mut self, level: CognitiveLevel) {
        *self.slot(level) += 1;
    }

    pub fn total(&self) -> usize {
        CognitiveLevel::ALL.iter().map(|&l| self.get(l)).sum()
    }

    /// Levels with their counts, lowest level first.
    pub fn iter(&self) -> impl Iterator<Item = (CognitiveLevel, usize)> + '_ {
        CognitiveLevel::ALL.into_iter().map(|l| (l, self.get(l)))
    }

    /// Fraction of questions at `level` (0.0 for an empty distribution).
    pub fn share(&self, level: CognitiveLevel) -> f64 {
        share_of(self.get(level), self.total())
    }
}

impl AddAssign for BloomsDistribution {
    fn add_assign(&mut self, rhs: Self) {
        for (level, count) in rhs.iter() {
            *self.slot(level) += count;
        }
    }
}

impl FromIterator<CognitiveLevel> for BloomsDistribution {
    fn from_iter<I: IntoIterator<Item = CognitiveLevel>>(iter: I) -> Self {
        let mut dist = Self::default();
        for level in iter {
            dist.record(level);
        }
        dist
    }
}

/// Question count per difficulty tier. Every tier is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyDistribution {
    #[serde(rename = "Easy")]
    pub easy: usize,
    #[serde(rename = "Medium")]
    pub medium: usize,
    #[serde(rename = "Hard")]
    pub hard: usize,
}

impl DifficultyDistribution {
    pub fn get(&self, tier: DifficultyTier) -> usize {
        match tier {
            DifficultyTier::Easy => self.easy,
            DifficultyTier::Medium => self.medium,
            DifficultyTier::Hard => self.hard,
        }
    }

    fn slot(&mut self, tier: DifficultyTier) -> &mut usize {
        match tier {
            DifficultyTier::Easy => &mut self.easy,
            DifficultyTier::Medium => &mut self.medium,
            DifficultyTier::Hard => &mut self.hard,
        }
    }

    pub fn record(&mut self, tier: DifficultyTier) {
        *self.slot(tier) += 1;
    }

    pub fn total(&self) -> usize {
        self.easy + self.medium + self.hard
    }

    pub fn iter(&self) -> impl Iterator<Item = (DifficultyTier, usize)> + '_ {
        DifficultyTier::ALL.into_iter().map(|t| (t, self.get(t)))
    }

    pub fn share(&self, tier: DifficultyTier) -> f64 {
        share_of(self.get(tier), self.total())
    }
}

impl AddAssign for DifficultyDistribution {
    fn add_assign(&mut self, rhs: Self) {
        for (tier, count) in rhs.iter() {
            *self.slot(tier) += count;
        }
    }
}

impl FromIterator<DifficultyTier> for DifficultyDistribution {
    fn from_iter<I: IntoIterator<Item = DifficultyTier>>(iter: I) -> Self {
        let mut dist = Self::default();
        for tier in iter {
            dist.record(tier);
        }
        dist
    }
}

fn share_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

// ---------------------------------------------------------------------------
// Questions and papers
// ---------------------------------------------------------------------------

/// A single analysed question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// 1-based position in the paper.
    pub number: usize,
    /// The question as submitted.
    pub text: String,
    /// Trimmed, de-numbered, whitespace-collapsed text (casing preserved).
    pub normalized_text: String,
    /// Assigned Bloom's level.
    pub level: CognitiveLevel,
    /// Assigned difficulty tier.
    pub difficulty: DifficultyTier,
    /// `true` iff `indicators` is non-empty.
    pub ambiguous: bool,
    /// Ambiguity indicators in detection order, without duplicates.
    #[serde(default)]
    pub indicators: Vec<String>,
    /// Word count of the normalized text.
    #[serde(default)]
    pub word_count: usize,
    /// Composite difficulty signal behind `difficulty`.
    #[serde(default)]
    pub difficulty_signal: f64,
    /// Lexicon cues that matched, lowest level first.
    #[serde(default)]
    pub cues: Vec<String>,
    /// 0-100 score of this question alone.
    #[serde(default)]
    pub quality_score: u32,
    /// Quality issues that are not ambiguity ("complex sentence").
    #[serde(default)]
    pub quality_issues: Vec<String>,
}

/// A submitted question paper and its analysed questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub id: Uuid,
    /// File name the questions came from, or "inline".
    pub source: String,
    pub professor_name: String,
    pub subject: String,
    pub upload_date: DateTime<Utc>,
    pub questions: Vec<Question>,
}

impl Paper {
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}

/// The engine's input contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub questions: Vec<String>,
    #[serde(default)]
    pub professor_name: String,
    #[serde(default)]
    pub subject: String,
    /// Where the questions came from (file name); "inline" when absent.
    #[serde(default)]
    pub source: Option<String>,
}

impl AnalysisRequest {
    pub fn new<I, S>(questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            questions: questions.into_iter().map(Into::into).collect(),
            professor_name: String::new(),
            subject: String::new(),
            source: None,
        }
    }

    pub fn with_professor(mut self, name: impl Into<String>) -> Self {
        self.professor_name = name.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Scores and suggestions
// ---------------------------------------------------------------------------

/// Letter grade derived from the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    /// Fixed cutoffs: 90 / 75 / 60.
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            75..=89 => Grade::B,
            60..=74 => Grade::C,
            _ => Grade::D,
        }
    }

    pub fn feedback(self) -> &'static str {
        match self {
            Grade::A => "Excellent paper with comprehensive cognitive coverage and good balance.",
            Grade::B => "Good paper. Minor improvements suggested for better balance.",
            Grade::C => "Fair paper. Several improvements needed for comprehensive coverage.",
            Grade::D => "Significant improvements needed. Review the suggestions carefully.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
        };
        f.write_str(letter)
    }
}

/// Overall paper score. Construct through [`OverallScore::new`] so the
/// grade always matches the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredScore")]
pub struct OverallScore {
    /// 0..=100.
    pub score: u32,
    pub grade: Grade,
}

/// Wire form of [`OverallScore`]. The stored grade is ignored and rebuilt
/// from the score.
#[derive(Deserialize)]
struct StoredScore {
    score: u32,
}

impl TryFrom<StoredScore> for OverallScore {
    type Error = String;

    fn try_from(stored: StoredScore) -> Result<Self, Self::Error> {
        if stored.score > 100 {
            return Err(format!("overall score {} is above 100", stored.score));
        }
        Ok(OverallScore::new(stored.score))
    }
}

impl OverallScore {
    pub fn new(score: u32) -> Self {
        let score = score.min(100);
        Self {
            score,
            grade: Grade::from_score(score),
        }
    }
}

/// Suggestion priority. `High` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionCategory {
    Coverage,
    DifficultyBalance,
    Clarity,
}

impl fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionCategory::Coverage => write!(f, "coverage"),
            SuggestionCategory::DifficultyBalance => write!(f, "difficulty-balance"),
            SuggestionCategory::Clarity => write!(f, "clarity"),
        }
    }
}

/// An actionable recommendation for the paper's author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: SuggestionCategory,
    pub message: String,
    pub priority: Priority,
}

/// An ambiguous question as listed in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbiguousQuestion {
    pub question_number: usize,
    pub question: String,
    pub indicators: Vec<String>,
}
