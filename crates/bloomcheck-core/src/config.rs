//! Engine configuration: lexicon, thresholds, weights and limits.
//!
//! The configuration is loaded once at startup, validated, and then shared
//! read-only by every analysis. Each section has a complete built-in
//! default; a section that appears in a config file must be complete, so a
//! typo or a missing key is reported instead of silently weakening the rules.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::model::{CognitiveLevel, DifficultyTier};

/// Environment variable that overrides `limits.max_questions`.
pub const MAX_QUESTIONS_ENV: &str = "BLOOMCHECK_MAX_QUESTIONS";

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "bloomcheck.toml";

/// Top-level bloomcheck configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub limits: Limits,
    pub lexicon: Lexicon,
    pub difficulty: DifficultyConfig,
    pub ambiguity: AmbiguityConfig,
    pub quality: QualityConfig,
    pub suggestions: SuggestionConfig,
    pub scoring: ScoringConfig,
}

/// Verb/phrase cues per cognitive level. Cues are matched as whole words;
/// multi-word cues match as contiguous word sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Lexicon {
    pub knowledge: Vec<String>,
    pub comprehension: Vec<String>,
    pub application: Vec<String>,
    pub analysis: Vec<String>,
    pub synthesis: Vec<String>,
    pub evaluation: Vec<String>,
}

impl Lexicon {
    pub fn cues(&self, level: CognitiveLevel) -> &[String] {
        match level {
            CognitiveLevel::Knowledge => &self.knowledge,
            CognitiveLevel::Comprehension => &self.comprehension,
            CognitiveLevel::Application => &self.application,
            CognitiveLevel::Analysis => &self.analysis,
            CognitiveLevel::Synthesis => &self.synthesis,
            CognitiveLevel::Evaluation => &self.evaluation,
        }
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            knowledge: strings(&[
                "define", "list", "identify", "recall", "name", "label", "match", "state",
                "memorize", "repeat", "reproduce", "outline", "what is", "who", "when", "where",
            ]),
            comprehension: strings(&[
                "explain", "describe", "discuss", "interpret", "summarize", "summarise",
                "classify", "paraphrase", "translate", "express", "restate", "why", "how does",
            ]),
            application: strings(&[
                "apply", "solve", "use", "demonstrate", "calculate", "compute", "illustrate",
                "implement", "modify", "operate", "execute", "sketch",
            ]),
            analysis: strings(&[
                "analyze", "analyse", "compare", "contrast", "distinguish", "differentiate",
                "examine", "investigate", "categorize", "categorise", "infer", "deconstruct",
                "break down",
            ]),
            // No "plan": in stems it is mostly a noun ("the Marshall plan").
            synthesis: strings(&[
                "create", "design", "compose", "construct", "formulate", "propose", "develop",
                "devise", "generate", "hypothesize", "hypothesise", "invent", "integrate",
            ]),
            evaluation: strings(&[
                "evaluate", "judge", "critique", "criticize", "criticise", "justify", "assess",
                "appraise", "argue", "defend", "recommend", "to what extent",
            ]),
        }
    }
}

/// Weights and thresholds of the composite difficulty signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DifficultyConfig {
    /// Words that add one point to the signal.
    pub words_per_point: f64,
    /// Added per subordinating connective ("however", "given that", ...).
    pub clause_weight: f64,
    /// Added per comma or semicolon.
    pub comma_weight: f64,
    /// Added per higher-order level (Analysis/Synthesis/Evaluation) with a matching cue.
    pub higher_order_weight: f64,
    /// Signal at or above this is at least Medium.
    pub medium_threshold: f64,
    /// Signal at or above this is Hard.
    pub hard_threshold: f64,
    pub connectives: Vec<String>,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            words_per_point: 10.0,
            clause_weight: 1.0,
            comma_weight: 0.5,
            higher_order_weight: 1.5,
            medium_threshold: 1.5,
            hard_threshold: 3.0,
            connectives: strings(&[
                "however", "although", "whereas", "given that", "assuming", "because", "unless",
                "if", "while", "therefore", "hence", "such that", "provided that", "which",
            ]),
        }
    }
}

/// Ambiguity indicator catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AmbiguityConfig {
    /// Pronouns that need an antecedent in the same clause.
    pub referents: Vec<String>,
    /// Vague quantifiers and hedges.
    pub vague_terms: Vec<String>,
    /// Phrases that push the reader toward an answer.
    pub leading_phrases: Vec<String>,
    /// Stems with fewer words than this are flagged as too short.
    pub min_words: usize,
}

impl Default for AmbiguityConfig {
    fn default() -> Self {
        Self {
            referents: strings(&["this", "that", "it", "these", "those", "they", "them"]),
            vague_terms: strings(&[
                "various", "several", "sometimes", "possibly", "maybe", "approximately", "often",
                "usually", "generally", "mostly", "rarely", "somewhat", "a few", "and so on",
                "and so forth",
            ]),
            leading_phrases: strings(&[
                "wouldn't you agree", "don't you think", "isn't it true", "do you agree",
            ]),
            min_words: 2,
        }
    }
}

/// Deductions from a question's 100-point quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityConfig {
    /// Deducted once when the question is ambiguous.
    pub ambiguous_penalty: u32,
    /// Deducted per ambiguity indicator and per quality issue.
    pub issue_penalty: u32,
    /// Stems with fewer words than this lose `short_penalty`.
    pub short_words: usize,
    pub short_penalty: u32,
    /// Stems with more words than this lose `long_penalty`.
    pub long_words: usize,
    pub long_penalty: u32,
    /// This many commas and semicolons make a "complex sentence" issue.
    pub complex_separators: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            ambiguous_penalty: 20,
            issue_penalty: 10,
            short_words: 5,
            short_penalty: 15,
            long_words: 40,
            long_penalty: 10,
            complex_separators: 3,
        }
    }
}

/// Thresholds for the suggestion rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuggestionConfig {
    /// Nonzero levels below this share get a medium coverage suggestion.
    pub min_level_share: f64,
    /// Tier deviation from target beyond this gets a medium suggestion.
    pub difficulty_tolerance: f64,
    /// Tier deviation beyond this (or an absent tier) gets a high suggestion.
    pub high_deviation: f64,
    /// Questions longer than this many words get a low clarity suggestion.
    pub max_question_words: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            min_level_share: 0.10,
            difficulty_tolerance: 0.15,
            high_deviation: 0.30,
            max_question_words: 40,
        }
    }
}

/// Weights of the overall score and the target difficulty mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    pub coverage_weight: f64,
    pub clarity_weight: f64,
    pub balance_weight: f64,
    pub targets: TierTargets,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            coverage_weight: 0.4,
            clarity_weight: 0.3,
            balance_weight: 0.3,
            targets: TierTargets::default(),
        }
    }
}

/// Target share of each difficulty tier; must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TierTargets {
    pub easy: f64,
    pub medium: f64,
    pub hard: f64,
}

impl TierTargets {
    pub fn get(&self, tier: DifficultyTier) -> f64 {
        match tier {
            DifficultyTier::Easy => self.easy,
            DifficultyTier::Medium => self.medium,
            DifficultyTier::Hard => self.hard,
        }
    }
}

impl Default for TierTargets {
    fn default() -> Self {
        Self {
            easy: 0.3,
            medium: 0.5,
            hard: 0.2,
        }
    }
}

/// Ingestion limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Limits {
    /// Papers with more questions are rejected before analysis.
    pub max_questions: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { max_questions: 200 }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl EngineConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, AnalysisError> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| AnalysisError::Configuration(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as TOML (used by `init`).
    pub fn to_toml(&self) -> Result<String, AnalysisError> {
        toml::to_string_pretty(self)
            .map_err(|e| AnalysisError::Configuration(format!("failed to render config: {e}")))
    }

    /// Check every section for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let bad = |msg: String| Err(AnalysisError::Configuration(msg));

        if self.limits.max_questions == 0 {
            return bad("limits.max_questions must be at least 1".into());
        }

        for level in CognitiveLevel::ALL {
            let key = level.name().to_lowercase();
            let cues = self.lexicon.cues(level);
            if cues.is_empty() {
                return bad(format!("lexicon.{key} has no cues"));
            }
            check_phrases(&format!("lexicon.{key}"), cues)?;
        }

        let d = &self.difficulty;
        if !(d.words_per_point.is_finite() && d.words_per_point > 0.0) {
            return bad("difficulty.words_per_point must be positive".into());
        }
        for (name, w) in [
            ("clause_weight", d.clause_weight),
            ("comma_weight", d.comma_weight),
            ("higher_order_weight", d.higher_order_weight),
        ] {
            if !(w.is_finite() && w >= 0.0) {
                return bad(format!("difficulty.{name} must be a non-negative number"));
            }
        }
        if !(d.medium_threshold > 0.0 && d.medium_threshold < d.hard_threshold) {
            return bad(format!(
                "difficulty thresholds must satisfy 0 < medium ({}) < hard ({})",
                d.medium_threshold, d.hard_threshold
            ));
        }
        check_phrases("difficulty.connectives", &d.connectives)?;

        let a = &self.ambiguity;
        if a.min_words == 0 {
            return bad("ambiguity.min_words must be at least 1".into());
        }
        check_phrases("ambiguity.referents", &a.referents)?;
        check_phrases("ambiguity.vague_terms", &a.vague_terms)?;
        check_phrases("ambiguity.leading_phrases", &a.leading_phrases)?;

        let q = &self.quality;
        for (name, penalty) in [
            ("ambiguous_penalty", q.ambiguous_penalty),
            ("issue_penalty", q.issue_penalty),
            ("short_penalty", q.short_penalty),
            ("long_penalty", q.long_penalty),
        ] {
            if penalty > 100 {
                return bad(format!("quality.{name} must be at most 100"));
            }
        }
        if q.short_words > q.long_words {
            return bad(format!(
                "quality word limits must satisfy short_words ({}) <= long_words ({})",
                q.short_words, q.long_words
            ));
        }
        if q.complex_separators == 0 {
            return bad("quality.complex_separators must be at least 1".into());
        }

        let s = &self.suggestions;
        if !(0.0..=1.0).contains(&s.min_level_share) {
            return bad("suggestions.min_level_share must be within [0, 1]".into());
        }
        if !(s.difficulty_tolerance >= 0.0 && s.high_deviation >= s.difficulty_tolerance) {
            return bad(
                "suggestions thresholds must satisfy 0 <= difficulty_tolerance <= high_deviation"
                    .into(),
            );
        }
        if s.max_question_words == 0 {
            return bad("suggestions.max_question_words must be at least 1".into());
        }

        let sc = &self.scoring;
        let weights = [sc.coverage_weight, sc.clarity_weight, sc.balance_weight];
        if weights.iter().any(|w| !(w.is_finite() && *w >= 0.0)) {
            return bad("scoring weights must be non-negative numbers".into());
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return bad("scoring weights must not all be zero".into());
        }
        let t = sc.targets;
        if [t.easy, t.medium, t.hard]
            .iter()
            .any(|v| !(0.0..=1.0).contains(v))
        {
            return bad("scoring.targets must each be within [0, 1]".into());
        }
        if (t.easy + t.medium + t.hard - 1.0).abs() > 1e-6 {
            return bad(format!(
                "scoring.targets must sum to 1 (got {})",
                t.easy + t.medium + t.hard
            ));
        }

        Ok(())
    }
}

fn check_phrases(section: &str, phrases: &[String]) -> Result<(), AnalysisError> {
    if let Some(pos) = phrases.iter().position(|p| p.trim().is_empty()) {
        return Err(AnalysisError::Configuration(format!(
            "{section}[{pos}] is blank"
        )));
    }
    Ok(())
}

/// Load configuration, searching in order: the explicit path, `./bloomcheck.toml`,
/// `~/.config/bloomcheck/config.toml`, then the built-in defaults.
///
/// An explicit path that does not exist is an error.
pub fn load_config_from(path: Option<&Path>) -> Result<EngineConfig, AnalysisError> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AnalysisError::Configuration(format!(
                    "config file not found: {}",
                    p.display()
                )));
            }
            Some(p.to_path_buf())
        }
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                AnalysisError::Configuration(format!(
                    "failed to read config {}: {e}",
                    path.display()
                ))
            })?;
            tracing::debug!("loading configuration from {}", path.display());
            toml::from_str::<EngineConfig>(&content).map_err(|e| {
                AnalysisError::Configuration(format!(
                    "failed to parse config {}: {e}",
                    path.display()
                ))
            })?
        }
        None => EngineConfig::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Apply environment overrides. `lookup` abstracts `std::env::var` for tests.
pub fn apply_env_overrides<F>(mut config: EngineConfig, lookup: F) -> Result<EngineConfig, AnalysisError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(MAX_QUESTIONS_ENV) {
        let value = raw.trim().parse::<usize>().map_err(|_| {
            AnalysisError::Configuration(format!(
                "{MAX_QUESTIONS_ENV} must be a positive integer, got '{raw}'"
            ))
        })?;
        config.limits.max_questions = value;
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("bloomcheck"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.limits.max_questions, 200);
        assert!(config.lexicon.cues(CognitiveLevel::Analysis).contains(&"analyze".to_string()));
    }

    #[test]
    fn partial_file_keeps_default_sections() {
        let config = EngineConfig::from_toml_str("[limits]\nmax_questions = 50\n").unwrap();
        assert_eq!(config.limits.max_questions, 50);
        assert_eq!(config.lexicon, Lexicon::default());
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn incomplete_section_is_rejected() {
        let err = EngineConfig::from_toml_str("[difficulty]\nmedium_threshold = 2.0\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = EngineConfig::from_toml_str("[limits]\nmax_question = 5\n").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn empty_lexicon_level_is_rejected() {
        let mut config = EngineConfig::default();
        config.lexicon.synthesis.clear();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lexicon.synthesis"), "{err}");
    }

    #[test]
    fn blank_cue_is_rejected() {
        let mut config = EngineConfig::default();
        config.ambiguity.vague_terms.push("  ".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let mut config = EngineConfig::default();
        config.difficulty.medium_threshold = 4.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn targets_must_sum_to_one() {
        let mut config = EngineConfig::default();
        config.scoring.targets.hard = 0.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1"));
    }

    #[test]
    fn zero_weights_rejected() {
        let mut config = EngineConfig::default();
        config.scoring.coverage_weight = 0.0;
        config.scoring.clarity_weight = 0.0;
        config.scoring.balance_weight = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn quality_section_overrides_deductions() {
        let config = EngineConfig::from_toml_str(
            "[quality]\nambiguous_penalty = 30\nissue_penalty = 5\nshort_words = 4\n\
             short_penalty = 10\nlong_words = 30\nlong_penalty = 20\ncomplex_separators = 4\n",
        )
        .unwrap();
        assert_eq!(config.quality.ambiguous_penalty, 30);
        assert_eq!(config.quality.long_words, 30);
        assert_eq!(config.suggestions, SuggestionConfig::default());
    }

    #[test]
    fn quality_limits_are_validated() {
        let mut config = EngineConfig::default();
        config.quality.issue_penalty = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("quality.issue_penalty"), "{err}");

        let mut config = EngineConfig::default();
        config.quality.short_words = 50;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.quality.complex_separators = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_toml_is_configuration_error() {
        let err = EngineConfig::from_toml_str("this is not [valid toml }{").unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }

    #[test]
    fn rendered_defaults_parse_back() {
        let rendered = EngineConfig::default().to_toml().unwrap();
        let parsed = EngineConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[ambiguity]\nreferents = [\"it\"]\nvague_terms = []\nleading_phrases = []\nmin_words = 3\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.ambiguity.min_words, 3);
        assert_eq!(config.ambiguity.referents, vec!["it"]);
    }

    #[test]
    fn load_missing_explicit_file_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/bloomcheck.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn env_override_applies() {
        let config = apply_env_overrides(EngineConfig::default(), |key| {
            (key == MAX_QUESTIONS_ENV).then(|| "12".to_string())
        })
        .unwrap();
        assert_eq!(config.limits.max_questions, 12);
    }

    #[test]
    fn env_override_rejects_garbage() {
        let err = apply_env_overrides(EngineConfig::default(), |_| Some("lots".into())).unwrap_err();
        assert!(matches!(err, AnalysisError::Configuration(_)));
    }
}
