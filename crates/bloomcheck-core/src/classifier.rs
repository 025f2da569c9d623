//! Bloom's taxonomy classifier.
//!
//! The lexicon is compiled once into word sequences; classification scans a
//! question's tokens for every cue and keeps the highest level that matched.
//! Questions with no cue default to [`CognitiveLevel::Knowledge`].

use crate::config::Lexicon;
use crate::error::AnalysisError;
use crate::model::CognitiveLevel;
use crate::preprocess::{normalize, tokenize, Phrase};

/// Level assigned when no cue matches.
pub const DEFAULT_LEVEL: CognitiveLevel = CognitiveLevel::Knowledge;

#[derive(Debug, Clone)]
struct CompiledCue {
    level: CognitiveLevel,
    phrase: Phrase,
}

/// Result of classifying one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub level: CognitiveLevel,
    /// Every cue that matched, lowest level first, lexicon order within a level.
    pub matches: Vec<(CognitiveLevel, String)>,
}

impl Classification {
    /// Whether any cue of `level` matched.
    pub fn has_level(&self, level: CognitiveLevel) -> bool {
        self.matches.iter().any(|(l, _)| *l == level)
    }

    pub fn cue_phrases(&self) -> Vec<String> {
        self.matches.iter().map(|(_, p)| p.clone()).collect()
    }
}

/// Compiled, read-only lexicon matcher.
#[derive(Debug, Clone)]
pub struct Classifier {
    cues: Vec<CompiledCue>,
}

impl Classifier {
    pub fn new(lexicon: &Lexicon) -> Result<Self, AnalysisError> {
        let mut cues: Vec<CompiledCue> = Vec::new();
        for level in CognitiveLevel::ALL {
            for raw in lexicon.cues(level) {
                let phrase = Phrase::parse(raw).ok_or_else(|| {
                    AnalysisError::Configuration(format!(
                        "lexicon cue '{raw}' for {level} contains no words"
                    ))
                })?;
                if cues.iter().any(|c| c.level == level && c.phrase == phrase) {
                    continue;
                }
                cues.push(CompiledCue { level, phrase });
            }
        }
        Ok(Self { cues })
    }

    /// Classify a tokenized (case-folded) question.
    pub fn classify(&self, tokens: &[&str]) -> Classification {
        let matches: Vec<(CognitiveLevel, String)> = self
            .cues
            .iter()
            .filter(|cue| cue.phrase.is_in(tokens))
            .map(|cue| (cue.level, cue.phrase.as_str().to_string()))
            .collect();

        let level = matches
            .iter()
            .map(|(level, _)| *level)
            .max()
            .unwrap_or(DEFAULT_LEVEL);

        Classification { level, matches }
    }

    /// Classify raw question text.
    pub fn classify_text(&self, text: &str) -> CognitiveLevel {
        let folded = normalize(text).unwrap_or_default().to_lowercase();
        self.classify(&tokenize(&folded)).level
    }
}
