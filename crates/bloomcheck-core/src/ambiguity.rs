//! Ambiguity detection.
//!
//! Checks run in a fixed order and each contributes at most one indicator
//! per distinct finding, so the returned list is an ordered set. An empty
//! list means the question reads as unambiguous.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{AmbiguityConfig, Lexicon};
use crate::error::AnalysisError;
use crate::model::CognitiveLevel;
use crate::preprocess::{normalize, tokenize, Phrase};

/// Words that never serve as an antecedent and never make a pronoun a determiner.
const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "but", "nor", "of", "to", "in", "on", "at", "for", "with", "by",
    "from", "as", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "has",
    "have", "had", "will", "would", "can", "could", "should", "may", "might", "must", "shall",
    "not", "no", "so", "then", "than", "into", "onto", "about", "your", "you", "its", "their",
    "our", "his", "her", "my", "what", "which", "who", "whom", "whose", "how", "why", "when",
    "where", "etc", "also", "all", "any", "each", "very",
];

/// Referents that can also act as determiners ("this algorithm").
const DEMONSTRATIVES: &[&str] = &["this", "that", "these", "those"];

/// Stems of prefixed words that are not negations ("universally",
/// "uniformity", "understand", "irrigation").
const NON_NEGATING_STEMS: &[&str] = &[
    "unit", "union", "uniq", "univers", "unif", "unis", "until", "unless", "unix", "under",
    "iron", "irrigat", "irritat", "iris", "nonce",
];

static DOUBLE_NEGATIVE: OnceLock<Regex> = OnceLock::new();

fn double_negative() -> &'static Regex {
    DOUBLE_NEGATIVE.get_or_init(|| {
        Regex::new(r"\b(?:not|never|no)\s+((?:un|non-?|ir)[a-z]{3,})")
            .expect("double negative regex is valid")
    })
}

#[derive(Debug, Clone)]
pub struct AmbiguityDetector {
    referents: Vec<String>,
    vague_terms: Vec<Phrase>,
    leading_phrases: Vec<Phrase>,
    min_words: usize,
    cue_words: HashSet<String>,
}

impl AmbiguityDetector {
    pub fn new(config: &AmbiguityConfig, lexicon: &Lexicon) -> Result<Self, AnalysisError> {
        let phrases = |section: &str, raw: &[String]| -> Result<Vec<Phrase>, AnalysisError> {
            raw.iter()
                .map(|p| {
                    Phrase::parse(p).ok_or_else(|| {
                        AnalysisError::Configuration(format!("{section}: '{p}' contains no words"))
                    })
                })
                .collect()
        };

        let cue_words = CognitiveLevel::ALL
            .into_iter()
            .flat_map(|level| lexicon.cues(level).iter())
            .filter_map(|cue| Phrase::parse(cue))
            .flat_map(|phrase| phrase.words().to_vec())
            .collect();

        Ok(Self {
            referents: config
                .referents
                .iter()
                .map(|r| r.trim().to_lowercase())
                .collect(),
            vague_terms: phrases("ambiguity.vague_terms", &config.vague_terms)?,
            leading_phrases: phrases("ambiguity.leading_phrases", &config.leading_phrases)?,
            min_words: config.min_words,
            cue_words,
        })
    }

    /// Indicators for one question, given its folded text and tokens.
    pub fn detect(&self, folded: &str, tokens: &[&str]) -> Vec<String> {
        let mut found = Indicators::default();

        for clause in folded.split([',', ';', ':', '.', '?', '!']) {
            let words = tokenize(clause);
            for (i, word) in words.iter().enumerate() {
                if !self.is_referent(word) {
                    continue;
                }
                let is_determiner = DEMONSTRATIVES.contains(word)
                    && words.get(i + 1).is_some_and(|next| self.is_content(next));
                let has_antecedent = words[..i].iter().any(|w| self.is_content(w));
                if !is_determiner && !has_antecedent {
                    found.push(format!("vague referent \"{word}\""));
                }
            }
        }

        for term in &self.vague_terms {
            if term.is_in(tokens) {
                found.push(format!("vague term \"{}\"", term.as_str()));
            }
        }

        if tokens.contains(&"etc") {
            found.push("trailing \"etc.\"".to_string());
        }

        if folded.contains("and/or") {
            found.push("\"and/or\"".to_string());
        }

        if folded.matches('?').count() > 1 {
            found.push("multiple question marks".to_string());
        }

        let negated = double_negative()
            .captures_iter(folded)
            .filter_map(|caps| caps.get(1))
            .any(|m| {
                let word = m.as_str();
                !NON_NEGATING_STEMS
                    .iter()
                    .any(|stem| word.starts_with(stem))
            });
        if negated {
            found.push("double negative".to_string());
        }

        if self.leading_phrases.iter().any(|p| p.is_in(tokens)) {
            found.push("leading question".to_string());
        }

        if tokens.len() < self.min_words {
            let noun = if tokens.len() == 1 { "word" } else { "words" };
            found.push(format!("stem too short ({} {noun})", tokens.len()));
        }

        found.into_vec()
    }

    /// Indicators for raw question text.
    pub fn detect_text(&self, text: &str) -> Vec<String> {
        let folded = normalize(text).unwrap_or_default().to_lowercase();
        self.detect(&folded, &tokenize(&folded))
    }

    fn is_referent(&self, word: &str) -> bool {
        self.referents.iter().any(|r| r == word)
    }

    /// A word that can name something: not a function word, pronoun or
    /// instruction verb, and at least three letters.
    fn is_content(&self, word: &str) -> bool {
        word.chars().count() >= 3
            && !FUNCTION_WORDS.contains(&word)
            && !self.is_referent(word)
            && !self.cue_words.contains(word)
    }
}

/// Insertion-ordered set of indicator strings.
#[derive(Default)]
struct Indicators {
    items: Vec<String>,
}

impl Indicators {
    fn push(&mut self, indicator: String) {
        if !self.items.contains(&indicator) {
            self.items.push(indicator);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}
