//! Question preprocessing.
//!
//! Turns the raw question strings handed over by ingestion into numbered
//! records with a display-ready normalized text and a case-folded copy used
//! only for keyword matching.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::AnalysisError;

static LABELLED_MARKER: OnceLock<Regex> = OnceLock::new();
static NUMBER_MARKER: OnceLock<Regex> = OnceLock::new();

/// Leading "Q4:", "Q3)", "Question 5 -", "Q6 " style markers.
fn labelled_marker() -> &'static Regex {
    LABELLED_MARKER.get_or_init(|| {
        Regex::new(r"(?i)^\(?q(?:uestion)?\.?\s*\d+[a-z]?\s*(?:[.):\]-](?:\s+|$)|\s+|$)")
            .expect("labelled marker regex is valid")
    })
}

/// Leading "1.", "2)", "(3)", "4 -", "5:" style markers.
fn number_marker() -> &'static Regex {
    NUMBER_MARKER.get_or_init(|| {
        Regex::new(r"(?i)^\(?(\d+)[a-z]?\s*([.):\]-])(?:\s+|$)")
            .expect("number marker regex is valid")
    })
}

/// Remove a leading enumeration marker.
///
/// A bare number followed by `-` or `:` is only a marker when it has at most
/// three digits and a word follows, so "7 - 3 equals" and "1945: explain"
/// keep their number.
fn strip_marker(text: &str) -> &str {
    if let Some(m) = labelled_marker().find(text) {
        return &text[m.end()..];
    }
    let Some(caps) = number_marker().captures(text) else {
        return text;
    };
    let rest = &text[caps[0].len()..];
    let loose = matches!(&caps[2], "-" | ":");
    if loose && (caps[1].len() > 3 || !rest.starts_with(char::is_alphabetic)) {
        return text;
    }
    rest
}

/// A question after normalization, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuestion {
    /// 1-based position among the retained questions.
    pub number: usize,
    /// The raw input string.
    pub text: String,
    /// Trimmed, de-numbered, whitespace-collapsed; casing preserved.
    pub normalized_text: String,
    /// Lower-cased `normalized_text`, for matching only.
    pub folded: String,
}

impl PreparedQuestion {
    /// Words of the folded text.
    pub fn tokens(&self) -> Vec<&str> {
        tokenize(&self.folded)
    }
}

/// Split folded text into words: runs of alphanumerics and inner apostrophes.
pub fn tokenize(folded: &str) -> Vec<&str> {
    folded
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .collect()
}

/// A lower-cased word sequence matched against question tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    text: String,
    words: Vec<String>,
}

impl Phrase {
    /// Returns `None` when `raw` contains no words.
    pub fn parse(raw: &str) -> Option<Self> {
        let text = raw.trim().to_lowercase();
        let words: Vec<String> = tokenize(&text).into_iter().map(String::from).collect();
        if words.is_empty() {
            None
        } else {
            Some(Self { text, words })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    fn matches_at(&self, window: &[&str]) -> bool {
        window.iter().zip(&self.words).all(|(t, w)| *t == w.as_str())
    }

    /// Start index of the first occurrence.
    pub fn find(&self, tokens: &[&str]) -> Option<usize> {
        if self.words.len() > tokens.len() {
            return None;
        }
        tokens
            .windows(self.words.len())
            .position(|w| self.matches_at(w))
    }

    pub fn is_in(&self, tokens: &[&str]) -> bool {
        self.find(tokens).is_some()
    }

    /// Number of (possibly overlapping) occurrences.
    pub fn occurrences(&self, tokens: &[&str]) -> usize {
        if self.words.len() > tokens.len() {
            return 0;
        }
        tokens
            .windows(self.words.len())
            .filter(|w| self.matches_at(w))
            .count()
    }
}

/// Normalize one raw question. Returns `None` when nothing is left.
pub fn normalize(raw: &str) -> Option<String> {
    let visible: String = raw
        .chars()
        .filter(|c| !is_invisible(*c))
        .map(|c| if c == '\u{2019}' { '\'' } else { c })
        .collect();
    let stripped = strip_marker(visible.trim());
    let collapsed = stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Zero-width characters and non-whitespace control characters.
fn is_invisible(c: char) -> bool {
    matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}')
        || (c.is_control() && !c.is_whitespace())
}

/// Normalize and number a paper's raw questions.
///
/// Blank entries are skipped and the remaining questions are numbered
/// consecutively from 1. Fails when the list is empty or entirely blank.
pub fn preprocess<S: AsRef<str>>(raw: &[S]) -> Result<Vec<PreparedQuestion>, AnalysisError> {
    if raw.is_empty() {
        return Err(AnalysisError::Validation("question list is empty".into()));
    }

    let mut prepared = Vec::with_capacity(raw.len());
    for (index, entry) in raw.iter().enumerate() {
        let text = entry.as_ref();
        let Some(normalized_text) = normalize(text) else {
            tracing::debug!("skipping blank entry at input position {}", index + 1);
            continue;
        };
        let folded = normalized_text.to_lowercase();
        prepared.push(PreparedQuestion {
            number: prepared.len() + 1,
            text: text.to_string(),
            normalized_text,
            folded,
        });
    }

    if prepared.is_empty() {
        return Err(AnalysisError::Validation(format!(
            "all {} questions are blank",
            raw.len()
        )));
    }

    Ok(prepared)
}
