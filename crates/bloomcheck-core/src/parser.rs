//! Question paper ingestion.
//!
//! Loads analysis requests from plain-text, TOML and JSON files (or
//! directories of them) and validates them before analysis.
//!
//! - `.txt`: one question per line, blank lines ignored
//! - `.toml`: top-level `questions = [...]` plus an optional `[paper]` table
//!   with `professor_name` and `subject`
//! - `.json`: `{"questions": [...], "professor_name": ..., "subject": ...}`

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::Limits;
use crate::error::AnalysisError;
use crate::model::AnalysisRequest;
use crate::preprocess::normalize;

/// File extensions `load_papers` picks up.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["txt", "toml", "json"];

#[derive(Debug, Deserialize)]
struct TomlPaperFile {
    #[serde(default)]
    paper: TomlPaperHeader,
    #[serde(default)]
    questions: Vec<toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TomlPaperHeader {
    #[serde(default)]
    professor_name: String,
    #[serde(default)]
    subject: String,
}

/// Parse one paper file, choosing the format by extension.
pub fn parse_paper(path: &Path) -> Result<AnalysisRequest, AnalysisError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        AnalysisError::Validation(format!("failed to read paper {}: {e}", path.display()))
    })?;
    let source = source_name(path);

    match extension(path).as_deref() {
        Some("txt") => Ok(parse_text_str(&content, &source)),
        Some("toml") => parse_toml_str(&content, &source),
        Some("json") => parse_json_str(&content, &source),
        _ => Err(AnalysisError::Validation(format!(
            "unsupported paper format: {} (expected .txt, .toml or .json)",
            path.display()
        ))),
    }
}

/// One question per non-blank line.
pub fn parse_text_str(content: &str, source: &str) -> AnalysisRequest {
    AnalysisRequest::new(
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string),
    )
    .with_source(source)
}

pub fn parse_toml_str(content: &str, source: &str) -> Result<AnalysisRequest, AnalysisError> {
    let parsed: TomlPaperFile = toml::from_str(content).map_err(|e| {
        AnalysisError::Validation(format!("failed to parse TOML paper {source}: {e}"))
    })?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, value)| match value {
            toml::Value::String(s) => Ok(s),
            other => Err(non_string_entry(source, i, other.type_str())),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnalysisRequest::new(questions)
        .with_professor(parsed.paper.professor_name)
        .with_subject(parsed.paper.subject)
        .with_source(source))
}

pub fn parse_json_str(content: &str, source: &str) -> Result<AnalysisRequest, AnalysisError> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| {
        AnalysisError::Validation(format!("failed to parse JSON paper {source}: {e}"))
    })?;

    let Some(entries) = value.get("questions").and_then(|q| q.as_array()) else {
        return Err(AnalysisError::Internal(format!(
            "{source}: expected a \"questions\" array"
        )));
    };
    if let Some((i, bad)) = entries.iter().enumerate().find(|(_, v)| !v.is_string()) {
        let kind = match bad {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
            serde_json::Value::String(_) => "string",
        };
        return Err(non_string_entry(source, i, kind));
    }

    let mut request: AnalysisRequest = serde_json::from_value(value)
        .map_err(|e| AnalysisError::Internal(format!("{source}: malformed request: {e}")))?;
    if request.source.is_none() {
        request.source = Some(source.to_string());
    }
    Ok(request)
}

fn non_string_entry(source: &str, index: usize, kind: &str) -> AnalysisError {
    AnalysisError::Internal(format!(
        "{source}: question entry {} is not a string (found {kind})",
        index + 1
    ))
}

/// Recursively load every supported paper under `dir`, in path order.
/// Files that fail to parse are skipped with a warning.
pub fn load_paper_directory(dir: &Path) -> Result<Vec<AnalysisRequest>, AnalysisError> {
    if !dir.is_dir() {
        return Err(AnalysisError::Validation(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let mut papers = Vec::new();
    for path in sorted_entries(dir)? {
        if path.is_dir() {
            papers.extend(load_paper_directory(&path)?);
        } else if is_supported(&path) {
            match parse_paper(&path) {
                Ok(paper) => papers.push(paper),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(papers)
}

/// Load a single file or every paper in a directory.
pub fn load_papers(path: &Path) -> Result<Vec<AnalysisRequest>, AnalysisError> {
    if path.is_dir() {
        load_paper_directory(path)
    } else {
        parse_paper(path).map(|paper| vec![paper])
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    let read_err = |e: std::io::Error| {
        AnalysisError::Validation(format!("failed to read directory {}: {e}", dir.display()))
    };
    let mut paths = std::fs::read_dir(dir)
        .map_err(read_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_err)?;
    paths.sort();
    Ok(paths)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn is_supported(path: &Path) -> bool {
    extension(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Reject papers above the configured question limit.
pub fn check_limits(request: &AnalysisRequest, limits: &Limits) -> Result<(), AnalysisError> {
    let count = request.questions.len();
    if count > limits.max_questions {
        return Err(AnalysisError::Validation(format!(
            "paper {} has {count} questions; the limit is {}",
            request.source.as_deref().unwrap_or("inline"),
            limits.max_questions
        )));
    }
    Ok(())
}

/// A warning from paper validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// 1-based input position, when the warning concerns one entry.
    pub entry: Option<usize>,
    pub message: String,
}

impl ValidationWarning {
    fn paper(message: impl Into<String>) -> Self {
        Self {
            entry: None,
            message: message.into(),
        }
    }

    fn entry(entry: usize, message: impl Into<String>) -> Self {
        Self {
            entry: Some(entry),
            message: message.into(),
        }
    }
}

/// Check a paper for common issues. Warnings never block analysis, except
/// that an empty or over-limit paper will be rejected by the engine.
pub fn validate_request(request: &AnalysisRequest, limits: &Limits) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if request.questions.is_empty() {
        warnings.push(ValidationWarning::paper("paper has no questions"));
    }

    if request.questions.len() > limits.max_questions {
        warnings.push(ValidationWarning::paper(format!(
            "paper has {} questions; the limit is {}",
            request.questions.len(),
            limits.max_questions
        )));
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    for (index, raw) in request.questions.iter().enumerate() {
        let position = index + 1;
        let Some(normalized) = normalize(raw) else {
            warnings.push(ValidationWarning::entry(
                position,
                "entry is blank and will be skipped",
            ));
            continue;
        };
        let key = normalized.to_lowercase();
        if let Some(first) = seen.get(&key) {
            warnings.push(ValidationWarning::entry(
                position,
                format!("duplicate of entry {first}"),
            ));
        } else {
            seen.insert(key, position);
        }
    }

    if request.professor_name.trim().is_empty() {
        warnings.push(ValidationWarning::paper("professor_name is missing"));
    }
    if request.subject.trim().is_empty() {
        warnings.push(ValidationWarning::paper("subject is missing"));
    }

    warnings
}
