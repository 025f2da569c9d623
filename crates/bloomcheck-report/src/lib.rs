//! bloomcheck-report: export of analysis reports.
//!
//! - [`text`]: plain-text rendering that carries every report field
//! - [`html`]: a self-contained HTML page with distribution charts

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod html;
pub mod text;

#[cfg(test)]
pub(crate) mod fixtures;

/// An export format for a single report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Text,
    Html,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Json, ExportFormat::Text, ExportFormat::Html];

    /// File extension used after `<paper_id>.report.`.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
            ExportFormat::Html => "html",
        }
    }

    /// Parse a comma-separated list such as `json,html` or `all`.
    /// Duplicates are dropped; order follows the input.
    pub fn parse_list(raw: &str) -> Result<Vec<ExportFormat>, String> {
        let mut formats = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let parsed: Vec<ExportFormat> = if part.eq_ignore_ascii_case("all") {
                Self::ALL.to_vec()
            } else {
                vec![part.parse()?]
            };
            for f in parsed {
                if !formats.contains(&f) {
                    formats.push(f);
                }
            }
        }
        if formats.is_empty() {
            return Err("no export format given".into());
        }
        Ok(formats)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Text => write!(f, "text"),
            ExportFormat::Html => write!(f, "html"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            "html" => Ok(ExportFormat::Html),
            other => Err(format!(
                "unknown export format: {other} (expected json, text, html or all)"
            )),
        }
    }
}
