//! The `bloomcheck list` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use bloomcheck_core::model::Grade;
use bloomcheck_core::report::{PaperRecord, Report};

use super::stats::load_reports;

/// One saved paper as shown by `list`.
#[derive(Debug, Clone, Serialize)]
pub struct PaperSummary {
    pub paper_id: Uuid,
    pub source: Option<String>,
    pub subject: String,
    pub professor_name: String,
    pub upload_date: Option<DateTime<Utc>>,
    pub total_questions: usize,
    pub score: u32,
    pub grade: Grade,
    pub ambiguous: usize,
}

impl PaperSummary {
    fn new(report: &Report, record: Option<&PaperRecord>) -> Self {
        Self {
            paper_id: report.paper_id,
            source: record.map(|r| r.paper.source.clone()),
            subject: report.subject.clone(),
            professor_name: report.professor_name.clone(),
            upload_date: record.map(|r| r.paper.upload_date),
            total_questions: report.total_questions,
            score: report.overall_score.score,
            grade: report.overall_score.grade,
            ambiguous: report.ambiguous_questions.len(),
        }
    }
}

pub fn execute(
    reports_dir: PathBuf,
    subject: Option<String>,
    professor: Option<String>,
    format: String,
) -> Result<()> {
    anyhow::ensure!(
        reports_dir.is_dir(),
        "not a directory: {}",
        reports_dir.display()
    );

    let papers = collect(&reports_dir, subject.as_deref(), professor.as_deref())?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&papers)?),
        "text" => print_text(&papers),
        other => anyhow::bail!("unknown list format: {other} (expected text or json)"),
    }

    Ok(())
}

/// Summaries of the saved papers matching the filters, newest upload first.
/// Papers without a readable paper record sort last, in file-name order.
pub(crate) fn collect(
    dir: &Path,
    subject: Option<&str>,
    professor: Option<&str>,
) -> Result<Vec<PaperSummary>> {
    let mut papers: Vec<PaperSummary> = load_reports(dir)?
        .iter()
        .filter(|r| matches_filter(&r.subject, subject))
        .filter(|r| matches_filter(&r.professor_name, professor))
        .map(|report| {
            let path = dir.join(format!("{}.paper.json", report.paper_id));
            let record = if path.is_file() {
                match PaperRecord::load_json(&path) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping paper record");
                        None
                    }
                }
            } else {
                None
            };
            PaperSummary::new(report, record.as_ref())
        })
        .collect();

    // Stable sort keeps file-name order among equal dates.
    papers.sort_by(|a, b| b.upload_date.cmp(&a.upload_date));
    Ok(papers)
}

/// Case-insensitive match on the trimmed value; no filter matches everything.
fn matches_filter(value: &str, filter: Option<&str>) -> bool {
    filter.is_none_or(|f| value.trim().eq_ignore_ascii_case(f.trim()))
}

fn print_text(papers: &[PaperSummary]) {
    use comfy_table::{Cell, Table};

    if papers.is_empty() {
        println!("No saved papers match.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Paper", "Source", "Subject", "Professor", "Uploaded", "Questions", "Score", "Grade",
        "Ambiguous",
    ]);
    for p in papers {
        table.add_row(vec![
            Cell::new(p.paper_id),
            Cell::new(p.source.as_deref().unwrap_or("-")),
            Cell::new(or_dash(&p.subject)),
            Cell::new(or_dash(&p.professor_name)),
            Cell::new(
                p.upload_date
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".into()),
            ),
            Cell::new(p.total_questions),
            Cell::new(p.score),
            Cell::new(p.grade),
            Cell::new(p.ambiguous),
        ]);
    }
    println!("{table}");
    println!("{} paper(s)", papers.len());
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}
