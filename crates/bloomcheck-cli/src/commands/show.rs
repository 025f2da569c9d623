//! The `bloomcheck show` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use uuid::Uuid;

use bloomcheck_core::report::{PaperRecord, Report};
use bloomcheck_report::text::render_text;

/// A saved report and, when present, the paper record next to it.
#[derive(Debug, Serialize)]
pub struct SavedPaper {
    pub report: Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<PaperRecord>,
}

pub fn execute(reports_dir: PathBuf, id: Uuid, format: String) -> Result<()> {
    let saved = load(&reports_dir, id)?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&saved)?),
        "text" => print!("{}", render(&saved)),
        other => anyhow::bail!("unknown show format: {other} (expected text or json)"),
    }

    Ok(())
}

pub(crate) fn load(dir: &Path, id: Uuid) -> Result<SavedPaper> {
    let report_path = dir.join(format!("{id}.report.json"));
    anyhow::ensure!(
        report_path.is_file(),
        "no saved report for paper {id} in {}",
        dir.display()
    );
    let report = Report::load_json(&report_path)?;
    anyhow::ensure!(
        report.paper_id == id,
        "{} holds paper {}, not {id}",
        report_path.display(),
        report.paper_id
    );

    let record_path = dir.join(format!("{id}.paper.json"));
    let record = if record_path.is_file() {
        Some(PaperRecord::load_json(&record_path).context("failed to load the paper record")?)
    } else {
        tracing::debug!(path = %record_path.display(), "no paper record; showing report only");
        None
    };

    Ok(SavedPaper { report, record })
}

pub(crate) fn render(saved: &SavedPaper) -> String {
    match &saved.record {
        Some(record) => render_text(
            &saved.report,
            Some(&record.breakdown),
            &record.paper.questions,
        ),
        None => render_text(&saved.report, None, &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloomcheck_core::model::AnalysisRequest;
    use bloomcheck_core::{Analysis, AnalysisEngine, EngineConfig};

    fn analysis() -> Analysis {
        AnalysisEngine::new(EngineConfig::default())
            .unwrap()
            .analyze(&AnalysisRequest::new(["Define entropy.", "Compare it with enthalpy."]))
            .unwrap()
    }

    #[test]
    fn shows_questions_when_record_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analysis();
        let id = analysis.report.paper_id;
        analysis
            .report
            .save_json(&dir.path().join(format!("{id}.report.json")))
            .unwrap();
        analysis
            .record()
            .save_json(&dir.path().join(format!("{id}.paper.json")))
            .unwrap();

        let saved = load(dir.path(), id).unwrap();
        assert_eq!(saved.report, analysis.report);
        let text = render(&saved);
        assert!(text.contains("QUESTIONS\n"));
        assert!(text.contains("] Define entropy."));
        assert!(text.contains(" | clarity "));
    }

    #[test]
    fn report_alone_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analysis();
        let id = analysis.report.paper_id;
        analysis
            .report
            .save_json(&dir.path().join(format!("{id}.report.json")))
            .unwrap();

        let saved = load(dir.path(), id).unwrap();
        assert!(saved.record.is_none());
        assert!(!render(&saved).contains("QUESTIONS\n"));
    }

    #[test]
    fn unknown_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), Uuid::new_v4()).unwrap_err();
        assert!(err.to_string().contains("no saved report"));
    }
}
