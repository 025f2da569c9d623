//! The `bloomcheck analyze` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use bloomcheck_core::config::load_config_from;
use bloomcheck_core::engine::{Analysis, AnalysisEngine, ProgressReporter, INLINE_SOURCE};
use bloomcheck_core::model::AnalysisRequest;
use bloomcheck_core::parser;
use bloomcheck_core::AnalysisError;
use bloomcheck_report::html::write_html_report;
use bloomcheck_report::text::write_text_report;
use bloomcheck_report::ExportFormat;

/// Arguments of `bloomcheck analyze`.
pub struct AnalyzeArgs {
    pub input: Option<PathBuf>,
    pub texts: Vec<String>,
    pub professor: Option<String>,
    pub subject: Option<String>,
    pub output: PathBuf,
    pub format: String,
    pub config: Option<PathBuf>,
    pub parallelism: usize,
}

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_paper_start(&self, index: usize, source: &str) {
        eprintln!("  Analysing [{}] {source}", index + 1);
    }

    fn on_paper_complete(&self, index: usize, analysis: &Analysis) {
        let report = &analysis.report;
        eprintln!(
            "  [{}] {} questions, score {} ({}), {} ambiguous",
            index + 1,
            report.total_questions,
            report.overall_score.score,
            report.overall_score.grade,
            report.ambiguous_questions.len()
        );
    }

    fn on_paper_error(&self, index: usize, source: &str, error: &AnalysisError) {
        eprintln!("  ERROR [{}] {source}: {error}", index + 1);
    }

    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} analysed, {failed} failed ({:.2}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(args: AnalyzeArgs) -> Result<()> {
    anyhow::ensure!(args.parallelism >= 1, "parallelism must be at least 1");
    anyhow::ensure!(
        args.input.is_some() || !args.texts.is_empty(),
        "nothing to analyse: pass --input or at least one --text"
    );
    let formats = ExportFormat::parse_list(&args.format).map_err(anyhow::Error::msg)?;

    let config = load_config_from(args.config.as_deref())?;
    let engine = AnalysisEngine::new(config)?;

    let mut requests = Vec::new();
    if let Some(input) = &args.input {
        let loaded = parser::load_papers(input)
            .with_context(|| format!("failed to load papers from {}", input.display()))?;
        anyhow::ensure!(
            !loaded.is_empty(),
            "no papers found in {}",
            input.display()
        );
        requests.extend(loaded);
    }
    if !args.texts.is_empty() {
        requests.push(AnalysisRequest::new(args.texts.iter().cloned()).with_source(INLINE_SOURCE));
    }
    let requests: Vec<AnalysisRequest> = requests
        .into_iter()
        .map(|request| fill_metadata(request, args.professor.as_deref(), args.subject.as_deref()))
        .collect();

    tracing::debug!(papers = requests.len(), ?formats, "prepared analysis requests");
    eprintln!(
        "bloomcheck v{} - analysing {} paper(s)",
        env!("CARGO_PKG_VERSION"),
        requests.len()
    );
    eprintln!();

    let sources: Vec<String> = requests
        .iter()
        .map(|r| r.source.clone().unwrap_or_else(|| INLINE_SOURCE.to_string()))
        .collect();
    let results = engine
        .analyze_batch(requests, args.parallelism, &ConsoleReporter)
        .await;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let (analysed, failures) = persist_results(sources, results, &args.output, &formats);

    if !analysed.is_empty() {
        print_summary(&analysed);
    }

    if !failures.is_empty() {
        let detail: Vec<String> = failures
            .iter()
            .map(|(source, e)| format!("{source}: {e:#}"))
            .collect();
        anyhow::bail!(
            "{} of {} paper(s) failed to analyse\n  {}",
            failures.len(),
            failures.len() + analysed.len(),
            detail.join("\n  ")
        );
    }

    Ok(())
}

/// Paper that could not be analysed or saved.
type Failure = (String, anyhow::Error);

/// Save every successful analysis. A paper whose outputs cannot be written
/// joins the failures; the remaining papers are still saved.
fn persist_results(
    sources: Vec<String>,
    results: Vec<Result<Analysis, AnalysisError>>,
    output: &Path,
    formats: &[ExportFormat],
) -> (Vec<(String, Analysis)>, Vec<Failure>) {
    let mut analysed = Vec::new();
    let mut failures = Vec::new();
    for (source, result) in sources.into_iter().zip(results) {
        match result {
            Ok(analysis) => match save_outputs(&analysis, output, formats) {
                Ok(()) => analysed.push((source, analysis)),
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "failed to save outputs");
                    failures.push((source, e));
                }
            },
            Err(e) => failures.push((source, e.into())),
        }
    }
    (analysed, failures)
}

/// CLI metadata only fills fields the paper left empty.
fn fill_metadata(
    mut request: AnalysisRequest,
    professor: Option<&str>,
    subject: Option<&str>,
) -> AnalysisRequest {
    if let Some(professor) = professor {
        if request.professor_name.trim().is_empty() {
            request.professor_name = professor.to_string();
        }
    }
    if let Some(subject) = subject {
        if request.subject.trim().is_empty() {
            request.subject = subject.to_string();
        }
    }
    request
}

fn save_outputs(analysis: &Analysis, output: &Path, formats: &[ExportFormat]) -> Result<()> {
    let id = analysis.report.paper_id;

    // The exact report and the paper record are always persisted; `stats`
    // and `compare` read them back.
    let report_json = output.join(format!("{id}.report.json"));
    analysis.report.save_json(&report_json)?;
    analysis
        .record()
        .save_json(&output.join(format!("{id}.paper.json")))?;

    let questions = &analysis.paper.questions;

    for format in formats {
        let path = output.join(format!("{id}.report.{}", format.extension()));
        match format {
            ExportFormat::Json => {}
            ExportFormat::Text => {
                write_text_report(&analysis.report, Some(&analysis.breakdown), questions, &path)?;
            }
            ExportFormat::Html => {
                write_html_report(&analysis.report, Some(&analysis.breakdown), questions, &path)?;
            }
        }
        eprintln!("{format} report: {}", path.display());
    }

    Ok(())
}

fn print_summary(analysed: &[(String, Analysis)]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Paper",
        "Source",
        "Questions",
        "Score",
        "Grade",
        "Ambiguous",
        "Suggestions",
    ]);

    for (source, analysis) in analysed {
        let report = &analysis.report;
        table.add_row(vec![
            Cell::new(report.paper_id),
            Cell::new(source),
            Cell::new(report.total_questions),
            Cell::new(report.overall_score.score),
            Cell::new(report.overall_score.grade),
            Cell::new(report.ambiguous_questions.len()),
            Cell::new(report.suggestions.len()),
        ]);
    }

    println!("{table}");
}
