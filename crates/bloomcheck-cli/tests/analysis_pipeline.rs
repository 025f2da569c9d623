//! End-to-end pipeline tests over the sample papers.
//!
//! These tests drive ingestion, batch analysis, persistence, statistics and
//! export through the library crates the CLI is built on.

use bloomcheck_core::engine::NoopReporter;
use bloomcheck_core::model::{AnalysisRequest, Priority};
use bloomcheck_core::parser::load_papers;
use bloomcheck_core::report::{PaperRecord, Report};
use bloomcheck_core::statistics::compute_statistics;
use bloomcheck_core::{Analysis, AnalysisEngine, AnalysisError, EngineConfig};
use bloomcheck_report::html::generate_html;
use bloomcheck_report::text::render_text;

const SAMPLE_PAPERS: &str = "../../papers";

fn engine() -> AnalysisEngine {
    AnalysisEngine::new(EngineConfig::default()).unwrap()
}

async fn analyse_samples() -> Vec<Analysis> {
    let requests = load_papers(SAMPLE_PAPERS.as_ref()).unwrap();
    assert_eq!(requests.len(), 3);

    engine()
        .analyze_batch(requests, 2, &NoopReporter)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect()
}

fn assert_report_invariants(report: &Report) {
    assert_eq!(report.blooms_distribution.total(), report.total_questions);
    assert_eq!(report.difficulty_distribution.total(), report.total_questions);
    assert!(report.overall_score.score <= 100);

    let numbers: Vec<usize> = report
        .ambiguous_questions
        .iter()
        .map(|a| a.question_number)
        .collect();
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    assert!(numbers
        .iter()
        .all(|&n| (1..=report.total_questions).contains(&n)));

    let priorities: Vec<Priority> = report.suggestions.iter().map(|s| s.priority).collect();
    assert!(priorities.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn sample_papers_analyse_in_path_order() {
    let analyses = analyse_samples().await;

    let sources: Vec<&str> = analyses
        .iter()
        .map(|a| a.paper.source.as_str())
        .collect();
    assert_eq!(
        sources,
        vec!["biology-quiz.txt", "data-structures.toml", "thermodynamics.json"]
    );

    let totals: Vec<usize> = analyses.iter().map(|a| a.report.total_questions).collect();
    assert_eq!(totals, vec![4, 6, 5]);

    for analysis in &analyses {
        assert_report_invariants(&analysis.report);
    }
}

#[tokio::test]
async fn numbered_toml_paper_covers_every_level() {
    let analyses = analyse_samples().await;
    let ds = &analyses[1].report;

    assert_eq!(ds.subject, "Data Structures");
    assert_eq!(ds.professor_name, "Dr. Mensah");
    for (level, count) in ds.blooms_distribution.iter() {
        assert_eq!(count, 1, "{level} should have exactly one question");
    }
    assert!(ds
        .suggestions
        .iter()
        .all(|s| !s.message.contains("No questions target")));
}

#[tokio::test]
async fn ambiguous_question_is_reported_with_indicators() {
    let analyses = analyse_samples().await;
    let thermo = &analyses[2].report;

    let q5 = thermo
        .ambiguous_questions
        .iter()
        .find(|a| a.question_number == 5)
        .expect("question 5 should be ambiguous");
    assert!(q5.indicators.contains(&"vague term \"various\"".to_string()));
    assert!(q5.indicators.contains(&"trailing \"etc.\"".to_string()));
    assert!(thermo
        .suggestions
        .iter()
        .any(|s| s.priority == Priority::High && s.message.starts_with("Question 5 is ambiguous")));
}

#[tokio::test]
async fn one_failed_paper_does_not_affect_the_batch() {
    let requests = vec![
        AnalysisRequest::new(["Define algorithm."]),
        AnalysisRequest::new(["", "   "]),
        AnalysisRequest::new(["Analyze sorting complexity."]),
    ];

    let results = engine().analyze_batch(requests, 3, &NoopReporter).await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(AnalysisError::Validation(_))));
    assert!(results[2].is_ok());
}

#[tokio::test]
async fn persisted_reports_feed_statistics() {
    let analyses = analyse_samples().await;
    let dir = tempfile::tempdir().unwrap();

    for analysis in &analyses {
        let id = analysis.report.paper_id;
        analysis
            .report
            .save_json(&dir.path().join(format!("{id}.report.json")))
            .unwrap();
        analysis
            .record()
            .save_json(&dir.path().join(format!("{id}.paper.json")))
            .unwrap();
    }

    let mut loaded = Vec::new();
    for analysis in &analyses {
        let id = analysis.report.paper_id;
        let report = Report::load_json(&dir.path().join(format!("{id}.report.json"))).unwrap();
        assert_eq!(report, analysis.report);

        let record = PaperRecord::load_json(&dir.path().join(format!("{id}.paper.json"))).unwrap();
        assert_eq!(record.paper.id, id);
        assert_eq!(record.paper.total_questions(), report.total_questions);
        loaded.push(report);
    }

    let stats = compute_statistics(&loaded);
    assert_eq!(stats.total_papers, 3);
    assert_eq!(stats.total_questions, 15);
    assert_eq!(stats.blooms_distribution.total(), 15);
    assert_eq!(stats.difficulty_distribution.total(), 15);

    let expected_avg = loaded
        .iter()
        .map(|r| r.overall_score.score as f64)
        .sum::<f64>()
        / 3.0;
    assert!((stats.average_quality_score - expected_avg).abs() < 1e-9);
}

#[tokio::test]
async fn reanalysis_compares_clean() {
    let requests = load_papers(SAMPLE_PAPERS.as_ref()).unwrap();
    let engine = engine();

    let first = engine.analyze(&requests[1]).unwrap();
    let second = engine.analyze(&requests[1]).unwrap();
    assert_ne!(first.report.paper_id, second.report.paper_id);

    let comparison = second.report.compare(&first.report);
    assert_eq!(comparison.score_delta(), 0);
    assert!(!comparison.grade_changed());
    assert!(comparison.levels.iter().all(|c| c.delta() == 0));
    assert!(comparison.tiers.iter().all(|c| c.delta() == 0));
    assert!(!comparison.is_regression(0));
}

#[tokio::test]
async fn exports_carry_report_content() {
    let analyses = analyse_samples().await;
    let thermo = &analyses[2];

    let text = render_text(&thermo.report, Some(&thermo.breakdown), &thermo.paper.questions);
    assert!(text.contains("Thermodynamics"));
    assert!(text.contains("Prof. Okafor"));
    assert!(text.contains("Q5: Discuss this in relation to various engines, etc."));

    for q in &thermo.paper.questions {
        assert!(q.quality_score <= 100);
        assert!(text.contains(&format!("quality {}/100]", q.quality_score)));
    }

    let html = generate_html(&thermo.report, Some(&thermo.breakdown), &thermo.paper.questions);
    assert!(html.contains("Thermodynamics"));
    assert!(html.contains("Ambiguous questions ("));
    assert!(html.contains("Questions (5)"));
}
