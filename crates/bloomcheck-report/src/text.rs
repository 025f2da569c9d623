//! Plain-text report export.
//!
//! The rendering carries every field of the report, so nothing is lost
//! relative to the JSON form.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use bloomcheck_core::model::Question;
use bloomcheck_core::report::Report;
use bloomcheck_core::scoring::ScoreBreakdown;

const RULE: &str = "==========================================";

/// Render a report as plain text. The breakdown, when given, is appended
/// after the overall score; questions, when given, get a per-question
/// section with their quality scores.
pub fn render_text(
    report: &Report,
    breakdown: Option<&ScoreBreakdown>,
    questions: &[Question],
) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = write_report(&mut out, report, breakdown, questions);
    out
}

fn write_report(
    out: &mut String,
    report: &Report,
    breakdown: Option<&ScoreBreakdown>,
    questions: &[Question],
) -> std::fmt::Result {
    writeln!(out, "QUESTION PAPER QUALITY REPORT")?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Paper ID:        {}", report.paper_id)?;
    writeln!(out, "Subject:         {}", or_dash(&report.subject))?;
    writeln!(out, "Professor:       {}", or_dash(&report.professor_name))?;
    writeln!(out, "Total questions: {}", report.total_questions)?;
    writeln!(
        out,
        "Overall score:   {}/100 (grade {})",
        report.overall_score.score, report.overall_score.grade
    )?;

    if let Some(b) = breakdown {
        writeln!(
            out,
            "  coverage {:.2} | clarity {:.2} | balance {:.2} | question quality {:.0}",
            b.coverage, b.clarity, b.balance, b.question_quality
        )?;
        writeln!(out, "  {}", b.feedback)?;
    }

    writeln!(out)?;
    writeln!(out, "BLOOM'S TAXONOMY DISTRIBUTION")?;
    let total = report.total_questions;
    for (level, count) in report.blooms_distribution.iter() {
        writeln!(out, "  {:<14} {:>3}  {}", level.name(), count, percent(count, total))?;
    }

    writeln!(out)?;
    writeln!(out, "DIFFICULTY DISTRIBUTION")?;
    for (tier, count) in report.difficulty_distribution.iter() {
        writeln!(out, "  {:<14} {:>3}  {}", tier.name(), count, percent(count, total))?;
    }

    if !questions.is_empty() {
        writeln!(out)?;
        writeln!(out, "QUESTIONS")?;
        for q in questions {
            writeln!(
                out,
                "  Q{} [{} | {} | quality {}/100] {}",
                q.number, q.level, q.difficulty, q.quality_score, q.normalized_text
            )?;
            for issue in &q.quality_issues {
                writeln!(out, "      - {issue}")?;
            }
        }
    }

    writeln!(out)?;
    writeln!(out, "AMBIGUOUS QUESTIONS ({})", report.ambiguous_questions.len())?;
    if report.ambiguous_questions.is_empty() {
        writeln!(out, "  none")?;
    }
    for a in &report.ambiguous_questions {
        writeln!(out, "  Q{}: {}", a.question_number, a.question)?;
        for indicator in &a.indicators {
            writeln!(out, "      - {indicator}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "SUGGESTIONS ({})", report.suggestions.len())?;
    if report.suggestions.is_empty() {
        writeln!(out, "  none")?;
    }
    for (i, s) in report.suggestions.iter().enumerate() {
        writeln!(
            out,
            "  {}. [{}] {}: {}",
            i + 1,
            s.priority,
            s.category,
            s.message
        )?;
    }

    Ok(())
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

fn percent(count: usize, total: usize) -> String {
    if total == 0 {
        return "(0%)".into();
    }
    format!("({:.0}%)", count as f64 * 100.0 / total as f64)
}

/// Write a text report to a file.
pub fn write_text_report(
    report: &Report,
    breakdown: Option<&ScoreBreakdown>,
    questions: &[Question],
    path: &Path,
) -> Result<()> {
    let text = render_text(report, breakdown, questions);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, text)
        .with_context(|| format!("failed to write text report to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_analysis;

    #[test]
    fn text_contains_every_report_field() {
        let analysis = sample_analysis();
        let report = &analysis.report;
        let text = render_text(report, None, &[]);

        assert!(text.contains(&report.paper_id.to_string()));
        assert!(text.contains("Algorithms & Data"));
        assert!(text.contains("Dr. O'Neil"));
        assert!(text.contains("Total questions: 3"));
        assert!(text.contains(&format!(
            "{}/100 (grade {})",
            report.overall_score.score, report.overall_score.grade
        )));

        for (level, count) in report.blooms_distribution.iter() {
            assert!(text.contains(&format!("{:<14} {:>3}", level.name(), count)));
        }
        for (tier, count) in report.difficulty_distribution.iter() {
            assert!(text.contains(&format!("{:<14} {:>3}", tier.name(), count)));
        }

        assert!(text.contains("AMBIGUOUS QUESTIONS (1)"));
        assert!(text.contains("Q2: Discuss this and that, etc."));
        for indicator in &report.ambiguous_questions[0].indicators {
            assert!(text.contains(indicator.as_str()));
        }

        for s in &report.suggestions {
            assert!(text.contains(&format!("[{}] {}: {}", s.priority, s.category, s.message)));
        }
    }

    #[test]
    fn breakdown_is_optional() {
        let analysis = sample_analysis();
        let without = render_text(&analysis.report, None, &[]);
        let with = render_text(&analysis.report, Some(&analysis.breakdown), &[]);
        assert!(!without.contains(" | clarity "));
        assert!(with.contains(" | clarity "));
        assert!(with.contains(&analysis.breakdown.feedback));
    }

    #[test]
    fn questions_section_shows_quality_scores() {
        let analysis = sample_analysis();
        let without = render_text(&analysis.report, None, &[]);
        assert!(!without.contains("QUESTIONS\n"));

        let text = render_text(&analysis.report, None, &analysis.paper.questions);
        assert!(text.contains("QUESTIONS\n"));
        for q in &analysis.paper.questions {
            assert!(text.contains(&format!(
                "Q{} [{} | {} | quality {}/100] {}",
                q.number, q.level, q.difficulty, q.quality_score, q.normalized_text
            )));
        }
        assert!(text.contains("quality 85/100] Define algorithm."));
    }

    #[test]
    fn empty_metadata_renders_as_dash() {
        let mut analysis = sample_analysis();
        analysis.report.subject.clear();
        let text = render_text(&analysis.report, None, &[]);
        assert!(text.contains("Subject:         -"));
    }

    #[test]
    fn write_to_file() {
        let analysis = sample_analysis();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.txt");
        write_text_report(&analysis.report, None, &[], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("QUESTION PAPER QUALITY REPORT"));
    }
}
