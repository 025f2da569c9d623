//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined and the two
//! distributions drawn as SVG bar charts.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use bloomcheck_core::model::{Grade, Priority, Question};
use bloomcheck_core::report::Report;
use bloomcheck_core::scoring::ScoreBreakdown;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page for one report. A non-empty `questions` slice adds a
/// per-question table with quality scores.
pub fn generate_html(
    report: &Report,
    breakdown: Option<&ScoreBreakdown>,
    questions: &[Question],
) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>bloomcheck report: {}</title>\n",
        html_escape(&title(report))
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str("<h1>Question paper quality report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Subject: <strong>{}</strong> | Professor: <strong>{}</strong> | {} questions | paper {} | generated {}</p>\n",
        html_escape(&report.subject),
        html_escape(&report.professor_name),
        report.total_questions,
        report.paper_id,
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str(&format!(
        "<div class=\"score grade-{}\"><span class=\"value\">{}</span><span class=\"grade\">{}</span></div>\n",
        grade_class(report.overall_score.grade),
        report.overall_score.score,
        report.overall_score.grade
    ));
    if let Some(b) = breakdown {
        html.push_str("<table class=\"breakdown\">\n");
        html.push_str("<thead><tr><th>Coverage</th><th>Clarity</th><th>Balance</th><th>Question quality</th></tr></thead>\n");
        html.push_str(&format!(
            "<tbody><tr><td>{:.0}%</td><td>{:.0}%</td><td>{:.0}%</td><td>{:.0}/100</td></tr></tbody>\n",
            b.coverage * 100.0,
            b.clarity * 100.0,
            b.balance * 100.0,
            b.question_quality
        ));
        html.push_str("</table>\n");
        html.push_str(&format!("<p class=\"feedback\">{}</p>\n", html_escape(&b.feedback)));
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"charts\">\n");
    html.push_str("<h2>Bloom's taxonomy distribution</h2>\n");
    let levels: Vec<(&str, usize)> = report
        .blooms_distribution
        .iter()
        .map(|(level, count)| (level.name(), count))
        .collect();
    html.push_str(&generate_bar_chart(&levels, report.total_questions));
    html.push_str("<h2>Difficulty distribution</h2>\n");
    let tiers: Vec<(&str, usize)> = report
        .difficulty_distribution
        .iter()
        .map(|(tier, count)| (tier.name(), count))
        .collect();
    html.push_str(&generate_bar_chart(&tiers, report.total_questions));
    html.push_str("</section>\n");

    if !questions.is_empty() {
        html.push_str("<section class=\"questions\">\n");
        html.push_str(&format!("<h2>Questions ({})</h2>\n", questions.len()));
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>#</th><th>Question</th><th>Level</th><th>Difficulty</th><th>Quality</th><th>Issues</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for q in questions {
            let issues: Vec<String> = q
                .quality_issues
                .iter()
                .map(|i| format!("<li>{}</li>", html_escape(i)))
                .collect();
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"quality\">{}</td><td><ul>{}</ul></td></tr>\n",
                q.number,
                html_escape(&q.normalized_text),
                q.level,
                q.difficulty,
                q.quality_score,
                issues.join("")
            ));
        }
        html.push_str("</tbody></table>\n");
        html.push_str("</section>\n");
    }

    html.push_str("<section class=\"ambiguous\">\n");
    html.push_str(&format!(
        "<h2>Ambiguous questions ({})</h2>\n",
        report.ambiguous_questions.len()
    ));
    if report.ambiguous_questions.is_empty() {
        html.push_str("<p>No ambiguous questions detected.</p>\n");
    } else {
        html.push_str("<table>\n");
        html.push_str("<thead><tr><th>#</th><th>Question</th><th>Indicators</th></tr></thead>\n");
        html.push_str("<tbody>\n");
        for a in &report.ambiguous_questions {
            let indicators: Vec<String> = a
                .indicators
                .iter()
                .map(|i| format!("<li>{}</li>", html_escape(i)))
                .collect();
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td><ul>{}</ul></td></tr>\n",
                a.question_number,
                html_escape(&a.question),
                indicators.join("")
            ));
        }
        html.push_str("</tbody></table>\n");
    }
    html.push_str("</section>\n");

    html.push_str("<section class=\"suggestions\">\n");
    html.push_str(&format!("<h2>Suggestions ({})</h2>\n", report.suggestions.len()));
    html.push_str("<table id=\"suggestions\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Priority</th><th onclick=\"sortTable(1)\">Category</th><th onclick=\"sortTable(2)\">Suggestion</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for s in &report.suggestions {
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            priority_class(s.priority),
            s.priority,
            s.category,
            html_escape(&s.message)
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(
    report: &Report,
    breakdown: Option<&ScoreBreakdown>,
    questions: &[Question],
    path: &Path,
) -> Result<()> {
    let html = generate_html(report, breakdown, questions);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn title(report: &Report) -> String {
    match (report.subject.trim(), report.professor_name.trim()) {
        ("", "") => report.paper_id.to_string(),
        (subject, "") => subject.to_string(),
        ("", professor) => professor.to_string(),
        (subject, professor) => format!("{subject} ({professor})"),
    }
}

fn grade_class(grade: Grade) -> &'static str {
    match grade {
        Grade::A => "a",
        Grade::B => "b",
        Grade::C => "c",
        Grade::D => "d",
    }
}

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "high",
        Priority::Medium => "medium",
        Priority::Low => "low",
    }
}

fn generate_bar_chart(rows: &[(&str, usize)], total: usize) -> String {
    let bar_height = 26;
    let max_width = 400;
    let padding = 8;
    let label_width = 140;

    let total_height = rows.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 80,
        total_height
    );

    for (i, (label, count)) in rows.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 / total as f64
        };
        let width = (share * max_width as f64) as usize;

        let color = if *count == 0 { "#ef4444" } else { "#3b82f6" };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(label)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{} ({:.0}%)</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            count,
            share * 100.0
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --high: #fde2e2; --medium: #fef3c7; --low: #e0f2fe; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --high: #7f1d1d; --medium: #78350f; --low: #0c4a6e; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.score { display: inline-flex; align-items: baseline; gap: 1rem; padding: 1rem 2rem; border-radius: 8px; border: 2px solid var(--border); }
.score .value { font-size: 3rem; font-weight: bold; }
.score .grade { font-size: 2rem; }
.grade-a { border-color: #22c55e; } .grade-b { border-color: #3b82f6; }
.grade-c { border-color: #eab308; } .grade-d { border-color: #ef4444; }
.feedback { font-style: italic; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; vertical-align: top; }
th { background: var(--border); cursor: pointer; }
tr.high { background: var(--high); } tr.medium { background: var(--medium); } tr.low { background: var(--low); }
ul { margin: 0; padding-left: 1.2rem; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('suggestions');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const rank = { high: 0, medium: 1, low: 2 };
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    const cmp = col === 0 ? rank[va] - rank[vb] : va.localeCompare(vb);
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
