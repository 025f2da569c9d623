//! The `bloomcheck stats` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use bloomcheck_core::report::Report;
use bloomcheck_core::statistics::{compute_statistics, Statistics};

const REPORT_SUFFIX: &str = ".report.json";

pub fn execute(reports_dir: PathBuf, format: String) -> Result<()> {
    anyhow::ensure!(
        reports_dir.is_dir(),
        "not a directory: {}",
        reports_dir.display()
    );

    let reports = load_reports(&reports_dir)?;
    let stats = compute_statistics(&reports);

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&stats)?),
        "text" => print_text(&stats),
        other => anyhow::bail!("unknown stats format: {other} (expected text or json)"),
    }

    Ok(())
}

/// Load every `*.report.json` directly inside `dir`, in file-name order.
pub(crate) fn load_reports(dir: &Path) -> Result<Vec<Report>> {
    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.retain(|p| {
        p.is_file()
            && p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(REPORT_SUFFIX))
    });
    paths.sort();

    paths.iter().map(|p| Report::load_json(p)).collect()
}

fn print_text(stats: &Statistics) {
    use comfy_table::{Cell, Table};

    println!("Papers:                {}", stats.total_papers);
    println!("Questions:             {}", stats.total_questions);
    println!("Average quality score: {:.1}", stats.average_quality_score);

    let mut levels = Table::new();
    levels.set_header(vec!["Level", "Questions", "Share"]);
    for (level, count) in stats.blooms_distribution.iter() {
        levels.add_row(vec![
            Cell::new(level),
            Cell::new(count),
            Cell::new(share(count, stats.total_questions)),
        ]);
    }
    println!("\n{levels}");

    let mut tiers = Table::new();
    tiers.set_header(vec!["Difficulty", "Questions", "Share"]);
    for (tier, count) in stats.difficulty_distribution.iter() {
        tiers.add_row(vec![
            Cell::new(tier),
            Cell::new(count),
            Cell::new(share(count, stats.total_questions)),
        ]);
    }
    println!("\n{tiers}");
}

fn share(count: usize, total: usize) -> String {
    if total == 0 {
        return "0.0%".into();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}
