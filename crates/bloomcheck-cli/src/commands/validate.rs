//! The `bloomcheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use bloomcheck_core::config::load_config_from;
use bloomcheck_core::engine::INLINE_SOURCE;
use bloomcheck_core::parser;

pub fn execute(input: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let papers = parser::load_papers(&input)?;
    anyhow::ensure!(!papers.is_empty(), "no papers found in {}", input.display());

    let mut total_warnings = 0;

    for paper in &papers {
        println!(
            "Paper: {} ({} questions)",
            paper.source.as_deref().unwrap_or(INLINE_SOURCE),
            paper.questions.len()
        );

        let warnings = parser::validate_request(paper, &config.limits);
        for w in &warnings {
            let prefix = w
                .entry
                .map(|entry| format!("  [entry {entry}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All papers valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
