//! The `bloomcheck compare` command.

use std::path::PathBuf;

use anyhow::Result;

use bloomcheck_core::report::Report;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: u32,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = Report::load_json(&baseline_path)?;
    let current = Report::load_json(&current_path)?;

    let comparison = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", comparison.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&comparison)?);
        }
        _ => {
            println!(
                "Score: {} -> {} ({:+})",
                comparison.score.baseline,
                comparison.score.current,
                comparison.score_delta()
            );
            if comparison.grade_changed() {
                println!(
                    "Grade: {} -> {}",
                    comparison.baseline_grade, comparison.current_grade
                );
            } else {
                println!("Grade: {} (unchanged)", comparison.current_grade);
            }
            println!(
                "Questions: {} -> {}",
                comparison.questions.baseline, comparison.questions.current
            );
            println!(
                "Ambiguous: {} -> {} ({:+})",
                comparison.ambiguous.baseline,
                comparison.ambiguous.current,
                comparison.ambiguous.delta()
            );

            let level_changes: Vec<_> = comparison.levels.iter().filter(|c| c.delta() != 0).collect();
            if !level_changes.is_empty() {
                println!("\nCognitive levels:");
                for c in level_changes {
                    println!(
                        "  {:<14} {} -> {} ({:+})",
                        c.key.name(),
                        c.change.baseline,
                        c.change.current,
                        c.delta()
                    );
                }
            }

            let tier_changes: Vec<_> = comparison.tiers.iter().filter(|c| c.delta() != 0).collect();
            if !tier_changes.is_empty() {
                println!("\nDifficulty:");
                for c in tier_changes {
                    println!(
                        "  {:<14} {} -> {} ({:+})",
                        c.key.name(),
                        c.change.baseline,
                        c.change.current,
                        c.delta()
                    );
                }
            }
        }
    }

    if fail_on_regression && comparison.is_regression(threshold) {
        eprintln!(
            "Regression: score fell by {} points (threshold {threshold})",
            -comparison.score_delta()
        );
        std::process::exit(1);
    }

    Ok(())
}
