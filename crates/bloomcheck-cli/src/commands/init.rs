//! The `bloomcheck init` command.

use std::path::Path;

use anyhow::Result;

use bloomcheck_core::config::CONFIG_FILE_NAME;
use bloomcheck_core::EngineConfig;

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        let body = EngineConfig::default().to_toml()?;
        std::fs::write(CONFIG_FILE_NAME, format!("{CONFIG_HEADER}\n{body}"))?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    std::fs::create_dir_all("papers")?;
    let example_path = Path::new("papers/example.toml");
    if example_path.exists() {
        println!("papers/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_PAPER)?;
        println!("Created papers/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Tune the cue lexicon and weights in {CONFIG_FILE_NAME}");
    println!("  2. Run: bloomcheck validate --input papers/example.toml");
    println!("  3. Run: bloomcheck analyze --input papers/example.toml --format all");

    Ok(())
}

const CONFIG_HEADER: &str = "# bloomcheck configuration
#
# Every section is optional; a section that is present must be complete.
# BLOOMCHECK_MAX_QUESTIONS overrides [limits].max_questions.
";

const EXAMPLE_PAPER: &str = r#"# Example question paper. One string per question, in paper order.

questions = [
    "Define an algorithm.",
    "Explain how binary search narrows the search interval.",
    "Calculate the number of comparisons insertion sort makes on a reversed list of 8 items.",
    "Compare the time complexity of merge sort and quicksort, given that the input is already sorted.",
    "Design a data structure that supports insert, delete and get-random in constant time.",
    "Evaluate whether a hash table or a balanced tree is the better index for range queries, and justify your choice.",
]

[paper]
professor_name = "Dr. Example"
subject = "Algorithms"
"#;
