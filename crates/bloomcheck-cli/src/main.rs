//! bloomcheck CLI: analyse question papers and work with saved reports.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(
    name = "bloomcheck",
    version,
    about = "Exam question paper moderation: Bloom's taxonomy, difficulty and clarity"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse one or more question papers
    Analyze {
        /// Paper file (.txt, .toml, .json) or directory of papers
        #[arg(long)]
        input: Option<PathBuf>,

        /// Inline question; repeat for several questions
        #[arg(long = "text")]
        texts: Vec<String>,

        /// Professor name, used when the paper does not give one
        #[arg(long)]
        professor: Option<String>,

        /// Subject, used when the paper does not give one
        #[arg(long)]
        subject: Option<String>,

        /// Output directory
        #[arg(long, default_value = "./bloomcheck-reports")]
        output: PathBuf,

        /// Output formats: json, text, html, all (comma-separated)
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Max papers analysed at once
        #[arg(long, default_value = "4")]
        parallelism: usize,
    },

    /// Aggregate statistics over saved reports
    Stats {
        /// Directory containing *.report.json files
        #[arg(long)]
        reports: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List saved papers, newest first
    List {
        /// Directory containing saved reports
        #[arg(long)]
        reports: PathBuf,

        /// Only papers with this subject (case-insensitive)
        #[arg(long)]
        subject: Option<String>,

        /// Only papers by this professor (case-insensitive)
        #[arg(long)]
        professor: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show one saved report with its per-question detail
    Show {
        /// Directory containing saved reports
        #[arg(long)]
        reports: PathBuf,

        /// Paper id
        #[arg(long)]
        id: Uuid,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Compare two saved reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Score drop (in points) that counts as a regression
        #[arg(long, default_value = "5")]
        threshold: u32,

        /// Exit code 1 if the score regressed
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Check papers for issues without analysing them
    Validate {
        /// Paper file or directory
        #[arg(long)]
        input: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and an example paper
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bloomcheck=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            input,
            texts,
            professor,
            subject,
            output,
            format,
            config,
            parallelism,
        } => {
            commands::analyze::execute(commands::analyze::AnalyzeArgs {
                input,
                texts,
                professor,
                subject,
                output,
                format,
                config,
                parallelism,
            })
            .await
        }
        Commands::Stats { reports, format } => commands::stats::execute(reports, format),
        Commands::List {
            reports,
            subject,
            professor,
            format,
        } => commands::list::execute(reports, subject, professor, format),
        Commands::Show {
            reports,
            id,
            format,
        } => commands::show::execute(reports, id, format),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { input, config } => commands::validate::execute(input, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
