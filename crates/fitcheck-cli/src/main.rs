//! fitcheck CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fitcheck", version, about = "Career readiness self-assessment")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take the assessment interactively
    Take {
        /// Question bank TOML (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, markdown, all
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score a completed answers file
    Score {
        /// Answers TOML with [trait], [knowledge] and [readiness] tables
        #[arg(long)]
        answers: PathBuf,

        /// Question bank TOML (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, markdown, all
        #[arg(long)]
        format: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List the questions of a bank
    Questions {
        /// Only this stage: trait, knowledge, readiness
        #[arg(long)]
        stage: Option<String>,

        /// Question bank TOML (default: built-in bank)
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Validate a question bank TOML file
    Validate {
        /// Path to the bank file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Compare two assessment reports
    Compare {
        /// Baseline report JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current report JSON
        #[arg(long)]
        current: PathBuf,

        /// Category changes up to this many points count as unchanged
        #[arg(long, default_value = "0")]
        threshold: u8,

        /// Exit code 1 if any category declined
        #[arg(long)]
        fail_on_decline: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Create starter config and example answers file
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitcheck=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            bank,
            output,
            format,
            config,
        } => commands::take::execute(bank, output, format, config),
        Commands::Score {
            answers,
            bank,
            output,
            format,
            config,
        } => commands::score::execute(answers, bank, output, format, config),
        Commands::Questions { stage, bank } => commands::questions::execute(stage, bank),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Compare {
            baseline,
            current,
            threshold,
            fail_on_decline,
            format,
        } => commands::compare::execute(baseline, current, threshold, fail_on_decline, format),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
