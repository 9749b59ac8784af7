//! CRF part-of-speech tagger training and evaluation.
//!
//! `experiment` runs the seeded flow that writes result tables and sample
//! predictions; `evaluate` only trains and scores.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use postag_core::crf::CrfConfig;
use postag_core::language::Language;
use postag_core::report::ResultRow;
use postag_trainer::{ExperimentConfig, run_evaluation, run_experiment};
use tracing::info;

/// CLI arguments
#[derive(Parser)]
#[command(name = "train-crf")]
#[command(about = "Train and evaluate CRF part-of-speech taggers on UD treebanks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// UD release directory
    #[arg(short = 'd', long, default_value = "datasets/ud-treebanks-v2.5")]
    dataset_root: PathBuf,

    /// Languages to process (English or Spanish names)
    #[arg(short, long = "language", default_value = "English", value_delimiter = ',')]
    languages: Vec<Language>,

    /// Share of sentences used for training
    #[arg(long, default_value_t = 0.8)]
    train_fraction: f64,

    #[command(flatten)]
    crf: CrfArgs,
}

#[derive(Args)]
struct CrfArgs {
    /// L1 regularization coefficient
    #[arg(long, default_value_t = 0.01)]
    c1: f64,

    /// L2 regularization coefficient
    #[arg(long, default_value_t = 0.1)]
    c2: f64,

    /// Maximum L-BFGS iterations
    #[arg(long, default_value_t = 100)]
    max_iterations: usize,

    /// Only learn transitions seen in the training data
    #[arg(long)]
    observed_transitions_only: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Seeded run that saves samples, result tables and predictions
    Experiment {
        /// Shuffle seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Directory for sampled input sentences
        #[arg(long, default_value = "assets/apartado_b")]
        sentences_dir: PathBuf,

        /// Directory for result tables and predictions
        #[arg(short, long, default_value = "out/apartado_b")]
        output_dir: PathBuf,

        /// Word budget of the saved sample
        #[arg(long, default_value_t = 10_000)]
        sample_words: usize,
    },
    /// Train and score only; unseeded unless --seed is given
    Evaluate {
        /// Shuffle seed
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl CrfArgs {
    fn config(&self) -> CrfConfig {
        CrfConfig::default()
            .with_c1(self.c1)
            .with_c2(self.c2)
            .with_max_iterations(self.max_iterations)
            .with_all_possible_transitions(!self.observed_transitions_only)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let base = ExperimentConfig::default()
        .with_dataset_root(cli.dataset_root)
        .with_languages(cli.languages)
        .with_train_fraction(cli.train_fraction)
        .with_crf(cli.crf.config());

    match cli.command {
        Commands::Experiment {
            seed,
            sentences_dir,
            output_dir,
            sample_words,
        } => {
            let config = base
                .with_seed(Some(seed))
                .with_sentences_dir(sentences_dir)
                .with_output_dir(output_dir)
                .with_sample_words(sample_words);
            let table = run_experiment(&config)?;
            for row in table.rows() {
                print_row(row);
            }
            info!(output = %config.output_dir.display(), "experiment complete");
        }
        Commands::Evaluate { seed } => {
            for row in run_evaluation(&base.with_seed(seed))? {
                print_row(&row);
            }
        }
    }

    Ok(())
}

fn print_row(row: &ResultRow) {
    println!(
        "[{}] training time {:.4}s, train F1 {:.4}, test F1 {:.4}",
        row.language, row.training_time, row.train_f1, row.test_f1
    );
}
