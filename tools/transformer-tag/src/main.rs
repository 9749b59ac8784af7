//! Transformer PoS tagging of raw text files.
//!
//! Each subcommand cleans its input text, saves the cleaned copy, tags it
//! with a local token-classification model and writes the predictions as a
//! JSON array.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use postag_core::neural::{PipelineConfig, TextNormalizer, TokenClassificationPipeline};
use tracing::info;

/// CLI arguments
#[derive(Parser)]
#[command(name = "transformer-tag")]
#[command(about = "Tag raw text with a transformer PoS model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// RoBERTa tagger on the Spanish report
    Spanish(PathArgs),
    /// Multilingual BERT tagger on the English text
    English(PathArgs),
}

/// Overrides for the preset paths.
#[derive(Args, Default)]
struct PathArgs {
    /// Model directory with config.json, tokenizer.json and model.safetensors
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Raw input text
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where the cleaned input is saved
    #[arg(short, long)]
    processed: Option<PathBuf>,

    /// Where predictions are written
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Everything one tagging run needs.
struct TagJob {
    name: &'static str,
    model_dir: PathBuf,
    pipeline: PipelineConfig,
    normalizer: TextNormalizer,
    input: PathBuf,
    processed: PathBuf,
    output: PathBuf,
}

impl TagJob {
    fn spanish() -> Self {
        Self {
            name: "Spanish tagger",
            model_dir: PathBuf::from("models/roberta-large-bne-capitel-pos"),
            pipeline: PipelineConfig::roberta(),
            normalizer: TextNormalizer::spanish_report(),
            input: PathBuf::from("assets/INPUT_RAW_espanol.txt"),
            processed: PathBuf::from("assets/INPUT_RAW_espanol_processed.txt"),
            output: PathBuf::from("out/OUTPUT_RAW_espanol.txt"),
        }
    }

    fn english() -> Self {
        Self {
            name: "English tagger",
            model_dir: PathBuf::from("models/bert-base-multilingual-cased-pos-english"),
            pipeline: PipelineConfig::default(),
            normalizer: TextNormalizer::collapse_newlines(),
            input: PathBuf::from("assets/apartado_a/INPUT_RAW_ingles.txt"),
            processed: PathBuf::from("assets/apartado_a/INPUT_RAW_ingles_processed.txt"),
            output: PathBuf::from("out/apartado_a/OUTPUT_RAW_ingles.txt"),
        }
    }

    fn with_overrides(mut self, args: PathArgs) -> Self {
        if let Some(dir) = args.model_dir {
            self.model_dir = dir;
        }
        if let Some(input) = args.input {
            self.input = input;
        }
        if let Some(processed) = args.processed {
            self.processed = processed;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        self
    }

    fn run(self) -> Result<()> {
        let pipeline = TokenClassificationPipeline::from_dir(&self.model_dir, self.pipeline)
            .with_context(|| format!("Failed to load model from {}", self.model_dir.display()))?;

        let text = self
            .normalizer
            .normalize_file(&self.input, &self.processed)
            .context("Failed to prepare input text")?;

        let start = Instant::now();
        let predictions = pipeline.tag(&text)?;
        let elapsed = start.elapsed().as_secs_f64();

        if let Some(parent) = self.output.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&predictions)?;
        std::fs::write(&self.output, json)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        info!(
            predictions = predictions.len(),
            output = %self.output.display(),
            "tagging complete"
        );
        println!("{}: {}", self.name, elapsed);
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let job = match cli.command {
        Commands::Spanish(args) => TagJob::spanish().with_overrides(args),
        Commands::English(args) => TagJob::english().with_overrides(args),
    };
    job.run()
}
