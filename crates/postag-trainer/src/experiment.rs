//! Training and evaluation flows for CRF taggers.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use postag_core::crf::{CrfConfig, CrfModel, CrfTrainer};
use postag_core::dataset::{DEFAULT_TRAIN_FRACTION, DatasetPreparer, PreparedData, Shuffler};
use postag_core::features::{FeatureExtractor, LatinFeatureExtractor, extractor_for};
use postag_core::language::Language;
use postag_core::metrics::{flat_f1_score, label_scores};
use postag_core::report::{ResultRow, ResultsTable};
use postag_core::treebank::{Treebank, TreebankSource, UdTreebank};
use tracing::{debug, info};

/// Label used in the `Model` column of result tables.
pub const MODEL_NAME: &str = "CRF";

/// Settings shared by both flows.
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    /// Root of the UD release holding the per-language treebanks.
    pub dataset_root: PathBuf,
    pub languages: Vec<Language>,
    pub train_fraction: f64,
    /// Shuffle seed; `None` shuffles differently on every run.
    pub seed: Option<u64>,
    pub crf: CrfConfig,
    /// Where sampled input sentences are written.
    pub sentences_dir: PathBuf,
    /// Where result tables and sample predictions are written.
    pub output_dir: PathBuf,
    /// Word budget of the saved sentence sample.
    pub sample_words: usize,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            dataset_root: PathBuf::from("datasets/ud-treebanks-v2.5"),
            languages: vec![Language::English],
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed: Some(0),
            crf: CrfConfig::default(),
            sentences_dir: PathBuf::from("assets/apartado_b"),
            output_dir: PathBuf::from("out/apartado_b"),
            sample_words: 10_000,
        }
    }
}

impl ExperimentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.dataset_root = root.into();
        self
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_train_fraction(mut self, fraction: f64) -> Self {
        self.train_fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_crf(mut self, crf: CrfConfig) -> Self {
        self.crf = crf;
        self
    }

    pub fn with_sentences_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sentences_dir = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_sample_words(mut self, words: usize) -> Self {
        self.sample_words = words;
        self
    }

    /// Sampled sentences for `language`.
    pub fn sample_path(&self, language: Language) -> PathBuf {
        self.sentences_dir.join(format!("INPUT_RAW_{language}.txt"))
    }

    /// Results table written after `language` is done.
    pub fn results_path(&self, language: Language) -> PathBuf {
        self.output_dir.join(format!("crf_{language}.csv"))
    }

    /// Predictions for the sampled sentences of `language`.
    pub fn predictions_path(&self, language: Language) -> PathBuf {
        self.output_dir.join(format!("OUTPUT_RAW_{language}.txt"))
    }
}

/// Full experiment: for every language, train on a seeded split, save a
/// sentence sample, report F1 in a CSV table and tag the sample.
///
/// The table accumulates rows and is rewritten after each language. One
/// shuffler serves all languages, so later languages continue its stream.
pub fn run_experiment(config: &ExperimentConfig) -> Result<ResultsTable> {
    let mut table = ResultsTable::new();
    let mut shuffler = Shuffler::from_seed(config.seed);

    for &language in &config.languages {
        let treebank = load_treebank(config, language)?;
        let extractor = LatinFeatureExtractor::new()?;
        let mut preparer = DatasetPreparer::new(treebank, extractor);
        let data = preparer.prepare(config.train_fraction, &mut shuffler)?;

        let sample = config.sample_path(language);
        preparer
            .save_sentences(&sample, config.sample_words)
            .with_context(|| format!("Failed to save sentence sample for {language}"))?;

        let (model, row) = train_and_evaluate(language, &data, &config.crf)?;
        table.push(row);
        table
            .write_csv(config.results_path(language))
            .context("Failed to write results table")?;

        let lines = write_sample_predictions(
            &model,
            preparer.extractor(),
            &sample,
            &config.predictions_path(language),
        )?;
        info!(%language, sentences = lines, "tagged sentence sample");
    }

    Ok(table)
}

/// Train and score every language with the extractor for its script.
/// Nothing is written to disk.
///
/// Fails on the first language without a feature extractor.
pub fn run_evaluation(config: &ExperimentConfig) -> Result<Vec<ResultRow>> {
    let mut rows = Vec::with_capacity(config.languages.len());
    let mut shuffler = Shuffler::from_seed(config.seed);

    for &language in &config.languages {
        let treebank = load_treebank(config, language)?;
        let extractor = extractor_for(language)
            .with_context(|| format!("No CRF feature extractor for {language}"))?;
        let mut preparer = DatasetPreparer::new(treebank, extractor);
        let data = preparer.prepare(config.train_fraction, &mut shuffler)?;

        let (_, row) = train_and_evaluate(language, &data, &config.crf)?;
        rows.push(row);
    }

    Ok(rows)
}

fn load_treebank(config: &ExperimentConfig, language: Language) -> Result<Treebank> {
    let source = UdTreebank::new(&config.dataset_root, language.treebank_path());
    source
        .load()
        .with_context(|| format!("Failed to load {language} treebank"))
}

fn train_and_evaluate(
    language: Language,
    data: &PreparedData,
    crf: &CrfConfig,
) -> Result<(CrfModel, ResultRow)> {
    let start = Instant::now();
    let model = CrfTrainer::new(crf.clone())
        .fit(&data.x_train, &data.y_train)
        .with_context(|| format!("CRF training failed for {language}"))?;
    let training_time = start.elapsed().as_secs_f64();
    info!(
        %language,
        treebank = language.treebank_path(),
        seconds = %format!("{training_time:.4}"),
        "training finished"
    );

    let labels = model.classes();

    let pred_train = model.predict(&data.x_train)?;
    let train_f1 = flat_f1_score(&data.y_train, &pred_train, labels)?;
    info!(%language, f1 = train_f1, "train F1");

    let pred_test = model.predict(&data.x_test)?;
    let test_f1 = flat_f1_score(&data.y_test, &pred_test, labels)?;
    info!(%language, f1 = test_f1, "test F1");

    for score in label_scores(&data.y_test, &pred_test, labels)? {
        debug!(
            label = %score.label,
            precision = score.precision,
            recall = score.recall,
            f1 = score.f1,
            support = score.support,
            "test label score"
        );
    }

    let row = ResultRow {
        model: MODEL_NAME.to_string(),
        language: language.to_string(),
        training_time,
        train_f1,
        test_f1,
    };
    Ok((model, row))
}

/// Tag every line of `sample` (split on whitespace) and write one
/// `Debug`-formatted label list per line. Returns the number of lines.
fn write_sample_predictions<E: FeatureExtractor>(
    model: &CrfModel,
    extractor: &E,
    sample: &Path,
    output: &Path,
) -> Result<usize> {
    let input = File::open(sample)
        .with_context(|| format!("Failed to open sentence sample {}", sample.display()))?;
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(
        File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?,
    );

    let mut count = 0;
    for line in BufReader::new(input).lines() {
        let words: Vec<String> = line?.split_whitespace().map(str::to_string).collect();
        let tags = model.predict_single(&extractor.sentence_features(&words))?;
        writeln!(out, "{tags:?}")?;
        count += 1;
    }
    out.flush()?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOY_CONLLU: &str = "\
# sent_id = 1
1\tThe\tthe\tDET\t_\t_\t2\tdet\t_\t_
2\tdog\tdog\tNOUN\t_\t_\t3\tnsubj\t_\t_
3\truns\trun\tVERB\t_\t_\t0\troot\t_\t_
4\t.\t.\tPUNCT\t_\t_\t3\tpunct\t_\t_

1\tA\ta\tDET\t_\t_\t2\tdet\t_\t_
2\tcat\tcat\tNOUN\t_\t_\t3\tnsubj\t_\t_
3\tsleeps\tsleep\tVERB\t_\t_\t0\troot\t_\t_
4\t.\t.\tPUNCT\t_\t_\t3\tpunct\t_\t_

";

    fn toy_dataset(root: &Path, language: Language, copies: usize) {
        let path = root.join(language.treebank_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, TOY_CONLLU.repeat(copies)).unwrap();
    }

    fn config(root: &Path) -> ExperimentConfig {
        ExperimentConfig::default()
            .with_dataset_root(root.join("ud"))
            .with_sentences_dir(root.join("assets"))
            .with_output_dir(root.join("out"))
            .with_crf(CrfConfig::default().with_max_iterations(10))
            .with_sample_words(10)
    }

    #[test]
    fn experiment_writes_table_sample_and_predictions() {
        let dir = tempfile::tempdir().unwrap();
        toy_dataset(&dir.path().join("ud"), Language::English, 5);
        let config = config(dir.path());

        let table = run_experiment(&config).unwrap();
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.model, "CRF");
        assert_eq!(row.language, "English");
        assert!((0.0..=1.0).contains(&row.train_f1));
        assert!((0.0..=1.0).contains(&row.test_f1));

        let csv = std::fs::read_to_string(config.results_path(Language::English)).unwrap();
        assert!(csv.starts_with("Model,Language,Training time,Train F1,Test F1\n"));
        assert_eq!(csv.lines().count(), 2);

        // 4 words per sentence: 4, 8, 12 > 10 -> three sampled sentences.
        let sample = std::fs::read_to_string(config.sample_path(Language::English)).unwrap();
        assert_eq!(sample.lines().count(), 3);

        let predictions =
            std::fs::read_to_string(config.predictions_path(Language::English)).unwrap();
        let lines: Vec<&str> = predictions.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.starts_with("[\"") && l.ends_with("\"]")));
        assert!(lines[0].ends_with("\"PUNCT\"]"));
    }

    fn distinct_dataset(root: &Path, language: Language, sentences: usize) {
        let text: String = (0..sentences)
            .map(|i| {
                format!(
                    "1\tThe\tthe\tDET\t_\t_\t2\tdet\t_\t_\n\
                     2\tdog{i}\tdog\tNOUN\t_\t_\t3\tnsubj\t_\t_\n\
                     3\truns\trun\tVERB\t_\t_\t0\troot\t_\t_\n\n"
                )
            })
            .collect();
        let path = root.join(language.treebank_path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, text).unwrap();
    }

    #[test]
    fn languages_share_one_shuffle_stream() {
        let dir = tempfile::tempdir().unwrap();
        let ud = dir.path().join("ud");
        distinct_dataset(&ud, Language::English, 10);
        distinct_dataset(&ud, Language::Spanish, 10);
        let config = config(dir.path())
            .with_languages(vec![Language::English, Language::Spanish])
            .with_sample_words(1000);

        run_experiment(&config).unwrap();

        let english = std::fs::read_to_string(config.sample_path(Language::English)).unwrap();
        let spanish = std::fs::read_to_string(config.sample_path(Language::Spanish)).unwrap();
        assert_eq!(english.lines().count(), 10);
        assert_eq!(spanish.lines().count(), 10);
        // Same treebank, but the second language draws from the continued stream.
        assert_ne!(english, spanish);
    }

    #[test]
    fn evaluation_scores_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        toy_dataset(&dir.path().join("ud"), Language::Spanish, 5);
        let config = config(dir.path())
            .with_languages(vec![Language::Spanish])
            .with_seed(None);

        let rows = run_evaluation(&config).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].language, "Spanish");
        assert!(!dir.path().join("out").exists());
        assert!(!dir.path().join("assets").exists());
    }

    #[test]
    fn evaluation_rejects_unsupported_script() {
        let dir = tempfile::tempdir().unwrap();
        toy_dataset(&dir.path().join("ud"), Language::Chinese, 2);
        let config = config(dir.path()).with_languages(vec![Language::Chinese]);

        let err = run_evaluation(&config).unwrap_err();
        assert!(err.to_string().contains("Chinese"));
    }

    #[test]
    fn missing_treebank_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_experiment(&config(dir.path())).unwrap_err();
        assert!(format!("{err:#}").contains("English treebank"));
    }

    #[test]
    fn output_paths_use_language_names() {
        let config = ExperimentConfig::default();
        assert_eq!(
            config.results_path(Language::Spanish),
            PathBuf::from("out/apartado_b/crf_Spanish.csv")
        );
        assert_eq!(
            config.sample_path(Language::English),
            PathBuf::from("assets/apartado_b/INPUT_RAW_English.txt")
        );
    }
}
