use crate::core::cipher::{Cipher, CipherError};
use crate::core::tokens::encoder::FIELD_DELIMITER;
use crate::core::tokens::fragments::{BoundsError, WindowBounds};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_EXTENSION: &str = "cif";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "source";
pub const DEFAULT_TARGET_LANGUAGE: &str = "target";
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error(transparent)]
    Cipher(#[from] CipherError),
    #[error("Train fraction must be greater than 0 and at most 1, got {0}")]
    TrainFraction(f64),
    #[error("The {0} language tag must not be empty")]
    EmptyLanguageTag(&'static str),
    #[error("Structure file extension must not be empty")]
    EmptyExtension,
    #[error("Cipher values must not contain the field delimiter '{}'", FIELD_DELIMITER)]
    DelimiterInCipher,
}

/// Which side of the train/validation split a corpus belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Train,
    Valid,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Partition::Train, Partition::Valid];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Valid => "valid",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed directory tree under the output root: `tokens/`, `eval/`, `train/`, `valid/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tokens_dir(&self) -> PathBuf {
        self.root.join("tokens")
    }

    pub fn eval_dir(&self) -> PathBuf {
        self.root.join("eval")
    }

    pub fn partition_dir(&self, partition: Partition) -> PathBuf {
        self.root.join(partition.as_str())
    }

    /// `tokens/<min>_<max>_<stem>.csv`
    pub fn shard_path(&self, bounds: &WindowBounds, stem: &str) -> PathBuf {
        self.tokens_dir()
            .join(format!("{}_{}.csv", bounds.file_prefix(), stem))
    }

    /// `eval/<stem>.csv`
    pub fn eval_path(&self, stem: &str) -> PathBuf {
        self.eval_dir().join(format!("{}.csv", stem))
    }

    /// `<partition>/<min>_<max>_<language>.txt`
    pub fn corpus_path(&self, partition: Partition, bounds: &WindowBounds, language: &str) -> PathBuf {
        self.partition_dir(partition)
            .join(format!("{}_{}.txt", bounds.file_prefix(), language))
    }

    pub fn ensure_dirs(&self) -> io::Result<()> {
        let partitions = Partition::ALL.map(|partition| self.partition_dir(partition));
        for dir in [self.tokens_dir(), self.eval_dir()].into_iter().chain(partitions) {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageTags {
    pub source: String,
    pub target: String,
}

impl Default for LanguageTags {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    pub train_fraction: f64,
    /// Leave the last shuffled line of every shard out of the validation partition.
    pub drop_last_valid_line: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            train_fraction: DEFAULT_TRAIN_FRACTION,
            drop_last_valid_line: true,
        }
    }
}

impl SplitConfig {
    /// Number of lines of an `n`-line shard that go to the training partition.
    pub fn split_point(&self, n: usize) -> usize {
        let point = (n as f64 * self.train_fraction).round_ties_even() as usize;
        point.min(n)
    }
}

/// What the batch tokenizer does when one structure file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// The first failure aborts the whole batch.
    #[default]
    Abort,
    /// Failures are recorded in the batch report and the remaining files are processed.
    Continue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub extension: String,
    pub layout: OutputLayout,
    pub bounds: WindowBounds,
    pub cipher: Cipher,
    pub workers: Option<usize>,
    pub languages: LanguageTags,
    pub split: SplitConfig,
    pub seed: Option<u64>,
    pub failure_policy: FailurePolicy,
}

impl PipelineConfig {
    /// Configured worker count, or the available parallelism when unset or zero.
    pub fn worker_count(&self) -> usize {
        self.workers.filter(|&n| n > 0).unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

#[derive(Default)]
pub struct PipelineConfigBuilder {
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    extension: Option<String>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    cipher_alphabets: Option<(String, String)>,
    workers: Option<usize>,
    source_language: Option<String>,
    target_language: Option<String>,
    train_fraction: Option<f64>,
    drop_last_valid_line: Option<bool>,
    seed: Option<u64>,
    failure_policy: Option<FailurePolicy>,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input_dir(mut self, path: PathBuf) -> Self {
        self.input_dir = Some(path);
        self
    }
    pub fn output_dir(mut self, path: PathBuf) -> Self {
        self.output_dir = Some(path);
        self
    }
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }
    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }
    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }
    pub fn cipher_alphabets(mut self, keys: impl Into<String>, values: impl Into<String>) -> Self {
        self.cipher_alphabets = Some((keys.into(), values.into()));
        self
    }
    pub fn workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }
    pub fn source_language(mut self, tag: impl Into<String>) -> Self {
        self.source_language = Some(tag.into());
        self
    }
    pub fn target_language(mut self, tag: impl Into<String>) -> Self {
        self.target_language = Some(tag.into());
        self
    }
    pub fn train_fraction(mut self, fraction: f64) -> Self {
        self.train_fraction = Some(fraction);
        self
    }
    pub fn drop_last_valid_line(mut self, drop: bool) -> Self {
        self.drop_last_valid_line = Some(drop);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<PipelineConfig, ConfigError> {
        let bounds = WindowBounds::new(
            self.min_len
                .ok_or(ConfigError::MissingParameter("min_fragment_len"))?,
            self.max_len
                .ok_or(ConfigError::MissingParameter("max_fragment_len"))?,
        )?;

        let cipher = match self.cipher_alphabets {
            Some((keys, values)) => {
                if values.contains(FIELD_DELIMITER) {
                    return Err(ConfigError::DelimiterInCipher);
                }
                Cipher::new(&keys, &values)?
            }
            None => Cipher::default(),
        };

        let defaults = SplitConfig::default();
        let split = SplitConfig {
            train_fraction: self.train_fraction.unwrap_or(defaults.train_fraction),
            drop_last_valid_line: self
                .drop_last_valid_line
                .unwrap_or(defaults.drop_last_valid_line),
        };
        if !(split.train_fraction > 0.0 && split.train_fraction <= 1.0) {
            return Err(ConfigError::TrainFraction(split.train_fraction));
        }

        let languages = LanguageTags {
            source: self
                .source_language
                .unwrap_or_else(|| DEFAULT_SOURCE_LANGUAGE.to_string()),
            target: self
                .target_language
                .unwrap_or_else(|| DEFAULT_TARGET_LANGUAGE.to_string()),
        };
        if languages.source.trim().is_empty() {
            return Err(ConfigError::EmptyLanguageTag("source"));
        }
        if languages.target.trim().is_empty() {
            return Err(ConfigError::EmptyLanguageTag("target"));
        }

        let extension = self
            .extension
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
            .trim_start_matches('.')
            .to_string();
        if extension.is_empty() {
            return Err(ConfigError::EmptyExtension);
        }

        Ok(PipelineConfig {
            input_dir: self
                .input_dir
                .ok_or(ConfigError::MissingParameter("input_dir"))?,
            extension,
            layout: OutputLayout::new(
                self.output_dir
                    .ok_or(ConfigError::MissingParameter("output_dir"))?,
            ),
            bounds,
            cipher,
            workers: self.workers,
            languages,
            split,
            seed: self.seed,
            failure_policy: self.failure_policy.unwrap_or_default(),
        })
    }
}
