use crate::core::tokens::encoder::EncodedLine;
use crate::core::tokens::shard::read_shard;
use crate::engine::config::{Partition, PipelineConfig, SplitConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssemblyReport {
    pub shards: usize,
    pub train_lines: usize,
    pub valid_lines: usize,
    /// Source and target corpus files, train first then valid.
    pub outputs: Vec<PathBuf>,
}

/// Merges the token shards of one window-size range into shuffled train/valid parallel corpora.
pub struct DatasetAssembler<'c> {
    config: &'c PipelineConfig,
}

impl<'c> DatasetAssembler<'c> {
    pub fn new(config: &'c PipelineConfig) -> Self {
        Self { config }
    }

    /// Shards named `<min>_<max>_*.csv` under the tokens directory, sorted.
    pub fn discover_shards(&self) -> Result<Vec<PathBuf>, EngineError> {
        let tokens_dir = self.config.layout.tokens_dir();
        let prefix = format!("{}_", self.config.bounds.file_prefix());

        let mut shards = Vec::new();
        for entry in WalkDir::new(&tokens_dir) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(tokens_dir.as_path()).to_path_buf();
                EngineError::io(path, e.into())
            })?;
            if entry.file_type().is_file() && is_shard_of(entry.path(), &prefix) {
                shards.push(entry.into_path());
            }
        }
        shards.sort();
        Ok(shards)
    }

    #[instrument(skip_all, name = "assemble_workflow")]
    pub fn run(&self, reporter: &ProgressReporter) -> Result<AssemblyReport, EngineError> {
        let shards = self.discover_shards()?;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(
            "Assembling {} shard(s) for window sizes {}..{} (train fraction {}).",
            shards.len(),
            self.config.bounds.min_len(),
            self.config.bounds.max_len(),
            self.config.split.train_fraction
        );

        reporter.report(Progress::PhaseStart {
            name: "Assembling corpora",
        });
        reporter.report(Progress::FilesStart {
            total: shards.len() as u64,
        });

        let mut train = Vec::new();
        let mut valid = Vec::new();
        for shard in &shards {
            let mut lines = read_shard(shard).map_err(|source| EngineError::Csv {
                path: shard.clone(),
                source,
            })?;
            lines.shuffle(&mut rng);
            let (shard_train, shard_valid) = split_lines(lines, &self.config.split);
            debug!(
                "{}: {} train, {} valid.",
                shard.display(),
                shard_train.len(),
                shard_valid.len()
            );
            train.extend(shard_train);
            valid.extend(shard_valid);
            reporter.report(Progress::FileDone);
        }
        reporter.report(Progress::FilesFinish);

        train.shuffle(&mut rng);
        valid.shuffle(&mut rng);

        let mut outputs = self.write_partition(Partition::Train, &train)?;
        outputs.extend(self.write_partition(Partition::Valid, &valid)?);

        reporter.report(Progress::PhaseFinish);
        info!(
            "Wrote {} train and {} valid line(s) from {} shard(s).",
            train.len(),
            valid.len(),
            shards.len()
        );

        Ok(AssemblyReport {
            shards: shards.len(),
            train_lines: train.len(),
            valid_lines: valid.len(),
            outputs,
        })
    }

    fn write_partition(
        &self,
        partition: Partition,
        lines: &[EncodedLine],
    ) -> Result<Vec<PathBuf>, EngineError> {
        let layout = &self.config.layout;
        let bounds = &self.config.bounds;
        let languages = &self.config.languages;

        let source_path = layout.corpus_path(partition, bounds, &languages.source);
        write_corpus(&source_path, lines.iter().map(|l| l.aa_pairs.as_str()))?;
        let target_path = layout.corpus_path(partition, bounds, &languages.target);
        write_corpus(&target_path, lines.iter().map(|l| l.angle_pairs.as_str()))?;

        Ok(vec![source_path, target_path])
    }
}

fn is_shard_of(path: &Path, prefix: &str) -> bool {
    let is_csv = path.extension().is_some_and(|ext| ext == "csv");
    let matches_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(prefix));
    is_csv && matches_prefix
}

/// Splits already-shuffled lines into `(train, valid)`.
///
/// With `drop_last_valid_line` the final line is left out of both partitions.
fn split_lines(
    mut lines: Vec<EncodedLine>,
    split: &SplitConfig,
) -> (Vec<EncodedLine>, Vec<EncodedLine>) {
    let point = split.split_point(lines.len());
    let valid_end = if split.drop_last_valid_line {
        lines.len().saturating_sub(1).max(point)
    } else {
        lines.len()
    };
    lines.truncate(valid_end);
    let valid = lines.split_off(point);
    (lines, valid)
}

fn write_corpus<'a>(
    path: &Path,
    lines: impl Iterator<Item = &'a str>,
) -> Result<(), EngineError> {
    let file = File::create(path).map_err(|e| EngineError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line).map_err(|e| EngineError::io(path, e))?;
    }
    writer.flush().map_err(|e| EngineError::io(path, e))
}
