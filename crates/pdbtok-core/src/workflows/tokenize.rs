use crate::core::io::traits::{ChainSelection, StructureReader};
use crate::core::tokens::encoder::FragmentEncoder;
use crate::core::tokens::fragments::FragmentGenerator;
use crate::core::tokens::shard::write_shard;
use crate::engine::config::{FailurePolicy, PipelineConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

/// Outcome of tokenizing one structure file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub chain_id: String,
    pub selection: ChainSelection,
    pub residues: usize,
    pub fragments: usize,
    pub shard_path: PathBuf,
    pub eval_path: PathBuf,
}

#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: EngineError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: Vec<FileSummary>,
    /// Only populated under [`FailurePolicy::Continue`].
    pub failed: Vec<FileFailure>,
}

impl BatchReport {
    pub fn total_fragments(&self) -> usize {
        self.processed.iter().map(|s| s.fragments).sum()
    }

    pub fn multi_chain_files(&self) -> usize {
        self.processed
            .iter()
            .filter(|s| s.selection.is_multi_chain())
            .count()
    }
}

/// Tokenizes every structure file under the input directory on a dedicated worker pool.
///
/// Each file is handled independently: its first chain is read, cut into windows, encoded
/// and written to `tokens/<min>_<max>_<stem>.csv`; the whole chain is also encoded as a
/// single record into `eval/<stem>.csv`.
pub struct BatchTokenizer<'c, R> {
    config: &'c PipelineConfig,
    reader: R,
    generator: FragmentGenerator,
    encoder: FragmentEncoder,
}

impl<'c, R: StructureReader> BatchTokenizer<'c, R> {
    pub fn new(config: &'c PipelineConfig, reader: R) -> Self {
        Self {
            config,
            reader,
            generator: FragmentGenerator::new(config.bounds),
            encoder: FragmentEncoder::new(config.cipher.clone()),
        }
    }

    /// Structure files under the input directory with the configured extension, sorted.
    pub fn discover(&self) -> Result<Vec<PathBuf>, EngineError> {
        let root = &self.config.input_dir;
        let mut paths = Vec::new();
        for entry in WalkDir::new(root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                EngineError::io(path, e.into())
            })?;
            if entry.file_type().is_file() && self.has_structure_extension(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn has_structure_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.config.extension)
    }

    pub fn tokenize_file(&self, path: &Path) -> Result<FileSummary, EngineError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| EngineError::InvalidStem {
                path: path.to_path_buf(),
            })?;

        let extraction = self
            .reader
            .read_chain(path)
            .map_err(|source| EngineError::Structure {
                path: path.to_path_buf(),
                source,
            })?;

        if let ChainSelection::FirstOfMany { chain_count } = extraction.selection {
            warn!(
                "{} holds {} chains; keeping chain '{}' only.",
                path.display(),
                chain_count,
                extraction.chain_id
            );
        }

        let residues = &extraction.residues;
        let lines = self
            .encoder
            .encode_all(self.generator.fragments(residues));
        debug_assert_eq!(
            lines.len(),
            self.generator.bounds().expected_count(residues.len())
        );
        let shard_path = self.config.layout.shard_path(&self.config.bounds, stem);
        write_shard(&shard_path, &lines).map_err(|source| EngineError::Csv {
            path: shard_path.clone(),
            source,
        })?;

        let eval_lines = self.encoder.encode_all(self.generator.whole(residues));
        let eval_path = self.config.layout.eval_path(stem);
        write_shard(&eval_path, &eval_lines).map_err(|source| EngineError::Csv {
            path: eval_path.clone(),
            source,
        })?;

        debug!(
            "Tokenized {}: {} residues, {} fragments.",
            path.display(),
            residues.len(),
            lines.len()
        );

        Ok(FileSummary {
            path: path.to_path_buf(),
            chain_id: extraction.chain_id,
            selection: extraction.selection,
            residues: residues.len(),
            fragments: lines.len(),
            shard_path,
            eval_path,
        })
    }

    #[instrument(skip_all, name = "tokenize_workflow")]
    pub fn run(&self, reporter: &ProgressReporter) -> Result<BatchReport, EngineError> {
        let paths = self.discover()?;
        ensure_unique_stems(&paths)?;
        let workers = self.config.worker_count();
        info!(
            "Tokenizing {} structure file(s) from {} with {} worker(s), window sizes {}..{}.",
            paths.len(),
            self.config.input_dir.display(),
            workers,
            self.config.bounds.min_len(),
            self.config.bounds.max_len()
        );

        reporter.report(Progress::PhaseStart {
            name: "Tokenizing structures",
        });
        reporter.report(Progress::FilesStart {
            total: paths.len() as u64,
        });

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| EngineError::ThreadPool(e.to_string()))?;

        let report = pool.install(|| match self.config.failure_policy {
            FailurePolicy::Abort => paths
                .par_iter()
                .map(|path| -> Result<FileSummary, EngineError> {
                    let summary = self.tokenize_file(path)?;
                    reporter.report(Progress::FileDone);
                    Ok(summary)
                })
                .collect::<Result<Vec<_>, EngineError>>()
                .map(|processed| BatchReport {
                    processed,
                    failed: Vec::new(),
                }),
            FailurePolicy::Continue => {
                let results: Vec<_> = paths
                    .par_iter()
                    .map(|path| match self.tokenize_file(path) {
                        Ok(summary) => {
                            reporter.report(Progress::FileDone);
                            Ok(summary)
                        }
                        Err(error) => {
                            warn!("Skipping {}: {}", path.display(), error);
                            reporter.report(Progress::FileSkipped {
                                file: path.display().to_string(),
                            });
                            Err(FileFailure {
                                path: path.clone(),
                                error,
                            })
                        }
                    })
                    .collect();

                let mut report = BatchReport::default();
                for result in results {
                    match result {
                        Ok(summary) => report.processed.push(summary),
                        Err(failure) => report.failed.push(failure),
                    }
                }
                Ok(report)
            }
        })?;

        reporter.report(Progress::FilesFinish);
        reporter.report(Progress::PhaseFinish);
        info!(
            "Tokenized {} file(s) into {} fragment(s); {} multi-chain, {} failed.",
            report.processed.len(),
            report.total_fragments(),
            report.multi_chain_files(),
            report.failed.len()
        );

        Ok(report)
    }
}

/// Outputs are named by file stem, so two inputs sharing a stem would clobber each other.
fn ensure_unique_stems(paths: &[PathBuf]) -> Result<(), EngineError> {
    let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(paths.len());
    for path in paths {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(first) = seen.insert(stem, path) {
            return Err(EngineError::DuplicateStem {
                stem: stem.to_string(),
                first: first.to_path_buf(),
                second: path.clone(),
            });
        }
    }
    Ok(())
}
