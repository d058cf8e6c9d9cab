use super::assemble::{AssemblyReport, DatasetAssembler};
use super::tokenize::{BatchReport, BatchTokenizer};
use crate::core::io::traits::StructureReader;
use crate::engine::config::PipelineConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use tracing::{info, instrument};

#[derive(Debug)]
pub struct PipelineReport {
    pub batch: BatchReport,
    pub assembly: AssemblyReport,
}

/// Tokenizes every structure file, then assembles the resulting shards into corpora.
///
/// The output tree must exist; see [`crate::engine::config::OutputLayout::ensure_dirs`].
#[instrument(skip_all, name = "pipeline_workflow")]
pub fn run<R: StructureReader>(
    config: &PipelineConfig,
    reader: R,
    reporter: &ProgressReporter,
) -> Result<PipelineReport, EngineError> {
    info!(
        "Starting pipeline: {} -> {}",
        config.input_dir.display(),
        config.layout.root().display()
    );

    let batch = BatchTokenizer::new(config, reader).run(reporter)?;
    let assembly = DatasetAssembler::new(config).run(reporter)?;

    Ok(PipelineReport { batch, assembly })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{Partition, PipelineConfigBuilder};
    use crate::workflows::tokenize::tests::{StubReader, five_residues};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn pipeline_runs_both_phases_end_to_end() {
        let tmp = tempdir().unwrap();
        let input = tmp.path().join("input");
        fs::create_dir_all(&input).unwrap();
        for stem in ["1abc", "2xyz"] {
            fs::write(input.join(format!("{stem}.cif")), b"").unwrap();
        }
        let config = PipelineConfigBuilder::new()
            .input_dir(input)
            .output_dir(tmp.path().join("out"))
            .min_len(2)
            .max_len(4)
            .seed(Some(3))
            .workers(Some(2))
            .build()
            .unwrap();
        config.layout.ensure_dirs().unwrap();
        let reader = StubReader::new()
            .with("1abc", five_residues())
            .with("2xyz", five_residues());

        let report = run(&config, reader, &ProgressReporter::new()).unwrap();

        // Sizes 2 and 3 over five residues: 4 + 3 fragments per file.
        assert_eq!(report.batch.total_fragments(), 14);
        assert_eq!(report.assembly.shards, 2);
        // round(7 * 0.8) = 6 train lines per shard, the seventh is dropped.
        assert_eq!(report.assembly.train_lines, 12);
        assert_eq!(report.assembly.valid_lines, 0);

        let train = fs::read_to_string(
            config
                .layout
                .corpus_path(Partition::Train, &config.bounds, "target"),
        )
        .unwrap();
        assert_eq!(train.lines().count(), 12);
    }
}
