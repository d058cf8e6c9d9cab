pub mod assemble;
pub mod run;
pub mod tokenize;

use crate::cli::PipelineArgs;
use crate::config;
use crate::error::Result;
use pdbtok::engine::config::PipelineConfig;
use pdbtok::workflows::assemble::AssemblyReport;
use pdbtok::workflows::tokenize::BatchReport;
use tracing::info;

/// Builds the run configuration and makes sure the output tree exists.
fn prepare(args: &PipelineArgs, threads: Option<usize>) -> Result<PipelineConfig> {
    info!("Merging configuration from file and CLI arguments...");
    let config = config::build_config(args, threads)?;
    info!(
        "Input: {}, output: {}",
        config.input_dir.display(),
        config.layout.root().display()
    );
    config.layout.ensure_dirs()?;
    Ok(config)
}

fn print_batch_summary(report: &BatchReport) {
    println!(
        "Tokenized {} file(s) into {} fragment(s).",
        report.processed.len(),
        report.total_fragments()
    );
    let multi_chain = report.multi_chain_files();
    if multi_chain > 0 {
        println!("  {} file(s) held several chains; only the first chain was used.", multi_chain);
    }
    if !report.failed.is_empty() {
        println!("  {} file(s) were skipped:", report.failed.len());
        for failure in &report.failed {
            println!("    {}: {}", failure.path.display(), failure.error);
        }
    }
}

fn print_assembly_summary(report: &AssemblyReport) {
    println!(
        "Assembled {} shard(s): {} train line(s), {} valid line(s).",
        report.shards, report.train_lines, report.valid_lines
    );
    for path in &report.outputs {
        println!("  ✓ {}", path.display());
    }
}
