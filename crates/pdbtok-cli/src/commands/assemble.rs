use super::{prepare, print_assembly_summary};
use crate::cli::PipelineArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use pdbtok::engine::progress::ProgressReporter;
use pdbtok::workflows::assemble::DatasetAssembler;
use tracing::{info, warn};

pub fn run(args: PipelineArgs, threads: Option<usize>) -> Result<()> {
    let config = prepare(&args, threads)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Assembling shards from {}...",
        config.layout.tokens_dir().display()
    );
    info!("Invoking the assemble workflow...");
    let report = DatasetAssembler::new(&config).run(&reporter)?;

    if report.shards == 0 {
        warn!(
            "No '{}_*.csv' shards found; the corpora are empty.",
            config.bounds.file_prefix()
        );
    }
    print_assembly_summary(&report);
    Ok(())
}
