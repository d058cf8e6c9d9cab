use super::{prepare, print_assembly_summary, print_batch_summary};
use crate::cli::PipelineArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use pdbtok::core::io::cif::CifReader;
use pdbtok::engine::progress::ProgressReporter;
use pdbtok::workflows::pipeline;
use tracing::info;

pub fn run(args: PipelineArgs, threads: Option<usize>) -> Result<()> {
    let config = prepare(&args, threads)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Running the full pipeline: {} -> {}",
        config.input_dir.display(),
        config.layout.root().display()
    );
    info!("Invoking the pipeline workflow...");
    let report = pipeline::run(&config, CifReader::new(), &reporter)?;

    print_batch_summary(&report.batch);
    print_assembly_summary(&report.assembly);
    Ok(())
}
