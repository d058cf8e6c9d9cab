use super::{prepare, print_batch_summary};
use crate::cli::PipelineArgs;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use pdbtok::core::io::cif::CifReader;
use pdbtok::engine::progress::ProgressReporter;
use pdbtok::workflows::tokenize::BatchTokenizer;
use tracing::{info, warn};

pub fn run(args: PipelineArgs, threads: Option<usize>) -> Result<()> {
    let config = prepare(&args, threads)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Tokenizing structures from {}...", config.input_dir.display());
    info!("Invoking the tokenize workflow...");
    let report = BatchTokenizer::new(&config, CifReader::new()).run(&reporter)?;

    if report.processed.is_empty() {
        warn!(
            "No '.{}' files were tokenized under {}.",
            config.extension,
            config.input_dir.display()
        );
    }
    print_batch_summary(&report);
    Ok(())
}
