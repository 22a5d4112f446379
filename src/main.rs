use clap::Parser;
use log::LevelFilter;
use upload_prep::{BatchProcessor, Cli, ExportError};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logger
    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let processor = BatchProcessor::new(cli.to_config())?;

    match processor.run() {
        Ok(report) => {
            log::debug!(
                "{} of {} images converted",
                report.succeeded(),
                report.outcomes.len()
            );
            Ok(())
        }
        // Already reported on the console; a missing input folder is not a failed run.
        Err(ExportError::InputDirMissing(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
