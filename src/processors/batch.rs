// upload-prep/src/processors/batch.rs
use crate::core::processor::{ImageProcessor, Progress};
use crate::core::{BatchReport, ExportConfig, Result};
use crate::processors::Scanner;
use indicatif::{ProgressBar, ProgressStyle};

/// Converts every eligible image of the input directory, one at a time.
pub struct BatchProcessor {
    scanner: Scanner,
    processor: ImageProcessor,
}

impl BatchProcessor {
    pub fn new(config: ExportConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            scanner: Scanner::new(),
            processor: ImageProcessor::new(config),
        })
    }

    pub fn config(&self) -> &ExportConfig {
        self.processor.config()
    }

    /// Runs the whole batch.
    ///
    /// The output directory is created first. A missing input directory is
    /// reported on the console and returned as
    /// [`ExportError::InputDirMissing`](crate::ExportError::InputDirMissing);
    /// per-file failures are reported and collected in the returned
    /// [`BatchReport`] without stopping the batch.
    pub fn run(&self) -> Result<BatchReport> {
        let config = self.config();
        std::fs::create_dir_all(&config.output_dir)?;

        let sources = match self.scanner.scan(&config.input_dir) {
            Ok(sources) => sources,
            Err(e) => {
                println!("{}", e);
                return Err(e);
            }
        };

        let pb = self.create_progress_bar();
        let mut report = BatchReport::default();

        for source in sources {
            pb.set_message(source.file_name.clone());
            let outcome = self
                .processor
                .process_with(source, &config.output_dir, |event| {
                    pb.suspend(|| Self::print_progress(event))
                });
            pb.inc(1);
            report.outcomes.push(outcome);
        }

        pb.finish_and_clear();

        if report.outcomes.is_empty() {
            log::warn!("No image files found in {}", config.input_dir.display());
        } else {
            log::info!(
                "Processed {} images: {} converted, {} failed, {} files written to {}",
                report.outcomes.len(),
                report.succeeded(),
                report.failed(),
                report.files_written(),
                config.output_dir.display()
            );
        }

        Ok(report)
    }

    fn print_progress(event: Progress<'_>) {
        match event {
            Progress::Saved(path) => println!("Saved {}", path.display()),
            Progress::Failed(error) => {
                log::debug!("{:?} stage failed for {}", error.stage, error.file_name);
                println!("Error processing {}: {}", error.file_name, error);
            }
        }
    }

    fn create_progress_bar(&self) -> ProgressBar {
        // The scan is lazy, so the total is unknown up front.
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} images {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExportError;

    #[test]
    fn rejects_invalid_config() {
        let config = ExportConfig::default().with_max_width(0);
        assert!(matches!(
            BatchProcessor::new(config),
            Err(ExportError::InvalidParameter(_))
        ));
    }

    #[test]
    fn empty_input_directory_yields_empty_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("raw_images");
        std::fs::create_dir(&input).unwrap();
        let output = dir.path().join("ready_to_upload");

        let report = BatchProcessor::new(ExportConfig::new(&input, &output))
            .unwrap()
            .run()
            .unwrap();

        assert!(report.outcomes.is_empty());
        assert!(output.is_dir());
    }

    #[test]
    fn missing_input_creates_output_but_processes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("ready_to_upload");
        let config = ExportConfig::new(dir.path().join("raw_images"), &output);

        let result = BatchProcessor::new(config).unwrap().run();

        assert!(matches!(result, Err(ExportError::InputDirMissing(_))));
        assert_eq!(std::fs::read_dir(&output).unwrap().count(), 0);
    }
}
