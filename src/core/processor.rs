// upload-prep/src/core/processor.rs
use super::{
    ExportConfig, ExportError, ExportPolicy, FileError, FileOutcome, OutputFormat, SourceFile, Stage,
};
use crate::processors::{Exporter, Loader, Normalizer, Resizer};
use image::DynamicImage;
use std::path::Path;

/// Runs a single source file through decode, normalize, resize and export.
pub struct ImageProcessor {
    config: ExportConfig,
    loader: Loader,
    normalizer: Normalizer,
    resizer: Resizer,
    exporter: Exporter,
}

impl ImageProcessor {
    pub fn new(config: ExportConfig) -> Self {
        let resizer = Resizer::new(config.max_width);
        let exporter = Exporter::new(&config);

        Self {
            config,
            loader: Loader::new(),
            normalizer: Normalizer::new(),
            resizer,
            exporter,
        }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Processes `source`, writing its renditions into `output_dir`.
    ///
    /// The decoded buffer lives only for the duration of this call.
    pub fn process(&self, source: SourceFile, output_dir: &Path) -> FileOutcome {
        self.process_with(source, output_dir, |_| {})
    }

    /// Like [`process`](Self::process), reporting each write and each failure
    /// to `on_progress` as it happens.
    pub fn process_with<F>(&self, source: SourceFile, output_dir: &Path, mut on_progress: F) -> FileOutcome
    where
        F: FnMut(Progress<'_>),
    {
        let mut outcome = FileOutcome::new(source);

        let image = match self.prepare(&outcome.source) {
            Ok(image) => image,
            Err(e) => {
                on_progress(Progress::Failed(&e));
                outcome.errors.push(e);
                return outcome;
            }
        };

        for format in OutputFormat::ALL {
            match self
                .exporter
                .export(&image, output_dir, &outcome.source.base_name, format)
            {
                Ok(path) => {
                    on_progress(Progress::Saved(&path));
                    outcome.written.push(path);
                }
                Err(e) => {
                    let error = FileError::new(
                        outcome.source.file_name.clone(),
                        Stage::Export(format),
                        e,
                    );
                    on_progress(Progress::Failed(&error));
                    outcome.errors.push(error);
                    if self.config.policy == ExportPolicy::StopOnFirstError {
                        break;
                    }
                }
            }
        }

        outcome
    }

    /// Decodes, normalizes and resizes one source file.
    fn prepare(&self, source: &SourceFile) -> std::result::Result<DynamicImage, FileError> {
        let fail = |stage: Stage| {
            let file_name = source.file_name.clone();
            move |e: ExportError| FileError::new(file_name, stage, e)
        };

        let image = self.loader.load(&source.path).map_err(fail(Stage::Decode))?;
        let image = self.normalizer.normalize(image).map_err(fail(Stage::Normalize))?;
        self.resizer.resize(image).map_err(fail(Stage::Resize))
    }
}

/// Per-file events emitted while a file is processed.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    Saved(&'a Path),
    Failed(&'a FileError),
}
