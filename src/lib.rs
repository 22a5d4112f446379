pub mod cli;
mod core;
mod processors;
mod utils;

pub use cli::Cli;
pub use crate::core::processor::{ImageProcessor, Progress};
pub use crate::core::{
    output_path_for, BatchReport, ColorMode, ExportConfig, ExportError, ExportPolicy, FileError,
    FileOutcome, OutputFormat, Result, SourceFile, Stage,
};
pub use processors::{BatchProcessor, Exporter, Loader, Normalizer, Resizer, Scanner};
pub use utils::{format_file_size, is_supported_format, SUPPORTED_EXTENSIONS};

pub mod prelude {
    pub use crate::{
        BatchProcessor, ExportConfig, ExportPolicy, Exporter, ImageProcessor, Loader, Normalizer,
        OutputFormat, Resizer, Scanner,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
