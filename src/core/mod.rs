// upload-prep/src/core/mod.rs
pub mod processor;

use image::ColorType;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT_DIR: &str = "./raw_images";
pub const DEFAULT_OUTPUT_DIR: &str = "./ready_to_upload";
pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_AVIF_QUALITY: u8 = 80;
pub const DEFAULT_AVIF_SPEED: u8 = 6;
pub const DEFAULT_WEBP_QUALITY: u8 = 80;
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Target encodings, in the order they are written for every source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Avif,
    WebP,
    Jpeg,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Avif, OutputFormat::WebP, OutputFormat::Jpeg];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Avif => "avif",
            OutputFormat::WebP => "webp",
            OutputFormat::Jpeg => "jpg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Avif => "AVIF",
            OutputFormat::WebP => "WebP",
            OutputFormat::Jpeg => "JPEG",
        };
        f.write_str(name)
    }
}

/// Color layout of a decoded buffer.
///
/// Palette sources never show up here: the decoders expand indexed color to
/// `Rgb` or, when the palette carries transparency, `Rgba`. Grayscale with a
/// `tRNS` chunk likewise decodes to `LumaAlpha`, so that mode counts as
/// alpha-bearing; the trigger stays "RGBA or palette", nothing wider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    Luma,
    LumaAlpha,
    Other(ColorType),
}

impl ColorMode {
    pub fn has_alpha(self) -> bool {
        matches!(self, ColorMode::Rgba | ColorMode::LumaAlpha)
            || matches!(self, ColorMode::Other(color) if color.has_alpha())
    }
}

impl From<ColorType> for ColorMode {
    fn from(color: ColorType) -> Self {
        match color {
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            ColorType::L8 | ColorType::L16 => ColorMode::Luma,
            ColorType::La8 | ColorType::La16 => ColorMode::LumaAlpha,
            other => ColorMode::Other(other),
        }
    }
}

/// What happens to the remaining formats of a file once one export fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportPolicy {
    #[default]
    StopOnFirstError,
    AttemptAll,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_width: u32,
    pub avif_quality: u8,
    pub avif_speed: u8,
    pub webp_quality: u8,
    pub jpeg_quality: u8,
    pub jpeg_optimize: bool,
    pub policy: ExportPolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            max_width: DEFAULT_MAX_WIDTH,
            avif_quality: DEFAULT_AVIF_QUALITY,
            avif_speed: DEFAULT_AVIF_SPEED,
            webp_quality: DEFAULT_WEBP_QUALITY,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            jpeg_optimize: true,
            policy: ExportPolicy::StopOnFirstError,
        }
    }
}

impl ExportConfig {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input_dir: P, output_dir: Q) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }

    pub fn with_policy(mut self, policy: ExportPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn quality_for(&self, format: OutputFormat) -> u8 {
        match format {
            OutputFormat::Avif => self.avif_quality,
            OutputFormat::WebP => self.webp_quality,
            OutputFormat::Jpeg => self.jpeg_quality,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 {
            return Err(ExportError::InvalidParameter(
                "Maximum width must be greater than 0".to_string(),
            ));
        }

        for format in OutputFormat::ALL {
            let quality = self.quality_for(format);
            if quality == 0 || quality > 100 {
                return Err(ExportError::InvalidParameter(format!(
                    "{} quality must be between 1 and 100, got {}",
                    format, quality
                )));
            }
        }

        if !(1..=10).contains(&self.avif_speed) {
            return Err(ExportError::InvalidParameter(
                "AVIF speed must be between 1 and 10".to_string(),
            ));
        }

        if self.input_dir == self.output_dir {
            return Err(ExportError::InvalidParameter(
                "Input and output directories cannot be the same".to_string(),
            ));
        }

        Ok(())
    }
}

/// An eligible file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Lossy rendering of the file name, for messages only.
    pub file_name: String,
    /// File stem exactly as on disk; output names are built from it.
    pub base_name: OsString,
}

impl SourceFile {
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        let base_name = path.file_stem()?.to_os_string();
        Some(Self {
            path,
            file_name,
            base_name,
        })
    }
}

/// Pipeline stage a per-file failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Decode,
    Normalize,
    Resize,
    Export(OutputFormat),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Decode => f.write_str("decode"),
            Stage::Normalize => f.write_str("normalize"),
            Stage::Resize => f.write_str("resize"),
            Stage::Export(format) => write!(f, "{} export", format),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Input directory '{}' does not exist. Please create it and add images.", .0.display())]
    InputDirMissing(PathBuf),

    #[error("{format} encoding failed: {message}")]
    Encoding { format: OutputFormat, message: String },

    #[error("Processing error: {0}")]
    Processing(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// A failure while processing one source file.
#[derive(Error, Debug)]
#[error("{stage} failed: {source}")]
pub struct FileError {
    pub file_name: String,
    pub stage: Stage,
    #[source]
    pub source: ExportError,
}

impl FileError {
    pub fn new(file_name: impl Into<String>, stage: Stage, source: ExportError) -> Self {
        Self {
            file_name: file_name.into(),
            stage,
            source,
        }
    }
}

#[derive(Debug)]
pub struct FileOutcome {
    pub source: SourceFile,
    pub written: Vec<PathBuf>,
    pub errors: Vec<FileError>,
}

impl FileOutcome {
    pub fn new(source: SourceFile) -> Self {
        Self {
            source,
            written: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        self.errors.first().map(|e| e.stage)
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn files_written(&self) -> usize {
        self.outcomes.iter().map(|o| o.written.len()).sum()
    }

    pub fn outcome_for(&self, file_name: &str) -> Option<&FileOutcome> {
        self.outcomes.iter().find(|o| o.source.file_name == file_name)
    }
}

pub fn output_path_for(output_dir: &Path, base_name: &OsStr, format: OutputFormat) -> PathBuf {
    let mut file_name = base_name.to_os_string();
    file_name.push(".");
    file_name.push(format.extension());
    output_dir.join(file_name)
}
