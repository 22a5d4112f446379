// upload-prep/src/cli.rs
use crate::core::{
    ExportConfig, ExportPolicy, DEFAULT_AVIF_QUALITY, DEFAULT_INPUT_DIR, DEFAULT_JPEG_QUALITY,
    DEFAULT_MAX_WIDTH, DEFAULT_OUTPUT_DIR, DEFAULT_WEBP_QUALITY,
};
use clap::Parser;
use std::path::PathBuf;

/// Convert a folder of images into AVIF, WebP and JPEG renditions ready for upload.
#[derive(Parser, Debug)]
#[command(name = "upload-prep", version, about)]
pub struct Cli {
    /// Directory holding the source images
    #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
    pub input: PathBuf,

    /// Directory the renditions are written to (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Images wider than this are downscaled to it
    #[arg(short = 'w', long, default_value_t = DEFAULT_MAX_WIDTH)]
    pub max_width: u32,

    /// AVIF quality (1-100)
    #[arg(long, default_value_t = DEFAULT_AVIF_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub avif_quality: u8,

    /// WebP quality (1-100)
    #[arg(long, default_value_t = DEFAULT_WEBP_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub webp_quality: u8,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// Keep writing the remaining formats of a file after one of them fails
    #[arg(long)]
    pub keep_going: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn to_config(&self) -> ExportConfig {
        ExportConfig {
            input_dir: self.input.clone(),
            output_dir: self.output.clone(),
            max_width: self.max_width,
            avif_quality: self.avif_quality,
            webp_quality: self.webp_quality,
            jpeg_quality: self.jpeg_quality,
            policy: if self.keep_going {
                ExportPolicy::AttemptAll
            } else {
                ExportPolicy::StopOnFirstError
            },
            ..ExportConfig::default()
        }
    }
}
