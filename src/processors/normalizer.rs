// upload-prep/src/processors/normalizer.rs
use crate::core::{ColorMode, ExportError, Result};
use image::DynamicImage;

/// Drops alpha so the lossy RGB-only encoders get a buffer they can take.
///
/// Only alpha-bearing buffers are converted. Grayscale and deep RGB pass
/// through untouched; color types the crate cannot classify are refused.
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, image: DynamicImage) -> Result<DynamicImage> {
        let mode = ColorMode::from(image.color());
        if let ColorMode::Other(color) = mode {
            return Err(ExportError::Processing(format!(
                "Unsupported color type {:?}",
                color
            )));
        }

        if !mode.has_alpha() {
            return Ok(image);
        }

        log::debug!("Converting {:?} image to RGB", mode);
        // Alpha is discarded, not composited over a background.
        Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
