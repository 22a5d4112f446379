// upload-prep/src/processors/exporter.rs
use crate::core::{output_path_for, ExportConfig, ExportError, OutputFormat, Result};
use crate::utils::format_file_size;
use image::codecs::avif::AvifEncoder;
use image::{ColorType, DynamicImage};
use jpeg_encoder::{ColorType as JpegColorType, Encoder as JpegEncoder};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Encodes one prepared buffer into each upload format.
pub struct Exporter {
    avif_quality: u8,
    avif_speed: u8,
    webp_quality: u8,
    jpeg_quality: u8,
    jpeg_optimize: bool,
}

impl Exporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            avif_quality: config.avif_quality.clamp(1, 100),
            avif_speed: config.avif_speed.clamp(1, 10),
            webp_quality: config.webp_quality.clamp(1, 100),
            jpeg_quality: config.jpeg_quality.clamp(1, 100),
            jpeg_optimize: config.jpeg_optimize,
        }
    }

    /// Encodes `image` and writes it to `{output_dir}/{base_name}.{ext}`.
    pub fn export(
        &self,
        image: &DynamicImage,
        output_dir: &Path,
        base_name: &OsStr,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let path = output_path_for(output_dir, base_name, format);

        log::debug!("Encoding {} as {}", path.display(), format);
        let data = self.encode(image, format)?;
        std::fs::write(&path, &data)?;

        log::debug!(
            "Wrote {} ({})",
            path.display(),
            format_file_size(data.len() as u64)
        );
        Ok(path)
    }

    pub fn encode(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        match format {
            OutputFormat::Avif => self.encode_avif(image),
            OutputFormat::WebP => self.encode_webp(image),
            OutputFormat::Jpeg => self.encode_jpeg(image),
        }
    }

    fn encode_avif(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let rgb = as_rgb8(image);
        let mut buffer = Vec::new();
        let encoder =
            AvifEncoder::new_with_speed_quality(&mut buffer, self.avif_speed, self.avif_quality);
        rgb.write_with_encoder(encoder)?;
        Ok(buffer)
    }

    fn encode_webp(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let rgb = as_rgb8(image);
        let encoder = webp::Encoder::from_rgb(rgb.as_bytes(), rgb.width(), rgb.height());
        let memory = encoder
            .encode_simple(false, self.webp_quality as f32)
            .map_err(|e| ExportError::Encoding {
                format: OutputFormat::WebP,
                message: format!("{:?}", e),
            })?;
        Ok(memory.to_vec())
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let width = jpeg_dimension(image.width())?;
        let height = jpeg_dimension(image.height())?;

        let (pixels, color_type) = match image.color() {
            ColorType::L8 => (Cow::Borrowed(image), JpegColorType::Luma),
            _ => (as_rgb8(image), JpegColorType::Rgb),
        };

        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new(&mut buffer, self.jpeg_quality);
        encoder.set_optimized_huffman_tables(self.jpeg_optimize);
        encoder
            .encode(pixels.as_bytes(), width, height, color_type)
            .map_err(|e| ExportError::Encoding {
                format: OutputFormat::Jpeg,
                message: e.to_string(),
            })?;
        Ok(buffer)
    }
}

/// Borrows 8-bit RGB buffers as they are and converts everything else.
fn as_rgb8(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::Rgb8 => Cow::Borrowed(image),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

fn jpeg_dimension(value: u32) -> Result<u16> {
    u16::try_from(value).map_err(|_| ExportError::Encoding {
        format: OutputFormat::Jpeg,
        message: format!("dimension {} exceeds the JPEG limit of {}", value, u16::MAX),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7) as u8, (y * 5) as u8, ((x + y) * 3) as u8])
        }))
    }

    fn exporter() -> Exporter {
        Exporter::new(&ExportConfig::default())
    }

    #[test]
    fn encodes_each_format_with_its_signature() {
        let image = gradient(32, 24);
        let exporter = exporter();

        let avif = exporter.encode(&image, OutputFormat::Avif).unwrap();
        assert_eq!(&avif[4..8], b"ftyp");

        let webp = exporter.encode(&image, OutputFormat::WebP).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");

        let jpeg = exporter.encode(&image, OutputFormat::Jpeg).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn lossy_outputs_decode_to_source_dimensions() {
        let image = gradient(40, 30);
        let exporter = exporter();

        for (format, decode_as) in [
            (OutputFormat::WebP, ImageFormat::WebP),
            (OutputFormat::Jpeg, ImageFormat::Jpeg),
        ] {
            let bytes = exporter.encode(&image, format).unwrap();
            let decoded = image::load_from_memory_with_format(&bytes, decode_as).unwrap();
            assert_eq!(decoded.dimensions(), (40, 30), "{} dimensions", format);
            assert!(!decoded.color().has_alpha(), "{} has alpha", format);
        }
    }

    #[test]
    fn grayscale_jpeg_stays_single_channel() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([128])));

        let bytes = exporter().encode(&image, OutputFormat::Jpeg).unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.color(), ColorType::L8);
    }

    #[test]
    fn export_writes_named_file() {
        let dir = tempfile::tempdir().unwrap();

        let path = exporter()
            .export(&gradient(8, 8), dir.path(), OsStr::new("sample"), OutputFormat::Jpeg)
            .unwrap();

        assert_eq!(path, dir.path().join("sample.jpg"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn export_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let result = exporter().export(&gradient(8, 8), &missing, OsStr::new("sample"), OutputFormat::WebP);
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn oversized_jpeg_dimension_is_reported() {
        assert!(jpeg_dimension(65_535).is_ok());
        assert!(matches!(
            jpeg_dimension(65_536),
            Err(ExportError::Encoding { format: OutputFormat::Jpeg, .. })
        ));
    }
}
