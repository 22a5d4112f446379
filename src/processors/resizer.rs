// upload-prep/src/processors/resizer.rs
use crate::core::{ExportError, Result};
use image::{imageops::FilterType, DynamicImage};

/// Downscales images wider than `max_width`, keeping the aspect ratio.
pub struct Resizer {
    max_width: u32,
    filter: FilterType,
}

impl Resizer {
    pub fn new(max_width: u32) -> Self {
        Self {
            max_width,
            filter: FilterType::Lanczos3,
        }
    }

    /// Target size for an image of `width` x `height`.
    ///
    /// Images at or below the limit keep their size. Wider ones get
    /// `max_width` and a height truncated from `height * (max_width / width)`,
    /// evaluated in double precision.
    pub fn target_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        if width <= self.max_width {
            return (width, height);
        }

        let ratio = self.max_width as f64 / width as f64;
        let new_height = (height as f64 * ratio) as u32;
        (self.max_width, new_height)
    }

    pub fn resize(&self, image: DynamicImage) -> Result<DynamicImage> {
        let (width, height) = (image.width(), image.height());
        let (new_width, new_height) = self.target_dimensions(width, height);

        if (new_width, new_height) == (width, height) {
            log::debug!("Image is {}px wide, within {}px, skipping resize", width, self.max_width);
            return Ok(image);
        }

        if new_height == 0 {
            return Err(ExportError::Processing(format!(
                "Resizing {}x{} to width {} leaves no rows",
                width, height, new_width
            )));
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            width,
            height,
            new_width,
            new_height
        );

        Ok(image.resize_exact(new_width, new_height, self.filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, RgbImage};

    fn blank(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(width, height))
    }

    #[test]
    fn narrow_images_are_untouched() {
        let resizer = Resizer::new(1920);
        assert_eq!(resizer.target_dimensions(100, 100), (100, 100));
        assert_eq!(resizer.target_dimensions(1920, 5000), (1920, 5000));

        let image = resizer.resize(blank(100, 40)).unwrap();
        assert_eq!(image.dimensions(), (100, 40));
    }

    #[test]
    fn wide_images_shrink_to_max_width() {
        let resizer = Resizer::new(1920);
        assert_eq!(resizer.target_dimensions(2400, 1600), (1920, 1280));
        assert_eq!(resizer.target_dimensions(1921, 1081), (1920, 1080));
        assert_eq!(resizer.target_dimensions(3840, 2160), (1920, 1080));
    }

    #[test]
    fn height_is_truncated_not_rounded() {
        // 20 / 3 = 6.67 and 29 / 3 = 9.67 both truncate down.
        let resizer = Resizer::new(10);
        assert_eq!(resizer.target_dimensions(3, 2), (3, 2));
        assert_eq!(resizer.target_dimensions(30, 20), (10, 6));
        assert_eq!(resizer.target_dimensions(30, 29), (10, 9));
    }

    #[test]
    fn resize_produces_target_buffer() {
        let image = Resizer::new(8).resize(blank(24, 13)).unwrap();
        assert_eq!(image.dimensions(), (8, 4));
    }

    #[test]
    fn degenerate_height_is_an_error() {
        let result = Resizer::new(10).resize(blank(1000, 1));
        assert!(matches!(result, Err(ExportError::Processing(_))));
    }
}
