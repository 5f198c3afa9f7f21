use std::{collections::HashSet, fs, path::Path};

use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use log::debug;

use crate::{
    error::TestImageError,
    render::{HEIGHT, WIDTH},
};

/// Files at or below this size cannot hold the rendered picture.
pub const MIN_FILE_SIZE: u64 = 100;
const MAX_COUNTED_COLORS: usize = 256;

#[derive(Debug, Clone)]
pub struct ImageAnalysis {
    pub width: u32,
    pub height: u32,
    pub color_type: ColorType,
    pub format: Option<ImageFormat>,
    /// `None` when the image holds more than 256 distinct colours.
    pub unique_colors: Option<usize>,
    pub file_size: u64,
}

impl ImageAnalysis {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn verify(&self) -> Result<(), TestImageError> {
        if self.file_size <= MIN_FILE_SIZE {
            return Err(TestImageError::TooSmall {
                size: self.file_size,
            });
        }
        if self.dimensions() != (WIDTH, HEIGHT) {
            return Err(TestImageError::Dimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

fn count_colors(img: &DynamicImage) -> Option<usize> {
    let mut seen = HashSet::new();
    for pixel in img.to_rgba8().pixels() {
        seen.insert(pixel.0);
        if seen.len() > MAX_COUNTED_COLORS {
            return None;
        }
    }
    Some(seen.len())
}

/// Opens and decodes the image without judging it.
pub fn inspect_image(image_path: &Path) -> Result<ImageAnalysis, TestImageError> {
    if !image_path.exists() {
        return Err(TestImageError::Missing(image_path.to_path_buf()));
    }

    let reader = ImageReader::open(image_path)?.with_guessed_format()?;
    let format = reader.format();
    let decoded = reader.decode()?;
    let file_size = fs::metadata(image_path)?.len();

    let analysis = ImageAnalysis {
        width: decoded.width(),
        height: decoded.height(),
        color_type: decoded.color(),
        format,
        unique_colors: count_colors(&decoded),
        file_size,
    };
    debug!("inspected {}: {analysis:?}", image_path.display());
    Ok(analysis)
}

pub fn analyze_test_image(image_path: &Path) -> Result<ImageAnalysis, TestImageError> {
    let analysis = inspect_image(image_path)?;
    analysis.verify()?;
    Ok(analysis)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(width: u32, height: u32, file_size: u64) -> ImageAnalysis {
        ImageAnalysis {
            width,
            height,
            color_type: ColorType::Rgb8,
            format: Some(ImageFormat::Png),
            unique_colors: Some(5),
            file_size,
        }
    }

    #[test]
    fn verify_rejects_tiny_files() {
        let err = analysis(WIDTH, HEIGHT, MIN_FILE_SIZE).verify().unwrap_err();
        assert!(matches!(err, TestImageError::TooSmall { size: 100 }));
        assert!(analysis(WIDTH, HEIGHT, MIN_FILE_SIZE + 1).verify().is_ok());
    }

    #[test]
    fn verify_rejects_wrong_dimensions() {
        let err = analysis(300, 400, 5_000).verify().unwrap_err();
        assert!(matches!(
            err,
            TestImageError::Dimensions {
                width: 300,
                height: 400
            }
        ));
    }

    #[test]
    fn colours_past_the_limit_are_not_counted() {
        let mut img = image::RgbImage::new(32, 32);
        for (i, pixel) in img.pixels_mut().enumerate() {
            *pixel = image::Rgb([(i % 256) as u8, (i / 256) as u8, 0]);
        }
        assert_eq!(count_colors(&DynamicImage::ImageRgb8(img)), None);

        let flat = image::RgbImage::from_pixel(4, 4, image::Rgb([1, 2, 3]));
        assert_eq!(count_colors(&DynamicImage::ImageRgb8(flat)), Some(1));
    }
}
