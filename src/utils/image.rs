//! Utility functions for image loading and saving.

use crate::core::SealError;
use image::{DynamicImage, ImageBuffer, RgbImage, RgbaImage};
use std::path::Path;

/// Converts a DynamicImage to an RgbImage.
pub fn dynamic_to_rgb(img: DynamicImage) -> RgbImage {
    img.to_rgb8()
}

/// Loads an image from a file path and converts it to RgbImage.
///
/// Handles any image format supported by the image crate.
///
/// # Errors
///
/// Returns `SealError::ImageLoad` if the image cannot be decoded.
pub fn load_image(path: &Path) -> Result<RgbImage, SealError> {
    let img = image::open(path).map_err(SealError::ImageLoad)?;
    Ok(dynamic_to_rgb(img))
}

/// Creates an RgbImage from raw pixel data in RGB order.
///
/// Returns `None` if the data length doesn't match the dimensions.
pub fn create_rgb_image(width: u32, height: u32, data: Vec<u8>) -> Option<RgbImage> {
    if data.len() != (width as usize) * (height as usize) * 3 {
        return None;
    }

    ImageBuffer::from_raw(width, height, data)
}

/// Writes an RGBA image to `path` as a PNG.
///
/// PNG is lossless, so alpha-channel edges survive the round trip exactly.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), SealError> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| SealError::ImageWrite {
            path: path.display().to_string(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_create_rgb_image() {
        let data = vec![0u8; 2 * 3 * 3];
        assert!(create_rgb_image(2, 3, data).is_some());
        assert!(create_rgb_image(2, 3, vec![0u8; 5]).is_none());
    }

    #[test]
    fn test_save_and_reload_png_preserves_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 0]));
        img.put_pixel(1, 1, Rgba([254, 10, 10, 255]));
        save_png(&img, &path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.get_pixel(1, 1), &Rgba([254, 10, 10, 255]));
        assert_eq!(reloaded.get_pixel(0, 0)[3], 0);
    }
}
