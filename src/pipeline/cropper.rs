//! Sub-rectangle extraction of candidate regions.

use crate::core::{SealError, SealResult};
use crate::domain::{CropRect, RasterPage};
use image::imageops;
use image::RgbImage;

/// Cuts the candidate's padded rectangle out of the page raster.
///
/// The localizer never emits a zero-area rectangle, but the bounds are
/// re-validated here because the rectangle may also arrive from a caller.
///
/// # Errors
///
/// Returns `SealError::EmptyCrop` when the rectangle, intersected with the
/// page, covers zero pixels.
pub fn crop(page: &RasterPage, rect: &CropRect) -> SealResult<RgbImage> {
    let empty_crop = || SealError::EmptyCrop {
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
    };

    if rect.is_empty() || rect.x >= page.width() || rect.y >= page.height() {
        return Err(empty_crop());
    }

    let width = rect.width.min(page.width() - rect.x);
    let height = rect.height.min(page.height() - rect.y);
    if width == 0 || height == 0 {
        return Err(empty_crop());
    }

    Ok(imageops::crop_imm(&page.image, rect.x, rect.y, width, height).to_image())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn page_with_marker() -> RasterPage {
        let mut img = RgbImage::from_pixel(100, 80, Rgb([255, 255, 255]));
        img.put_pixel(42, 30, Rgb([200, 30, 30]));
        RasterPage::new(img, 1, 210.0)
    }

    #[test]
    fn test_crop_extracts_region() {
        let page = page_with_marker();
        let out = crop(&page, &CropRect::new(40, 28, 10, 10)).unwrap();
        assert_eq!(out.dimensions(), (10, 10));
        assert_eq!(out.get_pixel(2, 2), &Rgb([200, 30, 30]));
    }

    #[test]
    fn test_crop_clamps_to_page_edge() {
        let page = page_with_marker();
        let out = crop(&page, &CropRect::new(95, 75, 20, 20)).unwrap();
        assert_eq!(out.dimensions(), (5, 5));
    }

    #[test]
    fn test_crop_rejects_empty_regions() {
        let page = page_with_marker();
        assert!(matches!(
            crop(&page, &CropRect::new(0, 0, 0, 10)),
            Err(SealError::EmptyCrop { .. })
        ));
        assert!(matches!(
            crop(&page, &CropRect::new(100, 0, 10, 10)),
            Err(SealError::EmptyCrop { .. })
        ));
    }
}
