//! Data model for the seal detection pipeline.
//!
//! A [`RasterPage`] is produced once per document page and owned by one
//! page-processing iteration. [`SealCandidate`]s reference locations on that
//! page; [`SealRecord`]s describe the persisted normalized artifacts and
//! carry no back-reference to the page raster.

use image::RgbImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One document page rendered to an RGB raster at a fixed physical
/// resolution.
///
/// The pixel-to-millimeter calibration is computed once at construction and
/// applied to every candidate found on the page.
#[derive(Debug, Clone)]
pub struct RasterPage {
    /// The rendered page pixels in RGB order.
    pub image: RgbImage,
    /// 1-based index of the page within the document.
    pub page_index: usize,
    /// Physical width of one pixel in millimeters.
    pub mm_per_pixel: f32,
}

impl RasterPage {
    /// Wraps a rendered page, calibrating against the physical page width.
    ///
    /// `mm_per_pixel` is `page_width_mm / width_px`; with the default
    /// 210mm page this is the A4 calibration used by the detector.
    pub fn new(image: RgbImage, page_index: usize, page_width_mm: f32) -> Self {
        let mm_per_pixel = page_width_mm / image.width() as f32;
        Self {
            image,
            page_index,
            mm_per_pixel,
        }
    }

    /// Page width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Page height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// An axis-aligned rectangle in page pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CropRect {
    /// Creates a new rectangle.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area of the rectangle in pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the rectangle covers zero pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One detected red blob on a page, sized by its minimum enclosing circle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealCandidate {
    /// Sequence number, unique and strictly increasing across one whole
    /// detection run, assigned in discovery order across pages.
    pub id: usize,
    /// 1-based index of the page the blob was found on.
    pub page_index: usize,
    /// Center of the enclosing circle in page pixel space, `(x, y)`.
    pub center: (f32, f32),
    /// Radius of the enclosing circle in pixels.
    pub radius_px: f32,
    /// Physical diameter estimate: `2 * radius_px * mm_per_pixel`.
    pub diameter_mm: f32,
    /// Padded bounding box used to cut the blob from the page.
    pub crop_rect: CropRect,
}

/// Metadata for one normalized seal written to durable storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealRecord {
    /// Id of the owning candidate; the output file name derives from it.
    pub id: usize,
    /// 1-based index of the page the seal was found on.
    pub page_index: usize,
    /// Physical diameter estimate of the seal.
    pub diameter_mm: f32,
    /// The crop rectangle the seal was cut from, for provenance.
    pub crop_rect: CropRect,
    /// Center of the enclosing circle in page pixel space.
    pub center: (f32, f32),
    /// Path of the persisted PNG artifact.
    pub image_path: PathBuf,
    /// Whether `diameter_mm` is within the configured target tolerance.
    pub within_tolerance: bool,
    /// True when segmentation found no contour and the unprocessed crop was
    /// saved instead of a normalized image.
    pub fallback: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_page_calibration() {
        let page = RasterPage::new(RgbImage::new(2480, 3508), 1, 210.0);
        // 210mm across 2480px is the 300 DPI A4 calibration.
        assert!((page.mm_per_pixel - 210.0 / 2480.0).abs() < 1e-6);
        assert_eq!(page.width(), 2480);
        assert_eq!(page.height(), 3508);
    }

    #[test]
    fn test_crop_rect_area() {
        let rect = CropRect::new(10, 20, 30, 40);
        assert_eq!(rect.area(), 1200);
        assert!(!rect.is_empty());
        assert!(CropRect::new(0, 0, 0, 10).is_empty());
    }
}
