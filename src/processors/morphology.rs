//! Morphological cleanup of binary ink masks.
//!
//! The localizer chain runs close before open: closing first bridges the
//! gaps inside one stamp's ink pattern, and the following opening removes
//! the speckle noise that closing leaves behind. Reordering the chain
//! changes which blobs survive, so the order is part of the contract.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology;

/// Radius of the 5x5 structuring element used throughout the page mask
/// cleanup.
const KERNEL_RADIUS: u8 = 2;

/// Radius of the large structuring element that merges nearby ink strokes
/// into one blob during normalization.
const MERGE_RADIUS: u8 = 11;

/// Sigma matching a 5x5 Gaussian kernel with an auto-derived sigma
/// (`0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`).
const BLUR_SIGMA: f32 = 1.1;

/// Cleans a page-level red mask before contour extraction.
///
/// Applies, in order: binary close with a 5x5 element for 2 iterations,
/// open with the same element once, one dilation to recover the erosion
/// lost to opening, then a 5x5 Gaussian blur re-thresholded at the 50%
/// gray level to smooth the jagged edges morphology introduces.
pub fn cleanup_page_mask(mask: &GrayImage) -> GrayImage {
    // Two close iterations compose into a single pass with a doubled
    // radius: dilate twice, then erode twice.
    let closed = morphology::erode(
        &morphology::dilate(mask, Norm::LInf, KERNEL_RADIUS * 2),
        Norm::LInf,
        KERNEL_RADIUS * 2,
    );
    let opened = morphology::open(&closed, Norm::LInf, KERNEL_RADIUS);
    let dilated = morphology::dilate(&opened, Norm::LInf, KERNEL_RADIUS);

    let blurred = gaussian_blur_f32(&dilated, BLUR_SIGMA);
    rethreshold(&blurred)
}

/// Dilates an ink silhouette with the large merge element so the strokes of
/// one stamp form a single contiguous blob.
pub fn merge_ink_strokes(mask: &GrayImage) -> GrayImage {
    morphology::dilate(mask, Norm::LInf, MERGE_RADIUS)
}

/// Binarizes a blurred mask at the 50% gray level.
fn rethreshold(image: &GrayImage) -> GrayImage {
    let mut out = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let value = if pixel[0] > 127 { 255 } else { 0 };
        out.put_pixel(x, y, Luma([value]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with_disk(size: u32, cx: i32, cy: i32, radius: i32) -> GrayImage {
        let mut mask = GrayImage::new(size, size);
        for (x, y, pixel) in mask.enumerate_pixels_mut() {
            let dx = x as i32 - cx;
            let dy = y as i32 - cy;
            if dx * dx + dy * dy <= radius * radius {
                *pixel = Luma([255]);
            }
        }
        mask
    }

    #[test]
    fn test_cleanup_is_binary() {
        let mask = mask_with_disk(100, 50, 50, 20);
        let cleaned = cleanup_page_mask(&mask);
        assert!(cleaned.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn test_cleanup_removes_speckle() {
        // A lone foreground pixel is noise; opening must remove it.
        let mut mask = GrayImage::new(60, 60);
        mask.put_pixel(30, 30, Luma([255]));
        let cleaned = cleanup_page_mask(&mask);
        assert!(cleaned.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_cleanup_keeps_solid_blob() {
        let mask = mask_with_disk(120, 60, 60, 25);
        let cleaned = cleanup_page_mask(&mask);
        // The blob's core survives the whole chain.
        assert_eq!(cleaned.get_pixel(60, 60)[0], 255);
    }

    #[test]
    fn test_cleanup_bridges_small_gap() {
        // Two disks two pixels apart merge under the double-close.
        let mut mask = mask_with_disk(120, 45, 60, 10);
        for (x, y, pixel) in mask_with_disk(120, 67, 60, 10).enumerate_pixels() {
            if pixel[0] == 255 {
                mask.put_pixel(x, y, *pixel);
            }
        }
        let cleaned = cleanup_page_mask(&mask);
        // The midpoint between the disks is filled in.
        assert_eq!(cleaned.get_pixel(56, 60)[0], 255);
    }

    #[test]
    fn test_merge_ink_strokes_grows_mask() {
        let mut mask = GrayImage::new(50, 50);
        mask.put_pixel(25, 25, Luma([255]));
        let merged = merge_ink_strokes(&mask);
        assert_eq!(merged.get_pixel(25 + 11, 25 + 11)[0], 255);
        assert_eq!(merged.get_pixel(25 + 12, 25)[0], 0);
    }
}
