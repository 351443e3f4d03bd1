//! Per-seal normalization.
//!
//! Turns an arbitrary crop into a fixed-size, background-transparent,
//! canonically-colored image. This is a second segmentation pass with its
//! own HSV windows, distinct from page-level localization: the crop is
//! isolated ink on a near-white background, not a full page, and the
//! windows are tuned for that contrast.
//!
//! When the crop contains no segmentable ink at all the normalizer falls
//! back to the unprocessed crop instead of failing; sparse or faint ink is
//! not a pipeline error.

use crate::core::{SealError, SealResult};
use crate::processors::color::ink_composite;
use crate::processors::geometry::contour_bounds;
use crate::processors::morphology::merge_ink_strokes;
use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, RgbImage, Rgba, RgbaImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::edges::canny;
use tracing::debug;

/// Side length of the final normalized image.
pub const OUTPUT_SIZE: u32 = 250;

/// Transparent-white fill used for borders and padding.
const BLANK: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Border added around the composite so contour extraction and dilation
/// never clip against the image boundary.
const BORDER_PX: u32 = 50;

/// Processing width for wide crops (native width above [`WIDE_CUTOFF`]).
const WIDE_TARGET: u32 = 650;
/// Native-width cutoff between the two processing scales.
const WIDE_CUTOFF: u32 = 600;
/// Processing width for narrow crops.
const NARROW_TARGET: u32 = 400;

/// Canonical red channel value all impure ink tones are forced to.
const CANONICAL_RED: u8 = 254;

/// Canny thresholds for outlining the merged ink mass.
const EDGE_THRESHOLD: f32 = 10.0;

/// Result of normalizing one crop.
#[derive(Debug, Clone)]
pub enum NormalizeOutcome {
    /// The canonical artifact: 250x250 RGBA, transparent background,
    /// canonical red ink, binary alpha.
    Normalized(RgbaImage),
    /// No contour was found during segmentation; the unprocessed crop is
    /// returned at its native size.
    Fallback(RgbaImage),
}

impl NormalizeOutcome {
    /// The image to persist, whichever way the outcome went.
    pub fn image(&self) -> &RgbaImage {
        match self {
            NormalizeOutcome::Normalized(img) | NormalizeOutcome::Fallback(img) => img,
        }
    }

    /// True when segmentation fell back to the unprocessed crop.
    pub fn is_fallback(&self) -> bool {
        matches!(self, NormalizeOutcome::Fallback(_))
    }
}

/// Normalizes seal crops to the canonical comparison format.
#[derive(Debug, Clone, Default)]
pub struct SealNormalizer;

impl SealNormalizer {
    /// Creates a normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Runs the full normalization sequence on one crop.
    ///
    /// # Errors
    ///
    /// Returns `SealError::Normalization` for a degenerate (zero-sized)
    /// input. A crop without segmentable ink is not an error; it yields
    /// [`NormalizeOutcome::Fallback`].
    pub fn normalize(&self, crop: &RgbImage) -> SealResult<NormalizeOutcome> {
        let (width, height) = crop.dimensions();
        if width == 0 || height == 0 {
            return Err(SealError::normalization_msg(format!(
                "degenerate {width}x{height} crop"
            )));
        }

        // 1. Bring the crop to one of two processing scales, preserving
        // aspect ratio.
        let target_w = if width > WIDE_CUTOFF {
            WIDE_TARGET
        } else {
            NARROW_TARGET
        };
        let target_h = ((target_w as u64 * height as u64) / width as u64).max(1) as u32;
        let resized = imageops::resize(crop, target_w, target_h, FilterType::CatmullRom);

        // 2. Re-segment ink against the near-white background.
        let composite = ink_composite(&resized);

        // 3. Extend the canvas so the dilate/contour pass has headroom.
        let bordered = extend_border(&composite);

        // 4-5. Ink silhouette regardless of hue, merged into one blob,
        // then outlined.
        let silhouette = ink_silhouette(&bordered);
        let merged = merge_ink_strokes(&silhouette);
        let edges = canny(&merged, EDGE_THRESHOLD, EDGE_THRESHOLD);

        // 6. No contour means no segmentable ink; keep the raw crop.
        let contours = find_contours::<i32>(&edges);
        let Some(bbox) = largest_outer_bounds(&contours) else {
            debug!("no contour in crop, falling back to unprocessed image");
            let mut raw = RgbaImage::new(width, height);
            for (x, y, pixel) in crop.enumerate_pixels() {
                raw.put_pixel(x, y, Rgba([pixel[0], pixel[1], pixel[2], 255]));
            }
            return Ok(NormalizeOutcome::Fallback(raw));
        };

        // 7. Tightest bounding region of the merged ink mass.
        let (bx, by, bw, bh) = clamp_bounds(bbox, bordered.width(), bordered.height());
        let cropped = imageops::crop_imm(&bordered, bx, by, bw, bh).to_image();

        // 8. Square before resizing so the circular geometry is not
        // stretched non-uniformly.
        let squared = pad_to_square(&cropped);

        // 9. Unify ink hue variance into the canonical red.
        let canonical = canonicalize_red(&squared);

        // 10. Final fixed-size resize; interpolation must not leave
        // translucent pixels behind.
        let mut output = imageops::resize(&canonical, OUTPUT_SIZE, OUTPUT_SIZE, FilterType::CatmullRom);
        binarize_alpha(&mut output);

        Ok(NormalizeOutcome::Normalized(output))
    }
}

/// Pads the image with [`BORDER_PX`] of transparent white on every side.
fn extend_border(image: &RgbaImage) -> RgbaImage {
    let mut out = RgbaImage::from_pixel(
        image.width() + 2 * BORDER_PX,
        image.height() + 2 * BORDER_PX,
        BLANK,
    );
    imageops::replace(&mut out, image, BORDER_PX as i64, BORDER_PX as i64);
    out
}

/// Thresholds the composite into a binary ink silhouette.
///
/// Grayscale uses the standard luma weights; anything short of pure white
/// counts as ink (inverted threshold at 254), which isolates the silhouette
/// regardless of hue.
fn ink_silhouette(image: &RgbaImage) -> GrayImage {
    let mut out = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let gray = (0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32)
            .round() as u8;
        let value = if gray > 254 { 0 } else { 255 };
        out.put_pixel(x, y, Luma([value]));
    }
    out
}

/// Bounding box of the outer contour with the largest bounding-box area.
///
/// Ties keep the first contour in discovery order.
fn largest_outer_bounds(
    contours: &[imageproc::contours::Contour<i32>],
) -> Option<(i32, i32, i32, i32)> {
    let mut best: Option<(i64, (i32, i32, i32, i32))> = None;
    for contour in contours {
        if contour.border_type != BorderType::Outer {
            continue;
        }
        let Some(bounds) = contour_bounds(contour) else {
            continue;
        };
        let area = bounds.2 as i64 * bounds.3 as i64;
        if best.map_or(true, |(best_area, _)| area > best_area) {
            best = Some((area, bounds));
        }
    }
    best.map(|(_, bounds)| bounds)
}

/// Clamps signed contour bounds to the image, returning `(x, y, w, h)`.
fn clamp_bounds(bounds: (i32, i32, i32, i32), width: u32, height: u32) -> (u32, u32, u32, u32) {
    let x = bounds.0.clamp(0, width as i32 - 1) as u32;
    let y = bounds.1.clamp(0, height as i32 - 1) as u32;
    let w = (bounds.2.max(1) as u32).min(width - x);
    let h = (bounds.3.max(1) as u32).min(height - y);
    (x, y, w, h)
}

/// Pads the shorter dimension with transparent white so the result is
/// exactly square, splitting an odd deficit floor/ceil across the two
/// sides.
fn pad_to_square(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    if width == height {
        return image.clone();
    }

    let side = width.max(height);
    let mut out = RgbaImage::from_pixel(side, side, BLANK);
    if height < width {
        let top = (width - height) / 2;
        imageops::replace(&mut out, image, 0, top as i64);
    } else {
        let left = (height - width) / 2;
        imageops::replace(&mut out, image, left as i64, 0);
    }
    out
}

/// Forces the red channel of every non-pure ink tone to the canonical
/// value, leaving the 0/255 extremes untouched.
fn canonicalize_red(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        if pixel[0] > 0 && pixel[0] < 255 {
            pixel[0] = CANONICAL_RED;
        }
    }
    out
}

/// Snaps interpolated alpha back to fully transparent or fully opaque.
fn binarize_alpha(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        pixel[3] = if pixel[3] >= 128 { 255 } else { 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    const STAMP_RED: Rgb<u8> = Rgb([200, 30, 30]);

    fn crop_with_disk(width: u32, height: u32, radius: i32) -> RgbImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let cx = width as i32 / 2;
        let cy = height as i32 / 2;
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= radius * radius {
                    img.put_pixel(x as u32, y as u32, STAMP_RED);
                }
            }
        }
        img
    }

    #[test]
    fn test_normalized_output_is_250x250_with_binary_alpha() {
        let crop = crop_with_disk(300, 280, 100);
        let outcome = SealNormalizer::new().normalize(&crop).unwrap();
        assert!(!outcome.is_fallback());
        let img = outcome.image();
        assert_eq!(img.dimensions(), (OUTPUT_SIZE, OUTPUT_SIZE));
        assert!(img.pixels().all(|p| p[3] == 0 || p[3] == 255));
    }

    #[test]
    fn test_ink_canonicalized_to_red_254() {
        let crop = crop_with_disk(300, 300, 100);
        let outcome = SealNormalizer::new().normalize(&crop).unwrap();
        let img = outcome.image();
        let center = img.get_pixel(OUTPUT_SIZE / 2, OUTPUT_SIZE / 2);
        assert_eq!(center[0], CANONICAL_RED);
        assert_eq!(center[3], 255);
    }

    #[test]
    fn test_background_corners_transparent() {
        let crop = crop_with_disk(300, 300, 100);
        let outcome = SealNormalizer::new().normalize(&crop).unwrap();
        let img = outcome.image();
        assert_eq!(img.get_pixel(0, 0)[3], 0);
        assert_eq!(img.get_pixel(OUTPUT_SIZE - 1, OUTPUT_SIZE - 1)[3], 0);
    }

    #[test]
    fn test_pure_white_crop_falls_back() {
        let crop = RgbImage::from_pixel(120, 90, Rgb([255, 255, 255]));
        let outcome = SealNormalizer::new().normalize(&crop).unwrap();
        assert!(outcome.is_fallback());
        // The fallback keeps the crop's native size.
        assert_eq!(outcome.image().dimensions(), (120, 90));
    }

    #[test]
    fn test_degenerate_crop_is_an_error() {
        let crop = RgbImage::new(0, 0);
        assert!(matches!(
            SealNormalizer::new().normalize(&crop),
            Err(SealError::Normalization { .. })
        ));
    }

    #[test]
    fn test_wide_crop_uses_wide_processing_scale() {
        // A 700px-wide crop goes through the 650px scale; a 300px one
        // through 400px. Both still land on the fixed output size.
        for width in [700, 300] {
            let crop = crop_with_disk(width, 300, 90);
            let outcome = SealNormalizer::new().normalize(&crop).unwrap();
            assert_eq!(outcome.image().dimensions(), (OUTPUT_SIZE, OUTPUT_SIZE));
        }
    }

    #[test]
    fn test_pad_to_square_law() {
        // Odd deficit: 10 wide, 5 high. Pad splits 5 as 2 above, 3 below.
        let img = RgbaImage::from_pixel(10, 5, Rgba([254, 0, 0, 255]));
        let squared = pad_to_square(&img);
        assert_eq!(squared.dimensions(), (10, 10));
        assert_eq!(squared.get_pixel(0, 1)[3], 0);
        assert_eq!(squared.get_pixel(0, 2)[3], 255);
        assert_eq!(squared.get_pixel(0, 6)[3], 255);
        assert_eq!(squared.get_pixel(0, 7)[3], 0);

        // Taller than wide pads left/right instead.
        let img = RgbaImage::from_pixel(4, 9, Rgba([254, 0, 0, 255]));
        let squared = pad_to_square(&img);
        assert_eq!(squared.dimensions(), (9, 9));
        assert_eq!(squared.get_pixel(1, 0)[3], 0);
        assert_eq!(squared.get_pixel(2, 0)[3], 255);

        // Already square is untouched.
        let img = RgbaImage::from_pixel(7, 7, Rgba([254, 0, 0, 255]));
        assert_eq!(pad_to_square(&img).dimensions(), (7, 7));
    }

    #[test]
    fn test_canonicalize_leaves_extremes() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([0, 10, 10, 255]));
        img.put_pixel(1, 0, Rgba([120, 10, 10, 255]));
        img.put_pixel(2, 0, Rgba([255, 255, 255, 0]));
        let out = canonicalize_red(&img);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
        assert_eq!(out.get_pixel(1, 0)[0], CANONICAL_RED);
        assert_eq!(out.get_pixel(2, 0)[0], 255);
    }
}
