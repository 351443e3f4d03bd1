//! Color-space segmentation for red ink.
//!
//! Hue is computed on the OpenCV 8-bit scale (hue 0-179, saturation and
//! value 0-255), the scale the empirical thresholds below are expressed
//! in. Two distinct threshold sets exist on purpose:
//! the page-level mask separates ink from arbitrary page content, while the
//! crop-level windows separate ink from a near-white background. Both sets
//! are fixed constants, not tuning knobs.

use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

/// An inclusive HSV window on the 8-bit scale.
#[derive(Debug, Clone, Copy)]
pub struct HsvRange {
    /// Lower bound `(hue, saturation, value)`, inclusive.
    pub lo: (u8, u8, u8),
    /// Upper bound `(hue, saturation, value)`, inclusive.
    pub hi: (u8, u8, u8),
}

impl HsvRange {
    /// Creates a new inclusive window.
    pub const fn new(lo: (u8, u8, u8), hi: (u8, u8, u8)) -> Self {
        Self { lo, hi }
    }

    /// Whether the given HSV triple falls inside the window.
    pub fn contains(&self, hsv: (u8, u8, u8)) -> bool {
        hsv.0 >= self.lo.0
            && hsv.0 <= self.hi.0
            && hsv.1 >= self.lo.1
            && hsv.1 <= self.hi.1
            && hsv.2 >= self.lo.2
            && hsv.2 <= self.hi.2
    }
}

/// Low-hue half of the page-level red mask. Red wraps the hue origin, so a
/// single contiguous range cannot express it; the mask is the union of this
/// window and [`PAGE_RED_HIGH`].
pub const PAGE_RED_LOW: HsvRange = HsvRange::new((0, 80, 80), (10, 255, 255));
/// High-hue half of the page-level red mask.
pub const PAGE_RED_HIGH: HsvRange = HsvRange::new((160, 80, 80), (180, 255, 255));

/// Crop-level window capturing darker and impure reds and shadows at ink
/// edges.
pub const INK_WIDE: HsvRange = HsvRange::new((65, 22, 13), (180, 255, 255));
/// Crop-level window capturing the saturated core red.
pub const INK_CORE: HsvRange = HsvRange::new((0, 43, 46), (9, 255, 255));

/// Converts one RGB pixel to HSV on the OpenCV 8-bit scale.
///
/// Hue is halved into 0-179, saturation and value are 0-255.
pub fn rgb_to_hsv(pixel: Rgb<u8>) -> (u8, u8, u8) {
    let r = pixel[0] as f32;
    let g = pixel[1] as f32;
    let b = pixel[2] as f32;

    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = v - min;

    let s = if v == 0.0 { 0.0 } else { 255.0 * delta / v };

    let h = if delta == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / delta
    } else if v == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let h8 = ((h / 2.0).round() as i32).rem_euclid(180) as u8;
    (h8, s.round() as u8, v.round() as u8)
}

/// Builds the page-level binary red-ink mask.
///
/// A pixel is foreground (255) when its HSV value falls in either half of
/// the wrapped red hue range.
pub fn red_page_mask(image: &RgbImage) -> GrayImage {
    let mut mask = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let hsv = rgb_to_hsv(*pixel);
        let value = if PAGE_RED_LOW.contains(hsv) || PAGE_RED_HIGH.contains(hsv) {
            255
        } else {
            0
        };
        mask.put_pixel(x, y, Luma([value]));
    }
    mask
}

/// Re-segments an isolated crop, compositing ink pixels onto a transparent
/// white canvas.
///
/// A pixel matching either ink window keeps its source color with full
/// opacity; everything else becomes transparent white `(255, 255, 255, 0)`.
/// The two windows are disjoint in hue, so this single pass is the union of
/// the two masked composites.
pub fn ink_composite(image: &RgbImage) -> RgbaImage {
    let mut out = RgbaImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let hsv = rgb_to_hsv(*pixel);
        let rgba = if INK_WIDE.contains(hsv) || INK_CORE.contains(hsv) {
            Rgba([pixel[0], pixel[1], pixel[2], 255])
        } else {
            Rgba([255, 255, 255, 0])
        };
        out.put_pixel(x, y, rgba);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_primaries() {
        assert_eq!(rgb_to_hsv(Rgb([255, 0, 0])), (0, 255, 255));
        assert_eq!(rgb_to_hsv(Rgb([0, 255, 0])), (60, 255, 255));
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 255])), (120, 255, 255));
    }

    #[test]
    fn test_rgb_to_hsv_achromatic() {
        assert_eq!(rgb_to_hsv(Rgb([255, 255, 255])), (0, 0, 255));
        assert_eq!(rgb_to_hsv(Rgb([0, 0, 0])), (0, 0, 0));
        let (_, s, v) = rgb_to_hsv(Rgb([128, 128, 128]));
        assert_eq!(s, 0);
        assert_eq!(v, 128);
    }

    #[test]
    fn test_red_wraps_hue_origin() {
        // A slightly blue-shifted red lands in the high half of the range.
        let hsv = rgb_to_hsv(Rgb([200, 10, 40]));
        assert!(PAGE_RED_HIGH.contains(hsv) || PAGE_RED_LOW.contains(hsv));
    }

    #[test]
    fn test_page_mask_selects_stamp_red() {
        let mut img = RgbImage::from_pixel(4, 4, Rgb([255, 255, 255]));
        img.put_pixel(1, 1, Rgb([200, 30, 30]));
        img.put_pixel(2, 2, Rgb([30, 30, 200]));
        let mask = red_page_mask(&img);
        assert_eq!(mask.get_pixel(1, 1)[0], 255);
        assert_eq!(mask.get_pixel(2, 2)[0], 0);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_ink_composite_background_transparent_white() {
        let mut img = RgbImage::from_pixel(3, 1, Rgb([255, 255, 255]));
        img.put_pixel(1, 0, Rgb([200, 30, 30]));
        let out = ink_composite(&img);
        assert_eq!(out.get_pixel(0, 0), &Rgba([255, 255, 255, 0]));
        assert_eq!(out.get_pixel(1, 0), &Rgba([200, 30, 30, 255]));
    }
}
