//! Page-level seal localization.
//!
//! Segments red-hued regions of a rasterized page, cleans the mask with the
//! fixed morphology chain, and reports each remaining blob's minimum
//! enclosing circle together with a padded crop rectangle. Touching stamps
//! whose ink merges under the closing step are reported as one blob with a
//! single combined circle; that is a documented limitation of the mask
//! approach, not a defect of the caller's input.

use crate::domain::{CropRect, RasterPage, SealCandidate};
use crate::processors::{
    cleanup_page_mask, contour_points, min_enclosing_circle, red_page_mask,
};
use imageproc::contours::{find_contours, BorderType};
use tracing::{debug, warn};

/// Fraction of the circle radius added as margin on every side of the crop
/// rectangle.
const CROP_MARGIN_RATIO: f32 = 0.2;

/// Finds candidate seal blobs on a rasterized page.
#[derive(Debug, Clone)]
pub struct SealLocalizer {
    min_diameter_mm: f32,
}

impl SealLocalizer {
    /// Creates a localizer with the given noise floor: blobs whose physical
    /// diameter falls below it are discarded as color noise.
    pub fn new(min_diameter_mm: f32) -> Self {
        Self { min_diameter_mm }
    }

    /// Locates candidate seals on the page, in discovery order.
    ///
    /// `next_id` is the run-wide candidate counter; it advances once per
    /// retained candidate so ids stay strictly increasing across pages.
    pub fn locate(&self, page: &RasterPage, next_id: &mut usize) -> Vec<SealCandidate> {
        let mask = cleanup_page_mask(&red_page_mask(&page.image));
        let contours = find_contours::<i32>(&mask);

        let mut candidates = Vec::new();
        for contour in &contours {
            // Holes inside a stamp are irrelevant to its outer silhouette.
            if contour.border_type != BorderType::Outer {
                continue;
            }

            let points = contour_points(contour);
            let Some(circle) = min_enclosing_circle(&points) else {
                continue;
            };

            let diameter_mm = 2.0 * circle.radius * page.mm_per_pixel;
            if diameter_mm < self.min_diameter_mm {
                debug!(
                    page_index = page.page_index,
                    diameter_mm, "discarding sub-threshold blob"
                );
                continue;
            }

            let Some(crop_rect) = padded_crop_rect(page, circle.center.x, circle.center.y, circle.radius)
            else {
                warn!(
                    page_index = page.page_index,
                    center_x = circle.center.x,
                    center_y = circle.center.y,
                    radius_px = circle.radius,
                    "discarding candidate with degenerate crop rectangle"
                );
                continue;
            };

            let id = *next_id;
            *next_id += 1;
            debug!(
                id,
                page_index = page.page_index,
                diameter_mm,
                "detected seal candidate"
            );
            candidates.push(SealCandidate {
                id,
                page_index: page.page_index,
                center: (circle.center.x, circle.center.y),
                radius_px: circle.radius,
                diameter_mm,
                crop_rect,
            });
        }
        candidates
    }
}

/// Expands the enclosing circle by the margin ratio and clamps the result
/// to the page bounds. Returns `None` when the clamped rectangle has zero
/// area.
fn padded_crop_rect(page: &RasterPage, cx: f32, cy: f32, radius: f32) -> Option<CropRect> {
    let margin = radius * CROP_MARGIN_RATIO;
    let x1 = ((cx - radius - margin) as i64).max(0);
    let y1 = ((cy - radius - margin) as i64).max(0);
    let x2 = ((cx + radius + margin) as i64).min(page.width() as i64);
    let y2 = ((cy + radius + margin) as i64).min(page.height() as i64);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(CropRect::new(
        x1 as u32,
        y1 as u32,
        (x2 - x1) as u32,
        (y2 - y1) as u32,
    ))
}
