//! Pixel-level building blocks: color segmentation, morphology, and
//! contour geometry.
//!
//! The HSV thresholds and kernel sizes in these modules are fixed
//! empirical constants; they are not exposed for tuning because changing
//! them changes detection behavior that was never validated otherwise.

pub mod color;
pub mod geometry;
pub mod morphology;

pub use color::{ink_composite, red_page_mask, rgb_to_hsv, HsvRange};
pub use geometry::{contour_bounds, contour_points, min_enclosing_circle, Circle, Point};
pub use morphology::{cleanup_page_mask, merge_ink_strokes};
