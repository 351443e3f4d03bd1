//! # seal-detect
//!
//! A Rust library that extracts circular red ink-stamp ("seal")
//! impressions from scanned document pages and normalizes each into a
//! canonical square image suitable for visual comparison against reference
//! templates.
//!
//! ## Pipeline
//!
//! 1. **Rasterize**: render a document page to RGB at 300 DPI, fixing the
//!    pixel-to-millimeter calibration (210mm page width).
//! 2. **Localize**: segment red-hued regions in HSV, clean the mask with a
//!    fixed morphology chain, and size each blob by its minimum enclosing
//!    circle.
//! 3. **Crop**: cut a padded rectangle around each candidate.
//! 4. **Normalize**: re-segment the isolated ink, square-pad it, force the
//!    ink to one canonical red, and resize to 250x250 RGBA with a
//!    transparent background.
//!
//! ## Modules
//!
//! * [`core`] - Error types and pipeline configuration
//! * [`domain`] - Data model (pages, candidates, records)
//! * [`processors`] - Color segmentation, morphology, contour geometry
//! * [`pipeline`] - The staged pipeline and its orchestrator
//! * [`compare`] - Template store and the opaque comparison collaborator
//! * [`utils`] - Image I/O helpers and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seal_detect::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let rasterizer = PdfRasterizer::new(config.dpi, config.page_width_mm)?;
//! let document = rasterizer.open(Path::new("contract.pdf"))?;
//!
//! let pipeline = SealPipeline::new(config)?;
//! let records = pipeline.run(&document, Path::new("out"))?;
//! for record in &records {
//!     println!(
//!         "seal {} on page {}: {:.1}mm -> {}",
//!         record.id,
//!         record.page_index,
//!         record.diameter_mm,
//!         record.image_path.display()
//!     );
//! }
//! # Ok(())
//! # }
//! ```

pub mod compare;
pub mod core;
pub mod domain;
pub mod pipeline;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// Bring the essentials into scope with a single use statement:
///
/// ```rust
/// use seal_detect::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::{PipelineConfig, SealError, SealResult, SortOrder};
    pub use crate::domain::{CropRect, SealCandidate, SealRecord};
    pub use crate::pipeline::{
        ImagePageSource, PageSource, PdfRasterizer, SealNormalizer, SealPipeline,
    };
    pub use crate::utils::load_image;
}
