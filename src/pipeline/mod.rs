//! The staged seal detection pipeline.
//!
//! Stages run in a fixed order per candidate: rasterize the page, locate
//! red blobs, crop each candidate, normalize the crop. The orchestrator
//! ties the stages together and owns id assignment and result ordering.

pub mod cropper;
pub mod localizer;
pub mod normalizer;
pub mod orchestrator;
pub mod rasterizer;

pub use cropper::crop;
pub use localizer::SealLocalizer;
pub use normalizer::{NormalizeOutcome, SealNormalizer, OUTPUT_SIZE};
pub use orchestrator::SealPipeline;
pub use rasterizer::{ImagePageSource, PageSource, PdfPageSource, PdfRasterizer};
