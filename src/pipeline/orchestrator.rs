//! Pipeline orchestration.
//!
//! Drives localization, cropping and normalization across a document's
//! pages, assigns run-wide candidate ids, writes one PNG per candidate and
//! returns the ordered metadata records. Failures are isolated per
//! candidate: only a document-level read failure aborts the run.
//!
//! Output files are named `seal_{id}_processed.png`. The naming is not
//! run-scoped, so concurrent runs must write to distinct output
//! directories.

use crate::core::{PipelineConfig, SealError, SealResult, SortOrder};
use crate::domain::{SealCandidate, SealRecord};
use crate::pipeline::cropper;
use crate::pipeline::localizer::SealLocalizer;
use crate::pipeline::normalizer::SealNormalizer;
use crate::pipeline::rasterizer::PageSource;
use crate::utils::{load_image, save_png};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The configured seal detection pipeline.
///
/// Holds no mutable state between runs; the candidate id counter lives
/// inside each [`run`](SealPipeline::run) invocation.
#[derive(Debug, Clone)]
pub struct SealPipeline {
    config: PipelineConfig,
    localizer: SealLocalizer,
    normalizer: SealNormalizer,
}

impl SealPipeline {
    /// Creates a pipeline from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `SealError::ConfigError` when the configuration is invalid.
    pub fn new(config: PipelineConfig) -> SealResult<Self> {
        config.validate()?;
        let localizer = SealLocalizer::new(config.min_diameter_mm);
        Ok(Self {
            config,
            localizer,
            normalizer: SealNormalizer::new(),
        })
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Detects, normalizes and persists every seal in the document.
    ///
    /// Pages are processed sequentially; within a page, candidates are
    /// processed sequentially in discovery order. Each normalized seal is
    /// written to `output_dir/seal_{id}_processed.png` and described by one
    /// [`SealRecord`] in the returned, sorted result set.
    ///
    /// # Errors
    ///
    /// Returns `SealError::DocumentRead` when a page cannot be rendered and
    /// `SealError::Io` when the output directory cannot be created.
    /// Per-candidate failures are logged and skipped.
    pub fn run(&self, source: &dyn PageSource, output_dir: &Path) -> SealResult<Vec<SealRecord>> {
        std::fs::create_dir_all(output_dir)?;

        let page_count = source.page_count();
        let last_page = if self.config.scan_all_pages {
            page_count
        } else {
            page_count.min(1)
        };

        let mut next_id = 1;
        let mut records = Vec::new();
        for page_index in 1..=last_page {
            let page = source.rasterize(page_index)?;
            let candidates = self.localizer.locate(&page, &mut next_id);
            info!(
                page_index,
                candidates = candidates.len(),
                "scanned page for seals"
            );

            for candidate in &candidates {
                match self.process_candidate(&page, candidate, output_dir) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        warn!(id = candidate.id, error = %e, "skipping candidate");
                    }
                }
            }
        }

        if self.config.apply_size_filter {
            records.retain(|r| r.within_tolerance);
        }
        self.sort_records(&mut records);
        Ok(records)
    }

    /// Normalizes a single pre-cropped seal image from disk.
    ///
    /// The standalone re-processing entry point: reads `input`, runs the
    /// normalization sequence (including its fallback semantics) and writes
    /// the result to `output`.
    ///
    /// # Errors
    ///
    /// Returns `SealError::ImageLoad` when the input cannot be decoded,
    /// `SealError::Normalization` when the transform fails, and
    /// `SealError::ImageWrite` when the result cannot be written.
    pub fn normalize_file(&self, input: &Path, output: &Path) -> SealResult<PathBuf> {
        let crop = load_image(input)?;
        let outcome = self.normalizer.normalize(&crop)?;
        if outcome.is_fallback() {
            warn!(input = %input.display(), "no contour found, saving unprocessed crop");
        }
        save_png(outcome.image(), output)?;
        Ok(output.to_path_buf())
    }

    /// Crops, normalizes and persists one candidate.
    fn process_candidate(
        &self,
        page: &crate::domain::RasterPage,
        candidate: &SealCandidate,
        output_dir: &Path,
    ) -> SealResult<SealRecord> {
        let crop = cropper::crop(page, &candidate.crop_rect)?;
        let outcome = self
            .normalizer
            .normalize(&crop)
            .map_err(|e| match e {
                SealError::Normalization { context, source } => SealError::Normalization {
                    context: format!("candidate {}: {context}", candidate.id),
                    source,
                },
                other => other,
            })?;
        if outcome.is_fallback() {
            warn!(
                id = candidate.id,
                "no contour found during normalization, saving unprocessed crop"
            );
        }

        let image_path = output_dir.join(format!("seal_{}_processed.png", candidate.id));
        save_png(outcome.image(), &image_path)?;

        let deviation = (candidate.diameter_mm - self.config.target_diameter_mm).abs();
        Ok(SealRecord {
            id: candidate.id,
            page_index: candidate.page_index,
            diameter_mm: candidate.diameter_mm,
            crop_rect: candidate.crop_rect,
            center: candidate.center,
            image_path,
            within_tolerance: deviation <= self.config.tolerance_mm,
            fallback: outcome.is_fallback(),
        })
    }

    fn sort_records(&self, records: &mut [SealRecord]) {
        match self.config.sort_order {
            SortOrder::BestMatch => {
                let target = self.config.target_diameter_mm;
                records.sort_by(|a, b| {
                    let da = (a.diameter_mm - target).abs();
                    let db = (b.diameter_mm - target).abs();
                    da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
                });
            }
            SortOrder::DocumentOrder => {
                records.sort_by(|a, b| {
                    a.page_index.cmp(&b.page_index).then_with(|| {
                        a.center
                            .1
                            .partial_cmp(&b.center.1)
                            .unwrap_or(std::cmp::Ordering::Equal)
                    })
                });
            }
        }
    }
}
