//! Configuration for the seal detection pipeline.
//!
//! All tunable parameters live in an explicit [`PipelineConfig`] passed into
//! the orchestrator, never in module-level state, so concurrent runs can use
//! different settings. Configuration files in TOML or JSON format are loaded
//! through [`ConfigLoader`].

use crate::core::errors::SealError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordering applied to the final result set of a detection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Best match first: ascending by `|diameter_mm - target_diameter_mm|`.
    #[default]
    BestMatch,
    /// Document order: ascending by `(page_index, center.y)`.
    DocumentOrder,
}

/// Configuration for a seal detection run.
///
/// The HSV thresholds, morphology kernel sizes and normalization constants
/// are fixed empirical values (see [`crate::processors`]) and are not
/// configurable; changing them changes detection behavior in ways that were
/// never validated against ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Rendering resolution for document pages, in dots per inch.
    pub dpi: f32,
    /// Physical page width used for pixel-to-millimeter calibration.
    pub page_width_mm: f32,
    /// Expected physical diameter of a genuine seal.
    pub target_diameter_mm: f32,
    /// Accepted deviation from the target diameter.
    pub tolerance_mm: f32,
    /// Blobs with an estimated diameter below this are treated as color
    /// noise and discarded before normalization.
    pub min_diameter_mm: f32,
    /// Process every page of the document; when false only the first page
    /// is scanned.
    pub scan_all_pages: bool,
    /// Drop candidates outside `target_diameter_mm ± tolerance_mm` from the
    /// result set.
    pub apply_size_filter: bool,
    /// Ordering of the returned records.
    pub sort_order: SortOrder,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dpi: 300.0,
            page_width_mm: 210.0,
            target_diameter_mm: 40.0,
            tolerance_mm: 1.0,
            min_diameter_mm: 5.0,
            scan_all_pages: true,
            apply_size_filter: false,
            sort_order: SortOrder::BestMatch,
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration, rejecting values that would make the
    /// pixel-to-millimeter calibration or size filtering meaningless.
    pub fn validate(&self) -> Result<(), SealError> {
        if !(self.dpi > 0.0) {
            return Err(SealError::config_error(format!(
                "dpi must be positive, got {}",
                self.dpi
            )));
        }
        if !(self.page_width_mm > 0.0) {
            return Err(SealError::config_error(format!(
                "page_width_mm must be positive, got {}",
                self.page_width_mm
            )));
        }
        if self.tolerance_mm < 0.0 {
            return Err(SealError::config_error(format!(
                "tolerance_mm must not be negative, got {}",
                self.tolerance_mm
            )));
        }
        if self.min_diameter_mm < 0.0 {
            return Err(SealError::config_error(format!(
                "min_diameter_mm must not be negative, got {}",
                self.min_diameter_mm
            )));
        }
        Ok(())
    }
}

/// Configuration file format.
#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Detects the format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Loader for pipeline configuration files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from a file, auto-detecting the format from the
    /// extension.
    pub fn load_from_file(path: &Path) -> Result<PipelineConfig, SealError> {
        let format = ConfigFormat::from_extension(path).ok_or_else(|| SealError::ConfigError {
            message: format!("Unsupported config file extension: {:?}", path.extension()),
        })?;

        let content = std::fs::read_to_string(path).map_err(|e| SealError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        Self::load_from_string(&content, format)
    }

    /// Loads configuration from a string with the specified format.
    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> Result<PipelineConfig, SealError> {
        let config = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| SealError::ConfigError {
                message: format!("Failed to parse TOML config: {e}"),
            })?,
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| SealError::ConfigError {
                    message: format!("Failed to parse JSON config: {e}"),
                })?
            }
        };
        Ok(config)
    }
}
