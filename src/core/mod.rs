//! Core error and configuration types shared across the pipeline.

pub mod config;
pub mod errors;

pub use config::{ConfigFormat, ConfigLoader, PipelineConfig, SortOrder};
pub use errors::{SealError, SealResult};
