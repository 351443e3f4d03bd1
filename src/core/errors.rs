//! Error types for the seal detection pipeline.
//!
//! Failures are isolated to the candidate that caused them: only a
//! document-level read failure is fatal to a run. A missing contour during
//! normalization is not represented here at all, because it is a fallback
//! outcome rather than an error (see [`crate::pipeline::NormalizeOutcome`]).

use thiserror::Error;

/// Errors that can occur while detecting and normalizing seals.
#[derive(Error, Debug)]
pub enum SealError {
    /// The document could not be decoded or the requested page does not exist.
    ///
    /// This is the only error that aborts a whole detection run.
    #[error("document read failed: {context}")]
    DocumentRead {
        /// Description of what was being read.
        context: String,
        /// The underlying decode or render error, when one exists; an
        /// out-of-range page index has no source.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A crop rectangle resolved to zero pixels.
    ///
    /// The localizer already discards degenerate rectangles, so hitting this
    /// in the cropper indicates a caller-supplied rectangle outside the page.
    #[error("empty crop: {width}x{height} region at ({x}, {y})")]
    EmptyCrop {
        /// Left edge of the requested region in page pixels.
        x: u32,
        /// Top edge of the requested region in page pixels.
        y: u32,
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Normalization of one candidate failed mid-transform.
    ///
    /// The orchestrator logs this with the candidate id and continues with
    /// the remaining candidates.
    #[error("normalization failed: {context}")]
    Normalization {
        /// Description of the failing step.
        context: String,
        /// The underlying error, when one exists.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error occurred while loading an image from disk.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred while encoding or writing an image.
    #[error("image write: {path}")]
    ImageWrite {
        /// Destination path of the failed write.
        path: String,
        /// The underlying encode error.
        #[source]
        source: image::ImageError,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

impl SealError {
    /// Creates a `DocumentRead` error with an underlying cause.
    pub fn document_read(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SealError::DocumentRead {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a `DocumentRead` error with no underlying cause, such as a
    /// page index outside the document.
    pub fn document_read_msg(context: impl Into<String>) -> Self {
        SealError::DocumentRead {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a `Normalization` error with an underlying cause.
    pub fn normalization(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        SealError::Normalization {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a `Normalization` error with no underlying cause.
    pub fn normalization_msg(context: impl Into<String>) -> Self {
        SealError::Normalization {
            context: context.into(),
            source: None,
        }
    }

    /// Creates a `ConfigError` with the given message.
    pub fn config_error(message: impl Into<String>) -> Self {
        SealError::ConfigError {
            message: message.into(),
        }
    }
}

/// Convenient result type used throughout the crate.
pub type SealResult<T> = Result<T, SealError>;
