//! Page rasterization.
//!
//! [`PageSource`] is the seam between the detection pipeline and whatever
//! paginated document format feeds it. The production implementation renders
//! PDF pages through pdfium at a fixed physical resolution; an in-memory
//! source backs direct image input and tests.

use crate::core::{SealError, SealResult};
use crate::domain::RasterPage;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::debug;

/// PDF pages use a 72 units-per-inch coordinate space.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// A paginated document that can render its pages to RGB rasters.
///
/// Page indices are 1-based throughout the pipeline.
pub trait PageSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Renders the requested page.
    ///
    /// # Errors
    ///
    /// Returns `SealError::DocumentRead` when the page index is out of
    /// range or the page cannot be rendered.
    fn rasterize(&self, page_index: usize) -> SealResult<RasterPage>;
}

/// Renders PDF pages through the pdfium library.
///
/// Owns the pdfium binding; one rasterizer can open any number of
/// documents sequentially.
pub struct PdfRasterizer {
    pdfium: Pdfium,
    dpi: f32,
    page_width_mm: f32,
}

impl PdfRasterizer {
    /// Binds the system pdfium library.
    ///
    /// # Errors
    ///
    /// Returns `SealError::ConfigError` when no pdfium library can be
    /// bound.
    pub fn new(dpi: f32, page_width_mm: f32) -> SealResult<Self> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| SealError::config_error(format!("failed to bind pdfium library: {e}")))?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
            dpi,
            page_width_mm,
        })
    }

    /// Opens a PDF document as a [`PageSource`].
    ///
    /// # Errors
    ///
    /// Returns `SealError::DocumentRead` when the file cannot be parsed as
    /// a PDF.
    pub fn open<'a>(&'a self, path: &Path) -> SealResult<PdfPageSource<'a>> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| SealError::document_read(path.display().to_string(), e))?;
        Ok(PdfPageSource {
            document,
            dpi: self.dpi,
            page_width_mm: self.page_width_mm,
        })
    }
}

/// An open PDF document rendering pages at a fixed DPI.
pub struct PdfPageSource<'a> {
    document: PdfDocument<'a>,
    dpi: f32,
    page_width_mm: f32,
}

impl PageSource for PdfPageSource<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn rasterize(&self, page_index: usize) -> SealResult<RasterPage> {
        let count = self.page_count();
        if page_index == 0 || page_index > count {
            return Err(SealError::document_read_msg(format!(
                "page {page_index} out of range (document has {count} pages)"
            )));
        }

        let pages = self.document.pages();
        let page = pages
            .get((page_index - 1) as u16)
            .map_err(|e| SealError::document_read(format!("page {page_index}"), e))?;

        // Scale from the native 72-unit space up to the target DPI.
        let scale = self.dpi / PDF_POINTS_PER_INCH;
        let pixel_width = (page.width().value * scale) as i32;
        let pixel_height = (page.height().value * scale) as i32;

        let bitmap = page
            .render_with_config(
                &PdfRenderConfig::new()
                    .set_target_width(pixel_width)
                    .set_target_height(pixel_height)
                    .render_form_data(true)
                    .render_annotations(true),
            )
            .map_err(|e| SealError::document_read(format!("render page {page_index}"), e))?;

        let image = bitmap.as_image().to_rgb8();
        debug!(
            page_index,
            width = image.width(),
            height = image.height(),
            dpi = self.dpi,
            "rasterized page"
        );
        Ok(RasterPage::new(image, page_index, self.page_width_mm))
    }
}

/// A [`PageSource`] over pre-loaded RGB images.
///
/// Used for direct image input and as the test seam; each image is treated
/// as one already-rasterized page.
pub struct ImagePageSource {
    pages: Vec<RgbImage>,
    page_width_mm: f32,
}

impl ImagePageSource {
    /// Wraps the given images as document pages, in order.
    pub fn new(pages: Vec<RgbImage>, page_width_mm: f32) -> Self {
        Self {
            pages,
            page_width_mm,
        }
    }
}

impl PageSource for ImagePageSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn rasterize(&self, page_index: usize) -> SealResult<RasterPage> {
        let image = self
            .pages
            .get(page_index.wrapping_sub(1))
            .ok_or_else(|| {
                SealError::document_read_msg(format!(
                    "page {page_index} out of range (source has {} pages)",
                    self.pages.len()
                ))
            })?
            .clone();
        Ok(RasterPage::new(image, page_index, self.page_width_mm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_image_source_pages() {
        let source = ImagePageSource::new(
            vec![RgbImage::from_pixel(100, 50, Rgb([255, 255, 255])); 2],
            210.0,
        );
        assert_eq!(source.page_count(), 2);

        let page = source.rasterize(2).unwrap();
        assert_eq!(page.page_index, 2);
        assert!((page.mm_per_pixel - 2.1).abs() < 1e-6);
    }

    #[test]
    fn test_image_source_out_of_range() {
        let source = ImagePageSource::new(vec![RgbImage::new(10, 10)], 210.0);
        assert!(matches!(
            source.rasterize(0),
            Err(SealError::DocumentRead { .. })
        ));
        assert!(matches!(
            source.rasterize(2),
            Err(SealError::DocumentRead { .. })
        ));
    }
}
