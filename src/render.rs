//! Page rendering for display

use crate::error::{Error, Result};
use crate::geometry::PageSize;
use crate::pdf::{PdfDocument, RenderedPage};

/// Page size assumed when a broken page does not even report its size
const FALLBACK_PAGE_SIZE: PageSize = PageSize {
    width: 612.0,
    height: 792.0,
};

/// A page ready for display. `error` is set when rendering failed and
/// `image` is a blank placeholder.
#[derive(Debug)]
pub struct PageView {
    pub image: RenderedPage,
    pub error: Option<Error>,
}

/// Rasterizes pages at a zoom factor. Nothing is cached.
#[derive(Debug, Clone, Copy)]
pub struct PageRenderer {
    max_pixels: u64,
}

impl PageRenderer {
    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    /// Render `page` of `document` at `zoom`
    pub fn render(
        &self,
        document: &dyn PdfDocument,
        page: u32,
        zoom: f32,
    ) -> Result<RenderedPage> {
        let size = document.page_size(page)?;
        let (width, height) = size.scaled_pixels(zoom);
        let area = width as u64 * height as u64;
        if area > self.max_pixels {
            return Err(Error::Render {
                page,
                reason: format!(
                    "{}x{} pixels exceeds the limit of {} pixels",
                    width, height, self.max_pixels
                ),
            });
        }

        document.render_page(page, zoom)
    }

    /// Render a page, falling back to a blank page of the expected size when
    /// rendering fails
    pub fn render_or_blank(&self, document: &dyn PdfDocument, page: u32, zoom: f32) -> PageView {
        match self.render(document, page, zoom) {
            Ok(image) => PageView { image, error: None },
            Err(e) => {
                tracing::warn!(page, zoom, error = %e, "page render failed, showing blank page");
                let size = document.page_size(page).unwrap_or(FALLBACK_PAGE_SIZE);
                let (width, height) = size.scaled_pixels(zoom);
                let (width, height) = if width as u64 * height as u64 > self.max_pixels {
                    FALLBACK_PAGE_SIZE.scaled_pixels(1.0)
                } else {
                    (width, height)
                };
                PageView {
                    image: RenderedPage::blank(width, height),
                    error: Some(e),
                }
            }
        }
    }
}
