//! PDFium implementation of the PDF capability traits

use super::{check_pdf_file, PdfBackend, PdfDocument, RenderedPage};
use crate::error::{Error, Result};
use crate::geometry::{PageSize, Rect};
use pdfium_render::prelude::*;
use std::path::Path;

/// Bind to the PDFium library.
///
/// Search order: executable directory, current directory, `/opt/pdfium/lib`,
/// then the system library path.
fn create_pdfium() -> Result<Pdfium> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()));

    if let Some(ref dir) = exe_dir {
        if let Ok(bindings) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
        {
            return Ok(Pdfium::new(bindings));
        }
    }

    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                "/opt/pdfium/lib",
            ))
        })
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| Error::Pdfium {
            reason: format!("Failed to initialize PDFium: {}", e),
        })?;

    Ok(Pdfium::new(bindings))
}

/// Map PDFium errors to our error type
fn map_pdfium_error(err: PdfiumError) -> Error {
    match err {
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
            Error::PasswordRequired
        }
        PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::FormatError) => {
            Error::InvalidPdf {
                reason: format!("{}", err),
            }
        }
        _ => Error::Pdfium {
            reason: format!("{}", err),
        },
    }
}

/// PDF backend using PDFium
pub struct PdfiumBackend {
    // Bound once per process and shared by every document
    pdfium: &'static Pdfium,
}

impl PdfiumBackend {
    /// Bind to the PDFium library. Fails when no library can be found.
    pub fn new() -> Result<Self> {
        let pdfium = Box::leak(Box::new(create_pdfium()?));
        Ok(Self { pdfium })
    }
}

impl PdfBackend for PdfiumBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>> {
        check_pdf_file(path)?;

        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(map_pdfium_error)?;

        tracing::debug!(path = %path.display(), pages = document.pages().len(), "opened PDF");
        Ok(Box::new(PdfiumDocument { document }))
    }
}

/// Document opened through PDFium. Dropping it closes the file.
struct PdfiumDocument {
    document: pdfium_render::prelude::PdfDocument<'static>,
}

impl PdfiumDocument {
    fn page(&self, index: u32) -> Result<PdfPage<'_>> {
        let total = self.page_count();
        if index >= total {
            return Err(Error::PageOutOfBounds { page: index, total });
        }
        self.document
            .pages()
            .get(index as u16)
            .map_err(|e| Error::Pdfium {
                reason: format!("Failed to get page {}: {}", index + 1, e),
            })
    }
}

impl PdfDocument for PdfiumDocument {
    fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }

    fn page_size(&self, page: u32) -> Result<PageSize> {
        let page = self.page(page)?;
        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn render_page(&self, index: u32, zoom: f32) -> Result<RenderedPage> {
        let page = self.page(index)?;

        let config = PdfRenderConfig::new()
            .scale_page_by_factor(zoom)
            .render_form_data(true)
            .render_annotations(true);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| Error::Render {
                page: index,
                reason: e.to_string(),
            })?;

        let image = bitmap.as_image().to_rgba8();
        Ok(RenderedPage {
            width: image.width(),
            height: image.height(),
            rgba: image.into_raw(),
        })
    }

    fn extract_text(&self, index: u32, region: &Rect) -> Result<String> {
        let page = self.page(index)?;
        let page_height = page.height().value;

        let text = page.text().map_err(|e| Error::Pdfium {
            reason: format!("Failed to get text of page {}: {}", index + 1, e),
        })?;

        // PDFium measures y from the bottom edge
        let bounds = PdfRect::new_from_values(
            page_height - region.bottom, // bottom
            region.left,                 // left
            page_height - region.top,    // top
            region.right,                // right
        );

        Ok(text.inside_rect(bounds))
    }
}
