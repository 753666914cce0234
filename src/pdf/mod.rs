//! PDF processing layer
//!
//! The rest of the crate only talks to PDFs through [`PdfBackend`] and
//! [`PdfDocument`], so the library behind them can be swapped. PDFium is the
//! production implementation.

mod pdfium;

pub use pdfium::PdfiumBackend;

use crate::error::{Error, Result};
use crate::geometry::{PageSize, Rect};
use std::io::Read;
use std::path::Path;

/// Opens documents from disk
pub trait PdfBackend {
    /// Open the PDF at `path`. The returned document keeps the file open
    /// until it is dropped.
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>>;
}

/// An open PDF document. Page indices are zero-based.
pub trait PdfDocument {
    /// Number of pages
    fn page_count(&self) -> u32;

    /// Intrinsic page size in PDF points
    fn page_size(&self, page: u32) -> Result<PageSize>;

    /// Rasterize a page at `zoom`, producing an image of
    /// `page_size * zoom` pixels
    fn render_page(&self, page: u32, zoom: f32) -> Result<RenderedPage>;

    /// Text inside `region`, given in PDF space (top-left origin, points)
    fn extract_text(&self, page: u32, region: &Rect) -> Result<String>;
}

/// RGBA bitmap of a rendered page
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, 4 bytes per pixel
    pub rgba: Vec<u8>,
}

impl RenderedPage {
    /// Opaque white page of the given size
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgba: vec![0xFF; width as usize * height as usize * 4],
        }
    }
}

/// Check the `%PDF` magic at the start of a file
pub(crate) fn has_pdf_header(data: &[u8]) -> bool {
    data.len() >= 4 && &data[0..4] == b"%PDF"
}

/// Make sure `path` is a readable file starting with the PDF header
pub(crate) fn check_pdf_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::PdfNotFound {
            path: path.display().to_string(),
        });
    }

    let unreadable = |e: std::io::Error| Error::Unreadable {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    let mut header = Vec::with_capacity(4);
    std::fs::File::open(path)
        .map_err(unreadable)?
        .take(4)
        .read_to_end(&mut header)
        .map_err(unreadable)?;

    if !has_pdf_header(&header) {
        return Err(Error::InvalidPdf {
            reason: "Not a valid PDF file".to_string(),
        });
    }
    Ok(())
}
