//! Region text extraction

use crate::error::Result;
use crate::geometry::Rect;
use crate::pdf::PdfDocument;

/// Text found inside a selection
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// The region in PDF space
    pub pdf_rect: Rect,
    /// Extracted text with surrounding whitespace trimmed
    pub text: String,
}

impl Extraction {
    /// No selectable text in the region. The page is probably a scanned
    /// image and would need OCR.
    pub fn needs_ocr(&self) -> bool {
        self.text.is_empty()
    }
}

/// Extract the text under a display-space rectangle drawn at `zoom`
pub fn extract_display_region(
    document: &dyn PdfDocument,
    page: u32,
    display_rect: &Rect,
    zoom: f32,
) -> Result<Extraction> {
    let pdf_rect = display_rect.normalized().to_pdf_space(zoom);
    extract_pdf_region(document, page, &pdf_rect)
}

/// Extract the text inside a PDF-space rectangle
pub fn extract_pdf_region(
    document: &dyn PdfDocument,
    page: u32,
    pdf_rect: &Rect,
) -> Result<Extraction> {
    let pdf_rect = pdf_rect.normalized();
    let text = document.extract_text(page, &pdf_rect)?.trim().to_string();
    if text.is_empty() {
        tracing::debug!(page, rect = %pdf_rect, "no selectable text in region");
    }
    Ok(Extraction { pdf_rect, text })
}
