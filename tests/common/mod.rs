//! Shared helpers for integration tests

#![allow(dead_code)]

use pdf_region_extractor::{Error, PageSize, PdfBackend, PdfDocument, Rect, RenderedPage, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

/// A page of a US Letter document with words at fixed PDF-space boxes
#[derive(Debug, Clone, Default)]
pub struct Page {
    words: Vec<(Rect, String)>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(mut self, left: f32, top: f32, right: f32, bottom: f32, text: &str) -> Self {
        self.words
            .push((Rect::new(left, top, right, bottom), text.to_string()));
        self
    }
}

struct Document {
    pages: Vec<Page>,
}

impl PdfDocument for Document {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_size(&self, page: u32) -> Result<PageSize> {
        self.pages
            .get(page as usize)
            .map(|_| PageSize::new(612.0, 792.0))
            .ok_or(Error::PageOutOfBounds {
                page,
                total: self.page_count(),
            })
    }

    fn render_page(&self, page: u32, zoom: f32) -> Result<RenderedPage> {
        let (width, height) = self.page_size(page)?.scaled_pixels(zoom);
        Ok(RenderedPage::blank(width, height))
    }

    fn extract_text(&self, page: u32, region: &Rect) -> Result<String> {
        self.page_size(page)?;
        let words: Vec<&str> = self.pages[page as usize]
            .words
            .iter()
            .filter(|(r, _)| {
                r.left >= region.left
                    && r.right <= region.right
                    && r.top >= region.top
                    && r.bottom <= region.bottom
            })
            .map(|(_, text)| text.as_str())
            .collect();
        Ok(words.join(" "))
    }
}

/// In-memory backend keyed by path
#[derive(Default)]
pub struct MemoryBackend {
    documents: HashMap<PathBuf, Vec<Page>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, pages: Vec<Page>) -> Self {
        self.documents.insert(PathBuf::from(path), pages);
        self
    }
}

impl PdfBackend for MemoryBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>> {
        let pages = self.documents.get(path).ok_or_else(|| Error::PdfNotFound {
            path: path.display().to_string(),
        })?;
        Ok(Box::new(Document {
            pages: pages.clone(),
        }))
    }
}
