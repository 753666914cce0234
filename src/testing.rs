//! In-memory PDF backend for unit tests

use crate::error::{Error, Result};
use crate::geometry::{PageSize, Rect};
use crate::pdf::{PdfBackend, PdfDocument, RenderedPage};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct FakePage {
    size: PageSize,
    words: Vec<(Rect, String)>,
    corrupt: bool,
}

impl FakePage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: PageSize::new(width, height),
            words: Vec::new(),
            corrupt: false,
        }
    }

    /// Place a word at a PDF-space rectangle
    pub fn word(mut self, rect: Rect, text: &str) -> Self {
        self.words.push((rect, text.to_string()));
        self
    }

    /// Make rendering of this page fail
    pub fn corrupt(mut self) -> Self {
        self.corrupt = true;
        self
    }
}

pub struct FakeDocument {
    pages: Vec<FakePage>,
    handles: Option<Rc<Cell<usize>>>,
}

impl FakeDocument {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            handles: None,
        }
    }

    fn page(&self, index: u32) -> Result<&FakePage> {
        self.pages
            .get(index as usize)
            .ok_or(Error::PageOutOfBounds {
                page: index,
                total: self.pages.len() as u32,
            })
    }
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        if let Some(handles) = &self.handles {
            handles.set(handles.get() - 1);
        }
    }
}

impl PdfDocument for FakeDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_size(&self, page: u32) -> Result<PageSize> {
        Ok(self.page(page)?.size)
    }

    fn render_page(&self, page: u32, zoom: f32) -> Result<RenderedPage> {
        let fake = self.page(page)?;
        if fake.corrupt {
            return Err(Error::Render {
                page,
                reason: "corrupt content stream".into(),
            });
        }
        let (width, height) = fake.size.scaled_pixels(zoom);
        Ok(RenderedPage::blank(width, height))
    }

    fn extract_text(&self, page: u32, region: &Rect) -> Result<String> {
        let fake = self.page(page)?;
        let words: Vec<&str> = fake
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
        Ok(format!(" {} ", words.join(" ")))
    }
}

/// Backend serving documents registered by path
#[derive(Default)]
pub struct FakeBackend {
    documents: HashMap<PathBuf, Vec<FakePage>>,
    invalid: Vec<PathBuf>,
    handles: Rc<Cell<usize>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, path: &str, pages: Vec<FakePage>) -> Self {
        self.documents.insert(PathBuf::from(path), pages);
        self
    }

    /// A path that exists but is not a PDF
    pub fn with_invalid(mut self, path: &str) -> Self {
        self.invalid.push(PathBuf::from(path));
        self
    }

    /// Counter of currently open documents
    pub fn handles(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.handles)
    }
}

impl PdfBackend for FakeBackend {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>> {
        if self.invalid.iter().any(|p| p == path) {
            return Err(Error::InvalidPdf {
                reason: "Not a valid PDF file".into(),
            });
        }
        let pages = self
            .documents
            .get(path)
            .ok_or_else(|| Error::PdfNotFound {
                path: path.display().to_string(),
            })?;
        self.handles.set(self.handles.get() + 1);
        Ok(Box::new(FakeDocument {
            pages: pages.clone(),
            handles: Some(Rc::clone(&self.handles)),
        }))
    }
}

/// Page with two labelled fields used across tests:
/// "Invoice" at (10,10)-(60,30) and "1234" at (70,10)-(100,30)
pub fn invoice_page() -> FakePage {
    FakePage::new(612.0, 792.0)
        .word(Rect::new(10.0, 10.0, 60.0, 30.0), "Invoice")
        .word(Rect::new(70.0, 10.0, 100.0, 30.0), "1234")
}
