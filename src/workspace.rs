//! The set of loaded documents

use crate::error::{Error, Result};
use crate::pdf::{PdfBackend, PdfDocument};
use crate::source::{self, ScanOptions};
use std::fmt;
use std::path::{Path, PathBuf};

/// Identity of a loaded document, unique for the lifetime of a workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An open document together with where it came from
pub struct LoadedDocument {
    id: DocumentId,
    path: PathBuf,
    name: String,
    document: Box<dyn PdfDocument>,
}

impl LoadedDocument {
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown in lists and exports
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_count(&self) -> u32 {
        self.document.page_count()
    }

    pub fn document(&self) -> &dyn PdfDocument {
        self.document.as_ref()
    }
}

impl fmt::Debug for LoadedDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedDocument")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("pages", &self.page_count())
            .finish()
    }
}

/// Outcome of loading several paths at once
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Newly opened documents, in load order
    pub loaded: Vec<DocumentId>,
    /// Paths that were not PDFs or were already loaded
    pub skipped: Vec<PathBuf>,
    /// Paths that failed to open
    pub failed: Vec<(PathBuf, Error)>,
}

/// Documents currently open, in load order
pub struct Workspace {
    backend: Box<dyn PdfBackend>,
    documents: Vec<LoadedDocument>,
    next_id: u64,
}

impl Workspace {
    pub fn new(backend: Box<dyn PdfBackend>) -> Self {
        Self {
            backend,
            documents: Vec::new(),
            next_id: 1,
        }
    }

    /// Open the PDF at `path`. A path that is already loaded is not opened
    /// again; its existing id is returned.
    pub fn load(&mut self, path: &Path) -> Result<DocumentId> {
        if let Some(existing) = self.find_by_path(path) {
            tracing::debug!(path = %path.display(), "already loaded");
            return Ok(existing.id);
        }

        let document = self.backend.open(path)?;
        let id = DocumentId(self.next_id);
        self.next_id += 1;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        tracing::info!(%id, path = %path.display(), pages = document.page_count(), "loaded PDF");
        self.documents.push(LoadedDocument {
            id,
            path: path.to_path_buf(),
            name,
            document,
        });
        Ok(id)
    }

    /// Load every PDF among `paths` (e.g. a drag-and-drop). Non-PDF paths are
    /// skipped and failures are collected rather than aborting the batch.
    pub fn load_all<I>(&mut self, paths: I) -> LoadReport
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut report = LoadReport::default();
        for path in paths {
            if !source::is_pdf_path(&path) || self.find_by_path(&path).is_some() {
                report.skipped.push(path);
                continue;
            }
            match self.load(&path) {
                Ok(id) => report.loaded.push(id),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to load PDF");
                    report.failed.push((path, e));
                }
            }
        }
        report
    }

    /// Load all PDFs in a folder
    pub fn load_folder(&mut self, dir: &Path, options: &ScanOptions) -> Result<LoadReport> {
        let files = source::list_pdfs(dir, options)?;
        tracing::info!(dir = %dir.display(), count = files.len(), "opening folder");
        Ok(self.load_all(files))
    }

    /// Close a document. The returned value owns the open file; dropping it
    /// releases the handle.
    pub fn unload(&mut self, id: DocumentId) -> Result<LoadedDocument> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or(Error::UnknownDocument { id: id.0 })?;
        let document = self.documents.remove(index);
        tracing::info!(%id, path = %document.path.display(), "unloaded PDF");
        Ok(document)
    }

    pub fn get(&self, id: DocumentId) -> Result<&LoadedDocument> {
        self.documents
            .iter()
            .find(|d| d.id == id)
            .ok_or(Error::UnknownDocument { id: id.0 })
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&LoadedDocument> {
        self.documents.iter().find(|d| d.path == path)
    }

    pub fn documents(&self) -> &[LoadedDocument] {
        &self.documents
    }

    /// Position of a document in load order
    pub fn index_of(&self, id: DocumentId) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
