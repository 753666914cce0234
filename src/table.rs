//! Table of selections and their extracted text

use crate::extract::Extraction;
use crate::geometry::Rect;
use crate::workspace::DocumentId;
use std::fmt;
use uuid::Uuid;

/// Identity of a row in the selection table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(Uuid);

impl RecordId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One selection on one page of one document
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRecord {
    pub id: RecordId,
    pub document: DocumentId,
    /// File name of the document
    pub document_name: String,
    /// Zero-based page index
    pub page: u32,
    /// Rectangle as drawn, in display space
    pub display_rect: Rect,
    /// Rectangle in PDF space
    pub pdf_rect: Rect,
    pub text: String,
}

impl SelectionRecord {
    /// New record with a fresh id
    pub fn new(
        document: DocumentId,
        document_name: impl Into<String>,
        page: u32,
        display_rect: Rect,
        extraction: Extraction,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            document,
            document_name: document_name.into(),
            page,
            display_rect,
            pdf_rect: extraction.pdf_rect,
            text: extraction.text,
        }
    }
}

/// Selection records in insertion order. No deduplication.
#[derive(Debug, Default)]
pub struct SelectionTable {
    records: Vec<SelectionRecord>,
}

impl SelectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its id
    pub fn push(&mut self, record: SelectionRecord) -> RecordId {
        let id = record.id;
        self.records.push(record);
        id
    }

    /// Remove the record with `id`, keeping the order of the others
    pub fn remove(&mut self, id: RecordId) -> Option<SelectionRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index))
    }

    /// Remove every record of `document`, returning how many were removed
    pub fn remove_document(&mut self, document: DocumentId) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.document != document);
        before - self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn get(&self, id: RecordId) -> Option<&SelectionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn records(&self) -> &[SelectionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionRecord> {
        self.records.iter()
    }

    /// Records of one document, in table order
    pub fn for_document(&self, document: DocumentId) -> impl Iterator<Item = &SelectionRecord> {
        self.records.iter().filter(move |r| r.document == document)
    }

    /// Records drawn on one page of one document
    pub fn on_page(
        &self,
        document: DocumentId,
        page: u32,
    ) -> impl Iterator<Item = &SelectionRecord> {
        self.for_document(document).filter(move |r| r.page == page)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
