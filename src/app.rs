//! Application state and the user actions that change it
//!
//! Everything the window shows is derived from [`AppState`]; the GUI layer
//! only forwards input events and draws. Failures of an action are logged
//! and queued as [`Notice`]s instead of being returned, so a bad file or an
//! unwritable destination never takes the application down.

use crate::config::AppConfig;
use crate::error::{Error, ErrorKind};
use crate::export::{self, ExportSummary};
use crate::extract::extract_display_region;
use crate::geometry::{Point, Rect};
use crate::pdf::PdfBackend;
use crate::render::{PageRenderer, PageView};
use crate::selection::SelectionTracker;
use crate::source::ScanOptions;
use crate::sync::{self, SyncReport};
use crate::table::{RecordId, SelectionRecord, SelectionTable};
use crate::workspace::{DocumentId, LoadReport, LoadedDocument, Workspace};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn title(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Notice",
        }
    }
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

/// Which page of which document is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub document: DocumentId,
    pub page: u32,
    /// Zoom in hundredths, so the key is hashable
    pub zoom_percent: u32,
}

pub struct AppState {
    config: AppConfig,
    workspace: Workspace,
    table: SelectionTable,
    tracker: SelectionTracker,
    renderer: PageRenderer,
    current: Option<DocumentId>,
    page: u32,
    zoom: f32,
    notices: Vec<Notice>,
}

impl AppState {
    pub fn new(backend: Box<dyn PdfBackend>, config: AppConfig) -> Self {
        let zoom = config.clamp_zoom(config.initial_zoom);
        Self {
            renderer: PageRenderer::new(config.max_render_pixels),
            workspace: Workspace::new(backend),
            table: SelectionTable::new(),
            tracker: SelectionTracker::new(),
            current: None,
            page: 0,
            zoom,
            notices: Vec::new(),
            config,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn table(&self) -> &SelectionTable {
        &self.table
    }

    pub fn current_document(&self) -> Option<&LoadedDocument> {
        self.current.and_then(|id| self.workspace.get(id).ok())
    }

    /// Zero-based index of the page on screen
    pub fn current_page(&self) -> u32 {
        self.page
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn page_key(&self) -> Option<PageKey> {
        self.current.map(|document| PageKey {
            document,
            page: self.page,
            zoom_percent: (self.zoom * 100.0).round() as u32,
        })
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Remove and return pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, severity: Severity, message: impl Into<String>) {
        self.notices.push(Notice {
            severity,
            message: message.into(),
        });
    }

    fn report(&mut self, action: &str, err: Error) {
        tracing::warn!(action, error = %err, "action failed");
        let severity = match err.kind() {
            ErrorKind::Render => Severity::Warning,
            _ => Severity::Error,
        };
        self.notify(severity, err.user_message());
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Load dropped files. Non-PDF paths are ignored.
    pub fn open_paths(&mut self, paths: Vec<PathBuf>) -> LoadReport {
        let report = self.workspace.load_all(paths);
        self.after_load(&report);
        report
    }

    /// Load every PDF in `dir`
    pub fn open_folder(&mut self, dir: &Path) -> Option<LoadReport> {
        let options = ScanOptions {
            recursive: self.config.recursive_folder_scan,
            pattern: self.config.folder_pattern.clone(),
        };
        match self.workspace.load_folder(dir, &options) {
            Ok(report) => {
                if report.loaded.is_empty() && report.failed.is_empty() && report.skipped.is_empty() {
                    self.notify(
                        Severity::Info,
                        format!("No PDF files found in {}", dir.display()),
                    );
                }
                self.after_load(&report);
                Some(report)
            }
            Err(e) => {
                self.report("open_folder", e);
                None
            }
        }
    }

    fn after_load(&mut self, report: &LoadReport) {
        for (path, err) in &report.failed {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            self.notify(
                Severity::Error,
                format!("{}: {}", name, err.user_message()),
            );
        }
        if self.current.is_none() {
            if let Some(&first) = report.loaded.first() {
                self.show_document(first);
            }
        }
    }

    /// Switch the view to a loaded document, starting at its first page
    pub fn select_document(&mut self, id: DocumentId) {
        match self.workspace.get(id) {
            Ok(_) => self.show_document(id),
            Err(e) => self.report("select_document", e),
        }
    }

    fn show_document(&mut self, id: DocumentId) {
        self.current = Some(id);
        self.page = 0;
        self.tracker.cancel();
    }

    /// Close a document, dropping its selections
    pub fn unload_document(&mut self, id: DocumentId) {
        let index = self.workspace.index_of(id).unwrap_or(0);
        let document = match self.workspace.unload(id) {
            Ok(document) => document,
            Err(e) => {
                self.report("unload_document", e);
                return;
            }
        };
        let removed = self.table.remove_document(id);
        tracing::debug!(removed, name = document.name(), "dropped selections of unloaded document");
        drop(document);

        if self.current == Some(id) {
            let documents = self.workspace.documents();
            let next = documents
                .get(index)
                .or_else(|| documents.last())
                .map(|d| d.id());
            match next {
                Some(next) => self.show_document(next),
                None => {
                    self.current = None;
                    self.page = 0;
                    self.tracker.cancel();
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Navigation and rendering
    // ------------------------------------------------------------------

    pub fn page_count(&self) -> u32 {
        self.current_document()
            .map(|d| d.page_count())
            .unwrap_or(0)
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.tracker.cancel();
        }
    }

    pub fn prev_page(&mut self) {
        if self.current.is_some() && self.page > 0 {
            self.page -= 1;
            self.tracker.cancel();
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        let zoom = self.config.clamp_zoom(zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.tracker.cancel();
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.config.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.config.zoom_step);
    }

    /// Render the page on screen. A page that fails to render comes back
    /// blank and a warning is queued.
    pub fn render_current(&mut self) -> Option<PageView> {
        let document = self.current_document()?;
        let view = self
            .renderer
            .render_or_blank(document.document(), self.page, self.zoom);
        if let Some(err) = &view.error {
            let message = err.user_message();
            self.notify(Severity::Warning, message);
        }
        Some(view)
    }

    /// Display size of the page on screen
    pub fn page_display_size(&self) -> Option<(f32, f32)> {
        let document = self.current_document()?;
        let size = document.document().page_size(self.page).ok()?;
        Some((size.width * self.zoom, size.height * self.zoom))
    }

    // ------------------------------------------------------------------
    // Selections
    // ------------------------------------------------------------------

    pub fn pointer_down(&mut self, pos: Point) {
        if let Some((width, height)) = self.page_display_size() {
            self.tracker.pointer_down(pos, width, height);
        }
    }

    pub fn pointer_move(&mut self, pos: Point) {
        self.tracker.pointer_move(pos);
    }

    /// Finish a drag. A non-degenerate rectangle becomes a new record with
    /// the text under it.
    pub fn pointer_up(&mut self, pos: Point) -> Option<RecordId> {
        let rect = self.tracker.pointer_up(pos)?;
        let document = self.current_document()?;

        match extract_display_region(document.document(), self.page, &rect, self.zoom) {
            Ok(extraction) => {
                let needs_ocr = extraction.needs_ocr();
                let record = SelectionRecord::new(
                    document.id(),
                    document.name(),
                    self.page,
                    rect,
                    extraction,
                );
                if needs_ocr {
                    tracing::info!(page = self.page, "no text under selection, page may need OCR");
                }
                tracing::debug!(
                    document = %record.document,
                    page = record.page,
                    rect = %record.pdf_rect,
                    chars = record.text.len(),
                    "new selection"
                );
                Some(self.table.push(record))
            }
            Err(e) => {
                self.report("extract", e);
                None
            }
        }
    }

    /// Rectangle being dragged, in display space
    pub fn in_progress_rect(&self) -> Option<Rect> {
        self.tracker.in_progress()
    }

    /// Selections on the page on screen, in display space at the current zoom
    pub fn current_overlays(&self) -> Vec<Rect> {
        let Some(id) = self.current else {
            return Vec::new();
        };
        self.table
            .on_page(id, self.page)
            .map(|r| r.pdf_rect.to_display_space(self.zoom))
            .collect()
    }

    pub fn delete_record(&mut self, id: RecordId) -> bool {
        self.table.remove(id).is_some()
    }

    pub fn clear_all(&mut self) {
        tracing::info!(count = self.table.len(), "clearing all selections");
        self.table.clear();
        self.tracker.cancel();
    }

    /// Copy the current document's selections to every other document
    pub fn sync_to_all(&mut self) -> Option<SyncReport> {
        let source = self.current?;
        if self.table.for_document(source).next().is_none() {
            self.notify(Severity::Info, "The current PDF has no selections to sync");
            return None;
        }

        match sync::sync_to_all(
            &self.workspace,
            &mut self.table,
            source,
            self.config.sync_policy,
        ) {
            Ok(report) => {
                if report.targets == 0 {
                    self.notify(Severity::Info, "Load more PDFs to sync selections to");
                } else if report.skipped > 0 {
                    self.notify(
                        Severity::Info,
                        format!(
                            "Copied {} selections to {} PDFs ({} skipped: page missing or unreadable)",
                            report.added, report.targets, report.skipped
                        ),
                    );
                }
                Some(report)
            }
            Err(e) => {
                self.report("sync", e);
                None
            }
        }
    }

    /// Write the selection table to `path`
    pub fn export(&mut self, path: &Path) -> Option<ExportSummary> {
        match export::export(self.table.records(), path, self.config.export_layout) {
            Ok(summary) => {
                self.notify(
                    Severity::Info,
                    format!("Exported {} rows to {}", summary.rows, path.display()),
                );
                Some(summary)
            }
            Err(e) => {
                self.report("export", e);
                None
            }
        }
    }

    /// Text of the current document's selections, one block per non-empty
    /// extraction
    pub fn extraction_preview(&self) -> String {
        let Some(id) = self.current else {
            return String::new();
        };
        self.table
            .for_document(id)
            .filter(|r| !r.text.is_empty())
            .map(|r| format!("--- Page {} ---\n{}", r.page + 1, r.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{invoice_page, FakeBackend, FakePage};
    use pretty_assertions::assert_eq;

    fn state() -> AppState {
        let backend = FakeBackend::new()
            .with_document("/docs/a.pdf", vec![invoice_page(); 3])
            .with_document("/docs/b.pdf", vec![invoice_page(); 2])
            .with_document("/docs/scan.pdf", vec![FakePage::new(612.0, 792.0)])
            .with_document(
                "/docs/corrupt.pdf",
                vec![FakePage::new(100.0, 100.0).corrupt()],
            )
            .with_invalid("/docs/broken.pdf");
        AppState::new(Box::new(backend), AppConfig::default())
    }

    fn drag(state: &mut AppState, from: (f32, f32), to: (f32, f32)) -> Option<RecordId> {
        state.pointer_down(Point::new(from.0, from.1));
        state.pointer_move(Point::new(to.0, to.1));
        state.pointer_up(Point::new(to.0, to.1))
    }

    #[test]
    fn test_first_loaded_document_is_shown() {
        let mut state = state();
        assert!(state.current_document().is_none());

        state.open_paths(vec![PathBuf::from("/docs/a.pdf"), PathBuf::from("/docs/b.pdf")]);
        assert_eq!(state.current_document().unwrap().name(), "a.pdf");
        assert_eq!(state.current_page(), 0);
        assert_eq!(state.page_count(), 3);
    }

    #[test]
    fn test_load_failure_is_a_notice() {
        let mut state = state();
        state.open_paths(vec![
            PathBuf::from("/docs/broken.pdf"),
            PathBuf::from("/docs/a.pdf"),
        ]);

        let notices = state.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
        assert_eq!(notices[0].message, "broken.pdf: Not a valid PDF file");
        assert_eq!(state.workspace().len(), 1);
        assert!(state.notices().is_empty());
    }

    #[test]
    fn test_page_navigation_bounds() {
        let mut state = state();
        state.prev_page();
        state.next_page();
        assert_eq!(state.current_page(), 0);

        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        state.prev_page();
        assert_eq!(state.current_page(), 0);
        state.next_page();
        state.next_page();
        state.next_page();
        assert_eq!(state.current_page(), 2);
        state.prev_page();
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_drag_creates_record() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        state.next_page();

        let id = drag(&mut state, (65.0, 35.0), (5.0, 5.0)).unwrap();
        let record = state.table().get(id).unwrap();
        assert_eq!(record.page, 1);
        assert_eq!(record.display_rect, Rect::new(5.0, 5.0, 65.0, 35.0));
        assert_eq!(record.pdf_rect, Rect::new(5.0, 5.0, 65.0, 35.0));
        assert_eq!(record.text, "Invoice");
        assert_eq!(record.document_name, "a.pdf");
    }

    #[test]
    fn test_drag_at_zoom() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        state.set_zoom(2.0);

        let id = drag(&mut state, (10.0, 10.0), (210.0, 70.0)).unwrap();
        let record = state.table().get(id).unwrap();
        assert_eq!(record.pdf_rect, Rect::new(5.0, 5.0, 105.0, 35.0));
        assert_eq!(record.text, "Invoice 1234");

        state.set_zoom(1.0);
        assert_eq!(state.current_overlays(), vec![Rect::new(5.0, 5.0, 105.0, 35.0)]);
    }

    #[test]
    fn test_degenerate_drag_creates_nothing() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);

        assert!(drag(&mut state, (10.0, 10.0), (10.0, 90.0)).is_none());
        assert!(drag(&mut state, (10.0, 10.0), (10.0, 10.0)).is_none());
        assert!(state.table().is_empty());
    }

    #[test]
    fn test_drag_without_document_is_ignored() {
        let mut state = state();
        assert!(drag(&mut state, (10.0, 10.0), (50.0, 50.0)).is_none());
        assert!(state.table().is_empty());
    }

    #[test]
    fn test_scanned_page_gives_empty_text() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/scan.pdf")]);

        let id = drag(&mut state, (0.0, 0.0), (300.0, 300.0)).unwrap();
        assert_eq!(state.table().get(id).unwrap().text, "");
        assert!(state.notices().is_empty());
    }

    #[test]
    fn test_overlays_only_for_current_page() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        drag(&mut state, (5.0, 5.0), (65.0, 35.0));
        state.next_page();
        assert!(state.current_overlays().is_empty());
        state.prev_page();
        assert_eq!(state.current_overlays().len(), 1);
    }

    #[test]
    fn test_navigation_cancels_drag() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        state.pointer_down(Point::new(5.0, 5.0));
        assert!(state.in_progress_rect().is_some());
        state.next_page();
        assert!(state.in_progress_rect().is_none());
        assert!(state.pointer_up(Point::new(60.0, 60.0)).is_none());
    }

    #[test]
    fn test_render_failure_shows_blank_page() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/corrupt.pdf")]);

        let view = state.render_current().unwrap();
        assert!(view.error.is_some());
        assert_eq!((view.image.width, view.image.height), (100, 100));
        let notices = state.take_notices();
        assert_eq!(notices[0].severity, Severity::Warning);
    }

    #[test]
    fn test_render_follows_zoom() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        state.zoom_out();
        state.zoom_out();

        let view = state.render_current().unwrap();
        assert!(view.error.is_none());
        assert_eq!((view.image.width, view.image.height), (306, 396));
        assert_eq!(state.page_key().unwrap().zoom_percent, 50);
    }

    #[test]
    fn test_page_keys_are_distinct_per_view() {
        let mut state = state();
        assert!(state.page_key().is_none());
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);

        let mut seen = std::collections::HashSet::new();
        assert!(seen.insert(state.page_key().unwrap()));
        state.next_page();
        assert!(seen.insert(state.page_key().unwrap()));
        state.zoom_in();
        assert!(seen.insert(state.page_key().unwrap()));
        state.zoom_out();
        assert!(!seen.insert(state.page_key().unwrap()));
    }

    #[test]
    fn test_delete_and_clear() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        let first = drag(&mut state, (5.0, 5.0), (65.0, 35.0)).unwrap();
        let second = drag(&mut state, (65.0, 5.0), (105.0, 35.0)).unwrap();

        assert!(state.delete_record(first));
        assert!(!state.delete_record(first));
        let remaining: Vec<RecordId> = state.table().iter().map(|r| r.id).collect();
        assert_eq!(remaining, vec![second]);

        state.clear_all();
        assert!(state.table().is_empty());
    }

    #[test]
    fn test_unload_drops_records_and_switches_document() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf"), PathBuf::from("/docs/b.pdf")]);
        drag(&mut state, (5.0, 5.0), (65.0, 35.0));
        let a = state.current_document().unwrap().id();
        let b = state.workspace().documents()[1].id();
        state.select_document(b);
        drag(&mut state, (5.0, 5.0), (65.0, 35.0));
        state.select_document(a);

        state.unload_document(a);
        assert_eq!(state.current_document().unwrap().id(), b);
        assert_eq!(state.table().len(), 1);
        assert_eq!(state.table().records()[0].document, b);

        state.unload_document(b);
        assert!(state.current_document().is_none());
        assert!(state.table().is_empty());
    }

    #[test]
    fn test_sync_to_all() {
        let mut state = state();
        state.open_paths(vec![
            PathBuf::from("/docs/a.pdf"),
            PathBuf::from("/docs/b.pdf"),
            PathBuf::from("/docs/scan.pdf"),
        ]);
        drag(&mut state, (5.0, 5.0), (65.0, 35.0));
        state.next_page();
        state.next_page();
        drag(&mut state, (5.0, 5.0), (65.0, 35.0));

        let report = state.sync_to_all().unwrap();
        // page 0 reaches b and scan; page 2 exists in neither
        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, 2);
        assert_eq!(state.table().len(), 4);
        assert_eq!(state.take_notices().len(), 1);
    }

    #[test]
    fn test_sync_needs_selections() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf"), PathBuf::from("/docs/b.pdf")]);
        assert!(state.sync_to_all().is_none());
        assert_eq!(state.take_notices()[0].severity, Severity::Info);
    }

    #[test]
    fn test_export_notices() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        drag(&mut state, (5.0, 5.0), (65.0, 35.0));

        let temp_dir = tempfile::tempdir().unwrap();
        let summary = state.export(&temp_dir.path().join("out.csv")).unwrap();
        assert_eq!(summary.rows, 1);

        assert!(state
            .export(Path::new("/nonexistent/dir/out.xlsx"))
            .is_none());
        let notices = state.take_notices();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].severity, Severity::Info);
        assert_eq!(notices[1].severity, Severity::Error);
    }

    #[test]
    fn test_extraction_preview() {
        let mut state = state();
        state.open_paths(vec![PathBuf::from("/docs/a.pdf")]);
        drag(&mut state, (5.0, 5.0), (65.0, 35.0));
        drag(&mut state, (300.0, 300.0), (400.0, 400.0));
        state.next_page();
        drag(&mut state, (65.0, 5.0), (105.0, 35.0));

        assert_eq!(
            state.extraction_preview(),
            "--- Page 1 ---\nInvoice\n\n--- Page 2 ---\n1234"
        );
    }

    #[test]
    fn test_open_folder_without_pdfs() {
        let mut state = state();
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(state.open_folder(temp_dir.path()).is_some());
        assert_eq!(state.take_notices()[0].severity, Severity::Info);

        assert!(state.open_folder(Path::new("/nonexistent/folder")).is_none());
        assert_eq!(state.take_notices()[0].severity, Severity::Error);
    }
}
