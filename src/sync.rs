//! Copying one document's selections onto every other loaded document

use crate::error::Result;
use crate::extract::extract_pdf_region;
use crate::table::{SelectionRecord, SelectionTable};
use crate::workspace::{DocumentId, Workspace};

/// What happens to selections already present on a target document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPolicy {
    /// Keep existing selections and add the copies after them
    #[default]
    Append,
    /// Drop the target's selections before copying
    Replace,
}

/// Summary of a sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Documents selections were copied to
    pub targets: usize,
    /// Records created
    pub added: usize,
    /// Copies not made because the target page is missing or unreadable
    pub skipped: usize,
    /// Records dropped from targets under [`SyncPolicy::Replace`]
    pub removed: usize,
}

/// Copy every selection of `source` onto the page with the same index of
/// every other loaded document, extracting the text again from each target.
///
/// Targets with fewer pages than a selection's page index skip that
/// selection.
pub fn sync_to_all(
    workspace: &Workspace,
    table: &mut SelectionTable,
    source: DocumentId,
    policy: SyncPolicy,
) -> Result<SyncReport> {
    workspace.get(source)?;

    let selections: Vec<SelectionRecord> = table.for_document(source).cloned().collect();
    let mut report = SyncReport::default();
    if selections.is_empty() {
        return Ok(report);
    }

    for target in workspace.documents().iter().filter(|d| d.id() != source) {
        report.targets += 1;

        if policy == SyncPolicy::Replace {
            report.removed += table.remove_document(target.id());
        }

        let page_count = target.page_count();
        for selection in &selections {
            if selection.page >= page_count {
                report.skipped += 1;
                continue;
            }

            match extract_pdf_region(target.document(), selection.page, &selection.pdf_rect) {
                Ok(extraction) => {
                    table.push(SelectionRecord::new(
                        target.id(),
                        target.name(),
                        selection.page,
                        selection.display_rect,
                        extraction,
                    ));
                    report.added += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        target = %target.path().display(),
                        page = selection.page,
                        error = %e,
                        "skipping selection during sync"
                    );
                    report.skipped += 1;
                }
            }
        }
    }

    tracing::info!(
        %source,
        targets = report.targets,
        added = report.added,
        skipped = report.skipped,
        "synced selections"
    );
    Ok(report)
}
