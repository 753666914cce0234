//! Discovery of PDF files on disk

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Options for scanning a folder
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Search subdirectories recursively
    pub recursive: bool,
    /// Filename pattern to filter (e.g., "report*.pdf"). Supports glob patterns.
    pub pattern: Option<String>,
}

/// Whether a path names a PDF file by its extension (case-insensitive)
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// List PDF files in a directory, sorted by path
pub fn list_pdfs(dir: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Err(Error::PdfNotFound {
            path: dir.display().to_string(),
        });
    }

    if !dir.is_dir() {
        return Err(Error::NotADirectory {
            path: dir.display().to_string(),
        });
    }

    // Invalid patterns are ignored rather than rejecting the folder
    let pattern = options
        .pattern
        .as_ref()
        .and_then(|p| glob::Pattern::new(p).ok());

    let mut files = Vec::new();
    collect_pdfs(dir, options.recursive, &pattern, &mut files)?;
    files.sort();

    Ok(files)
}

fn collect_pdfs(
    dir: &Path,
    recursive: bool,
    pattern: &Option<glob::Pattern>,
    files: &mut Vec<PathBuf>,
) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::Unreadable {
        path: dir.display().to_string(),
        reason: e.to_string(),
    })?;

    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue, // Skip entries we can't read
        };

        let path = entry.path();

        if path.is_dir() {
            if recursive {
                if let Err(e) = collect_pdfs(&path, recursive, pattern, files) {
                    tracing::warn!(dir = %path.display(), error = %e, "skipping unreadable folder");
                }
            }
        } else if path.is_file() && is_pdf_path(&path) {
            if let Some(ref pat) = pattern {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                if !pat.matches(&name) {
                    continue;
                }
            }
            files.push(path);
        }
    }

    Ok(())
}
