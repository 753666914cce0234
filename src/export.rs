//! Spreadsheet export of the selection table
//!
//! Files are written all-or-nothing: the content is produced in memory,
//! written to a temporary file next to the destination and then renamed over
//! it, so an interrupted export never leaves a truncated spreadsheet behind.

use crate::error::{Error, Result};
use crate::table::SelectionRecord;
use crate::workspace::DocumentId;
use rust_xlsxwriter::{Format, Workbook};
use std::fmt;
use std::io::Write;
use std::path::Path;

/// Worksheet name used in xlsx exports
pub const SHEET_NAME: &str = "Selections";

/// Column headers of [`ExportLayout::Rows`]
pub const ROW_HEADERS: [&str; 3] = ["Document", "Page", "Text"];

/// Excel rejects longer cell strings
const MAX_CELL_CHARS: usize = 32_767;

/// Arrangement of records in the spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportLayout {
    /// One row per selection: Document, Page, Text
    #[default]
    Rows,
    /// One row per document: Document, Selection 1..N
    PerDocument,
}

/// File format, chosen from the destination's extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
    Json,
}

impl ExportFormat {
    /// Format for a destination path. Unknown extensions export as xlsx.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => ExportFormat::Csv,
            "json" => ExportFormat::Json,
            _ => ExportFormat::Xlsx,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Result of a successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub format: ExportFormat,
    /// Data rows written, header excluded
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(u32),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Empty => Ok(()),
        }
    }
}

/// Header plus data rows, independent of the file format
#[derive(Debug)]
struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

fn build_sheet(records: &[SelectionRecord], layout: ExportLayout) -> Sheet {
    match layout {
        ExportLayout::Rows => Sheet {
            headers: ROW_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows: records
                .iter()
                .map(|r| {
                    vec![
                        Cell::Text(r.document_name.clone()),
                        Cell::Number(r.page + 1),
                        Cell::Text(r.text.clone()),
                    ]
                })
                .collect(),
        },
        ExportLayout::PerDocument => {
            // Documents in order of their first selection
            let mut groups: Vec<(DocumentId, &str, Vec<&str>)> = Vec::new();
            for record in records {
                match groups.iter_mut().find(|(id, _, _)| *id == record.document) {
                    Some((_, _, texts)) => texts.push(record.text.as_str()),
                    None => groups.push((
                        record.document,
                        record.document_name.as_str(),
                        vec![record.text.as_str()],
                    )),
                }
            }

            let width = groups.iter().map(|(_, _, t)| t.len()).max().unwrap_or(0);
            let mut headers = vec!["Document".to_string()];
            headers.extend((1..=width).map(|i| format!("Selection {}", i)));

            let rows = groups
                .into_iter()
                .map(|(_, name, texts)| {
                    let mut row = vec![Cell::Text(name.to_string())];
                    row.extend(texts.iter().map(|t| Cell::Text(t.to_string())));
                    row.resize(width + 1, Cell::Empty);
                    row
                })
                .collect();

            Sheet { headers, rows }
        }
    }
}

fn truncate_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((index, _)) => {
            tracing::warn!(chars = text.chars().count(), "truncating cell text for xlsx");
            &text[..index]
        }
        None => text,
    }
}

fn write_xlsx(sheet: &Sheet) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, title) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &header_format)?;
    }

    for (index, cells) in sheet.rows.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row, col, truncate_cell(text))?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_csv(sheet: &Sheet) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row.iter().map(|c| c.to_string()))?;
    }
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

fn write_json(sheet: &Sheet) -> Result<Vec<u8>> {
    let objects: Vec<serde_json::Map<String, serde_json::Value>> = sheet
        .rows
        .iter()
        .map(|row| {
            sheet
                .headers
                .iter()
                .zip(row)
                .map(|(header, cell)| {
                    let value = match cell {
                        Cell::Text(s) => serde_json::Value::from(s.as_str()),
                        Cell::Number(n) => serde_json::Value::from(*n),
                        Cell::Empty => serde_json::Value::Null,
                    };
                    (header.clone(), value)
                })
                .collect()
        })
        .collect();
    Ok(serde_json::to_vec_pretty(&objects)?)
}

/// Replace `path` with `bytes` via a temporary file in the same directory
fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let export_error = |reason: String| Error::Export {
        path: path.display().to_string(),
        reason,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| export_error(e.to_string()))?;
    tmp.write_all(bytes)
        .map_err(|e| export_error(e.to_string()))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| export_error(e.to_string()))?;
    tmp.persist(path)
        .map_err(|e| export_error(e.error.to_string()))?;
    Ok(())
}

/// Write `records`, in order, to `path`. The format follows the extension.
pub fn export(
    records: &[SelectionRecord],
    path: &Path,
    layout: ExportLayout,
) -> Result<ExportSummary> {
    let format = ExportFormat::from_path(path);
    let sheet = build_sheet(records, layout);

    let bytes = match format {
        ExportFormat::Xlsx => write_xlsx(&sheet)?,
        ExportFormat::Csv => write_csv(&sheet)?,
        ExportFormat::Json => write_json(&sheet)?,
    };
    write_atomically(path, &bytes)?;

    let summary = ExportSummary {
        format,
        rows: sheet.rows.len(),
    };
    tracing::info!(path = %path.display(), ?format, rows = summary.rows, "exported selections");
    Ok(summary)
}

/// Suggested file name for the save dialog, e.g. `selections-20250101-093000.xlsx`
pub fn default_file_name<Tz>(now: chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: fmt::Display,
{
    format!(
        "selections-{}.{}",
        now.format("%Y%m%d-%H%M%S"),
        ExportFormat::Xlsx.extension()
    )
}
