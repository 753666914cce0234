//! PDF Region Extractor Library
//!
//! Select rectangular regions on PDF pages, extract the text under them and
//! export the results to a spreadsheet:
//! - [`workspace`]: loading and unloading documents
//! - [`selection`] and [`extract`]: turning pointer drags into text
//! - [`table`]: the ordered list of selections
//! - [`sync`]: copying one document's selections onto every other one
//! - [`export`]: writing the table as xlsx, csv or json
//!
//! [`app::AppState`] ties these together behind the actions of the window in
//! [`ui`].

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod geometry;
pub mod pdf;
pub mod render;
pub mod selection;
pub mod source;
pub mod sync;
pub mod table;
pub mod ui;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use app::{AppState, Notice, Severity};
pub use config::AppConfig;
pub use error::{Error, ErrorKind, Result};
pub use export::{ExportFormat, ExportLayout, ExportSummary};
pub use geometry::{PageSize, Point, Rect};
pub use pdf::{PdfBackend, PdfDocument, PdfiumBackend, RenderedPage};
pub use sync::{SyncPolicy, SyncReport};
pub use table::{RecordId, SelectionRecord, SelectionTable};
pub use workspace::{DocumentId, LoadedDocument, Workspace};
