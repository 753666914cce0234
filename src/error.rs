//! Error types for PDF Region Extractor

use thiserror::Error;

/// Result type alias for PDF Region Extractor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for PDF Region Extractor
#[derive(Error, Debug)]
pub enum Error {
    /// PDF file not found
    #[error("PDF not found: {path}")]
    PdfNotFound { path: String },

    /// Invalid PDF file
    #[error("Invalid PDF file: {reason}")]
    InvalidPdf { reason: String },

    /// File exists but could not be read
    #[error("Cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// Folder open on something that is not a folder
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    /// PDF is password protected
    #[error("PDF is password protected")]
    PasswordRequired,

    /// Page out of bounds (zero-based index)
    #[error("Page {page} out of bounds (total: {total})")]
    PageOutOfBounds { page: u32, total: u32 },

    /// PDFium error
    #[error("PDFium error: {reason}")]
    Pdfium { reason: String },

    /// Page failed to rasterize
    #[error("Failed to render page {page}: {reason}")]
    Render { page: u32, reason: String },

    /// Spreadsheet could not be written
    #[error("Failed to export to {path}: {reason}")]
    Export { path: String, reason: String },

    /// Document id does not refer to a loaded document
    #[error("Unknown document: {id}")]
    UnknownDocument { id: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// xlsx writer error
    #[error("xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// CSV writer error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse error category shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unreadable or invalid PDF on load
    File,
    /// Page failed to rasterize; the page is shown blank
    Render,
    /// Destination unwritable or write interrupted
    Export,
    /// Anything else
    Internal,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PdfNotFound { .. }
            | Error::InvalidPdf { .. }
            | Error::Unreadable { .. }
            | Error::NotADirectory { .. }
            | Error::PasswordRequired
            | Error::PageOutOfBounds { .. } => ErrorKind::File,
            Error::Render { .. } => ErrorKind::Render,
            Error::Export { .. } | Error::Xlsx(_) | Error::Csv(_) | Error::Serialization(_) => {
                ErrorKind::Export
            }
            Error::Pdfium { .. } | Error::UnknownDocument { .. } | Error::Io(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Return a short message suitable for a notification window.
    /// Library details are omitted; log the full error via tracing first.
    pub fn user_message(&self) -> String {
        match self {
            Error::PdfNotFound { path } => format!("PDF not found: {}", path),
            Error::InvalidPdf { .. } => "Not a valid PDF file".to_string(),
            Error::Unreadable { path, .. } => format!("Cannot read {}", path),
            Error::NotADirectory { path } => format!("{} is not a folder", path),
            Error::PasswordRequired => "PDF is password protected".to_string(),
            Error::PageOutOfBounds { page, total } => {
                format!("Page {} out of bounds (total: {})", page + 1, total)
            }
            Error::Pdfium { .. } => "PDF processing error".to_string(),
            Error::Render { page, .. } => {
                format!("Page {} could not be rendered and is shown blank", page + 1)
            }
            Error::Export { path, .. } => format!("Could not write {}", path),
            Error::UnknownDocument { .. } => "Document is no longer loaded".to_string(),
            Error::Io(_) => "I/O error".to_string(),
            Error::Xlsx(_) | Error::Csv(_) | Error::Serialization(_) => {
                "Failed to write the spreadsheet".to_string()
            }
        }
    }
}
