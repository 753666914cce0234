//! Locating PDF files to load

pub mod scan;

pub use scan::{is_pdf_path, list_pdfs, ScanOptions};
