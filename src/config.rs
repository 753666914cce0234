//! Application configuration

use crate::export::ExportLayout;
use crate::sync::SyncPolicy;

/// Behaviour and resource limits of the application.
///
/// Not persisted; the binary starts from [`AppConfig::default`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Zoom factor used for newly opened documents (default: 1.0)
    pub initial_zoom: f32,
    /// Smallest zoom factor (default: 0.25)
    pub min_zoom: f32,
    /// Largest zoom factor (default: 4.0)
    pub max_zoom: f32,
    /// Zoom change per zoom in/out action (default: 0.25)
    pub zoom_step: f32,
    /// How sync treats selections already on a target document (default: Append)
    pub sync_policy: SyncPolicy,
    /// Spreadsheet layout used by export (default: one row per selection)
    pub export_layout: ExportLayout,
    /// Descend into subdirectories when opening a folder (default: false)
    pub recursive_folder_scan: bool,
    /// Glob on file names applied when opening a folder, e.g. "invoice*.pdf"
    pub folder_pattern: Option<String>,
    /// Maximum pixel area of a rendered page (default: 100_000_000)
    pub max_render_pixels: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_zoom: 1.0,
            min_zoom: 0.25,
            max_zoom: 4.0,
            zoom_step: 0.25,
            sync_policy: SyncPolicy::default(),
            export_layout: ExportLayout::default(),
            recursive_folder_scan: false,
            folder_pattern: None,
            max_render_pixels: 100_000_000,
        }
    }
}

impl AppConfig {
    /// Clamp a zoom factor into `[min_zoom, max_zoom]`
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}
