//! PDF Region Extractor - Entry point

use pdf_region_extractor::{ui, AppConfig, AppState, PdfiumBackend};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_region_extractor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting PDF Region Extractor");

    let backend = PdfiumBackend::new()?;
    let state = AppState::new(Box::new(backend), AppConfig::default());

    ui::run(state)
}
