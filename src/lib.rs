pub mod analysis; // Question analysis: KL + CO mapping for one question
pub mod classify; // Bloom's-level classifier and course-outcome matcher
pub mod config;
pub mod db;
pub mod error;
pub mod export; // Finalized paper structure consumed by the PDF renderer
pub mod models;
pub mod review; // Scrutinizer reviews and paper-level aggregation

use tracing_subscriber::EnvFilter;

/// Initialize tracing for embedding applications.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Scrutiny engine v{}", config::APP_VERSION);
}
