pub mod config;
pub mod dates;
pub mod db;
pub mod intelligence; // Trends, panel risk, recommendations, comparison summaries
pub mod models;
pub mod pipeline; // Text extraction (OCR seam, line parsing, report assembly) and image store
pub mod service; // Async facade over OCR + storage collaborators

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `fallback_filter` is used
/// (normally [`config::AppConfig::log_filter`]). Calling this twice is
/// harmless, the second install is ignored.
pub fn init_tracing(fallback_filter: &str) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter)),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_tracing_twice_is_harmless() {
        init_tracing(config::DEFAULT_LOG_FILTER);
        init_tracing("debug");
    }
}
