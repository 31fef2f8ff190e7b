use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Hemotrend";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "hemotrend_lib=info";

/// Upper bound on a single OCR call made through the service facade.
pub const DEFAULT_OCR_TIMEOUT_SECS: u64 = 60;

const ENV_DATA_DIR: &str = "HEMOTREND_DATA_DIR";
const ENV_OCR_TIMEOUT: &str = "HEMOTREND_OCR_TIMEOUT_SECS";
const ENV_LOG: &str = "HEMOTREND_LOG";

/// Get the application data directory
/// ~/Hemotrend/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the SQLite database path under the data directory
pub fn database_path() -> PathBuf {
    app_data_dir().join("reports.db")
}

/// Runtime configuration for the service facade.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database_path: PathBuf,
    pub ocr_timeout: Duration,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: app_data_dir(),
            database_path: database_path(),
            ocr_timeout: Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `HEMOTREND_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
            config.database_path = config.data_dir.join("reports.db");
        }

        if let Some(raw) = lookup(ENV_OCR_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.ocr_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "Ignoring invalid {ENV_OCR_TIMEOUT}"),
            }
        }

        if let Some(filter) = lookup(ENV_LOG).filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("Hemotrend"));
    }

    #[test]
    fn database_under_app_data() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("reports.db"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn defaults_without_env() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.ocr_timeout, Duration::from_secs(60));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn data_dir_override_moves_database() {
        let config = AppConfig::from_lookup(lookup_from(&[("HEMOTREND_DATA_DIR", "/tmp/ht")]));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/ht"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/ht/reports.db"));
    }

    #[test]
    fn timeout_override_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[("HEMOTREND_OCR_TIMEOUT_SECS", "5")]));
        assert_eq!(config.ocr_timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        for raw in ["abc", "0", "-3"] {
            let config =
                AppConfig::from_lookup(lookup_from(&[("HEMOTREND_OCR_TIMEOUT_SECS", raw)]));
            assert_eq!(config.ocr_timeout, Duration::from_secs(DEFAULT_OCR_TIMEOUT_SECS));
        }
    }

    #[test]
    fn log_filter_override() {
        let config = AppConfig::from_lookup(lookup_from(&[("HEMOTREND_LOG", "debug")]));
        assert_eq!(config.log_filter, "debug");
    }
}
