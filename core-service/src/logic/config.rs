//! Dashboard Configuration
//!
//! Runtime settings assembled from `constants` env readers.

use std::time::Duration;

use crate::constants;

/// Dashboard configuration
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Backend base URL (no trailing slash)
    pub api_url: String,

    /// Period of the silent background refresh
    pub refresh_interval: Duration,

    /// Records requested per fetch
    pub batch_limit: usize,

    /// Rows per table page
    pub page_size: usize,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,

    /// Score above which a new fraud-labelled record is announced
    pub high_risk_threshold: f64,

    /// Merchants shown in the top-merchants chart
    pub top_merchants: usize,
}

impl DashboardConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }

        Self {
            api_url: constants::get_api_url(),
            refresh_interval: Duration::from_secs(constants::get_refresh_interval()),
            batch_limit: constants::get_batch_limit(),
            page_size: constants::get_page_size(),
            timeout_seconds: constants::get_http_timeout(),
            high_risk_threshold: constants::get_high_risk_threshold(),
            top_merchants: constants::get_top_merchants(),
        }
    }

    /// Configuration pointing at a specific backend, defaults elsewhere
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: constants::DEFAULT_API_URL.to_string(),
            refresh_interval: Duration::from_secs(constants::DEFAULT_REFRESH_INTERVAL),
            batch_limit: constants::DEFAULT_BATCH_LIMIT,
            page_size: constants::DEFAULT_PAGE_SIZE,
            timeout_seconds: constants::DEFAULT_HTTP_TIMEOUT,
            high_risk_threshold: constants::DEFAULT_HIGH_RISK_THRESHOLD,
            top_merchants: constants::DEFAULT_TOP_MERCHANTS,
        }
    }
}
