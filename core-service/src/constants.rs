//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To point the dashboard at another backend, set `FRAUD_API_URL`.

/// Default fraud-scoring backend URL
///
/// This is the fallback URL when no environment variable is set.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default periodic refresh interval (seconds)
pub const DEFAULT_REFRESH_INTERVAL: u64 = 30;

/// Default number of records requested per fetch
pub const DEFAULT_BATCH_LIMIT: usize = 100;

/// Default table page size
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Default HTTP timeout (seconds)
pub const DEFAULT_HTTP_TIMEOUT: u64 = 10;

/// Score above which a fraud-labelled transaction counts as high risk
pub const DEFAULT_HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Number of merchants shown in the top-merchants chart
pub const DEFAULT_TOP_MERCHANTS: usize = 5;

/// Records synthesized when the backend is unreachable
pub const OFFLINE_MOCK_COUNT: usize = 100;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Fraud Dashboard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get backend URL from environment or use default
pub fn get_api_url() -> String {
    std::env::var("FRAUD_API_URL")
        .map(|s| s.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Get refresh interval from environment or use default
pub fn get_refresh_interval() -> u64 {
    env_parse("FRAUD_REFRESH_INTERVAL")
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REFRESH_INTERVAL)
}

/// Get fetch batch limit from environment or use default
pub fn get_batch_limit() -> usize {
    env_parse("FRAUD_BATCH_LIMIT")
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_BATCH_LIMIT)
}

/// Get page size from environment or use default
pub fn get_page_size() -> usize {
    env_parse("FRAUD_PAGE_SIZE")
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

/// Get HTTP timeout from environment or use default
pub fn get_http_timeout() -> u64 {
    env_parse("FRAUD_HTTP_TIMEOUT")
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_HTTP_TIMEOUT)
}

/// Get high-risk score threshold from environment or use default
pub fn get_high_risk_threshold() -> f64 {
    env_parse("FRAUD_HIGH_RISK_THRESHOLD")
        .filter(|t: &f64| (0.0..=1.0).contains(t))
        .unwrap_or(DEFAULT_HIGH_RISK_THRESHOLD)
}

/// Get top-merchants chart size from environment or use default
pub fn get_top_merchants() -> usize {
    env_parse("FRAUD_TOP_MERCHANTS").unwrap_or(DEFAULT_TOP_MERCHANTS)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
