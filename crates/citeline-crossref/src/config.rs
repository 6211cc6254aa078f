//! Crossref retrieval configuration

use std::time::Duration;

use citeline_core::{ClientIdentity, RetryPolicy};

pub const DEFAULT_BASE_URL: &str = "https://api.crossref.org";

/// Largest page the works endpoint accepts for `rows`
pub const MAX_ROWS: usize = 1000;

/// Runtime configuration for one retrieval run
#[derive(Debug, Clone)]
pub struct Config {
    /// API root, without trailing slash
    pub base_url: String,
    /// Sent as `User-Agent` on every request
    pub identity: ClientIdentity,
    /// Page size for citing-works searches, 1..=[`MAX_ROWS`]
    pub rows: usize,
    /// Per-request timeout
    pub timeout: Duration,
    pub retry: RetryPolicy,
    /// Fixed pause between successive pages of one search
    pub page_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            identity: ClientIdentity::default(),
            rows: 100,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            page_delay: Duration::from_secs(1),
        }
    }
}
