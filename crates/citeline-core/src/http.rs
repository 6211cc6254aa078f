//! Blocking HTTP facade over async reqwest.
//!
//! Requests run on a shared tokio runtime via `block_on`, so callers keep a
//! plain synchronous control flow (one request at a time, in order).

use std::sync::LazyLock;
use std::time::Duration;

use crate::error::ApiError;

/// Connect timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Who is calling: sent as `User-Agent` on every request.
///
/// Metadata services with a "polite pool" use this to rate-limit fairly and
/// to contact the operator if a client misbehaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub name: String,
    pub version: String,
    pub url: Option<String>,
    pub mailto: Option<String>,
}

impl ClientIdentity {
    /// `name/version (url; mailto:contact)`, omitting whatever is unset
    pub fn user_agent(&self) -> String {
        let mut extras = Vec::with_capacity(2);
        if let Some(url) = self.url.as_deref().filter(|s| !s.is_empty()) {
            extras.push(url.to_string());
        }
        if let Some(mail) = self.mailto.as_deref().filter(|s| !s.is_empty()) {
            extras.push(format!("mailto:{mail}"));
        }
        if extras.is_empty() {
            format!("{}/{}", self.name, self.version)
        } else {
            format!("{}/{} ({})", self.name, self.version, extras.join("; "))
        }
    }
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            name: "citeline".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            url: None,
            mailto: None,
        }
    }
}

/// Build an HTTP client carrying the identity header and a per-call timeout.
///
/// `timeout` bounds each request end to end, independent of any retry
/// backoff applied by the caller.
pub fn build_client(
    identity: &ClientIdentity,
    timeout: Duration,
) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .user_agent(identity.user_agent())
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .timeout(timeout)
        .pool_max_idle_per_host(2)
        .build()
        .map_err(ApiError::from_reqwest)
}

/// Status code and full body of a completed response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Send a request and read the whole body, blocking the calling thread.
///
/// Non-2xx statuses are returned as-is; only transport failures are errors.
pub fn fetch_text(request: reqwest::RequestBuilder) -> Result<HttpResponse, ApiError> {
    SHARED_RUNTIME.handle().block_on(async {
        let response = request.send().await.map_err(ApiError::from_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::from_reqwest)?;
        Ok(HttpResponse { status, body })
    })
}
