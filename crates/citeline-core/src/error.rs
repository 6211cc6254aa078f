//! Error type for calls against a remote metadata API

/// Error from a single remote call.
///
/// Either the transport/HTTP layer failed, or the service answered with a
/// body that does not decode into the expected shape. Both are candidates
/// for retry; [`ApiError::is_retryable`] decides which ones actually are.
#[derive(Debug)]
pub enum ApiError {
    /// HTTP error with optional status code (None = network/timeout)
    Http {
        status: Option<u16>,
        message: String,
    },
    /// Response body was malformed or incomplete
    Decode(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http {
                status: Some(s),
                message,
            } => write!(f, "HTTP {s}: {message}"),
            Self::Http {
                status: None,
                message,
            } => write!(f, "HTTP error: {message}"),
            Self::Decode(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create HTTP error from reqwest error.
    ///
    /// The URL is stripped so request parameters don't end up in logs.
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::Http {
            status: e.status().map(|s| s.as_u16()),
            message: e.without_url().to_string(),
        }
    }

    /// Build an HTTP error from a non-success status and (truncated) body.
    pub fn from_status(status: u16, body: &str) -> Self {
        const MAX_BODY: usize = 200;
        let mut end = body.len().min(MAX_BODY);
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        Self::Http {
            status: Some(status),
            message: body[..end].trim().to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            // 408 = request timeout, 429 = rate limited, 5xx = server side
            // other 4xx = the service rejected the request itself
            Self::Http { status, .. } => {
                matches!(status, None | Some(408) | Some(429) | Some(500..=599))
            }
            Self::Decode(_) => true,
        }
    }
}
