//! Per-seed retrieval errors

use citeline_core::ApiError;

/// Why a seed's retrieval stopped before completing
#[derive(Debug)]
pub enum RetrievalError {
    /// Remote call failed permanently (retries exhausted or non-retryable)
    Api(ApiError),
    /// External cancellation observed between pages
    Cancelled,
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Api(e) => write!(f, "{e}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

impl std::error::Error for RetrievalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Cancelled => None,
        }
    }
}

impl From<ApiError> for RetrievalError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}
