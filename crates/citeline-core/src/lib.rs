//! Citeline Core - Common infrastructure for citation retrieval pipelines
//!
//! This crate provides the source-agnostic pieces: a blocking facade over
//! the async HTTP client, retry with exponential backoff, cancellation,
//! logging, progress display and the output sinks.

pub mod accumulator;
pub mod error;
pub mod http;
pub mod logging;
pub mod progress;
pub mod retry;
pub mod shutdown;
pub mod sink;

// Re-exports for convenience
pub use accumulator::Accumulator;
pub use error::ApiError;
pub use http::{ClientIdentity, HttpResponse, SHARED_RUNTIME, build_client, fetch_text};
pub use logging::{IndicatifLogger, init_logging};
pub use progress::{ProgressContext, fmt_num};
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use shutdown::CancelToken;
pub use sink::{CsvSink, ParquetSink, is_valid_parquet};
