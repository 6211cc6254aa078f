//! Citeline Crossref - citation-by-year retrieval against the Crossref REST API
//!
//! For each seed DOI: resolve its metadata, walk every work that references
//! it via cursor deep paging, and count those works per publication year.
//!
//! # Example
//!
//! ```ignore
//! use citeline_crossref::{Config, CrossrefClient, Runner};
//!
//! let config = Config::default();
//! let client = CrossrefClient::new(&config)?;
//! let summary = Runner::new(&client, &config).run(&["10.1038/nbt.3820"], |buckets| {
//!     for b in buckets {
//!         println!("{} {} {}", b.source_identifier, b.year, b.citation_count);
//!     }
//!     Ok(())
//! })?;
//! println!("{} succeeded", summary.succeeded);
//! ```

pub mod aggregate;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod paginator;
pub mod runner;
pub mod schema;
pub mod stats;
pub mod transform;
pub mod wire;

#[cfg(test)]
mod testing;

// Re-exports
pub use aggregate::{YearAggregator, current_year, fold};
pub use client::{CrossrefClient, WorksApi};
pub use config::Config;
pub use error::RetrievalError;
pub use model::{CitingEvent, Page, PublishedYear, SeedWork, YearBucket};
pub use paginator::CitingPages;
pub use runner::Runner;
pub use stats::RunSummary;
pub use transform::{BucketAccumulator, BucketRecord};
