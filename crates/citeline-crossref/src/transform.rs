//! Year buckets → output rows (Arrow record batches and CSV records)

use std::sync::Arc;

use arrow::array::{ArrayRef, Int32Array, RecordBatch, StringArray, UInt64Array};
use arrow::datatypes::Schema;
use arrow::error::ArrowError;
use citeline_core::Accumulator;
use citeline_core::accumulator::DEFAULT_BATCH_SIZE;
use serde::Serialize;

use crate::model::YearBucket;
use crate::schema;

/// Flat CSV record; column names match the Parquet schema
#[derive(Debug, Serialize)]
pub struct BucketRecord<'a> {
    pub doi: &'a str,
    pub title: &'a str,
    pub published_year: Option<i32>,
    pub total_citations: u64,
    pub year: i32,
    pub citation_count: u64,
}

impl<'a> From<&'a YearBucket> for BucketRecord<'a> {
    fn from(b: &'a YearBucket) -> Self {
        Self {
            doi: &b.source_identifier,
            title: &b.source_title,
            published_year: b.source_published.known(),
            total_citations: b.total_citations,
            year: b.year,
            citation_count: b.citation_count,
        }
    }
}

pub struct BucketAccumulator {
    schema: Arc<Schema>,
    doi: Vec<String>,
    title: Vec<String>,
    published_year: Vec<Option<i32>>,
    total_citations: Vec<u64>,
    year: Vec<i32>,
    citation_count: Vec<u64>,
}

impl BucketAccumulator {
    pub fn new() -> Self {
        Self {
            schema: schema::citations().clone(),
            doi: Vec::with_capacity(DEFAULT_BATCH_SIZE),
            title: Vec::with_capacity(DEFAULT_BATCH_SIZE),
            published_year: Vec::with_capacity(DEFAULT_BATCH_SIZE),
            total_citations: Vec::with_capacity(DEFAULT_BATCH_SIZE),
            year: Vec::with_capacity(DEFAULT_BATCH_SIZE),
            citation_count: Vec::with_capacity(DEFAULT_BATCH_SIZE),
        }
    }
}

impl Default for BucketAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for BucketAccumulator {
    type Row = YearBucket;

    fn push(&mut self, row: YearBucket) {
        self.doi.push(row.source_identifier);
        self.title.push(row.source_title);
        self.published_year.push(row.source_published.known());
        self.total_citations.push(row.total_citations);
        self.year.push(row.year);
        self.citation_count.push(row.citation_count);
    }

    fn len(&self) -> usize {
        self.doi.len()
    }

    fn take_batch(&mut self) -> Result<RecordBatch, ArrowError> {
        let arrays: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(std::mem::take(&mut self.doi))),
            Arc::new(StringArray::from(std::mem::take(&mut self.title))),
            Arc::new(Int32Array::from(std::mem::take(&mut self.published_year))),
            Arc::new(UInt64Array::from(std::mem::take(&mut self.total_citations))),
            Arc::new(Int32Array::from(std::mem::take(&mut self.year))),
            Arc::new(UInt64Array::from(std::mem::take(&mut self.citation_count))),
        ];
        RecordBatch::try_new(self.schema.clone(), arrays)
    }
}
