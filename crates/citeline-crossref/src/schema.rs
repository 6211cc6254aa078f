//! Arrow schema for the citation output table

use std::sync::{Arc, LazyLock};

use arrow::datatypes::{DataType, Field, Schema};

/// citations.parquet, one row per (source DOI, citing year)
pub fn citations() -> &'static Arc<Schema> {
    static SCHEMA: LazyLock<Arc<Schema>> = LazyLock::new(|| {
        Arc::new(Schema::new(vec![
            Field::new("doi", DataType::Utf8, false),
            Field::new("title", DataType::Utf8, false),
            Field::new("published_year", DataType::Int32, true),
            Field::new("total_citations", DataType::UInt64, false),
            Field::new("year", DataType::Int32, false),
            Field::new("citation_count", DataType::UInt64, false),
        ]))
    });
    &SCHEMA
}
