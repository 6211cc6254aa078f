//! Output file writers for year buckets

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use citeline_core::{Accumulator, CsvSink, ParquetSink};
use citeline_crossref::{BucketAccumulator, BucketRecord, YearBucket, schema};
use clap::ValueEnum;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Parquet,
    Csv,
}

impl OutputFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Parquet => "citations.parquet",
            Self::Csv => "citations.csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parquet => f.write_str("parquet"),
            Self::Csv => f.write_str("csv"),
        }
    }
}

/// Single output table; the file appears under its final name only on `finish`
pub enum BucketWriter {
    Parquet {
        sink: ParquetSink,
        acc: BucketAccumulator,
    },
    Csv(CsvSink),
}

impl BucketWriter {
    /// Create `<dir>/citations.<ext>` (directory created if missing)
    pub fn create(
        dir: &Path,
        format: OutputFormat,
        zstd_level: i32,
    ) -> io::Result<(Self, PathBuf)> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format.file_name());
        let schema = schema::citations();
        let writer = match format {
            OutputFormat::Parquet => Self::Parquet {
                sink: ParquetSink::new(&path, schema, zstd_level)?,
                acc: BucketAccumulator::new(),
            },
            OutputFormat::Csv => {
                let header: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
                Self::Csv(CsvSink::new(&path, &header)?)
            }
        };
        Ok((writer, path))
    }

    pub fn write(&mut self, buckets: &[YearBucket]) -> io::Result<()> {
        match self {
            Self::Parquet { sink, acc } => {
                for bucket in buckets {
                    acc.push(bucket.clone());
                    if acc.is_full() {
                        let batch = acc.take_batch().map_err(io::Error::other)?;
                        sink.write_batch(&batch)?;
                    }
                }
                Ok(())
            }
            Self::Csv(sink) => sink.write_rows(buckets.iter().map(BucketRecord::from)),
        }
    }

    /// Flush remaining rows and move the file into place. Returns rows written.
    pub fn finish(self) -> io::Result<usize> {
        match self {
            Self::Parquet { mut sink, mut acc } => {
                if !acc.is_empty() {
                    let batch = acc.take_batch().map_err(io::Error::other)?;
                    sink.write_batch(&batch)?;
                }
                sink.finalize()
            }
            Self::Csv(sink) => sink.finalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int32Array, StringArray};
    use citeline_crossref::PublishedYear;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    fn buckets() -> Vec<YearBucket> {
        [(2019, 2), (2021, 1)]
            .into_iter()
            .map(|(year, count)| YearBucket {
                source_identifier: "10.1038/nbt.3820".into(),
                source_title: "Nextflow, reproducible".into(),
                source_published: PublishedYear::Known(2017),
                total_citations: 3,
                year,
                citation_count: count,
            })
            .collect()
    }

    #[test]
    fn csv_output_has_header_and_rows() {
        let dir = TempDir::new().unwrap();
        let (mut writer, path) = BucketWriter::create(dir.path(), OutputFormat::Csv, 3).unwrap();
        writer.write(&buckets()).unwrap();
        assert_eq!(writer.finish().unwrap(), 2);

        assert_eq!(path, dir.path().join("citations.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "doi,title,published_year,total_citations,year,citation_count\n\
             10.1038/nbt.3820,\"Nextflow, reproducible\",2017,3,2019,2\n\
             10.1038/nbt.3820,\"Nextflow, reproducible\",2017,3,2021,1\n"
        );
    }

    #[test]
    fn csv_unknown_year_is_empty_field() {
        let dir = TempDir::new().unwrap();
        let (mut writer, path) = BucketWriter::create(dir.path(), OutputFormat::Csv, 3).unwrap();
        let mut rows = buckets();
        rows.truncate(1);
        rows[0].source_published = PublishedYear::Unknown;
        writer.write(&rows).unwrap();
        writer.finish().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("\"Nextflow, reproducible\",,3,2019,2\n"));
    }

    #[test]
    fn parquet_output_roundtrips_columns() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("nested/out");
        let (mut writer, path) = BucketWriter::create(&out, OutputFormat::Parquet, 3).unwrap();
        writer.write(&buckets()).unwrap();
        assert!(!path.exists());
        assert_eq!(writer.finish().unwrap(), 2);
        assert!(citeline_core::is_valid_parquet(&path));

        let file = std::fs::File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<_> = reader.map(|b| b.unwrap()).collect();
        assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 2);

        let batch = &batches[0];
        let doi = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(doi.value(1), "10.1038/nbt.3820");
        let years = batch
            .column(4)
            .as_any()
            .downcast_ref::<Int32Array>()
            .unwrap();
        assert_eq!(years.values().to_vec(), vec![2019, 2021]);
    }

    #[test]
    fn empty_run_still_writes_file() {
        let dir = TempDir::new().unwrap();
        let (writer, path) = BucketWriter::create(dir.path(), OutputFormat::Parquet, 3).unwrap();
        assert_eq!(writer.finish().unwrap(), 0);
        assert!(citeline_core::is_valid_parquet(&path));
    }

    #[test]
    fn format_parses_from_toml_and_cli() {
        #[derive(Deserialize)]
        struct Wrap {
            format: OutputFormat,
        }
        let w: Wrap = toml::from_str("format = \"csv\"").unwrap();
        assert_eq!(w.format, OutputFormat::Csv);
        assert_eq!(OutputFormat::from_str("parquet", true).unwrap(), OutputFormat::Parquet);
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }
}
