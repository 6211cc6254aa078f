//! Output sinks: Parquet and CSV file writers with atomic tmp→rename

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::RecordBatch;
use arrow::datatypes::Schema;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use serde::Serialize;

/// `<final>.tmp` next to the final path; a stale one is removed first.
fn tmp_path_for(final_path: &Path) -> io::Result<PathBuf> {
    let mut name = final_path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name"))?
        .to_os_string();
    name.push(".tmp");
    let tmp_path = final_path.with_file_name(name);
    if tmp_path.exists() {
        log::warn!("Removing stale tmp file: {}", tmp_path.display());
        fs::remove_file(&tmp_path)?;
    }
    Ok(tmp_path)
}

/// Buffered parquet writer with atomic tmp→rename
pub struct ParquetSink {
    writer: ArrowWriter<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    row_count: usize,
}

impl std::fmt::Debug for ParquetSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetSink")
            .field("final_path", &self.final_path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl ParquetSink {
    /// Create a new sink writing to a temporary file beside `final_path`
    pub fn new(final_path: &Path, schema: &Schema, zstd_level: i32) -> io::Result<Self> {
        let tmp_path = tmp_path_for(final_path)?;
        let file = File::create(&tmp_path)?;
        let level = ZstdLevel::try_new(zstd_level)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let props = WriterProperties::builder()
            .set_compression(Compression::ZSTD(level))
            .build();

        let writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))
            .map_err(io::Error::other)?;

        Ok(Self {
            writer,
            tmp_path,
            final_path: final_path.to_path_buf(),
            row_count: 0,
        })
    }

    /// Write a record batch
    pub fn write_batch(&mut self, batch: &RecordBatch) -> io::Result<()> {
        self.row_count += batch.num_rows();
        self.writer.write(batch).map_err(io::Error::other)
    }

    /// Finalize: flush footer and atomically rename tmp → final
    pub fn finalize(self) -> io::Result<usize> {
        let row_count = self.row_count;
        self.writer.close().map_err(io::Error::other)?;
        fs::rename(&self.tmp_path, &self.final_path)?;
        Ok(row_count)
    }
}

/// Check if a completed parquet file exists and has a valid footer
pub fn is_valid_parquet(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    parquet::file::reader::SerializedFileReader::new(file).is_ok()
}

/// CSV writer for serde rows with atomic tmp→rename.
///
/// The header is written up front, so a run with no rows still yields a
/// well-formed file. Row field order must match it.
pub struct CsvSink {
    writer: csv::Writer<File>,
    tmp_path: PathBuf,
    final_path: PathBuf,
    row_count: usize,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("final_path", &self.final_path)
            .field("row_count", &self.row_count)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    pub fn new(final_path: &Path, header: &[&str]) -> io::Result<Self> {
        let tmp_path = tmp_path_for(final_path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp_path)
            .map_err(io::Error::other)?;
        writer.write_record(header).map_err(io::Error::other)?;
        Ok(Self {
            writer,
            tmp_path,
            final_path: final_path.to_path_buf(),
            row_count: 0,
        })
    }

    pub fn write_rows<T: Serialize>(
        &mut self,
        rows: impl IntoIterator<Item = T>,
    ) -> io::Result<()> {
        for row in rows {
            self.writer.serialize(row).map_err(io::Error::other)?;
            self.row_count += 1;
        }
        Ok(())
    }

    pub fn finalize(mut self) -> io::Result<usize> {
        self.writer.flush()?;
        drop(self.writer);
        fs::rename(&self.tmp_path, &self.final_path)?;
        Ok(self.row_count)
    }
}
