//! Fetch subcommand - citation counts per year for a list of seed DOIs

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use citeline_core::{CancelToken, ProgressContext};
use citeline_crossref::{CrossrefClient, RunSummary, Runner};

use crate::config::{Config, check_rows};
use crate::output::{BucketWriter, OutputFormat};
use crate::seeds;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Seed DOIs (e.g. 10.1038/nbt.3820)
    pub dois: Vec<String>,

    /// File with one DOI per line (`#` comments allowed)
    #[arg(short = 'f', long)]
    pub seeds_file: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output file format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Zstd compression level (1-22, parquet only)
    #[arg(short, long)]
    pub zstd_level: Option<i32>,

    /// Contact address sent with every request (polite pool)
    #[arg(long)]
    pub mailto: Option<String>,

    /// Citing works requested per page
    #[arg(long)]
    pub rows: Option<usize>,
}

/// Exit status for a finished run: 130 cancelled, 1 some seed failed, else 0
pub fn exit_status(summary: &RunSummary) -> u8 {
    if summary.cancelled {
        130
    } else if summary.failed > 0 {
        1
    } else {
        0
    }
}

pub fn run(
    args: FetchArgs,
    config: &Config,
    progress: &ProgressContext,
    cancel: CancelToken,
) -> Result<ExitCode> {
    let seeds = seeds::collect(args.dois, args.seeds_file.as_deref())?;
    if seeds.is_empty() {
        anyhow::bail!("No seeds given: pass DOIs as arguments or use --seeds-file");
    }

    let mut retrieval = config.retrieval();
    if let Some(mailto) = args.mailto {
        retrieval.identity.mailto = Some(mailto);
    }
    if let Some(rows) = args.rows {
        retrieval.rows = check_rows(rows).context("Invalid --rows")?;
    }
    if retrieval.identity.mailto.is_none() {
        log::warn!("No mailto configured; requests will not use the polite pool");
    }

    let output_dir = args
        .output
        .unwrap_or_else(|| config.output.default_dir.clone());
    let format = args.format.unwrap_or(config.output.format);
    let zstd_level = args.zstd_level.unwrap_or(config.output.compression_level);

    log::info!("Fetching citations for {} seeds", seeds.len());
    log::info!("  API: {}", retrieval.base_url);
    log::info!("  User-Agent: {}", retrieval.identity.user_agent());
    log::info!("  Output: {} ({format})", output_dir.display());

    let client = CrossrefClient::new(&retrieval).context("Failed to build HTTP client")?;
    let (mut writer, path) = BucketWriter::create(&output_dir, format, zstd_level)
        .with_context(|| format!("Failed to create output in {}", output_dir.display()))?;

    let summary = Runner::new(&client, &retrieval)
        .with_cancel(cancel)
        .with_progress(progress)
        .run(&seeds, |buckets| writer.write(buckets))
        .with_context(|| format!("Failed writing {}", path.display()))?;

    // Completed seeds are kept even when the run was cut short
    let rows = writer
        .finish()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;

    if progress.is_tty() {
        progress.println(summary.format_table());
    } else {
        summary.log();
    }
    log::info!("Wrote {rows} rows to {}", path.display());

    Ok(ExitCode::from(exit_status(&summary)))
}
