//! citeline - citation counts per publication year from Crossref
//!
//! Resolves each seed DOI, walks every work that references it, and writes
//! one row per (seed, citing year) to Parquet or CSV.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use citeline_core::{CancelToken, ProgressContext};

mod cmd;
mod config;
mod output;
mod seeds;

use config::Config;

#[derive(Parser)]
#[command(name = "citeline")]
#[command(about = "Citation counts per year for seed publications, from Crossref")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Config file path (default: ./citeline.toml or ~/.config/citeline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Maximum attempts per remote call
    #[arg(long, global = true)]
    max_retries: Option<u32>,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch per-year citation counts for seed DOIs
    Fetch(cmd::fetch::FetchArgs),
    /// Show current configuration
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Progress context (TTY auto-detect)
    let progress = ProgressContext::new();

    // Logging:
    //   TTY:     quiet (warn) unless --debug, spinners show activity
    //   non-TTY: info unless --debug, logs are the only progress indicator
    let is_tty = progress.is_tty();
    let multi = if is_tty { Some(progress.multi()) } else { None };
    let quiet = if is_tty { !cli.debug } else { false };
    citeline_core::init_logging(quiet, cli.debug, multi);

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Configuration error: {e:#}");
            return ExitCode::from(2);
        }
    };
    if let Some(secs) = cli.timeout {
        config.http.timeout_secs = secs;
    }
    if let Some(attempts) = cli.max_retries {
        config.http.max_retries = attempts;
    }

    match cli.command {
        Command::Fetch(args) => {
            let cancel = CancelToken::new();
            if let Err(e) = setup_signal_handler(&cancel) {
                log::error!("Failed to install signal handlers: {e}");
                return ExitCode::from(2);
            }
            match cmd::fetch::run(args, &config, &progress, cancel) {
                Ok(code) => code,
                Err(e) => {
                    log::error!("Fatal error: {e:#}");
                    ExitCode::from(2)
                }
            }
        }
        Command::Config => {
            print_config(&config);
            ExitCode::SUCCESS
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
}

fn setup_signal_handler(cancel: &CancelToken) -> std::io::Result<()> {
    // First signal: request cancellation, finish at the next safe point
    // Second signal: exit immediately
    // SAFETY: the handlers only swap an AtomicBool and call process::exit
    for signal in [signal_hook::consts::SIGTERM, signal_hook::consts::SIGINT] {
        let token = cancel.clone();
        unsafe {
            signal_hook::low_level::register(signal, move || {
                if token.cancel() {
                    std::process::exit(130);
                }
            })?;
        }
    }
    Ok(())
}

fn print_config(config: &Config) {
    use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

    let retrieval = config.retrieval();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Setting").fg(Color::Cyan),
            Cell::new("Value").fg(Color::Cyan),
        ]);

    table.add_row(vec!["Crossref base URL", &retrieval.base_url]);
    table.add_row(vec!["User-Agent", &retrieval.identity.user_agent()]);
    table.add_row(vec![
        "Mailto",
        if retrieval.identity.mailto.is_some() {
            "configured"
        } else {
            "not set"
        },
    ]);
    table.add_row(vec!["Rows per page", &retrieval.rows.to_string()]);
    table.add_row(vec![
        "Timeout",
        &format!("{}s", config.http.timeout_secs),
    ]);
    table.add_row(vec![
        "Retries",
        &format!(
            "{} attempts, {}ms base delay",
            config.http.max_retries, config.http.base_delay_ms
        ),
    ]);
    table.add_row(vec!["Page delay", &format!("{}ms", config.http.page_delay_ms)]);
    table.add_row(vec![
        "Output directory",
        &config.output.default_dir.display().to_string(),
    ]);
    table.add_row(vec!["Output format", &config.output.format.to_string()]);
    table.add_row(vec![
        "Compression level",
        &config.output.compression_level.to_string(),
    ]);

    eprintln!("\n{table}");
}
