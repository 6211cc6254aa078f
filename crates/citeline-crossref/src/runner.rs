//! Seed-by-seed orchestration: lookup → walk citing pages → fold → emit

use std::collections::HashSet;
use std::io;
use std::time::{Duration, Instant};

use citeline_core::{ApiError, CancelToken, ProgressContext, Sleeper, ThreadSleeper, fmt_num};
use indicatif::ProgressBar;

use crate::aggregate::{YearAggregator, current_year};
use crate::client::WorksApi;
use crate::config::Config;
use crate::error::RetrievalError;
use crate::model::YearBucket;
use crate::paginator::CitingPages;
use crate::stats::RunSummary;

static THREAD_SLEEPER: ThreadSleeper = ThreadSleeper;

/// Completed seed, ready to emit
struct SeedResult {
    buckets: Vec<YearBucket>,
    events: usize,
    undated: usize,
    pages: usize,
}

enum SeedOutcome {
    Completed(SeedResult),
    NotFound,
    Failed(ApiError),
    Cancelled,
}

/// Sequential pipeline over a seed list.
///
/// Seeds are processed strictly in input order. A seed's buckets reach the
/// sink only after its whole result set was walked; a failed or
/// interrupted seed contributes nothing.
pub struct Runner<'a, A: WorksApi + ?Sized> {
    api: &'a A,
    rows: usize,
    page_delay: Duration,
    sleeper: &'a dyn Sleeper,
    cancel: CancelToken,
    progress: Option<&'a ProgressContext>,
    current_year: i32,
}

impl<'a, A: WorksApi + ?Sized> Runner<'a, A> {
    pub fn new(api: &'a A, config: &Config) -> Self {
        Self {
            api,
            rows: config.rows,
            page_delay: config.page_delay,
            sleeper: &THREAD_SLEEPER,
            cancel: CancelToken::new(),
            progress: None,
            current_year: current_year(),
        }
    }

    /// Replace how the inter-page delay waits
    pub fn with_sleeper(mut self, sleeper: &'a dyn Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, progress: &'a ProgressContext) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Year stamped on zero-citation buckets (defaults to today's)
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Process every seed, handing each completed seed's buckets to `emit`.
    ///
    /// Per-seed failures are logged and counted, never propagated. Only a
    /// sink error from `emit` aborts the run with `Err`. A repeated
    /// identifier is skipped, so each (source, year) is emitted at most once.
    pub fn run<S: AsRef<str>>(
        &self,
        seeds: &[S],
        mut emit: impl FnMut(&[YearBucket]) -> io::Result<()>,
    ) -> io::Result<RunSummary> {
        let start = Instant::now();
        let mut summary = RunSummary {
            total_seeds: seeds.len(),
            ..Default::default()
        };
        let mut processed: HashSet<&str> = HashSet::with_capacity(seeds.len());

        for (idx, seed) in seeds.iter().enumerate() {
            let identifier = seed.as_ref();
            if self.cancel.is_cancelled() {
                log::warn!(
                    "Cancellation requested, {} of {} seeds not started",
                    seeds.len() - idx,
                    seeds.len()
                );
                summary.cancelled = true;
                break;
            }
            if !processed.insert(identifier) {
                log::warn!("{identifier}: duplicate seed, already processed in this run");
                summary.skipped += 1;
                continue;
            }

            let pb = self.seed_line(identifier);
            let outcome = self.process_seed(identifier, &pb);
            pb.finish_and_clear();

            match outcome {
                SeedOutcome::Completed(result) => {
                    emit(&result.buckets)?;
                    log::info!(
                        "{identifier}: {} citing works over {} years ({} undated, {} pages)",
                        fmt_num(result.events),
                        result.buckets.len(),
                        result.undated,
                        result.pages
                    );
                    summary.succeeded += 1;
                    summary.buckets_written += result.buckets.len();
                    summary.citing_events += result.events;
                    summary.undated_events += result.undated;
                    summary.pages_fetched += result.pages;
                }
                SeedOutcome::NotFound => {
                    log::warn!("{identifier}: no record found, skipping");
                    summary.skipped += 1;
                }
                SeedOutcome::Failed(e) => {
                    log::error!("{identifier}: failed: {e}");
                    summary.failed += 1;
                    summary.failures.push((identifier.to_string(), e.to_string()));
                }
                SeedOutcome::Cancelled => {
                    log::warn!("{identifier}: cancelled, partial results discarded");
                    summary.cancelled = true;
                    summary.interrupted = Some(identifier.to_string());
                    break;
                }
            }
        }

        summary.elapsed = start.elapsed();
        Ok(summary)
    }

    fn seed_line(&self, identifier: &str) -> ProgressBar {
        match self.progress {
            Some(progress) => progress.seed_line(identifier),
            None => ProgressBar::hidden(),
        }
    }

    fn process_seed(&self, identifier: &str, pb: &ProgressBar) -> SeedOutcome {
        pb.set_message("resolving...");
        let seed = match self.api.lookup_work(identifier) {
            Ok(Some(seed)) => seed,
            Ok(None) => return SeedOutcome::NotFound,
            Err(e) => return SeedOutcome::Failed(e),
        };
        log::debug!(
            "{identifier}: \"{}\" ({}), {} citations reported",
            seed.title,
            seed.published,
            seed.total_citations
        );

        let mut agg = YearAggregator::new(seed);
        let mut pages_fetched = 0;

        // Nothing cites it: skip the search, the aggregator emits the zero bucket
        if agg.seed().total_citations > 0 {
            let mut pages = CitingPages::new(
                self.api,
                identifier,
                self.rows,
                self.page_delay,
                self.sleeper,
                &self.cancel,
            );
            while let Some(batch) = pages.next() {
                match batch {
                    Ok(events) => {
                        agg.extend(&events);
                        pb.set_message(format!(
                            "page {}, {} citing works",
                            pages.pages_fetched(),
                            fmt_num(agg.seen())
                        ));
                    }
                    Err(RetrievalError::Cancelled) => return SeedOutcome::Cancelled,
                    Err(RetrievalError::Api(e)) => return SeedOutcome::Failed(e),
                }
            }
            pages_fetched = pages.pages_fetched();
        }

        let events = agg.seen();
        let undated = agg.undated();
        SeedOutcome::Completed(SeedResult {
            buckets: agg.finish(self.current_year),
            events,
            undated,
            pages: pages_fetched,
        })
    }
}
