//! Run summary: how many seeds succeeded, were skipped, or failed

use std::time::Duration;

use citeline_core::fmt_num;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

/// Outcome counts for one run over a seed list.
///
/// `skipped` = the service has no record for the seed, or the seed repeats
/// one already processed (not an error);
/// `failed` = retries exhausted or request rejected for that seed.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total_seeds: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Run stopped early on external cancellation
    pub cancelled: bool,
    /// Seed whose walk was cut short by cancellation (results discarded)
    pub interrupted: Option<String>,
    pub buckets_written: usize,
    pub citing_events: usize,
    /// Citing works dropped for lack of a publication year
    pub undated_events: usize,
    pub pages_fetched: usize,
    /// (seed, error) for every failed seed
    pub failures: Vec<(String, String)>,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Seeds never started because the run was cancelled
    pub fn not_started(&self) -> usize {
        let finished = self.succeeded + self.skipped + self.failed;
        let interrupted = usize::from(self.interrupted.is_some());
        self.total_seeds.saturating_sub(finished + interrupted)
    }

    /// No failures and no cancellation
    pub fn is_clean(&self) -> bool {
        self.failed == 0 && !self.cancelled
    }

    /// Format summary table as a string.
    pub fn format_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![
                Cell::new("Citation retrieval")
                    .fg(Color::Cyan)
                    .add_attribute(comfy_table::Attribute::Bold),
                Cell::new("Value").fg(Color::Cyan),
            ]);

        table.add_row(vec![
            Cell::new("Seeds"),
            Cell::new(fmt_num(self.total_seeds)),
        ]);
        table.add_row(vec![
            Cell::new("Succeeded").fg(Color::Green),
            Cell::new(fmt_num(self.succeeded)).fg(Color::Green),
        ]);
        table.add_row(vec![
            Cell::new("Skipped (not found / repeated)"),
            Cell::new(fmt_num(self.skipped)),
        ]);
        let failed_color = if self.failed > 0 { Color::Red } else { Color::Reset };
        table.add_row(vec![
            Cell::new("Failed").fg(failed_color),
            Cell::new(fmt_num(self.failed)).fg(failed_color),
        ]);
        if self.cancelled {
            table.add_row(vec![
                Cell::new("Cancelled").fg(Color::Yellow),
                Cell::new(self.cancellation_note()).fg(Color::Yellow),
            ]);
        }
        table.add_row(vec![
            Cell::new("Pages fetched"),
            Cell::new(fmt_num(self.pages_fetched)),
        ]);
        table.add_row(vec![
            Cell::new("Citing works"),
            Cell::new(format!(
                "{} ({} undated)",
                fmt_num(self.citing_events),
                fmt_num(self.undated_events)
            )),
        ]);
        table.add_row(vec![
            Cell::new("Year buckets"),
            Cell::new(fmt_num(self.buckets_written)),
        ]);
        table.add_row(vec![
            Cell::new("Elapsed"),
            Cell::new(format!("{:.1}s", self.elapsed.as_secs_f64())),
        ]);

        format!("\n{table}")
    }

    fn cancellation_note(&self) -> String {
        let not_started = format!("{} not started", fmt_num(self.not_started()));
        match &self.interrupted {
            Some(seed) => format!("{seed} interrupted, {not_started}"),
            None => not_started,
        }
    }

    /// Log minimal summary (non-TTY mode).
    pub fn log(&self) {
        log::info!(
            "Run complete: {} succeeded, {} skipped, {} failed of {} seeds; {} buckets [{:.1}s]",
            self.succeeded,
            self.skipped,
            self.failed,
            self.total_seeds,
            self.buckets_written,
            self.elapsed.as_secs_f64()
        );
        for (seed, err) in &self.failures {
            log::info!("  failed {seed}: {err}");
        }
        if self.cancelled {
            log::warn!("Run cancelled: {}", self.cancellation_note());
        }
    }
}
