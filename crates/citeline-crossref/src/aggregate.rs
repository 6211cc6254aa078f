//! Fold citing events into per-year citation counts

use std::collections::BTreeMap;

use chrono::Datelike;

use crate::model::{CitingEvent, PublishedYear, SeedWork, YearBucket};

/// Calendar year used for the zero-citation bucket
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Running year → count map for one seed.
///
/// Owned by a single seed's retrieval; events without a resolvable year
/// are dropped (tracked in [`undated`](Self::undated) only).
#[derive(Debug)]
pub struct YearAggregator {
    seed: SeedWork,
    counts: BTreeMap<i32, u64>,
    seen: usize,
    undated: usize,
}

impl YearAggregator {
    pub fn new(seed: SeedWork) -> Self {
        Self {
            seed,
            counts: BTreeMap::new(),
            seen: 0,
            undated: 0,
        }
    }

    pub fn push(&mut self, event: &CitingEvent) {
        self.seen += 1;
        match event.published {
            PublishedYear::Known(year) => *self.counts.entry(year).or_insert(0) += 1,
            PublishedYear::Unknown => {
                self.undated += 1;
                log::trace!(
                    "{}: undated citing work {} ({}, in {})",
                    self.seed.identifier,
                    event.citing_identifier,
                    event.work_type.as_deref().unwrap_or("unknown type"),
                    event.container_title.as_deref().unwrap_or("no container")
                );
            }
        }
    }

    pub fn extend(&mut self, events: &[CitingEvent]) {
        for event in events {
            self.push(event);
        }
    }

    /// Events pushed so far
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Events dropped for lack of a year
    pub fn undated(&self) -> usize {
        self.undated
    }

    pub fn seed(&self) -> &SeedWork {
        &self.seed
    }

    /// One bucket per observed year, ascending.
    ///
    /// A seed with no citations yields a single zero bucket dated
    /// `current_year`, whatever was pushed.
    pub fn finish(self, current_year: i32) -> Vec<YearBucket> {
        let seed = self.seed;
        if seed.total_citations == 0 {
            return vec![bucket(&seed, current_year, 0)];
        }
        self.counts
            .into_iter()
            .map(|(year, count)| bucket(&seed, year, count))
            .collect()
    }
}

fn bucket(seed: &SeedWork, year: i32, citation_count: u64) -> YearBucket {
    YearBucket {
        source_identifier: seed.identifier.clone(),
        source_title: seed.title.clone(),
        source_published: seed.published,
        total_citations: seed.total_citations,
        year,
        citation_count,
    }
}

/// Fold a complete event sequence for `seed` into year buckets
pub fn fold(
    seed: SeedWork,
    events: impl IntoIterator<Item = CitingEvent>,
    current_year: i32,
) -> Vec<YearBucket> {
    let mut agg = YearAggregator::new(seed);
    for event in events {
        agg.push(&event);
    }
    agg.finish(current_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{events, seed};

    #[test]
    fn counts_sorted_ascending() {
        let buckets = fold(
            seed("10.1/a", 6),
            events(&[Some(2021), Some(2019), Some(2021), Some(2020), Some(2019), Some(2021)]),
            2030,
        );
        let pairs: Vec<(i32, u64)> = buckets.iter().map(|b| (b.year, b.citation_count)).collect();
        assert_eq!(pairs, vec![(2019, 2), (2020, 1), (2021, 3)]);
        assert!(buckets.windows(2).all(|w| w[0].year < w[1].year));
    }

    #[test]
    fn buckets_carry_seed_fields() {
        let s = seed("10.1/a", 2);
        let buckets = fold(s.clone(), events(&[Some(2019), Some(2019)]), 2030);
        assert_eq!(buckets.len(), 1);
        let b = &buckets[0];
        assert_eq!(b.source_identifier, s.identifier);
        assert_eq!(b.source_title, s.title);
        assert_eq!(b.source_published, s.published);
        assert_eq!(b.total_citations, 2);
        assert_eq!((b.year, b.citation_count), (2019, 2));
    }

    #[test]
    fn undated_events_dropped() {
        let mut agg = YearAggregator::new(seed("10.1/a", 4));
        agg.extend(&events(&[Some(2018), None, None, Some(2018)]));
        assert_eq!(agg.seen(), 4);
        assert_eq!(agg.undated(), 2);

        let buckets = agg.finish(2030);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].citation_count, 2);
    }

    #[test]
    fn only_undated_events_yield_nothing() {
        let buckets = fold(seed("10.1/a", 3), events(&[None, None]), 2030);
        assert!(buckets.is_empty());
    }

    #[test]
    fn zero_citations_synthetic_bucket() {
        let buckets = fold(seed("10.1/z", 0), Vec::new(), 2026);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].year, 2026);
        assert_eq!(buckets[0].citation_count, 0);
        assert_eq!(buckets[0].source_identifier, "10.1/z");
    }

    #[test]
    fn zero_citations_ignores_stray_events() {
        let buckets = fold(seed("10.1/z", 0), events(&[Some(2019), Some(2020)]), 2026);
        assert_eq!(buckets.len(), 1);
        assert_eq!((buckets[0].year, buckets[0].citation_count), (2026, 0));
    }

    #[test]
    fn counts_across_batches_accumulate() {
        let mut agg = YearAggregator::new(seed("10.1/a", 3));
        agg.extend(&events(&[Some(2019), Some(2020)]));
        agg.extend(&events(&[Some(2019)]));
        let counts: Vec<u64> = agg.finish(2030).iter().map(|b| b.citation_count).collect();
        assert_eq!(counts, vec![2, 1]);
    }

    #[test]
    fn current_year_is_plausible() {
        assert!(current_year() >= 2024);
    }
}
