use citeline_core::Accumulator;
use citeline_crossref::wire::decode_page;
use citeline_crossref::{BucketAccumulator, CitingEvent, PublishedYear, SeedWork, fold};

const EVENTS: usize = 50_000;

fn seed() -> SeedWork {
    SeedWork {
        identifier: "10.1038/nbt.3820".into(),
        title: "Nextflow enables reproducible computational workflows".into(),
        published: PublishedYear::Known(2017),
        total_citations: EVENTS as u64,
    }
}

/// Deterministic spread over 1990..2026 with every 97th event undated
fn synthetic_events(n: usize) -> Vec<CitingEvent> {
    (0..n)
        .map(|i| {
            let published = if i % 97 == 0 {
                PublishedYear::Unknown
            } else {
                PublishedYear::Known(1990 + ((i * 7919) % 36) as i32)
            };
            CitingEvent::new(format!("10.9999/bench.{i}"), published)
        })
        .collect()
}

fn synthetic_page(rows: usize) -> String {
    let items: Vec<String> = (0..rows)
        .map(|i| {
            format!(
                r#"{{"DOI":"10.9999/bench.{i}","type":"journal-article","container-title":["Journal"],"published-print":{{"date-parts":[[{},3,1]]}}}}"#,
                2000 + i % 25
            )
        })
        .collect();
    format!(
        r#"{{"status":"ok","message":{{"total-results":{rows},"next-cursor":"AoJ/bench","items":[{}]}}}}"#,
        items.join(",")
    )
}

#[divan::bench]
fn decode_search_page(bencher: divan::Bencher) {
    let body = synthetic_page(100);
    bencher.bench(|| decode_page(&body).unwrap());
}

#[divan::bench]
fn fold_events(bencher: divan::Bencher) {
    let events = synthetic_events(EVENTS);
    bencher.bench(|| fold(seed(), events.iter().cloned(), 2026));
}

#[divan::bench]
fn accumulator_buckets(bencher: divan::Bencher) {
    let buckets = fold(seed(), synthetic_events(EVENTS), 2026);
    bencher.bench(|| {
        let mut acc = BucketAccumulator::new();
        for b in &buckets {
            acc.push(b.clone());
        }
        acc.take_batch().unwrap()
    });
}

fn main() {
    divan::main();
}
