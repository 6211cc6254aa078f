//! In-memory `WorksApi` with scripted responses, for unit tests

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use citeline_core::{ApiError, Sleeper};

use crate::client::WorksApi;
use crate::model::{CitingEvent, Page, PublishedYear, SeedWork};

type LookupResult = Result<Option<SeedWork>, ApiError>;
type PageResult = Result<Page, ApiError>;

/// Responses are consumed in order; an unscripted search returns an empty page.
#[derive(Default)]
pub struct ScriptedApi {
    lookups: RefCell<HashMap<String, VecDeque<LookupResult>>>,
    pages: RefCell<HashMap<String, VecDeque<PageResult>>>,
    search_calls: RefCell<Vec<(String, String)>>,
    lookup_calls: RefCell<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(self, seed: SeedWork) -> Self {
        let id = seed.identifier.clone();
        self.lookup(&id, Ok(Some(seed)))
    }

    pub fn not_found(self, identifier: &str) -> Self {
        self.lookup(identifier, Ok(None))
    }

    pub fn lookup(self, identifier: &str, result: LookupResult) -> Self {
        self.lookups
            .borrow_mut()
            .entry(identifier.to_string())
            .or_default()
            .push_back(result);
        self
    }

    pub fn pages(self, identifier: &str, script: Vec<PageResult>) -> Self {
        self.pages
            .borrow_mut()
            .entry(identifier.to_string())
            .or_default()
            .extend(script);
        self
    }

    /// Cursors sent for `identifier`, in call order
    pub fn cursors_for(&self, identifier: &str) -> Vec<String> {
        self.search_calls
            .borrow()
            .iter()
            .filter(|(id, _)| id == identifier)
            .map(|(_, cursor)| cursor.clone())
            .collect()
    }

    pub fn lookup_calls(&self) -> Vec<String> {
        self.lookup_calls.borrow().clone()
    }
}

impl WorksApi for ScriptedApi {
    fn lookup_work(&self, identifier: &str) -> Result<Option<SeedWork>, ApiError> {
        self.lookup_calls.borrow_mut().push(identifier.to_string());
        self.lookups
            .borrow_mut()
            .get_mut(identifier)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Ok(None))
    }

    fn search_citing_works(
        &self,
        identifier: &str,
        cursor: &str,
        _rows: usize,
    ) -> Result<Page, ApiError> {
        self.search_calls
            .borrow_mut()
            .push((identifier.to_string(), cursor.to_string()));
        self.pages
            .borrow_mut()
            .get_mut(identifier)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(Page::default()))
    }
}

#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

pub fn seed(identifier: &str, total_citations: u64) -> SeedWork {
    SeedWork {
        identifier: identifier.to_string(),
        title: format!("Title of {identifier}"),
        published: PublishedYear::Known(2012),
        total_citations,
    }
}

/// One event per entry, with generated citing DOIs
pub fn events(years: &[Option<i32>]) -> Vec<CitingEvent> {
    years
        .iter()
        .enumerate()
        .map(|(i, y)| CitingEvent::new(format!("10.9999/citing.{i}"), PublishedYear::from(*y)))
        .collect()
}

pub fn page(items: Vec<CitingEvent>, next_cursor: Option<&str>) -> Page {
    Page {
        items,
        next_cursor: next_cursor.map(String::from),
        total_results: None,
    }
}

pub fn unavailable() -> ApiError {
    ApiError::Http {
        status: Some(503),
        message: "service unavailable".into(),
    }
}
