//! Cursor-driven walk over a citing-works result set
//!
//! [`CitingPages`] is a lazy, finite, non-restartable iterator of event
//! batches. It yields one `Ok(batch)` per non-empty page and returns `None`
//! once the service reports an empty page or stops handing out cursors.
//! An error is yielded once and ends the walk.

use std::time::Duration;

use citeline_core::{CancelToken, Sleeper};

use crate::client::WorksApi;
use crate::error::RetrievalError;
use crate::model::CitingEvent;

/// Cursor value that starts a fresh deep-paging walk
pub const START_CURSOR: &str = "*";

#[derive(Debug)]
enum State {
    Active { cursor: String },
    Done,
}

pub struct CitingPages<'a, A: WorksApi + ?Sized> {
    api: &'a A,
    identifier: &'a str,
    rows: usize,
    page_delay: Duration,
    sleeper: &'a dyn Sleeper,
    cancel: &'a CancelToken,
    state: State,
    pages_fetched: usize,
}

impl<'a, A: WorksApi + ?Sized> CitingPages<'a, A> {
    pub fn new(
        api: &'a A,
        identifier: &'a str,
        rows: usize,
        page_delay: Duration,
        sleeper: &'a dyn Sleeper,
        cancel: &'a CancelToken,
    ) -> Self {
        Self {
            api,
            identifier,
            rows,
            page_delay,
            sleeper,
            cancel,
            state: State::Active {
                cursor: START_CURSOR.to_string(),
            },
            pages_fetched: 0,
        }
    }

    /// Search requests issued so far (including the final empty page)
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<A: WorksApi + ?Sized> Iterator for CitingPages<'_, A> {
    type Item = Result<Vec<CitingEvent>, RetrievalError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Every exit below leaves the state Done unless a next cursor is adopted
        let cursor = match std::mem::replace(&mut self.state, State::Done) {
            State::Active { cursor } => cursor,
            State::Done => return None,
        };

        // Rate limit: fixed pause between pages, not before the first
        if self.pages_fetched > 0 {
            self.sleeper.sleep(self.page_delay);
        }
        if self.cancel.is_cancelled() {
            return Some(Err(RetrievalError::Cancelled));
        }

        let page = match self
            .api
            .search_citing_works(self.identifier, &cursor, self.rows)
        {
            Ok(page) => page,
            Err(e) => return Some(Err(RetrievalError::Api(e))),
        };
        self.pages_fetched += 1;
        log::debug!(
            "{}: page {} with {} items (total {:?})",
            self.identifier,
            self.pages_fetched,
            page.items.len(),
            page.total_results
        );

        if page.items.is_empty() {
            return None;
        }
        if let Some(next) = page.next_cursor {
            self.state = State::Active { cursor: next };
        }
        Some(Ok(page.items))
    }
}
