//! Crossref REST wire format → domain types
//!
//! Responses are decoded into typed structs first; every optional field is
//! an explicit `Option`/`Vec` with a default. Year resolution walks an
//! ordered list of date sources and takes the first one that has a year.

use citeline_core::ApiError;
use serde::Deserialize;

use crate::model::{CitingEvent, Page, PublishedYear, SeedWork};

/// Fields requested from the search endpoint (`select=`)
pub const SEARCH_SELECT: &str =
    "DOI,title,published-print,published-online,created,type,container-title";

/// `{ "message": <work> }` from `GET /works/{doi}`
#[derive(Debug, Deserialize)]
pub struct WorkEnvelope {
    pub message: WireWork,
}

/// `{ "message": { "items": [...], "next-cursor": ... } }` from `GET /works?query=...`
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub message: SearchMessage,
}

#[derive(Debug, Deserialize)]
pub struct SearchMessage {
    pub items: Vec<WireWork>,
    #[serde(rename = "next-cursor", default)]
    pub next_cursor: Option<String>,
    #[serde(rename = "total-results", default)]
    pub total_results: Option<u64>,
}

/// Crossref work record (only the fields we read)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireWork {
    #[serde(rename = "DOI")]
    pub doi: Option<String>,
    pub title: Vec<String>,
    #[serde(rename = "published-print")]
    pub published_print: Option<WireDate>,
    #[serde(rename = "published-online")]
    pub published_online: Option<WireDate>,
    pub created: Option<WireDate>,
    #[serde(rename = "is-referenced-by-count")]
    pub is_referenced_by_count: Option<u64>,
    #[serde(rename = "type")]
    pub work_type: Option<String>,
    #[serde(rename = "container-title")]
    pub container_title: Vec<String>,
}

/// `{"date-parts": [[year, month, day]]}`; parts may be null
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WireDate {
    #[serde(rename = "date-parts")]
    pub date_parts: Vec<Vec<Option<i32>>>,
}

impl WireDate {
    pub fn year(&self) -> Option<i32> {
        self.date_parts.first()?.first().copied().flatten()
    }
}

type DateSource = fn(&WireWork) -> Option<&WireDate>;

fn published_print(w: &WireWork) -> Option<&WireDate> {
    w.published_print.as_ref()
}

fn published_online(w: &WireWork) -> Option<&WireDate> {
    w.published_online.as_ref()
}

fn created(w: &WireWork) -> Option<&WireDate> {
    w.created.as_ref()
}

/// Date sources in precedence order
const YEAR_SOURCES: [DateSource; 3] = [published_print, published_online, created];

impl WireWork {
    pub fn published_year(&self) -> PublishedYear {
        YEAR_SOURCES
            .iter()
            .find_map(|source| source(self).and_then(WireDate::year))
            .into()
    }

    pub fn first_title(&self) -> String {
        self.title.first().cloned().unwrap_or_default()
    }

    /// Seed metadata; the requested identifier is kept as the source id
    pub fn into_seed(self, identifier: &str) -> SeedWork {
        SeedWork {
            identifier: identifier.to_string(),
            title: self.first_title(),
            published: self.published_year(),
            total_citations: self.is_referenced_by_count.unwrap_or(0),
        }
    }

    pub fn into_event(self) -> CitingEvent {
        let published = self.published_year();
        CitingEvent {
            citing_identifier: self.doi.unwrap_or_default(),
            published,
            work_type: self.work_type,
            container_title: self.container_title.into_iter().next(),
        }
    }
}

impl SearchMessage {
    pub fn into_page(self) -> Page {
        Page {
            items: self.items.into_iter().map(WireWork::into_event).collect(),
            next_cursor: self.next_cursor.filter(|c| !c.is_empty()),
            total_results: self.total_results,
        }
    }
}

pub fn decode_work(body: &str, identifier: &str) -> Result<SeedWork, ApiError> {
    let envelope: WorkEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::Decode(format!("work {identifier}: {e}")))?;
    Ok(envelope.message.into_seed(identifier))
}

pub fn decode_page(body: &str) -> Result<Page, ApiError> {
    let envelope: SearchEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::Decode(format!("search page: {e}")))?;
    Ok(envelope.message.into_page())
}
