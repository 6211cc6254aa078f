//! Domain types: resolved seeds, citing events, year buckets

use std::fmt;

/// Publication year of a work, if any date source could be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PublishedYear {
    Known(i32),
    Unknown,
}

impl PublishedYear {
    pub fn known(self) -> Option<i32> {
        match self {
            Self::Known(y) => Some(y),
            Self::Unknown => None,
        }
    }
}

impl From<Option<i32>> for PublishedYear {
    fn from(year: Option<i32>) -> Self {
        year.map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for PublishedYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(y) => write!(f, "{y}"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

/// Canonical metadata of a seed work. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedWork {
    pub identifier: String,
    /// First title, or empty
    pub title: String,
    pub published: PublishedYear,
    /// Service-reported cited-by count
    pub total_citations: u64,
}

/// One work that references a seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitingEvent {
    pub citing_identifier: String,
    pub published: PublishedYear,
    pub work_type: Option<String>,
    pub container_title: Option<String>,
}

impl CitingEvent {
    pub fn new(citing_identifier: impl Into<String>, published: PublishedYear) -> Self {
        Self {
            citing_identifier: citing_identifier.into(),
            published,
            work_type: None,
            container_title: None,
        }
    }
}

/// Citation count for one (source, year) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearBucket {
    pub source_identifier: String,
    pub source_title: String,
    pub source_published: PublishedYear,
    pub total_citations: u64,
    pub year: i32,
    pub citation_count: u64,
}

/// One page of a citing-works search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<CitingEvent>,
    /// Continuation cursor; `None` when the result set is exhausted
    pub next_cursor: Option<String>,
    /// Size of the whole result set, when the service reports it
    pub total_results: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_year_from_option() {
        assert_eq!(PublishedYear::from(Some(2019)), PublishedYear::Known(2019));
        assert_eq!(PublishedYear::from(None), PublishedYear::Unknown);
        assert_eq!(PublishedYear::Known(2019).known(), Some(2019));
        assert_eq!(PublishedYear::Unknown.known(), None);
    }

    #[test]
    fn published_year_display() {
        assert_eq!(PublishedYear::Known(2001).to_string(), "2001");
        assert_eq!(PublishedYear::Unknown.to_string(), "unknown");
    }
}
