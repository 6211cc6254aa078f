//! Crossref REST API client

use std::sync::Arc;

use reqwest::Url;

use citeline_core::{ApiError, RetryPolicy, Sleeper, ThreadSleeper, build_client, fetch_text};

use crate::config::Config;
use crate::model::{Page, SeedWork};
use crate::wire::{SEARCH_SELECT, decode_page, decode_work};

/// The two remote queries the pipeline needs.
///
/// Implementations own their retry behaviour: an `Err` returned here is
/// final for the current seed.
pub trait WorksApi {
    /// Canonical record for one identifier; `Ok(None)` when the service has none
    fn lookup_work(&self, identifier: &str) -> Result<Option<SeedWork>, ApiError>;

    /// One page of works whose reference list contains `identifier`
    fn search_citing_works(
        &self,
        identifier: &str,
        cursor: &str,
        rows: usize,
    ) -> Result<Page, ApiError>;
}

/// Blocking Crossref client. Build once per run and share by reference.
pub struct CrossrefClient {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for CrossrefClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossrefClient")
            .field("base_url", &self.base_url.as_str())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl CrossrefClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::Http {
            status: None,
            message: format!("invalid base URL {:?}: {e}", config.base_url),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Http {
                status: None,
                message: format!("base URL {:?} cannot carry a path", config.base_url),
            });
        }
        let http = build_client(&config.identity, config.timeout)?;
        log::debug!(
            "Crossref client: {} as {}",
            base_url,
            config.identity.user_agent()
        );
        Ok(Self {
            http,
            base_url,
            retry: config.retry,
            sleeper: Arc::new(ThreadSleeper),
        })
    }

    /// Replace how retry backoff waits (tests use a recording sleeper)
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// `{base}/works`, optionally followed by a DOI.
    ///
    /// Each `/`-separated part of the DOI becomes its own percent-encoded path
    /// segment, so the service sees `/works/<prefix>/<suffix>`.
    fn works_url(&self, identifier: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("works");
            if let Some(identifier) = identifier {
                segments.extend(identifier.split('/'));
            }
        }
        url
    }
}

impl WorksApi for CrossrefClient {
    fn lookup_work(&self, identifier: &str) -> Result<Option<SeedWork>, ApiError> {
        let url = self.works_url(Some(identifier));
        let label = format!("lookup {identifier}");
        self.retry.execute(&label, self.sleeper.as_ref(), || {
            let response = fetch_text(self.http.get(url.clone()))?;
            match response.status {
                404 => Ok(None),
                _ if response.is_success() => decode_work(&response.body, identifier).map(Some),
                status => Err(ApiError::from_status(status, &response.body)),
            }
        })
    }

    fn search_citing_works(
        &self,
        identifier: &str,
        cursor: &str,
        rows: usize,
    ) -> Result<Page, ApiError> {
        let url = self.works_url(None);
        let query = format!("reference.DOI:{identifier}");
        let rows = rows.to_string();
        let params = [
            ("query", query.as_str()),
            ("cursor", cursor),
            ("rows", rows.as_str()),
            ("select", SEARCH_SELECT),
        ];
        let label = format!("citing {identifier}");
        self.retry.execute(&label, self.sleeper.as_ref(), || {
            let response = fetch_text(self.http.get(url.clone()).query(&params))?;
            if !response.is_success() {
                return Err(ApiError::from_status(response.status, &response.body));
            }
            decode_page(&response.body)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> CrossrefClient {
        let config = Config {
            base_url: base_url.into(),
            ..Default::default()
        };
        CrossrefClient::new(&config).unwrap()
    }

    #[test]
    fn doi_slash_splits_segments() {
        let url = client("https://api.crossref.org").works_url(Some("10.1038/nbt.3820"));
        assert_eq!(url.as_str(), "https://api.crossref.org/works/10.1038/nbt.3820");
    }

    #[test]
    fn reserved_chars_percent_encoded() {
        let url = client("https://api.crossref.org").works_url(Some("10.1/a?b#c%d e"));
        assert_eq!(url.path(), "/works/10.1/a%3Fb%23c%25d%20e");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn backslash_stays_inside_segment() {
        let url = client("https://api.crossref.org").works_url(Some(r"10.1002/a\b"));
        assert_eq!(url.path_segments().unwrap().count(), 3);
        assert!(url.path().ends_with("a%5Cb"));
    }

    #[test]
    fn base_url_trailing_slash_and_prefix() {
        let url = client("https://api.crossref.org/").works_url(None);
        assert_eq!(url.as_str(), "https://api.crossref.org/works");

        let url = client("http://127.0.0.1:8080/proxy/").works_url(Some("10.1/x"));
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/proxy/works/10.1/x");
    }

    #[test]
    fn invalid_base_url_rejected() {
        let config = Config {
            base_url: "not a url".into(),
            ..Default::default()
        };
        let err = CrossrefClient::new(&config).unwrap_err();
        assert!(err.to_string().contains("invalid base URL"));
    }
}
