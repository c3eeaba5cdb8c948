use std::sync::Arc;
use std::time::Duration;

use url::Url;

use super::headers::HeaderStrategy;

pub const SCHOLAR_BASE_URL: &str = "https://scholar.google.com/scholar";

const LANGUAGE: &str = "en";
const DOCUMENT_FILTER: &str = "0,5";
const SORT_BY_DATE: &str = "1";
const YEAR_FLOOR: &str = "2024";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

pub struct ScholarFetcher {
    client: reqwest::Client,
    headers: Arc<dyn HeaderStrategy>,
    base_url: Url,
}

impl ScholarFetcher {
    pub fn new(timeout: Duration, headers: Arc<dyn HeaderStrategy>) -> Result<Self, FetchError> {
        let base_url = Url::parse(SCHOLAR_BASE_URL).expect("base url must parse");
        Self::with_base_url(timeout, headers, base_url)
    }

    pub fn with_base_url(
        timeout: Duration,
        headers: Arc<dyn HeaderStrategy>,
        base_url: Url,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self {
            client,
            headers,
            base_url,
        })
    }

    pub fn search_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("hl", LANGUAGE)
            .append_pair("as_sdt", DOCUMENT_FILTER)
            .append_pair("scisbd", SORT_BY_DATE)
            .append_pair("as_ylo", YEAR_FLOOR);
        url
    }

    pub async fn fetch(&self, query: &str) -> Result<String, FetchError> {
        let url = self.search_url(query);
        let response = self
            .client
            .get(url.as_str())
            .headers(self.headers.headers_for(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Non-success bodies still go to the parser; Scholar serves its block pages with error codes.
            tracing::warn!(%url, status = status.as_u16(), "upstream returned non-success status");
        }

        Ok(response.text().await?)
    }
}
