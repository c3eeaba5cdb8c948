use std::sync::Arc;

use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;

use crate::core::feed::{render_rss, ChannelMeta, FeedRenderError};
use crate::core::scholar::fetcher::{FetchError, ScholarFetcher};
use crate::core::scholar::parser::parse_results;

pub const DEFAULT_QUERY: &str = "psilocybin";

const SOURCE_NAME: &str = "Google Scholar";
const FEED_LANGUAGE: &str = "en";
const HOME_PAGE: &str = r#"<h1>Scholar RSS Feed Generator</h1><p>Access the feed at: <a href="/scholar.rss?q=psilocybin">/scholar.rss?q=psilocybin</a></p>"#;

#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<ScholarFetcher>,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("feed rendering failed: {0}")]
    Render(#[from] FeedRenderError),
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "feed generation failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Error generating feed").into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/scholar.rss", get(scholar_feed))
        .with_state(state)
}

async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

async fn scholar_feed(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, FeedError> {
    let query = requested_topic(raw_query.as_deref());
    let search_url = state.fetcher.search_url(&query);

    let html = state.fetcher.fetch(&query).await?;
    let results = parse_results(&html);
    tracing::info!(
        query = %query,
        records = results.records.len(),
        skipped_blocks = results.skipped_blocks,
        "generating feed"
    );

    let channel = ChannelMeta {
        title: format!("{SOURCE_NAME} - {query}"),
        link: search_url.to_string(),
        description: format!("Latest research about {query}"),
        language: FEED_LANGUAGE.to_string(),
    };
    let feed = render_rss(&channel, &results.records, Utc::now())?;

    Ok(([(header::CONTENT_TYPE, "application/rss+xml")], feed).into_response())
}

// The first q wins when the parameter repeats.
fn requested_topic(raw_query: Option<&str>) -> String {
    raw_query
        .and_then(|raw| {
            url::form_urlencoded::parse(raw.as_bytes())
                .find(|(key, _)| key == "q")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| DEFAULT_QUERY.to_string())
}
