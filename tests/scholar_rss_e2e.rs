use std::sync::Arc;
use std::time::Duration;

use axum::response::Html;
use axum::routing::get;
use axum::Router;
use url::Url;

use scholar_rss::core::scholar::fetcher::ScholarFetcher;
use scholar_rss::core::scholar::headers::StaticHeaders;
use scholar_rss::server::{router, AppState};

const RESULTS_PAGE: &str = include_str!("../fixtures/scholar-results.html");
const NO_RESULTS_PAGE: &str = include_str!("../fixtures/scholar-no-results.html");

async fn spawn_upstream(page: &'static str) -> (Url, tokio::task::JoinHandle<()>) {
    let app = Router::new().route("/scholar", get(move || async move { Html(page) }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("local addr should exist");
    let join_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("upstream should run");
    });
    let base_url = Url::parse(&format!("http://{address}/scholar")).expect("url must parse");
    (base_url, join_handle)
}

async fn unreachable_upstream() -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("local addr should exist");
    drop(listener);
    Url::parse(&format!("http://{address}/scholar")).expect("url must parse")
}

async fn spawn_app(upstream: Url) -> (String, tokio::task::JoinHandle<()>) {
    let fetcher = ScholarFetcher::with_base_url(
        Duration::from_secs(5),
        Arc::new(StaticHeaders::with_user_agent("scholar-rss-e2e/1.0")),
        upstream,
    )
    .expect("fetcher should build");
    let app = router(AppState {
        fetcher: Arc::new(fetcher),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let address = listener.local_addr().expect("local addr should exist");
    let join_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("app should run");
    });
    (format!("http://{address}"), join_handle)
}

fn entry_titles(feed: &feed_rs::model::Feed) -> Vec<String> {
    feed.entries
        .iter()
        .map(|entry| {
            entry
                .title
                .clone()
                .map(|text| text.content)
                .unwrap_or_default()
        })
        .collect()
}

#[tokio::test]
async fn feed_endpoint_renders_items_for_well_formed_blocks() {
    let (upstream, upstream_task) = spawn_upstream(RESULTS_PAGE).await;
    let (base, app_task) = spawn_app(upstream).await;

    let response = reqwest::get(format!("{base}/scholar.rss?q=test"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status().as_u16(), 200);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);
    assert_eq!(content_type.as_deref(), Some("application/rss+xml"));

    let body = response.text().await.expect("body should read");
    assert!(body.contains(
        "<author>R Carhart-Harris, DJ Nutt, M Bolstridge - Nature Medicine, 2024 - nature.com</author>"
    ));

    let feed = feed_rs::parser::parse(body.as_bytes()).expect("feed must parse");
    assert_eq!(feed.entries.len(), 2);
    assert_eq!(
        feed.title.clone().map(|text| text.content).as_deref(),
        Some("Google Scholar - test")
    );

    let titles = entry_titles(&feed);
    assert_eq!(
        titles[0],
        "Single-dose psilocybin therapy for treatment-resistant depression"
    );
    assert_eq!(
        titles[1],
        "[PDF] Microdosing psilocybin: effects on mood and cognition in a naturalistic sample"
    );

    let first_summary = feed.entries[0]
        .summary
        .clone()
        .map(|text| text.content)
        .unwrap_or_default();
    assert!(first_summary.starts_with("We conducted a randomised, double-blind trial"));
    assert_eq!(
        feed.entries[0].links.first().map(|link| link.href.as_str()),
        Some("https://www.nature.com/articles/s41591-024-02984-x")
    );

    upstream_task.abort();
    app_task.abort();
}

#[tokio::test]
async fn feed_endpoint_defaults_the_query_topic() {
    let (upstream, upstream_task) = spawn_upstream(RESULTS_PAGE).await;
    let (base, app_task) = spawn_app(upstream).await;

    let response = reqwest::get(format!("{base}/scholar.rss"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.expect("body should read");
    let feed = feed_rs::parser::parse(body.as_bytes()).expect("feed must parse");
    assert_eq!(
        feed.title.map(|text| text.content).as_deref(),
        Some("Google Scholar - psilocybin")
    );
    let channel_link = feed
        .links
        .first()
        .map(|link| link.href.clone())
        .unwrap_or_default();
    assert!(channel_link.contains("q=psilocybin"));

    upstream_task.abort();
    app_task.abort();
}

#[tokio::test]
async fn feed_endpoint_uses_the_first_duplicated_topic_value() {
    let (upstream, upstream_task) = spawn_upstream(RESULTS_PAGE).await;
    let (base, app_task) = spawn_app(upstream).await;

    let response = reqwest::get(format!("{base}/scholar.rss?q=caffeine&q=memory"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.expect("body should read");
    let feed = feed_rs::parser::parse(body.as_bytes()).expect("feed must parse");
    assert_eq!(
        feed.title.map(|text| text.content).as_deref(),
        Some("Google Scholar - caffeine")
    );

    upstream_task.abort();
    app_task.abort();
}

#[tokio::test]
async fn feed_endpoint_returns_empty_feed_for_no_results_page() {
    let (upstream, upstream_task) = spawn_upstream(NO_RESULTS_PAGE).await;
    let (base, app_task) = spawn_app(upstream).await;

    let response = reqwest::get(format!("{base}/scholar.rss?q=nothing"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.expect("body should read");
    let feed = feed_rs::parser::parse(body.as_bytes()).expect("feed must parse");
    assert!(feed.entries.is_empty());
    assert_eq!(
        feed.title.map(|text| text.content).as_deref(),
        Some("Google Scholar - nothing")
    );

    upstream_task.abort();
    app_task.abort();
}

#[tokio::test]
async fn feed_endpoint_reports_unreachable_upstream_as_500() {
    let upstream = unreachable_upstream().await;
    let (base, app_task) = spawn_app(upstream).await;

    let response = reqwest::get(format!("{base}/scholar.rss?q=test"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status().as_u16(), 500);

    let body = response.text().await.expect("body should read");
    assert_eq!(body, "Error generating feed");

    app_task.abort();
}

#[tokio::test]
async fn home_page_links_to_the_default_feed() {
    let (upstream, upstream_task) = spawn_upstream(NO_RESULTS_PAGE).await;
    let (base, app_task) = spawn_app(upstream).await;

    let response = reqwest::get(format!("{base}/"))
        .await
        .expect("request should succeed");
    assert_eq!(response.status().as_u16(), 200);

    let body = response.text().await.expect("body should read");
    assert!(body.contains("Scholar RSS Feed Generator"));
    assert!(body.contains("/scholar.rss?q=psilocybin"));

    upstream_task.abort();
    app_task.abort();
}
