use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, USER_AGENT};

pub const USER_AGENT_POOL: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:122.0) Gecko/20100101 Firefox/122.0",
];

pub trait HeaderStrategy: Send + Sync {
    fn headers_for(&self, query: &str) -> HeaderMap;
}

#[derive(Debug, Clone, Default)]
pub struct RotatingBrowserHeaders;

impl HeaderStrategy for RotatingBrowserHeaders {
    fn headers_for(&self, _query: &str) -> HeaderMap {
        let user_agent = USER_AGENT_POOL[fastrand::usize(..USER_AGENT_POOL.len())];
        let mut headers = base_headers();
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
        headers
    }
}

#[derive(Debug, Clone)]
pub struct StaticHeaders(pub HeaderMap);

impl StaticHeaders {
    pub fn with_user_agent(user_agent: &'static str) -> Self {
        let mut headers = base_headers();
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
        Self(headers)
    }
}

impl HeaderStrategy for StaticHeaders {
    fn headers_for(&self, _query: &str) -> HeaderMap {
        self.0.clone()
    }
}

fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}
