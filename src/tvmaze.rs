use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::show::{Show, ShowId};

pub const TVMAZE_BASE: &str = "https://api.tvmaze.com";

/// Read-only paginated access to the remote show index.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Show>>;
}

#[derive(Debug, Clone)]
pub struct TvmazeClient {
    client: Client,
    base: String,
}

impl TvmazeClient {
    pub fn new(base: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let user_agent = format!("movieverse/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build TVMaze HTTP client: {}", e))?;
        Ok(Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!("{}/shows?page={}", self.base, page)
    }
}

#[async_trait]
impl CatalogApi for TvmazeClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<Show>> {
        let url = self.page_url(page);
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::network(page, format!("request failed: {e}")))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| Error::network(page, format!("reading body failed: {e}")))?;
        if !status.is_success() {
            return Err(Error::network(page, format!("{} -> {}", url, status)));
        }
        let shows = parse_page(page, &text)?;
        debug!(page, count = shows.len(), "Fetched catalog page");
        Ok(shows)
    }
}

fn parse_page(page: u32, body: &str) -> Result<Vec<Show>> {
    serde_json::from_str(body).map_err(|e| Error::network(page, format!("JSON parse failed: {e}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogLimits {
    pub max_items: usize,
    pub max_pages: u32,
}

impl Default for CatalogLimits {
    fn default() -> Self {
        Self {
            max_items: 15,
            max_pages: 2,
        }
    }
}

/// Shows fetched for the current session, in page-then-index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    shows: Vec<Show>,
}

impl Catalog {
    pub fn new(shows: Vec<Show>) -> Self {
        Self { shows }
    }

    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    pub fn find(&self, id: ShowId) -> Option<&Show> {
        self.shows.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.shows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shows.is_empty()
    }
}

/// Requests pages 0, 1, ... until `max_items` shows are collected or
/// `max_pages` have been tried, then truncates to `max_items`.
/// A failure on any page discards everything fetched so far.
pub async fn fetch_catalog(api: &dyn CatalogApi, limits: CatalogLimits) -> Result<Catalog> {
    let mut shows = Vec::new();
    for page in 0..limits.max_pages {
        if shows.len() >= limits.max_items {
            break;
        }
        let batch = match api.fetch_page(page).await {
            Ok(b) => b,
            Err(e) => {
                warn!("Error fetching shows: {}", e);
                return Err(e);
            }
        };
        if batch.is_empty() {
            debug!(page, "Empty catalog page, stopping");
            break;
        }
        shows.extend(batch);
    }
    shows.truncate(limits.max_items);
    info!("Loaded {} shows", shows.len());
    Ok(Catalog::new(shows))
}

/// Picks one show from the first page. `pick` maps the page length to an index.
pub async fn fetch_featured(
    api: &dyn CatalogApi,
    pick: impl FnOnce(usize) -> usize + Send,
) -> Result<Option<Show>> {
    let mut shows = api.fetch_page(0).await.inspect_err(|e| {
        warn!("Error fetching featured show: {}", e);
    })?;
    if shows.is_empty() {
        return Ok(None);
    }
    let idx = pick(shows.len()) % shows.len();
    Ok(Some(shows.swap_remove(idx)))
}
