use crate::error::{Error, Result};
use crate::github::fetcher::{ActivitySource, Fetched};
use crate::github::graph::GraphFetcher;
use crate::github::model::{RepositoryStats, SearchPage, SearchParams};
use crate::github::search::SearchFetcher;
use crate::model::{ApiStyle, EntityKind, RepoId};
use crate::window::DateWindow;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hosting API client shared by both pagination styles.
#[derive(Clone)]
pub struct HostingClient {
    client: octocrab::Octocrab,
    per_page: u32,
    timeout: Duration,
}

impl HostingClient {
    pub async fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, None).await
    }

    /// Create a client with an optional base URL (for testing with wiremock)
    pub async fn with_base_url(token: &str, base_url: Option<&str>) -> Result<Self> {
        let mut builder = octocrab::Octocrab::builder().personal_token(token.to_string());

        if let Some(url) = base_url {
            builder = builder.base_uri(url)?;
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            per_page: DEFAULT_PER_PAGE,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Search page size, clamped to what the API accepts.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, 100);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Look up repository metadata; a missing repository is an explicit error.
    pub async fn get_repository(&self, repo: &RepoId) -> Result<RepositoryStats> {
        let route = format!("/repos/{}/{}", repo.owner, repo.name);
        let value: Value = self
            .bounded(self.client.get(route, None::<&()>))
            .await?
            .map_err(|err| match status_of(&err) {
                Some(404) => Error::RepositoryNotFound(repo.to_string()),
                Some(401) => Error::Auth(err.to_string()),
                _ => Error::GitHub(err),
            })?;

        Ok(serde_json::from_value(value)?)
    }

    /// Fetch one page of search results.
    pub async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage> {
        let params = SearchParams {
            q: query,
            per_page: self.per_page,
            page,
        };
        let value: Value = self
            .bounded(self.client.get("/search/issues", Some(&params)))
            .await?
            .map_err(classify)?;

        serde_json::from_value(value)
            .map_err(|e| Error::TransientFetch(format!("unexpected search payload: {}", e)))
    }

    /// Post a graph query and return the raw response body.
    pub async fn graph_query(&self, body: &Value) -> Result<Value> {
        self.bounded(self.client.graphql(body))
            .await?
            .map_err(classify)
    }

    async fn bounded<T>(&self, fut: impl Future<Output = T>) -> Result<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| Error::TransientFetch(format!("request timed out after {:?}", self.timeout)))
    }
}

impl ActivitySource for HostingClient {
    async fn repository(&self, repo: &RepoId) -> Result<RepositoryStats> {
        self.get_repository(repo).await
    }

    async fn fetch(&self, kind: EntityKind, window: &DateWindow, repo: &RepoId) -> Result<Fetched> {
        match kind.api_style() {
            ApiStyle::Search => SearchFetcher::new(self).fetch(kind, window, repo).await,
            ApiStyle::Graph => GraphFetcher::new(self).fetch(kind, window, repo).await,
        }
    }
}

fn status_of(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// Credentials problems stop everything; anything else only loses one page.
fn classify(err: octocrab::Error) -> Error {
    match status_of(&err) {
        Some(401) => Error::Auth(err.to_string()),
        _ => Error::TransientFetch(err.to_string()),
    }
}
