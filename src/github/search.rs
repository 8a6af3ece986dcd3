//! Offset-paginated search for issues and pull requests.

use crate::error::Result;
use crate::github::client::HostingClient;
use crate::github::fetcher::Fetched;
use crate::model::{EntityKind, RepoId};
use crate::window::DateWindow;

const LOG_TARGET: &str = "repo_pulse::search";

/// The search API never returns more than this many results for one query.
pub const SEARCH_RESULT_CAP: u64 = 1000;

pub struct SearchFetcher<'a> {
    client: &'a HostingClient,
}

impl<'a> SearchFetcher<'a> {
    pub fn new(client: &'a HostingClient) -> Self {
        Self { client }
    }

    /// Build the search query for one kind, repository and window.
    pub fn query(kind: EntityKind, window: &DateWindow, repo: &RepoId) -> String {
        let types = match kind {
            EntityKind::Pulls => "type:pr",
            _ => "type:issue",
        };
        format!("{} repo:{} created:{}", types, repo, window.range_query())
    }

    /// Walk pages until one comes back short or empty, or the reported total
    /// is reached. A failed page is counted and skipped.
    pub async fn fetch(&self, kind: EntityKind, window: &DateWindow, repo: &RepoId) -> Result<Fetched> {
        let query = Self::query(kind, window, repo);
        let per_page = u64::from(self.client.per_page());
        let mut fetched = Fetched::default();
        let mut total: Option<u64> = None;
        let mut page: u32 = 1;

        loop {
            let seen = u64::from(page - 1) * per_page;
            if seen >= SEARCH_RESULT_CAP {
                log::warn!(
                    target: LOG_TARGET,
                    "Search for '{}' hit the {} result cap, later results are missing",
                    query,
                    SEARCH_RESULT_CAP
                );
                break;
            }

            match self.client.search_page(&query, page).await {
                Ok(result) => {
                    fetched.pages_ok += 1;
                    if result.incomplete_results {
                        log::debug!(target: LOG_TARGET, "Page {} of '{}' reported incomplete results", page, query);
                    }

                    let count = result.items.len() as u64;
                    total = Some(result.total_count);
                    fetched.records.extend(result.items);

                    // A short page wins over the reported total.
                    if count == 0 || count < per_page || seen + count >= result.total_count {
                        break;
                    }
                }
                Err(e) if e.is_transient() => {
                    fetched.pages_failed += 1;
                    log::warn!(target: LOG_TARGET, "Skipping page {} of '{}': {}", page, query, e);

                    // Without a known total keep going; a short or empty page
                    // or the result cap ends the walk.
                    if let Some(total) = total {
                        if seen + per_page >= total {
                            break;
                        }
                    }
                }
                Err(e) => return Err(e),
            }

            page += 1;
        }

        log::debug!(
            target: LOG_TARGET,
            "{} {} in {}: {} records over {} pages",
            repo,
            kind,
            window.range_query(),
            fetched.records.len(),
            fetched.pages_ok + fetched.pages_failed
        );

        Ok(fetched)
    }
}
