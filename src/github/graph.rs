//! Cursor-paginated graph queries for commits, branches and contributors.

use crate::error::{Error, Result};
use crate::github::client::HostingClient;
use crate::github::fetcher::Fetched;
use crate::github::model::{Connection, GraphResponse, PageInfo};
use crate::model::{EntityKind, RepoId};
use crate::window::DateWindow;
use serde_json::{json, Value};

const LOG_TARGET: &str = "repo_pulse::graph";

const HISTORY_QUERY: &str = r#"
query($owner: String!, $name: String!, $since: GitTimestamp!, $until: GitTimestamp!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    defaultBranchRef {
      target {
        ... on Commit {
          history(first: 100, since: $since, until: $until, after: $cursor) {
            pageInfo { hasNextPage endCursor }
            nodes {
              oid
              committedDate
              messageHeadline
              author { name email user { login } }
            }
          }
        }
      }
    }
  }
}
"#;

const REFS_QUERY: &str = r#"
query($owner: String!, $name: String!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    refs(refPrefix: "refs/heads/", first: 100, after: $cursor) {
      pageInfo { hasNextPage endCursor }
      nodes {
        name
        target {
          ... on Commit {
            history(first: 100) {
              totalCount
              nodes { committedDate }
            }
          }
        }
      }
    }
  }
}
"#;

const HISTORY_PATH: &str = "/repository/defaultBranchRef/target/history";
const REFS_PATH: &str = "/repository/refs";

pub struct GraphFetcher<'a> {
    client: &'a HostingClient,
}

impl<'a> GraphFetcher<'a> {
    pub fn new(client: &'a HostingClient) -> Self {
        Self { client }
    }

    /// Request body for one page. Branch listings are not date scoped; the
    /// caller keeps only branches dated inside the window.
    pub fn request_body(kind: EntityKind, window: &DateWindow, repo: &RepoId, cursor: Option<&str>) -> Value {
        match kind {
            EntityKind::Branches => json!({
                "query": REFS_QUERY,
                "variables": {
                    "owner": repo.owner,
                    "name": repo.name,
                    "cursor": cursor,
                },
            }),
            _ => json!({
                "query": HISTORY_QUERY,
                "variables": {
                    "owner": repo.owner,
                    "name": repo.name,
                    "since": format!("{}T00:00:00Z", window.start),
                    "until": format!("{}T23:59:59Z", window.end),
                    "cursor": cursor,
                },
            }),
        }
    }

    /// Follow cursors until the last page. Errors and empty pages end the
    /// walk early but keep what was already collected.
    pub async fn fetch(&self, kind: EntityKind, window: &DateWindow, repo: &RepoId) -> Result<Fetched> {
        let mut fetched = Fetched::default();
        let mut cursor: Option<String> = None;

        loop {
            let body = Self::request_body(kind, window, repo, cursor.as_deref());
            let page = self
                .client
                .graph_query(&body)
                .await
                .and_then(|response| extract_connection(kind, response));

            let connection = match page {
                Ok(Some(connection)) => connection,
                Ok(None) => {
                    // Unreachable default branch or history: nothing here.
                    fetched.pages_ok += 1;
                    break;
                }
                Err(e) if e.is_transient() => {
                    fetched.pages_failed += 1;
                    log::warn!(
                        target: LOG_TARGET,
                        "Stopping {} {} pagination in {} after {} records: {}",
                        repo,
                        kind,
                        window.range_query(),
                        fetched.records.len(),
                        e
                    );
                    break;
                }
                Err(e) => return Err(e),
            };

            fetched.pages_ok += 1;
            if connection.nodes.is_empty() {
                break;
            }
            fetched.records.extend(connection.nodes);

            match connection.page_info {
                PageInfo {
                    has_next_page: true,
                    end_cursor: Some(next),
                } => cursor = Some(next),
                _ => break,
            }
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

/// Pull the paginated level for `kind` out of a response.
///
/// `Ok(None)` means the path is absent, which counts as zero results.
pub fn extract_connection(kind: EntityKind, response: Value) -> Result<Option<Connection>> {
    let response: GraphResponse = serde_json::from_value(response)
        .map_err(|e| Error::TransientFetch(format!("unexpected graph payload: {}", e)))?;

    if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| match &e.kind {
                Some(kind) => format!("{} ({})", e.message, kind),
                None => e.message.clone(),
            })
            .collect();
        return Err(Error::TransientFetch(messages.join("; ")));
    }

    let path = match kind {
        EntityKind::Branches => REFS_PATH,
        _ => HISTORY_PATH,
    };

    match response.data.as_ref().and_then(|data| data.pointer(path)) {
        None | Some(Value::Null) => Ok(None),
        Some(level) => serde_json::from_value(level.clone())
            .map(Some)
            .map_err(|e| Error::TransientFetch(format!("unexpected connection shape: {}", e))),
    }
}
