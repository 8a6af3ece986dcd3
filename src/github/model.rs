//! Wire shapes returned by the hosting API.
//!
//! Only the fields the pipeline reads are modelled. Record payloads stay as
//! raw JSON until the normalizer looks at them one at a time, so a single
//! bad record cannot poison the page it arrived on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw record as returned upstream.
pub type RawRecord = Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryStats {
    pub full_name: String,
    #[serde(rename = "stargazers_count", default)]
    pub stars: u64,
    #[serde(rename = "forks_count", default)]
    pub forks: u64,
}

/// One page from the search endpoint.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<RawRecord>,
}

#[derive(Debug, Serialize)]
pub struct SearchParams<'a> {
    pub q: &'a str,
    pub per_page: u32,
    pub page: u32,
}

/// Envelope of every graph query response.
#[derive(Debug, Deserialize)]
pub struct GraphResponse {
    pub data: Option<Value>,
    #[serde(default)]
    pub errors: Option<Vec<GraphError>>,
}

#[derive(Debug, Deserialize)]
pub struct GraphError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A paginated level of a graph response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

// Record payloads, parsed by the normalizer.

#[derive(Debug, Deserialize)]
pub struct RawIssue {
    pub number: u64,
    pub created_at: String,
    pub closed_at: Option<String>,
    #[serde(default)]
    pub labels: Vec<RawLabel>,
    pub state: String,
    pub user: Option<RawUser>,
    /// Present only on pull requests.
    pub pull_request: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawLabel {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub login: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommit {
    pub oid: String,
    pub committed_date: String,
    #[serde(default)]
    pub message_headline: String,
    pub author: Option<RawGitActor>,
}

#[derive(Debug, Deserialize)]
pub struct RawGitActor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
pub struct RawBranchRef {
    pub name: String,
    pub target: Option<RawBranchTarget>,
}

#[derive(Debug, Deserialize)]
pub struct RawBranchTarget {
    pub history: Option<RawBranchHistory>,
}

#[derive(Debug, Deserialize)]
pub struct RawBranchHistory {
    /// Commits reachable from the branch tip, not just the ones returned.
    #[serde(default, rename = "totalCount")]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub nodes: Vec<RawCommitDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCommitDate {
    pub committed_date: String,
}
