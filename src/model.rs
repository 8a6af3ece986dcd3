//! Canonical records shared by every stage of the pipeline.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// `owner/name` pair identifying a repository on the hosting API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Repository name without the owner, used to tag forecast jobs.
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split('/').collect();
        match parts.as_slice() {
            [owner, name] if !owner.is_empty() && !name.is_empty() => Ok(Self {
                owner: (*owner).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(Error::InvalidRepository(s.to_string())),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Which hosting API protocol serves an entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStyle {
    /// Offset-paginated REST search.
    Search,
    /// Cursor-paginated graph query.
    Graph,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Issues,
    Pulls,
    Commits,
    Branches,
    Contributors,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Issues,
        EntityKind::Pulls,
        EntityKind::Commits,
        EntityKind::Branches,
        EntityKind::Contributors,
    ];

    pub fn api_style(self) -> ApiStyle {
        match self {
            EntityKind::Issues | EntityKind::Pulls => ApiStyle::Search,
            EntityKind::Commits | EntityKind::Branches | EntityKind::Contributors => {
                ApiStyle::Graph
            }
        }
    }

    /// Suffix appended to the repository name in forecast requests.
    pub fn series_suffix(self) -> &'static str {
        match self {
            EntityKind::Issues => "",
            EntityKind::Pulls => "_pulls",
            EntityKind::Commits => "_commits",
            EntityKind::Branches => "_branches",
            EntityKind::Contributors => "_contributors",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Issues => "issues",
            EntityKind::Pulls => "pulls",
            EntityKind::Commits => "commits",
            EntityKind::Branches => "branches",
            EntityKind::Contributors => "contributors",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which date of a record a series is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    CreatedAt,
    ClosedAt,
}

impl SeriesKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SeriesKind::CreatedAt => "created_at",
            SeriesKind::ClosedAt => "closed_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// An issue or pull request from the search endpoint.
///
/// `closed_at` and `state` come from upstream independently and are not
/// reconciled with each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueRecord {
    pub number: u64,
    pub created_at: NaiveDate,
    pub closed_at: Option<NaiveDate>,
    pub labels: BTreeSet<String>,
    pub state: IssueState,
    pub author_login: String,
    pub is_pull_request: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub hash: String,
    pub committed_at: NaiveDate,
    pub message_headline: String,
    pub author_name: String,
    pub author_email: String,
    pub author_login: String,
}

impl CommitRecord {
    pub fn short_hash(&self) -> &str {
        self.hash.get(..8).unwrap_or(&self.hash)
    }
}

/// A branch dated by its oldest retrievable commit.
///
/// This approximates branch creation time; the hosting API does not
/// expose the real one. Only the 100 newest commits of each branch are
/// retrieved, so a branch with a longer history is dated by the oldest of
/// those 100 and can look much younger than it is. `history_truncated`
/// marks those branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchRecord {
    pub name: String,
    pub created_at: NaiveDate,
    pub history_truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorRecord {
    pub identity: String,
    pub first_contribution_at: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Issue(IssueRecord),
    Commit(CommitRecord),
    Branch(BranchRecord),
    Contributor(ContributorRecord),
}

impl Record {
    /// Natural short identifier sent to the forecast service.
    pub fn id(&self) -> String {
        match self {
            Record::Issue(issue) => issue.number.to_string(),
            Record::Commit(commit) => commit.short_hash().to_string(),
            Record::Branch(branch) => branch.name.clone(),
            Record::Contributor(contributor) => contributor.identity.clone(),
        }
    }

    /// The date a record entered the repository's history.
    pub fn created_date(&self) -> NaiveDate {
        match self {
            Record::Issue(issue) => issue.created_at,
            Record::Commit(commit) => commit.committed_at,
            Record::Branch(branch) => branch.created_at,
            Record::Contributor(contributor) => contributor.first_contribution_at,
        }
    }

    pub fn closed_date(&self) -> Option<NaiveDate> {
        match self {
            Record::Issue(issue) => issue.closed_at,
            _ => None,
        }
    }

    pub fn date(&self, series: SeriesKind) -> Option<NaiveDate> {
        match series {
            SeriesKind::CreatedAt => Some(self.created_date()),
            SeriesKind::ClosedAt => self.closed_date(),
        }
    }

    pub fn is_pull_request(&self) -> bool {
        matches!(self, Record::Issue(issue) if issue.is_pull_request)
    }
}
