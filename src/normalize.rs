//! Raw API records to canonical records.

use crate::error::{Error, Result};
use crate::github::model::{RawBranchRef, RawCommit, RawGitActor, RawIssue, RawRecord};
use crate::model::{
    BranchRecord, CommitRecord, ContributorRecord, EntityKind, IssueRecord, IssueState, Record,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

/// Placeholder for identities and logins upstream does not provide.
pub const UNKNOWN: &str = "unknown";

const HEADLINE_MAX_CHARS: usize = 100;

const LOG_TARGET: &str = "repo_pulse::normalize";

pub fn normalize(raw: &RawRecord, kind: EntityKind) -> Result<Record> {
    match kind {
        EntityKind::Issues | EntityKind::Pulls => normalize_issue(parse(raw, kind)?, kind),
        EntityKind::Commits => normalize_commit(parse(raw, kind)?, kind),
        EntityKind::Branches => normalize_branch(parse(raw, kind)?, kind),
        EntityKind::Contributors => normalize_contributor(parse(raw, kind)?, kind),
    }
}

fn parse<T: DeserializeOwned>(raw: &RawRecord, kind: EntityKind) -> Result<T> {
    T::deserialize(raw).map_err(|e| malformed(kind, e.to_string()))
}

fn malformed(kind: EntityKind, reason: impl Into<String>) -> Error {
    Error::MalformedRecord {
        kind: kind.to_string(),
        reason: reason.into(),
    }
}

/// Truncate a timestamp to its calendar day, whatever its precision or offset.
pub fn day_of(timestamp: &str) -> Option<NaiveDate> {
    let day = timestamp.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn required_day(timestamp: &str, field: &str, kind: EntityKind) -> Result<NaiveDate> {
    day_of(timestamp).ok_or_else(|| malformed(kind, format!("bad {} '{}'", field, timestamp)))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_issue(raw: RawIssue, kind: EntityKind) -> Result<Record> {
    let created_at = required_day(&raw.created_at, "created_at", kind)?;
    let closed_at = match raw.closed_at.as_deref() {
        Some(ts) => Some(required_day(ts, "closed_at", kind)?),
        None => None,
    };
    let state = match raw.state.as_str() {
        "closed" => IssueState::Closed,
        _ => IssueState::Open,
    };

    Ok(Record::Issue(IssueRecord {
        number: raw.number,
        created_at,
        closed_at,
        labels: raw.labels.into_iter().map(|l| l.name).collect(),
        state,
        author_login: raw
            .user
            .and_then(|u| non_empty(u.login))
            .unwrap_or_else(|| UNKNOWN.to_string()),
        // The per-item marker decides, not the query that found the item.
        is_pull_request: raw.pull_request.is_some(),
    }))
}

fn normalize_commit(raw: RawCommit, kind: EntityKind) -> Result<Record> {
    if raw.oid.is_empty() {
        return Err(malformed(kind, "empty oid"));
    }
    let committed_at = required_day(&raw.committed_date, "committedDate", kind)?;
    let author = raw.author.unwrap_or(RawGitActor {
        name: None,
        email: None,
        user: None,
    });

    Ok(Record::Commit(CommitRecord {
        hash: raw.oid,
        committed_at,
        message_headline: raw.message_headline.chars().take(HEADLINE_MAX_CHARS).collect(),
        author_name: author.name.unwrap_or_default(),
        author_email: author.email.unwrap_or_default(),
        author_login: author
            .user
            .and_then(|u| non_empty(u.login))
            .unwrap_or_else(|| UNKNOWN.to_string()),
    }))
}

fn normalize_branch(raw: RawBranchRef, kind: EntityKind) -> Result<Record> {
    let history = raw.target.and_then(|t| t.history);
    let (total, nodes) = match history {
        Some(h) => (h.total_count, h.nodes),
        None => (None, Vec::new()),
    };
    let history_truncated = total.is_some_and(|total| total > nodes.len() as u64);
    let oldest = nodes
        .iter()
        .filter_map(|node| day_of(&node.committed_date))
        .min();

    match oldest {
        Some(created_at) => {
            if history_truncated {
                log::debug!(
                    target: LOG_TARGET,
                    "Branch '{}' has more history than was retrieved, dating it {}",
                    raw.name,
                    created_at
                );
            }
            Ok(Record::Branch(BranchRecord {
                name: raw.name,
                created_at,
                history_truncated,
            }))
        }
        None => Err(malformed(kind, format!("branch '{}' has no retrievable commits", raw.name))),
    }
}

fn normalize_contributor(raw: RawCommit, kind: EntityKind) -> Result<Record> {
    let first_contribution_at = required_day(&raw.committed_date, "committedDate", kind)?;
    let identity = match raw.author {
        Some(author) => contributor_identity(author),
        None => UNKNOWN.to_string(),
    };

    Ok(Record::Contributor(ContributorRecord {
        identity,
        first_contribution_at,
    }))
}

/// Login, then email, then display name, then "unknown".
pub fn contributor_identity(author: RawGitActor) -> String {
    author
        .user
        .and_then(|u| non_empty(u.login))
        .or_else(|| non_empty(author.email))
        .or_else(|| non_empty(author.name))
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// Normalize a batch, dropping and logging records that do not fit.
pub fn normalize_all(raws: &[RawRecord], kind: EntityKind) -> (Vec<Record>, usize) {
    let mut records = Vec::with_capacity(raws.len());
    let mut dropped = 0;

    for raw in raws {
        match normalize(raw, kind) {
            Ok(record) => records.push(record),
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Dropping {} record: {}", kind, e);
                dropped += 1;
            }
        }
    }

    (records, dropped)
}

/// Collapse records seen in more than one window.
///
/// Contributors keep their earliest date regardless of observation order;
/// everything else keeps the first record seen for each id.
pub fn dedupe(records: Vec<Record>) -> Vec<Record> {
    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    let mut seen: HashSet<String> = HashSet::new();
    let mut contributors: HashMap<String, usize> = HashMap::new();

    for record in records {
        match record {
            Record::Contributor(contributor) => {
                match contributors.entry(contributor.identity.clone()) {
                    Entry::Occupied(slot) => {
                        if let Record::Contributor(existing) = &mut out[*slot.get()] {
                            if contributor.first_contribution_at < existing.first_contribution_at {
                                existing.first_contribution_at = contributor.first_contribution_at;
                            }
                        }
                    }
                    Entry::Vacant(slot) => {
                        slot.insert(out.len());
                        out.push(Record::Contributor(contributor));
                    }
                }
            }
            other => {
                if seen.insert(other.id()) {
                    out.push(other);
                }
            }
        }
    }

    out
}
