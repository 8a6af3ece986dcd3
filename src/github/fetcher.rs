use crate::error::Result;
use crate::github::model::{RawRecord, RepositoryStats};
use crate::model::{EntityKind, RepoId};
use crate::window::DateWindow;
use std::future::Future;

/// Everything retrieved for one entity kind and one window.
#[derive(Debug, Default)]
pub struct Fetched {
    pub records: Vec<RawRecord>,
    pub pages_ok: usize,
    pub pages_failed: usize,
}

/// Source of raw repository activity.
///
/// Implemented by [`HostingClient`](crate::github::HostingClient) against the
/// live API, and by in-memory fakes in tests.
pub trait ActivitySource {
    /// Resolve the repository, failing when it does not exist.
    fn repository(&self, repo: &RepoId) -> impl Future<Output = Result<RepositoryStats>> + Send;

    /// Retrieve every record of `kind` that falls in `window`.
    ///
    /// Pages that fail are counted and skipped; only errors that make the
    /// whole kind unrecoverable are returned.
    fn fetch(
        &self,
        kind: EntityKind,
        window: &DateWindow,
        repo: &RepoId,
    ) -> impl Future<Output = Result<Fetched>> + Send;
}
