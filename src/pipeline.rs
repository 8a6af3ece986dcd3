//! Fetch, normalize, aggregate and forecast one entity kind of one repository.

use crate::aggregate::{aggregate, MonthCount};
use crate::error::{Error, Result};
use crate::forecast::{self, forecast_or_placeholder, ForecastRequest, ForecastResponse, Forecaster};
use crate::github::ActivitySource;
use crate::model::{EntityKind, Record, RepoId, SeriesKind};
use crate::normalize::{dedupe, normalize_all};
use crate::window::{self, DateWindow};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

const LOG_TARGET: &str = "repo_pulse::pipeline";

#[derive(Debug, Clone)]
pub struct ActivityRequest {
    pub repo: RepoId,
    pub kind: EntityKind,
    /// Last day covered; windows walk backwards from here.
    pub anchor: NaiveDate,
    pub months: u32,
}

/// Normalized records for every window, plus what was lost on the way.
#[derive(Debug, Default)]
pub struct Collected {
    pub records: Vec<Record>,
    pub dropped_records: usize,
    pub failed_pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityReport {
    pub repository: String,
    pub kind: EntityKind,
    pub anchor: NaiveDate,
    pub months: u32,
    pub stars: u64,
    pub forks: u64,
    pub records: usize,
    pub dropped_records: usize,
    pub failed_pages: usize,
    pub created: Vec<MonthCount>,
    /// Only issues have a closed series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed: Option<Vec<MonthCount>>,
    /// Forecast service answers keyed by series kind.
    pub forecasts: BTreeMap<String, ForecastResponse>,
}

/// Run every window for one kind, one window at a time.
pub async fn collect_records<S>(source: &S, kind: EntityKind, repo: &RepoId, windows: &[DateWindow]) -> Result<Collected>
where
    S: ActivitySource + Sync,
{
    let mut collected = Collected::default();
    let mut pages_ok = 0;

    for window in windows {
        let fetched = source.fetch(kind, window, repo).await?;
        pages_ok += fetched.pages_ok;
        collected.failed_pages += fetched.pages_failed;

        let (records, dropped) = normalize_all(&fetched.records, kind);
        collected.dropped_records += dropped;

        // Branch listings ignore the window, so filter by date here.
        collected.records.extend(
            records
                .into_iter()
                .filter(|r| kind != EntityKind::Branches || window.contains(r.created_date())),
        );
    }

    if pages_ok == 0 && collected.failed_pages > 0 {
        return Err(Error::UpstreamUnavailable {
            repo: repo.to_string(),
            kind: kind.to_string(),
        });
    }

    // Adjacent windows share their boundary day.
    collected.records = dedupe(collected.records);
    Ok(collected)
}

/// Display series for a kind: the created series, and for issues the closed one.
pub fn display_series(kind: EntityKind, records: &[Record]) -> (Vec<MonthCount>, Option<Vec<MonthCount>>) {
    match kind {
        EntityKind::Issues => (
            aggregate(records, |r| r.date(SeriesKind::CreatedAt)),
            Some(aggregate(records, |r| r.date(SeriesKind::ClosedAt))),
        ),
        EntityKind::Pulls => (
            aggregate(records, |r| r.is_pull_request().then_some(r.created_date())),
            None,
        ),
        _ => (aggregate(records, |r| Some(r.created_date())), None),
    }
}

/// Forecast requests for a kind, tagged with the kind's series suffix.
pub fn forecast_requests(kind: EntityKind, records: &[Record], repo: &RepoId) -> Vec<ForecastRequest> {
    let series_kinds: &[SeriesKind] = match kind {
        EntityKind::Issues => &[SeriesKind::CreatedAt, SeriesKind::ClosedAt],
        _ => &[SeriesKind::CreatedAt],
    };

    series_kinds
        .iter()
        .map(|&series_kind| forecast::build(records, series_kind, repo.short_name(), kind.series_suffix()))
        .collect()
}

/// Aggregate one kind of repository activity over the trailing months and
/// return both the display series and the forecast service's answers.
pub async fn aggregate_activity<S, F>(source: &S, forecaster: &F, request: &ActivityRequest) -> Result<ActivityReport>
where
    S: ActivitySource + Sync,
    F: Forecaster + Sync,
{
    let ActivityRequest {
        repo,
        kind,
        anchor,
        months,
    } = request;

    let stats = source.repository(repo).await?;
    let windows = window::generate(*anchor, *months);
    log::info!(
        target: LOG_TARGET,
        "Collecting {} for {} over {} windows ending {}",
        kind,
        repo,
        windows.len(),
        anchor
    );

    let collected = collect_records(source, *kind, repo, &windows).await?;
    let (created, closed) = display_series(*kind, &collected.records);

    let mut forecasts = BTreeMap::new();
    for forecast_request in forecast_requests(*kind, &collected.records, repo) {
        let response = forecast_or_placeholder(forecaster, &forecast_request).await;
        forecasts.insert(forecast_request.series_kind.as_str().to_string(), response);
    }

    log::info!(
        target: LOG_TARGET,
        "{} {}: {} records, {} dropped, {} failed pages",
        repo,
        kind,
        collected.records.len(),
        collected.dropped_records,
        collected.failed_pages
    );

    Ok(ActivityReport {
        repository: stats.full_name,
        kind: *kind,
        anchor: *anchor,
        months: *months,
        stars: stats.stars,
        forks: stats.forks,
        records: collected.records.len(),
        dropped_records: collected.dropped_records,
        failed_pages: collected.failed_pages,
        created,
        closed,
        forecasts,
    })
}
