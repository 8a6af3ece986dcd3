//! Requests to, and responses from, the external forecasting service.

use crate::error::{Error, Result};
use crate::model::{Record, SeriesKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use std::time::Duration;

const LOG_TARGET: &str = "repo_pulse::forecast";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Whatever the forecast service answered, passed through untouched.
pub type ForecastResponse = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    pub series: Vec<SeriesPoint>,
    pub series_kind: SeriesKind,
    pub series_name: String,
}

/// Reshape records into the minimal `{id, date}` series.
///
/// Records without the selected date (an issue that never closed) are left out.
pub fn build(records: &[Record], series_kind: SeriesKind, short_name: &str, suffix: &str) -> ForecastRequest {
    ForecastRequest {
        series: records
            .iter()
            .filter_map(|record| {
                record.date(series_kind).map(|date| SeriesPoint {
                    id: record.id(),
                    date,
                })
            })
            .collect(),
        series_kind,
        series_name: format!("{}{}", short_name, suffix),
    }
}

/// Result substituted when the forecast service cannot be reached.
pub fn placeholder() -> ForecastResponse {
    let mut map = Map::new();
    for key in ["model_loss_image_url", "lstm_generated_image_url", "all_issues_data_image"] {
        map.insert(key.to_string(), Value::String(String::new()));
    }
    map
}

pub trait Forecaster {
    fn forecast(&self, request: &ForecastRequest) -> impl Future<Output = Result<ForecastResponse>> + Send;
}

/// Ask for a forecast, falling back to [`placeholder`] on any failure.
pub async fn forecast_or_placeholder<F: Forecaster + Sync>(forecaster: &F, request: &ForecastRequest) -> ForecastResponse {
    match forecaster.forecast(request).await {
        Ok(response) => response,
        Err(e) => {
            log::warn!(
                target: LOG_TARGET,
                "Using placeholder forecast for {} ({}): {}",
                request.series_name,
                request.series_kind.as_str(),
                e
            );
            placeholder()
        }
    }
}

/// HTTP client for the forecast service. Without a URL every call is
/// reported unavailable.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: reqwest::Client,
    url: Option<String>,
}

impl ForecastClient {
    pub fn new(url: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("repo-pulse/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl Forecaster for ForecastClient {
    async fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| Error::ForecastUnavailable("no forecast service configured".into()))?;

        let response = self
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::ForecastUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ForecastUnavailable(format!("service answered {}", status)));
        }

        response
            .json::<ForecastResponse>()
            .await
            .map_err(|e| Error::ForecastUnavailable(format!("non-JSON answer: {}", e)))
    }
}
