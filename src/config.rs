use crate::error::{Error, Result};
use crate::forecast::ForecastClient;
use crate::github::HostingClient;
use crate::window::DEFAULT_MONTHS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GitHubConfig {
    pub token: Option<String>,
    /// Alternate API root, e.g. a GitHub Enterprise instance.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub per_page: u32,
    pub months: u32,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            per_page: crate::github::client::DEFAULT_PER_PAGE,
            months: DEFAULT_MONTHS,
            timeout_secs: crate::github::client::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: crate::forecast::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "repo-pulse")
            .ok_or_else(|| Error::Config("Could not determine config directory".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get GitHub token from (in order): explicit override, env var, gh CLI, config file
    pub fn github_token(&self, explicit: Option<&str>) -> Result<String> {
        if let Some(token) = explicit {
            return Ok(token.to_string());
        }

        // 1. Environment variable
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            return Ok(token);
        }

        // 2. gh CLI
        if let Ok(output) = std::process::Command::new("gh")
            .args(["auth", "token"])
            .output()
        {
            if output.status.success() {
                let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !token.is_empty() {
                    return Ok(token);
                }
            }
        }

        // 3. Config file
        if let Some(token) = &self.github.token {
            return Ok(token.clone());
        }

        Err(Error::Auth(
            "No GitHub token found. Set GITHUB_TOKEN, run 'gh auth login', or add token to config"
                .into(),
        ))
    }

    /// Forecast service URL from `FORECAST_URL`, then the config file.
    pub fn forecast_url(&self) -> Option<String> {
        std::env::var("FORECAST_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .or_else(|| self.forecast.url.clone())
    }

    pub async fn hosting_client(&self, token: &str) -> Result<HostingClient> {
        let client = HostingClient::with_base_url(token, self.github.api_url.as_deref()).await?;
        Ok(client
            .with_per_page(self.fetch.per_page)
            .with_timeout(Duration::from_secs(self.fetch.timeout_secs)))
    }

    pub fn forecast_client(&self) -> Result<ForecastClient> {
        ForecastClient::new(
            self.forecast_url(),
            Duration::from_secs(self.forecast.timeout_secs),
        )
    }
}
