use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A single page or request failed or came back in an unexpected shape.
    #[error("Fetch failed: {0}")]
    TransientFetch(String),

    #[error("Hosting API unavailable for {repo} ({kind}): every request failed")]
    UpstreamUnavailable { repo: String, kind: String },

    #[error("Forecast service unavailable: {0}")]
    ForecastUnavailable(String),

    #[error("Malformed {kind} record: {reason}")]
    MalformedRecord { kind: String, reason: String },

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Invalid repository format: {0}. Expected owner/repo")]
    InvalidRepository(String),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] octocrab::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GitHub authentication failed: {0}")]
    Auth(String),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Interrupted")]
    Cancelled,
}

impl Error {
    /// Whether the failure is local to one page and may be skipped.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::TransientFetch(_) | Error::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
