use crate::config::Config;
use crate::error::Result;
use crate::model::{EntityKind, RepoId};
use crate::output::{format, ActivityOutput, Format};
use crate::pipeline::{aggregate_activity, ActivityRequest};
use chrono::NaiveDate;
use clap::Args as ClapArgs;
use tokio::task::JoinSet;

const LOG_TARGET: &str = "repo_pulse::activity";

#[derive(ClapArgs)]
pub struct Args {
    /// GitHub repository (owner/repo)
    pub repo: String,

    /// Entity kind to aggregate
    #[arg(long, short, value_enum, default_value_t = EntityKind::Issues)]
    pub kind: EntityKind,

    /// Aggregate every entity kind concurrently
    #[arg(long, conflicts_with = "kind")]
    pub all: bool,

    /// Last day covered (YYYY-MM-DD), defaults to today in UTC
    #[arg(long)]
    pub anchor: Option<NaiveDate>,

    /// Number of trailing months
    #[arg(long)]
    pub months: Option<u32>,
}

pub async fn run(args: Args, config: &Config, token: Option<&str>, output_format: Format) -> Result<()> {
    let repo: RepoId = args.repo.parse()?;
    let anchor = args.anchor.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let months = args.months.unwrap_or(config.fetch.months);

    let token = config.github_token(token)?;
    let client = config.hosting_client(&token).await?;
    let forecaster = config.forecast_client()?;
    if forecaster.url().is_none() {
        log::info!(
            target: LOG_TARGET,
            "No forecast service configured, forecasts will be placeholders"
        );
    }

    let kinds: Vec<EntityKind> = if args.all {
        EntityKind::ALL.to_vec()
    } else {
        vec![args.kind]
    };

    // One task per kind; dropping the set aborts whatever is still running.
    let mut tasks = JoinSet::new();
    for kind in kinds {
        let client = client.clone();
        let forecaster = forecaster.clone();
        let request = ActivityRequest {
            repo: repo.clone(),
            kind,
            anchor,
            months,
        };
        tasks.spawn(async move { aggregate_activity(&client, &forecaster, &request).await });
    }

    let mut reports = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        reports.push(joined??);
    }
    reports.sort_by_key(|r| r.kind);

    print!("{}", format(&ActivityOutput { reports }, output_format));
    Ok(())
}
