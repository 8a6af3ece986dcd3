use crate::config::Config;
use crate::error::Result;
use crate::output::{format, Format, WindowsOutput};
use crate::window;
use chrono::NaiveDate;
use clap::Args as ClapArgs;

#[derive(ClapArgs)]
pub struct Args {
    /// Last day covered (YYYY-MM-DD), defaults to today in UTC
    #[arg(long)]
    pub anchor: Option<NaiveDate>,

    /// Number of trailing months
    #[arg(long)]
    pub months: Option<u32>,
}

pub async fn run(args: Args, config: &Config, output_format: Format) -> Result<()> {
    let anchor = args.anchor.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let months = args.months.unwrap_or(config.fetch.months);

    let output = WindowsOutput {
        windows: window::generate(anchor, months),
    };
    print!("{}", format(&output, output_format));
    Ok(())
}
