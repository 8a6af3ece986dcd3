use clap::Parser;
use repo_pulse::cli::{Cli, Command};
use repo_pulse::config::Config;
use repo_pulse::error::{Error, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.init_logging();
    let format = cli.output_format();
    let config = Config::load(cli.config.as_deref())?;

    let command = async {
        match cli.command {
            Command::Activity(args) => {
                repo_pulse::cli::activity::run(args, &config, cli.token.as_deref(), format).await
            }
            Command::Windows(args) => repo_pulse::cli::windows::run(args, &config, format).await,
        }
    };

    // Dropping the command future on interrupt aborts in-flight pagination.
    tokio::select! {
        result = command => result,
        _ = tokio::signal::ctrl_c() => Err(Error::Cancelled),
    }
}
