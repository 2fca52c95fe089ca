//! stockkeep CLI entry point.

mod args;
mod commands;

use clap::Parser;

use stockkeep_infra::ProviderConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    stockkeep_observability::tracing::init(stockkeep_observability::LogFormat::from_env_or(
        stockkeep_observability::LogFormat::Text,
    ));

    let cli = args::Cli::parse();

    let mut config = ProviderConfig::from_env();
    if let Some(url) = cli.database.clone() {
        config = config.with_database_url(url);
    }

    tracing::debug!(database = %config.database_url, command = ?cli.command, "running");

    if let Err(e) = commands::run(&config, cli.command).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
