mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;
use redact_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = cli::Cli::parse();

    let (config, config_path) = match &cli.config {
        Some(path) => (Config::load_from(path)?, path.clone()),
        None => (Config::load()?, Config::config_path()),
    };

    logging::init(&config.logging, cli.log_level.as_deref(), cli.debug)?;

    match cli.command {
        cli::Commands::Serve {
            host,
            port,
            workers,
            ner_endpoint,
            api_title,
        } => {
            let overrides = commands::serve::Overrides {
                host,
                port,
                workers,
                ner_endpoint,
                api_title,
            };
            commands::serve::handle(config, overrides).await
        }
        cli::Commands::Redact { file, ner_endpoint } => {
            commands::redact::handle(config, file, ner_endpoint).await
        }
        cli::Commands::Config => commands::config::handle(&config, &config_path),
    }
}
