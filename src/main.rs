use clap::Parser;
use std::path::PathBuf;
use stencil_core::config::Config;

mod cli;
mod commands;

fn default_config_path() -> eyre::Result<PathBuf> {
    use dirs_next as dirs;

    dirs::config_dir()
        .map(|dir| dir.join("stencil").join("config.toml"))
        .ok_or_else(|| eyre::eyre!("failed to get default config file path"))
}

fn setup_logger(verbose: bool) -> eyre::Result<()> {
    use tracing::Level;
    use tracing_subscriber::{
        filter::LevelFilter,
        fmt::layer,
        layer::SubscriberExt,
        util::SubscriberInitExt,
        Registry,
    };

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    Registry::default()
        .with(LevelFilter::from(level))
        .with(
            layer()
                .with_ansi(true)
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}

async fn load_config(args: &cli::Cli) -> eyre::Result<Config> {
    if let Some(config_string) = &args.config_string {
        Ok(Config::parse(config_string)?)
    } else if let Some(path) = &args.config_file {
        Ok(Config::parse_file(path).await?)
    } else {
        let path = default_config_path()?;
        if tokio::fs::metadata(&path).await.is_ok() {
            Ok(Config::parse_file(&path).await?)
        } else {
            Ok(Config::default())
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::Cli::parse();
    setup_logger(args.verbose)?;
    let config = load_config(&args).await?;

    match args.subcommand {
        Some(cli::Cmd::Generate(cmd_args)) => commands::generate(&config, cmd_args).await,
        None => commands::generate(&config, Default::default()).await,
        Some(cli::Cmd::Config) => commands::config(&config),
        Some(cli::Cmd::Version) => commands::version(&config).await,
    }
}
