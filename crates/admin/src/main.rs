use anyhow::Context;
use clap::Parser;
use mockable::DefaultClock;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use commands::App;
use config::Config;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()
        .context("Failed to load configuration")?
        .with_overrides(cli.data_dir.clone(), cli.verbose);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("reppi_admin={},storage={}", config.log_level, config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let output = match cli.command {
        Commands::Reset { collection } => commands::reset(&config.data_dir, collection)?,
        command => {
            let mut app = App::open(&config.data_dir, Arc::new(DefaultClock))?;
            let output = app.run(command)?;
            for toast in app.toasts() {
                eprintln!("[{:?}] {}", toast.kind, toast.message);
            }
            output
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
