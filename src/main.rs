#![allow(dead_code)]

mod action;
mod api;
mod app;
mod config;
mod currency;
mod destinations;
mod error;
mod form;
mod models;
mod scope;
mod screens;
mod session;
mod state;
mod theme;
mod tui;
mod validation;
mod widgets;

use std::fs::OpenOptions;
use std::sync::Mutex;

use app::App;
use config::Config;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let config = Config::load()?;
    init_logging(&config)?;

    // Initialize and run the TUI application
    let mut app = App::new(&config).await?;
    app.run().await?;
    Ok(())
}

/// Log to a file; stdout belongs to the terminal UI.
fn init_logging(config: &Config) -> error::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tripfund=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
    Ok(())
}
