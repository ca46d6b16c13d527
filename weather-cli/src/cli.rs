use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use std::time::Duration;
use tracing::info;
use weather_core::{Config, QueryState, WeatherQueryService, WeatherSession};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current conditions and daily forecast for a city")]
pub struct Cli {
    /// Log request details to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key and default city.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name; defaults to the configured default city.
        city: Option<String>,

        /// Print the view model as JSON.
        #[arg(long)]
        json: bool,

        /// Keep running and refresh every SECS seconds.
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json, watch } => show(city, json, watch).await,
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt was cancelled")?;

    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()
        .context("Default city prompt was cancelled")?;

    config.api_key = Some(api_key.trim().to_string());
    if !default_city.trim().is_empty() {
        config.default_city = default_city.trim().to_string();
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(city: Option<String>, json: bool, watch: Option<u64>) -> anyhow::Result<()> {
    let config = Config::load()?.with_env_overrides();
    let service = WeatherQueryService::from_config(&config)?;
    let session = WeatherSession::new();

    let city = city.unwrap_or_else(|| config.default_city.clone());
    if !json {
        eprintln!("Loading weather data for {city}...");
    }
    session.run(&service, &city).await;

    let Some(secs) = watch else {
        if let QueryState::Failed(err) = session.state() {
            return Err(anyhow!(err).context(format!("Could not load weather for {city}")));
        }
        return print_state(&session.state(), json);
    };
    print_state(&session.state(), json)?;

    let mut ticker = tokio::time::interval(Duration::from_secs(secs.max(1)));
    ticker.tick().await;
    loop {
        ticker.tick().await;

        let refreshed = match session.refresh(&service).await {
            Some(applied) => applied,
            // Nothing displayed yet: retry the requested city.
            None => session.run(&service, &city).await,
        };
        if refreshed {
            info!(at = %chrono::Local::now().format("%H:%M:%S"), "refreshed");
            print_state(&session.state(), json)?;
        }
    }
}

fn print_state(state: &QueryState, json: bool) -> anyhow::Result<()> {
    match state {
        QueryState::Success(vm) if json => {
            println!("{}", serde_json::to_string_pretty(vm)?);
        }
        QueryState::Success(vm) => {
            println!("{}", render::view_model(vm));
        }
        QueryState::Failed(err) => {
            eprintln!("{}", render::error(err));
        }
        QueryState::Idle | QueryState::Loading { .. } => {}
    }
    Ok(())
}
