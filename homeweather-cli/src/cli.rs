use clap::{Parser, Subcommand};
use homeweather_core::{Config, FileHomeStore, Trigger, Unit, WeatherWidget, WidgetError};
use std::{path::PathBuf, process::ExitCode};

use crate::presenter::TerminalPresenter;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "homeweather", version, about = "Current weather for here, home, or anywhere")]
pub struct Cli {
    /// OpenWeather API key; overrides the configured one.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key and how the current position is found.
    Configure,

    /// Interactive session (the default).
    Run,

    /// Weather at the current position.
    Here,

    /// Weather at the saved home location.
    Home,

    /// Look up a place and show its weather.
    Search {
        /// Place name, e.g. "Paris" or "Portland, OR, US".
        #[arg(required = true)]
        query: Vec<String>,

        /// Units to show: metric or imperial.
        #[arg(long, value_parser = parse_unit)]
        unit: Option<Unit>,

        /// Save the place as home once found.
        #[arg(long)]
        save: bool,
    },
}

type Widget = WeatherWidget<FileHomeStore, TerminalPresenter>;

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config_path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        let command = self.command.unwrap_or(Command::Run);
        if let Command::Configure = command {
            crate::configure::run(&config_path)?;
            return Ok(ExitCode::SUCCESS);
        }

        let mut config = Config::load_from(&config_path)?;
        if let Some(key) = self.api_key {
            config.set_api_key(key);
        }
        let mut widget = build_widget(&config)?;

        let result = match command {
            Command::Configure | Command::Run => return crate::session::run(widget).await,
            Command::Here => widget.use_current_location(Trigger::User).await,
            Command::Home => widget.load_home(Trigger::User).await,
            Command::Search { query, unit, save } => {
                if let Some(unit) = unit {
                    widget.location_mut().set_unit(unit);
                }
                search(&mut widget, &query.join(" "), save).await
            }
        };

        // Failures have already been shown by the presenter.
        Ok(match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        })
    }
}

fn build_widget(config: &Config) -> anyhow::Result<Widget> {
    let client = config.client()?;
    let store = config.home_store()?;
    tracing::debug!(home = %store.path().display(), "using home location store");

    Ok(WeatherWidget::new(client, config.geolocator(), store, TerminalPresenter::new()))
}

fn parse_unit(value: &str) -> anyhow::Result<Unit> {
    Unit::try_from(value)
}

async fn search(widget: &mut Widget, query: &str, save: bool) -> Result<(), WidgetError> {
    widget.submit_search(query).await?;
    if save {
        widget.save_home().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_accepts_unit_in_any_case() {
        let cli = Cli::try_parse_from(["homeweather", "search", "New", "York", "--unit", "Metric"])
            .expect("search should parse");

        match cli.command {
            Some(Command::Search { query, unit, save }) => {
                assert_eq!(query, vec!["New", "York"]);
                assert_eq!(unit, Some(Unit::Metric));
                assert!(!save);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn search_rejects_unknown_unit() {
        let err = Cli::try_parse_from(["homeweather", "search", "Paris", "--unit", "kelvin"])
            .unwrap_err();
        assert!(err.to_string().contains("Unknown unit 'kelvin'"));
    }
}
