use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{Config, Orchestrator, provider_from_config};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the default city, then look up each city typed on stdin.
    Interactive,

    /// Look up one city and print the result.
    Show {
        /// City name; the configured default city when absent.
        city: Option<String>,

        /// Print the widget state as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Store the OpenWeather API key and default city.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Interactive => {
                let orchestrator = orchestrator_from_config()?;
                interactive::run(orchestrator).await?;
            }
            Command::Show { city, json } => {
                let orchestrator = orchestrator_from_config()?;

                match city {
                    Some(city) => {
                        if !orchestrator.fetch_weather(&city).await {
                            bail!("City name must not be empty.");
                        }
                    }
                    None => {
                        orchestrator.mount().await;
                    }
                }

                let state = orchestrator.state();
                if json {
                    let out = serde_json::to_string_pretty(&state)
                        .context("Failed to serialize weather state")?;
                    println!("{out}");
                } else {
                    println!("{}", render::render(&state));
                }
            }
            Command::Configure => configure()?,
        }

        Ok(())
    }
}

fn orchestrator_from_config() -> anyhow::Result<Orchestrator> {
    let config = Config::load()?.with_env_overrides();
    let provider = provider_from_config(&config)?;
    Ok(Orchestrator::new(provider, config.default_city))
}

fn configure() -> anyhow::Result<()> {
    // Environment overrides are not persisted.
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty.");
    }
    config.set_api_key(api_key);

    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .with_placeholder(render::PROMPT_PLACEHOLDER)
        .prompt()
        .context("Failed to read default city")?;
    config.set_default_city(&city);

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

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
    fn bare_invocation_has_no_subcommand() {
        let cli = Cli::try_parse_from(["weather"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn show_accepts_optional_city_and_json() {
        let cli = Cli::try_parse_from(["weather", "show", "Port Harcourt", "--json"]).unwrap();
        match cli.command {
            Some(Command::Show { city, json }) => {
                assert_eq!(city.as_deref(), Some("Port Harcourt"));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["weather", "show"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Show { city: None, json: false })));
    }
}
