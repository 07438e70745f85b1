use std::{convert::Infallible, io};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{info, warn};
use weather_core::{
    Config, DayCount, OpenWeatherClient, Units, client::DEFAULT_DAY_COUNT,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and daily forecasts from OpenWeatherMap")]
pub struct Cli {
    /// Increase log output (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Get the current weather.
    #[command(subcommand)]
    Current(CurrentCommand),

    /// Get the daily weather forecast.
    #[command(subcommand)]
    Forecast(ForecastCommand),

    /// Store the OpenWeatherMap API key.
    Configure,
}

#[derive(Debug, Subcommand)]
pub enum CurrentCommand {
    /// Current weather for a city, e.g. `new-york` or `montreal -c ca`.
    City {
        /// City name; separate words with `-`.
        city: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Current weather for a postal code (USA unless --country is given).
    Zip {
        /// Postal code; Canadian codes only need the first three characters.
        code: String,

        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum ForecastCommand {
    /// Daily forecast for a city.
    City {
        /// City name; separate words with `-`.
        city: String,

        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        days: DaysArg,
    },

    /// Daily forecast for a postal code (USA unless --country is given).
    Zip {
        /// Postal code; Canadian codes only need the first three characters.
        code: String,

        #[command(flatten)]
        query: QueryArgs,

        #[command(flatten)]
        days: DaysArg,
    },
}

/// Flags shared by every lookup.
#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Country code of the location, e.g. `ca` for Canada or `fr` for France.
    #[arg(short, long)]
    pub country: Option<String>,

    /// Unit system: S (Kelvin, m/s), M (Celsius, m/s) or I (Fahrenheit, mph).
    #[arg(short, long, default_value = "M", value_parser = parse_units)]
    pub units: Units,

    /// Display a more detailed version of the weather data.
    #[arg(short, long)]
    pub detailed: bool,
}

#[derive(Debug, Args)]
pub struct DaysArg {
    /// Number of forecast days, 1 to 16.
    #[arg(short = 'n', long, default_value_t = DEFAULT_DAY_COUNT, allow_negative_numbers = true)]
    pub count: i64,
}

fn parse_units(value: &str) -> Result<Units, Infallible> {
    Ok(Units::from_flag(value))
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current(command) => run_current(command).await,
            Command::Forecast(command) => run_forecast(command).await,
        }
    }
}

async fn run_current(command: CurrentCommand) -> anyhow::Result<()> {
    let client = client_from_config()?;

    let (weather, query) = match command {
        CurrentCommand::City { city, query } => {
            let weather = client
                .current_by_city(&city, query.country.as_deref(), query.units)
                .await?;
            (weather, query)
        }
        CurrentCommand::Zip { code, query } => {
            let weather = client
                .current_by_postal_code(&code, query.country.as_deref(), query.units)
                .await?;
            (weather, query)
        }
    };

    info!("current weather for {} ({})", weather.name, weather.id);

    let mut out = io::stdout().lock();
    if let Err(err) = render::render_current(&mut out, &weather, query.detailed, query.units) {
        warn!("failed to write weather report: {err}");
    }
    Ok(())
}

async fn run_forecast(command: ForecastCommand) -> anyhow::Result<()> {
    let (location, query, days) = match command {
        ForecastCommand::City { city, query, days } => (Lookup::City(city), query, days),
        ForecastCommand::Zip { code, query, days } => (Lookup::Zip(code), query, days),
    };

    // Reject the day count before touching config or the network.
    let day_count = DayCount::try_from(days.count)?;
    let client = client_from_config()?;
    let country = query.country.as_deref();

    let forecast = match &location {
        Lookup::City(city) => {
            client.forecast_by_city(city, country, day_count, query.units).await?
        }
        Lookup::Zip(code) => {
            client.forecast_by_postal_code(code, country, day_count, query.units).await?
        }
    };

    info!("{}-day forecast for {} ({})", forecast.list.len(), forecast.city.name, forecast.city.id);

    let mut out = io::stdout().lock();
    if let Err(err) = render::render_forecast(
        &mut out,
        &forecast,
        day_count.get(),
        query.detailed,
        query.units,
    ) {
        warn!("failed to write weather report: {err}");
    }
    Ok(())
}

enum Lookup {
    City(String),
    Zip(String),
}

fn client_from_config() -> anyhow::Result<OpenWeatherClient> {
    let config = Config::load()?.with_env_override();
    let api_key = config.require_api_key()?;
    Ok(OpenWeatherClient::new(api_key))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.require_api_key()?;
    config.save()?;

    println!("API key saved to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[test]
    fn current_city_defaults() {
        let cli = parse(&["weather", "current", "city", "london"]);

        let Command::Current(CurrentCommand::City { city, query }) = cli.command else {
            panic!("expected current city");
        };
        assert_eq!(city, "london");
        assert_eq!(query.country, None);
        assert_eq!(query.units, Units::Metric);
        assert!(!query.detailed);
    }

    #[test]
    fn current_zip_with_short_flags() {
        let cli = parse(&["weather", "current", "zip", "75001", "-c", "fr", "-u", "S", "-d"]);

        let Command::Current(CurrentCommand::Zip { code, query }) = cli.command else {
            panic!("expected current zip");
        };
        assert_eq!(code, "75001");
        assert_eq!(query.country.as_deref(), Some("fr"));
        assert_eq!(query.units, Units::Standard);
        assert!(query.detailed);
    }

    #[test]
    fn unknown_units_fall_back_to_metric() {
        let cli = parse(&["weather", "current", "city", "london", "--units", "Q"]);

        let Command::Current(CurrentCommand::City { query, .. }) = cli.command else {
            panic!("expected current city");
        };
        assert_eq!(query.units, Units::Metric);
    }

    #[test]
    fn forecast_count_defaults_to_seven() {
        let cli = parse(&["weather", "forecast", "city", "madrid"]);

        let Command::Forecast(ForecastCommand::City { days, .. }) = cli.command else {
            panic!("expected forecast city");
        };
        assert_eq!(days.count, 7);
    }

    #[test]
    fn forecast_accepts_negative_count_for_validation() {
        let cli = parse(&["weather", "forecast", "zip", "h1a", "-c", "ca", "-n", "-1"]);

        let Command::Forecast(ForecastCommand::Zip { code, days, query }) = cli.command else {
            panic!("expected forecast zip");
        };
        assert_eq!(code, "h1a");
        assert_eq!(days.count, -1);
        assert_eq!(query.country.as_deref(), Some("ca"));
        assert!(DayCount::try_from(days.count).is_err());
    }

    #[tokio::test]
    async fn invalid_count_fails_before_config_lookup() {
        let cli = parse(&["weather", "forecast", "city", "madrid", "--count", "17"]);

        let err = cli.run().await.unwrap_err();
        assert_eq!(err.to_string(), "the number of days must be between 1 and 16, got 17");
    }

    #[test]
    fn missing_location_is_a_usage_error() {
        assert!(Cli::try_parse_from(["weather", "current", "city"]).is_err());
        assert!(Cli::try_parse_from(["weather", "forecast", "zip"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = parse(&["weather", "current", "city", "london", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }
}
