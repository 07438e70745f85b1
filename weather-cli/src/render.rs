//! Human-friendly console output for current weather and daily forecasts.

use std::{fmt::Display, io};

use chrono::{Local, TimeZone};
use log::warn;
use weather_core::{
    CurrentWeather, DailyForecast, Units, WeatherError, WeatherForecast, model::Condition,
};

const TIME_FORMAT: &str = "%H:%M:%S";
const DATE_FORMAT: &str = "%a %d-%m-%Y";
const DATE_TIME_FORMAT: &str = "%a %d-%m-%Y %H:%M:%S";

/// Label/value rows whose values line up in one column.
#[derive(Debug, Default)]
struct Table {
    rows: Vec<(String, String)>,
}

impl Table {
    fn row(&mut self, label: &str, value: impl Display) -> &mut Self {
        self.rows.push((format!("{label}:"), value.to_string()));
        self
    }

    fn write_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        let width = self.rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

        for (label, value) in &self.rows {
            writeln!(out, "{label:<width$} {value}")?;
        }
        Ok(())
    }
}

/// Write the current weather report.
pub fn render_current(
    out: &mut impl io::Write,
    weather: &CurrentWeather,
    detailed: bool,
    units: Units,
) -> io::Result<()> {
    let temp = units.temperature_symbol();
    let speed = units.speed_symbol();

    writeln!(out, "Here is the current weather data.")?;

    let mut table = Table::default();
    table
        .row("City", format!("{} {}", weather.name, weather.sys.country).trim_end())
        .row("Temperature", format!("{} {temp}", weather.main.temp))
        .row("Feels like", format!("{} {temp}", weather.main.feels_like))
        .row("Min temperature", format!("{} {temp}", weather.main.temp_min))
        .row("Max temperature", format!("{} {temp}", weather.main.temp_max))
        .row("Condition", condition_text(weather.condition()))
        .row("Humidity", format!("{} %", weather.main.humidity));

    if detailed {
        table
            .row("Pressure", format!("{} hPa", weather.main.pressure))
            .row("Cloudiness", format!("{} %", weather.clouds.all))
            .row("Wind speed", format!("{} {speed}", weather.wind.speed))
            .row("Wind direction", format!("{}°", weather.wind.deg))
            .row("Wind gust", format!("{} {speed}", weather.wind.gust));

        if let Some(rain) = &weather.rain {
            table.row("Rain (last hour)", format!("{} mm", rain.last_hour));
        }
        if let Some(snow) = &weather.snow {
            table.row("Snow (last hour)", format!("{} mm", snow.last_hour));
        }

        table
            .row("Sunrise", local_time(weather.sys.sunrise, TIME_FORMAT))
            .row("Sunset", local_time(weather.sys.sunset, TIME_FORMAT))
            .row("Longitude", weather.coord.lon)
            .row("Latitude", weather.coord.lat);
    }

    table.row("Date & Time of data collection", local_time(weather.dt, DATE_TIME_FORMAT));
    table.write_to(out)?;

    out.flush()
}

/// Write the first `day_count` daily entries of a forecast, in the order the
/// API returned them.
pub fn render_forecast(
    out: &mut impl io::Write,
    forecast: &WeatherForecast,
    day_count: usize,
    detailed: bool,
    units: Units,
) -> io::Result<()> {
    let city = &forecast.city;
    writeln!(out, "Here is the daily weather forecast for {} {}", city.name, city.country)?;

    if detailed {
        let mut table = Table::default();
        table
            .row("Longitude", city.coord.lon)
            .row("Latitude", city.coord.lat)
            .row("Population", city.population);
        table.write_to(out)?;
    }

    for day in forecast.list.iter().take(day_count) {
        writeln!(out)?;
        day_table(day, detailed, units).write_to(out)?;
    }

    out.flush()
}

fn day_table(day: &DailyForecast, detailed: bool, units: Units) -> Table {
    let temp = units.temperature_symbol();
    let speed = units.speed_symbol();

    let mut table = Table::default();
    table
        .row("Date", local_time(day.dt, DATE_FORMAT))
        .row("Temperature", format!("{} {temp}", day.temp.day))
        .row("Feels like", format!("{} {temp}", day.feels_like.day))
        .row("Min temperature", format!("{} {temp}", day.temp.min))
        .row("Max temperature", format!("{} {temp}", day.temp.max))
        .row("Condition", condition_text(day.condition()))
        .row("Humidity", format!("{} %", day.humidity));

    if detailed {
        table
            .row("Pressure", format!("{} hPa", day.pressure))
            .row("Cloudiness", format!("{} %", day.clouds))
            .row("Wind speed", format!("{} {speed}", day.speed))
            .row("Wind direction", format!("{}°", day.deg))
            .row("Wind gust", format!("{} {speed}", day.gust))
            .row("Precipitation chance", format!("{:.0} %", day.pop * 100.0));

        if let Some(rain) = day.rain {
            table.row("Rain", format!("{rain} mm"));
        }
        if let Some(snow) = day.snow {
            table.row("Snow", format!("{snow} mm"));
        }

        table
            .row("Sunrise", local_time(day.sunrise, TIME_FORMAT))
            .row("Sunset", local_time(day.sunset, TIME_FORMAT));
    }

    table
}

fn condition_text(condition: Result<&Condition, WeatherError>) -> String {
    match condition {
        Ok(condition) => condition.description.clone(),
        Err(err) => {
            warn!("{err}");
            "unknown".to_string()
        }
    }
}

/// Unix seconds as local clock time.
fn local_time(ts: i64, format: &str) -> String {
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format(format).to_string(),
        None => "-".to_string(),
    }
}
