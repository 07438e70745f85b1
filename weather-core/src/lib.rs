//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The OpenWeatherMap client (current weather, daily forecast)
//! - Typed response records and unit systems
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod units;

pub use client::{DayCount, Location, OpenWeatherClient};
pub use config::Config;
pub use error::WeatherError;
pub use model::{CurrentWeather, DailyForecast, WeatherForecast};
pub use units::Units;
