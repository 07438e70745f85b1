//! Typed records for the OpenWeatherMap current weather and daily forecast
//! responses.
//!
//! Every block is default-initialised when the API leaves it out, so an error
//! body that only carries `cod` and `message` still decodes.

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::error::{Result, WeatherError};

/// Status code the API reports for a successful lookup.
pub const STATUS_OK: u16 = 200;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

/// One weather condition descriptor, e.g. `Clouds / broken clouds`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainMeasurements {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
    pub sea_level: u32,
    pub grnd_level: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wind {
    pub speed: f64,
    pub deg: u16,
    pub gust: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Clouds {
    pub all: u8,
}

/// Rain or snow volume for the last hour, in millimetres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub last_hour: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sys {
    #[serde(rename = "type")]
    pub kind: u32,
    pub id: u64,
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Snapshot returned by the `/weather` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentWeather {
    pub coord: Coordinates,
    pub weather: Vec<Condition>,
    pub base: String,
    pub main: MainMeasurements,
    pub visibility: u32,
    pub wind: Wind,
    pub clouds: Clouds,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    /// Observation time, Unix seconds.
    pub dt: i64,
    pub sys: Sys,
    /// Shift in seconds from UTC.
    pub timezone: i32,
    pub id: u64,
    pub name: String,
    #[serde(deserialize_with = "status_code")]
    pub cod: u16,
    pub message: Option<String>,
}

impl CurrentWeather {
    /// First condition descriptor of the snapshot.
    pub fn condition(&self) -> Result<&Condition> {
        first_condition(&self.weather)
    }

    pub fn is_ok(&self) -> bool {
        self.cod == STATUS_OK
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct City {
    pub id: u64,
    pub name: String,
    pub coord: Coordinates,
    pub country: String,
    pub population: u64,
    pub timezone: i32,
}

/// Temperatures of one day by time of day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyFeelsLike {
    pub day: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

/// One entry of the daily forecast list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyForecast {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: DailyTemperature,
    pub feels_like: DailyFeelsLike,
    pub pressure: u32,
    pub humidity: u8,
    pub weather: Vec<Condition>,
    pub speed: f64,
    pub deg: u16,
    pub gust: f64,
    pub clouds: u8,
    pub rain: Option<f64>,
    pub snow: Option<f64>,
    /// Probability of precipitation, 0.0 to 1.0.
    pub pop: f64,
}

impl DailyForecast {
    pub fn condition(&self) -> Result<&Condition> {
        first_condition(&self.weather)
    }
}

/// Multi-day record returned by the `/forecast/daily` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherForecast {
    pub city: City,
    #[serde(deserialize_with = "status_code")]
    pub cod: u16,
    pub message: Option<serde_json::Value>,
    pub cnt: u32,
    pub list: Vec<DailyForecast>,
}

impl WeatherForecast {
    pub fn is_ok(&self) -> bool {
        self.cod == STATUS_OK
    }

    /// Text of the `message` field when the API sent one as a string.
    pub fn error_message(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.as_str())
    }
}

fn first_condition(conditions: &[Condition]) -> Result<&Condition> {
    conditions.first().ok_or(WeatherError::MissingConditionDescriptor)
}

/// The API sends `cod` as a number on `/weather` success bodies and as a
/// string everywhere else.
fn status_code<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Number(u16),
        Text(String),
    }

    match RawCode::deserialize(deserializer)? {
        RawCode::Number(code) => Ok(code),
        RawCode::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid status code '{text}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_accessor_returns_first_descriptor() {
        let weather = CurrentWeather {
            weather: vec![
                Condition { id: 500, main: "Rain".into(), description: "light rain".into(), icon: "10d".into() },
                Condition { id: 701, main: "Mist".into(), description: "mist".into(), icon: "50d".into() },
            ],
            ..Default::default()
        };

        assert_eq!(weather.condition().unwrap().description, "light rain");
    }

    #[test]
    fn empty_condition_list_is_a_named_error() {
        let weather = CurrentWeather::default();
        let err = weather.condition().unwrap_err();
        assert!(matches!(err, WeatherError::MissingConditionDescriptor));

        let day = DailyForecast::default();
        assert!(matches!(day.condition(), Err(WeatherError::MissingConditionDescriptor)));
    }

    #[test]
    fn status_code_accepts_number_and_string() {
        let numeric: CurrentWeather = serde_json::from_str(r#"{"cod": 200}"#).unwrap();
        assert_eq!(numeric.cod, 200);
        assert!(numeric.is_ok());

        let text: WeatherForecast = serde_json::from_str(r#"{"cod": "404"}"#).unwrap();
        assert_eq!(text.cod, 404);
        assert!(!text.is_ok());
    }

    #[test]
    fn status_code_rejects_garbage() {
        let err = serde_json::from_str::<CurrentWeather>(r#"{"cod": "abc"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid status code"));
    }

    #[test]
    fn missing_blocks_are_default_initialised() {
        let weather: CurrentWeather =
            serde_json::from_str(r#"{"cod": 200, "name": "Nowhere"}"#).unwrap();

        assert_eq!(weather.name, "Nowhere");
        assert_eq!(weather.main, MainMeasurements::default());
        assert_eq!(weather.wind, Wind::default());
        assert!(weather.rain.is_none());
        assert!(weather.snow.is_none());
        assert!(weather.weather.is_empty());
    }

    #[test]
    fn forecast_message_may_be_number_or_text() {
        let ok: WeatherForecast =
            serde_json::from_str(r#"{"cod": "200", "message": 0.0512, "cnt": 0}"#).unwrap();
        assert_eq!(ok.error_message(), None);

        let failed: WeatherForecast =
            serde_json::from_str(r#"{"cod": "404", "message": "city not found"}"#).unwrap();
        assert_eq!(failed.error_message(), Some("city not found"));
    }
}
