use log::debug;
use reqwest::{Client, Request, StatusCode, Url};

use crate::{
    error::{Result, WeatherError},
    model::{CurrentWeather, WeatherForecast},
    units::Units,
};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub const MIN_DAY_COUNT: i64 = 1;
pub const MAX_DAY_COUNT: i64 = 16;
pub const DEFAULT_DAY_COUNT: i64 = 7;

/// Number of forecast days, validated to lie in `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount(u8);

impl DayCount {
    pub fn get(self) -> usize {
        usize::from(self.0)
    }
}

impl TryFrom<i64> for DayCount {
    type Error = WeatherError;

    fn try_from(value: i64) -> Result<Self> {
        if (MIN_DAY_COUNT..=MAX_DAY_COUNT).contains(&value) {
            Ok(DayCount(value as u8))
        } else {
            Err(WeatherError::InvalidDayCount(value))
        }
    }
}

/// How a request resolves its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    City(String),
    /// Without a country the API searches in its default region (USA).
    PostalCode(String),
}

impl Location {
    fn query_key(&self) -> &'static str {
        match self {
            Location::City(_) => "q",
            Location::PostalCode(_) => "zip",
        }
    }

    /// Selector value, joined with the country code as `value,country`.
    fn query_value(&self, country: Option<&str>) -> String {
        let value = match self {
            Location::City(city) => city_token(city),
            Location::PostalCode(code) => code.trim().to_string(),
        };

        match country.map(str::trim).filter(|c| !c.is_empty()) {
            Some(country) => format!("{value},{country}"),
            None => value,
        }
    }
}

/// Multi-word cities are typed with hyphens (`new-york`). They become spaces,
/// which the query encoder writes as `+`.
fn city_token(city: &str) -> String {
    city.trim().replace('-', " ")
}

/// Client for the OpenWeatherMap current weather and daily forecast endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn current_by_city(
        &self,
        city: &str,
        country: Option<&str>,
        units: Units,
    ) -> Result<CurrentWeather> {
        self.current(&Location::City(city.to_string()), country, units).await
    }

    pub async fn current_by_postal_code(
        &self,
        code: &str,
        country: Option<&str>,
        units: Units,
    ) -> Result<CurrentWeather> {
        self.current(&Location::PostalCode(code.to_string()), country, units).await
    }

    pub async fn forecast_by_city(
        &self,
        city: &str,
        country: Option<&str>,
        days: DayCount,
        units: Units,
    ) -> Result<WeatherForecast> {
        self.forecast(&Location::City(city.to_string()), country, days, units).await
    }

    pub async fn forecast_by_postal_code(
        &self,
        code: &str,
        country: Option<&str>,
        days: DayCount,
        units: Units,
    ) -> Result<WeatherForecast> {
        self.forecast(&Location::PostalCode(code.to_string()), country, days, units).await
    }

    pub async fn current(
        &self,
        location: &Location,
        country: Option<&str>,
        units: Units,
    ) -> Result<CurrentWeather> {
        let request = self.current_request(location, country, units)?;
        let (status, body) = self.execute(request).await?;

        with_http_status(status, &body, decode_current(&body))
    }

    /// Fetch `days` daily entries. The returned list holds exactly `days`
    /// entries.
    pub async fn forecast(
        &self,
        location: &Location,
        country: Option<&str>,
        days: DayCount,
        units: Units,
    ) -> Result<WeatherForecast> {
        let request = self.forecast_request(location, country, days, units)?;
        let (status, body) = self.execute(request).await?;

        let forecast = with_http_status(status, &body, decode_forecast(&body))?;
        with_day_count(forecast, days)
    }

    fn current_request(
        &self,
        location: &Location,
        country: Option<&str>,
        units: Units,
    ) -> Result<Request> {
        let url = format!("{}/weather", self.base_url);

        let request = self
            .http
            .get(url)
            .query(&[
                (location.query_key(), location.query_value(country).as_str()),
                ("units", units.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .build()?;

        Ok(request)
    }

    fn forecast_request(
        &self,
        location: &Location,
        country: Option<&str>,
        days: DayCount,
        units: Units,
    ) -> Result<Request> {
        let url = format!("{}/forecast/daily", self.base_url);

        let request = self
            .http
            .get(url)
            .query(&[
                (location.query_key(), location.query_value(country).as_str()),
                ("units", units.as_str()),
                ("cnt", days.get().to_string().as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .build()?;

        Ok(request)
    }

    async fn execute(&self, request: Request) -> Result<(StatusCode, String)> {
        debug!("GET {}", redacted_url(request.url()));

        let res = self.http.execute(request).await?;
        let status = res.status();
        let body = res.text().await?;

        debug!("response status {status}, {} bytes", body.len());
        Ok((status, body))
    }
}

/// The URL with the `appid` value masked, for logging.
fn redacted_url(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "appid" { "***".to_string() } else { value.into_owned() };
            (key.into_owned(), value)
        })
        .collect();

    let mut redacted = url.clone();
    if !pairs.is_empty() {
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }
    redacted.to_string()
}

/// Decode a `/weather` body, turning a non-200 `cod` into an API error.
pub fn decode_current(body: &str) -> Result<CurrentWeather> {
    let weather: CurrentWeather = serde_json::from_str(body)?;

    if !weather.is_ok() {
        let message = weather.message.clone().unwrap_or_default();
        return Err(api_error(weather.cod, message));
    }

    Ok(weather)
}

/// Decode a `/forecast/daily` body, turning a non-200 `cod` into an API error.
pub fn decode_forecast(body: &str) -> Result<WeatherForecast> {
    let forecast: WeatherForecast = serde_json::from_str(body)?;

    if !forecast.is_ok() {
        let message = forecast.error_message().unwrap_or_default().to_string();
        return Err(api_error(forecast.cod, message));
    }

    Ok(forecast)
}

/// Trim a longer list to `days` entries; a shorter one is an error.
fn with_day_count(mut forecast: WeatherForecast, days: DayCount) -> Result<WeatherForecast> {
    let requested = days.get();
    let received = forecast.list.len();

    if received < requested {
        return Err(WeatherError::IncompleteForecast { requested, received });
    }

    forecast.list.truncate(requested);
    Ok(forecast)
}

fn api_error(code: u16, message: String) -> WeatherError {
    let message = if message.is_empty() {
        format!("request failed with status code {code}")
    } else {
        message
    };

    WeatherError::Api { code, message }
}

/// A body that fails to decode on an unsuccessful HTTP status (a proxy error
/// page, for instance) is reported with that status instead.
fn with_http_status<T>(status: StatusCode, body: &str, decoded: Result<T>) -> Result<T> {
    match decoded {
        Err(WeatherError::Decode(_)) if !status.is_success() => Err(WeatherError::Api {
            code: status.as_u16(),
            message: format!("request failed with status {status}: {}", truncate_body(body)),
        }),
        other => other,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
