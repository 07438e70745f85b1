use thiserror::Error;

/// Errors returned by the weather client and the typed records.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection, DNS, timeout or body read failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Response body is not JSON or does not have the expected shape.
    #[error(transparent)]
    Decode(#[from] serde_json::Error),

    /// The API answered with a status code other than 200.
    #[error("{message}")]
    Api { code: u16, message: String },

    #[error("the number of days must be between 1 and 16, got {0}")]
    InvalidDayCount(i64),

    #[error("requested a {requested}-day forecast but the response holds {received} days")]
    IncompleteForecast { requested: usize, received: usize },

    #[error("response did not contain any weather condition descriptor")]
    MissingConditionDescriptor,
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
