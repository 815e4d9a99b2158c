//! Current weather from Open-Meteo.

use crate::config::{self, WeatherLocation};
use serde::Deserialize;

/// Error type for weather responses
#[derive(Debug)]
pub enum WeatherError {
    Parse(serde_json::Error),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Parse(e) => write!(f, "Invalid weather response: {}", e),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Parse(e)
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: u32,
}

/// Current conditions at the configured location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReport {
    /// Degrees Celsius
    pub temperature: f64,
    /// WMO weather interpretation code
    pub code: u32,
}

impl WeatherReport {
    /// Parse an Open-Meteo forecast response with `current_weather=true`
    pub fn from_json(bytes: &[u8]) -> Result<Self, WeatherError> {
        let response: ForecastResponse = serde_json::from_slice(bytes)?;
        Ok(Self {
            temperature: response.current_weather.temperature,
            code: response.current_weather.weathercode,
        })
    }

    pub fn description(&self) -> &'static str {
        describe_code(self.code)
    }
}

/// What the weather widget currently shows
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeatherStatus {
    Loading,
    Ready(WeatherReport),
    Unavailable,
    /// No location to ask for
    LocationDenied,
}

impl WeatherStatus {
    pub fn temperature_text(&self) -> String {
        match self {
            WeatherStatus::Ready(report) => format!("{}°C", report.temperature),
            _ => String::new(),
        }
    }

    pub fn description_text(&self) -> &'static str {
        match self {
            WeatherStatus::Loading => "Loading...",
            WeatherStatus::Ready(report) => report.description(),
            WeatherStatus::Unavailable => "Unavailable",
            WeatherStatus::LocationDenied => "Location access denied",
        }
    }
}

/// Forecast request URL for a location
pub fn forecast_url(location: &WeatherLocation) -> String {
    config::WEATHER_API_URL
        .replace("{lat}", &location.latitude.to_string())
        .replace("{lon}", &location.longitude.to_string())
}

/// WMO weather code to text
pub fn describe_code(code: u32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}
