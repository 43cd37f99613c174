//! Current conditions from the Open-Meteo forecast API
//!
//! See: https://open-meteo.com/en/docs

use anyhow::{bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::WeatherConfig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: String,
    /// Degrees Celsius, rounded
    pub temperature: i64,
    pub condition: String,
    /// Relative humidity, percent
    pub humidity: f64,
    /// km/h, rounded
    pub wind_speed: i64,
    pub feels_like: i64,
    pub high: i64,
    pub low: i64,
}

/// Bucket a WMO weather interpretation code
pub fn condition_from_code(code: i64) -> &'static str {
    match code {
        0 => "Clear",
        1..=3 => "Partly Cloudy",
        4..=49 => "Foggy",
        50..=59 => "Drizzle",
        60..=69 => "Rain",
        70..=79 => "Snow",
        80..=99 => "Thunderstorm",
        _ => "Unknown",
    }
}

// Open-Meteo response types
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
    daily: DailyForecast,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    weather_code: i64,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct DailyForecast {
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

pub struct WeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn location(&self) -> &str {
        &self.config.location
    }

    fn forecast_url(&self) -> Result<url::Url> {
        let base = format!("{}/v1/forecast", self.config.api_url.trim_end_matches('/'));
        let url = url::Url::parse_with_params(
            &base,
            &[
                ("latitude", self.config.latitude.to_string()),
                ("longitude", self.config.longitude.to_string()),
                (
                    "current",
                    "temperature_2m,relative_humidity_2m,apparent_temperature,weather_code,wind_speed_10m"
                        .to_string(),
                ),
                ("daily", "temperature_2m_max,temperature_2m_min".to_string()),
                ("timezone", self.config.timezone.clone()),
            ],
        )
        .with_context(|| format!("invalid weather API URL '{}'", base))?;
        Ok(url)
    }

    pub async fn current(&self) -> Result<WeatherReport> {
        let url = self.forecast_url()?;
        tracing::debug!("Fetching weather: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("weather request failed")?;

        if !response.status().is_success() {
            bail!("weather API returned {}", response.status());
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .context("failed to parse weather response")?;

        self.to_report(forecast)
    }

    fn to_report(&self, forecast: ForecastResponse) -> Result<WeatherReport> {
        let current = forecast.current;
        let (Some(high), Some(low)) = (
            forecast.daily.temperature_2m_max.first(),
            forecast.daily.temperature_2m_min.first(),
        ) else {
            bail!("weather response has no daily forecast");
        };

        Ok(WeatherReport {
            location: self.config.location.clone(),
            temperature: round(current.temperature_2m),
            condition: condition_from_code(current.weather_code).to_string(),
            humidity: current.relative_humidity_2m,
            wind_speed: round(current.wind_speed_10m),
            feels_like: round(current.apparent_temperature),
            high: round(*high),
            low: round(*low),
        })
    }
}

/// Half rounds up, toward positive infinity
fn round(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
