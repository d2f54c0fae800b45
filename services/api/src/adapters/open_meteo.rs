//! services/api/src/adapters/open_meteo.rs
//!
//! This module contains the adapters for the open-meteo marine and forecast APIs.
//! They implement the `MarineDataService` and `WeatherDataService` ports from the
//! `core` crate. Both APIs return hourly series; index 0 is the current hour.

use async_trait::async_trait;
use serde::Deserialize;
use surfnomad_core::domain::{MarineConditions, WeatherConditions};
use surfnomad_core::ports::{MarineDataService, PortError, PortResult, WeatherDataService};

//=========================================================================================
// Response Payloads
//=========================================================================================

#[derive(Debug, Deserialize)]
struct MarineResponse {
    hourly: Option<MarineHourly>,
}

#[derive(Debug, Default, Deserialize)]
struct MarineHourly {
    #[serde(default)]
    wave_height: Vec<Option<f64>>,
    #[serde(default)]
    swell_wave_height: Vec<Option<f64>>,
    #[serde(default)]
    swell_wave_direction: Vec<Option<f64>>,
    #[serde(default)]
    swell_wave_period: Vec<Option<f64>>,
}

impl MarineHourly {
    fn to_conditions(&self) -> PortResult<MarineConditions> {
        Ok(MarineConditions {
            wave_height: current(&self.wave_height, "wave_height")?,
            swell_height: current(&self.swell_wave_height, "swell_wave_height")?,
            swell_direction: current(&self.swell_wave_direction, "swell_wave_direction")?,
            swell_period: current(&self.swell_wave_period, "swell_wave_period")?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    hourly: Option<WeatherHourly>,
}

#[derive(Debug, Default, Deserialize)]
struct WeatherHourly {
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation: Vec<Option<f64>>,
    #[serde(default)]
    weathercode: Vec<Option<u8>>,
    #[serde(default)]
    windspeed_10m: Vec<Option<f64>>,
}

impl WeatherHourly {
    fn to_conditions(&self) -> PortResult<WeatherConditions> {
        Ok(WeatherConditions {
            temperature: current(&self.temperature_2m, "temperature_2m")?,
            precipitation: current(&self.precipitation, "precipitation")?,
            weather_code: current(&self.weathercode, "weathercode")?,
            wind_speed: current(&self.windspeed_10m, "windspeed_10m")?,
        })
    }
}

/// Extracts the current-hour value of an hourly series.
///
/// A missing series, an empty series, or a null at index 0 all count as a
/// malformed payload for this field set.
fn current<T: Copy>(series: &[Option<T>], field: &str) -> PortResult<T> {
    series
        .first()
        .copied()
        .flatten()
        .ok_or_else(|| PortError::Unexpected(format!("hourly series '{}' has no current value", field)))
}

//=========================================================================================
// Marine Adapter
//=========================================================================================

/// An adapter that implements `MarineDataService` against the open-meteo marine API.
#[derive(Clone)]
pub struct OpenMeteoMarineAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoMarineAdapter {
    /// Creates a new `OpenMeteoMarineAdapter`.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl MarineDataService for OpenMeteoMarineAdapter {
    async fn current_conditions(&self, lat: f64, lng: f64) -> PortResult<MarineConditions> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                (
                    "hourly",
                    "wave_height,swell_wave_height,swell_wave_direction,swell_wave_period"
                        .to_string(),
                ),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "marine API responded with {}",
                response.status()
            )));
        }

        let payload: MarineResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        payload
            .hourly
            .ok_or_else(|| {
                PortError::Unexpected("marine response has no hourly block".to_string())
            })?
            .to_conditions()
    }
}

//=========================================================================================
// Weather Adapter
//=========================================================================================

/// An adapter that implements `WeatherDataService` against the open-meteo forecast API.
#[derive(Clone)]
pub struct OpenMeteoWeatherAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl OpenMeteoWeatherAdapter {
    /// Creates a new `OpenMeteoWeatherAdapter`.
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl WeatherDataService for OpenMeteoWeatherAdapter {
    async fn current_conditions(&self, lat: f64, lng: f64) -> PortResult<WeatherConditions> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lng.to_string()),
                (
                    "hourly",
                    "temperature_2m,precipitation,weathercode,windspeed_10m".to_string(),
                ),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PortError::Unexpected(format!(
                "weather API responded with {}",
                response.status()
            )));
        }

        let payload: WeatherResponse = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        payload
            .hourly
            .ok_or_else(|| {
                PortError::Unexpected("weather response has no hourly block".to_string())
            })?
            .to_conditions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marine_payload_reads_index_zero() {
        let payload: MarineResponse = serde_json::from_str(
            r#"{
                "hourly": {
                    "wave_height": [1.42, 1.5],
                    "swell_wave_height": [0.9, 1.0],
                    "swell_wave_direction": [213.0, 215.0],
                    "swell_wave_period": [8.3, 8.1]
                }
            }"#,
        )
        .unwrap();

        let conditions = payload.hourly.unwrap().to_conditions().unwrap();
        assert_eq!(conditions.wave_height, 1.42);
        assert_eq!(conditions.swell_height, 0.9);
        assert_eq!(conditions.swell_direction, 213.0);
        assert_eq!(conditions.swell_period, 8.3);
    }

    #[test]
    fn marine_payload_with_empty_series_is_an_error() {
        let payload: MarineResponse = serde_json::from_str(
            r#"{
                "hourly": {
                    "wave_height": [],
                    "swell_wave_height": [0.9],
                    "swell_wave_direction": [213.0],
                    "swell_wave_period": [8.3]
                }
            }"#,
        )
        .unwrap();

        assert!(payload.hourly.unwrap().to_conditions().is_err());
    }

    #[test]
    fn marine_payload_with_null_current_hour_is_an_error() {
        let payload: MarineResponse = serde_json::from_str(
            r#"{
                "hourly": {
                    "wave_height": [null, 1.5],
                    "swell_wave_height": [0.9],
                    "swell_wave_direction": [213.0],
                    "swell_wave_period": [8.3]
                }
            }"#,
        )
        .unwrap();

        assert!(payload.hourly.unwrap().to_conditions().is_err());
    }

    #[test]
    fn marine_payload_without_hourly_block_is_none() {
        let payload: MarineResponse = serde_json::from_str(r#"{"latitude": -8.65}"#).unwrap();
        assert!(payload.hourly.is_none());
    }

    #[test]
    fn weather_payload_reads_index_zero() {
        let payload: WeatherResponse = serde_json::from_str(
            r#"{
                "hourly": {
                    "temperature_2m": [24.6, 25.0],
                    "precipitation": [0.2, 0.0],
                    "weathercode": [61, 3],
                    "windspeed_10m": [12.4, 10.0]
                }
            }"#,
        )
        .unwrap();

        let conditions = payload.hourly.unwrap().to_conditions().unwrap();
        assert_eq!(conditions.temperature, 24.6);
        assert_eq!(conditions.precipitation, 0.2);
        assert_eq!(conditions.weather_code, 61);
        assert_eq!(conditions.wind_speed, 12.4);
    }

    #[test]
    fn weather_payload_with_missing_series_is_an_error() {
        let payload: WeatherResponse = serde_json::from_str(
            r#"{
                "hourly": {
                    "temperature_2m": [24.6],
                    "precipitation": [0.2],
                    "windspeed_10m": [12.4]
                }
            }"#,
        )
        .unwrap();

        assert!(payload.hourly.unwrap().to_conditions().is_err());
    }
}
