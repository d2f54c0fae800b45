//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub log_level: Level,
    /// Public token for the browser-side map library. Optional at load time;
    /// its absence is only fatal to map surface creation.
    pub mapbox_access_token: Option<String>,
    pub map_style: String,
    pub map_zoom: f64,
    pub marine_api_url: String,
    pub weather_api_url: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server and Database Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load Map Surface Settings ---
        let mapbox_access_token = std::env::var("MAPBOX_ACCESS_TOKEN").ok();
        let map_style = std::env::var("MAP_STYLE")
            .unwrap_or_else(|_| "mapbox://styles/mapbox/light-v11".to_string());
        let map_zoom_str = std::env::var("MAP_ZOOM").unwrap_or_else(|_| "11".to_string());
        let map_zoom = map_zoom_str.parse::<f64>().map_err(|_| {
            ConfigError::InvalidValue(
                "MAP_ZOOM".to_string(),
                format!("'{}' is not a valid zoom level", map_zoom_str),
            )
        })?;

        // --- Load Environmental Data Endpoints ---
        let marine_api_url = std::env::var("MARINE_API_URL")
            .unwrap_or_else(|_| "https://marine-api.open-meteo.com/v1/marine".to_string());
        let weather_api_url = std::env::var("WEATHER_API_URL")
            .unwrap_or_else(|_| "https://api.open-meteo.com/v1/forecast".to_string());

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            mapbox_access_token,
            map_style,
            map_zoom,
            marine_api_url,
            weather_api_url,
        })
    }
}
