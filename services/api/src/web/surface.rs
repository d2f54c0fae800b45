//! services/api/src/web/surface.rs
//!
//! The concrete `MapSurface` implementation. The actual map lives in the user's
//! browser; this handle drives it by emitting surface protocol messages over
//! the connection's outbound channel.

use crate::config::{Config, ConfigError};
use crate::web::protocol::ServerMessage;
use surfnomad_core::domain::PoiId;
use surfnomad_core::ports::{MapSurface, MarkerSpec};
use tokio::sync::mpsc::UnboundedSender;

/// A map surface rendered by the browser's map library.
pub struct WireMapSurface {
    tx: UnboundedSender<ServerMessage>,
}

impl WireMapSurface {
    /// Creates the surface, centered on the given coordinate.
    ///
    /// Fails when the map access token is missing from the configuration; the
    /// caller logs the error and runs the session without a map.
    pub fn create(
        config: &Config,
        tx: UnboundedSender<ServerMessage>,
        lat: f64,
        lng: f64,
    ) -> Result<Self, ConfigError> {
        let access_token = config
            .mapbox_access_token
            .clone()
            .ok_or_else(|| ConfigError::MissingVar("MAPBOX_ACCESS_TOKEN".to_string()))?;

        // A closed channel means the client is gone; there is nothing left to draw.
        let _ = tx.send(ServerMessage::MapCreated {
            access_token,
            style: config.map_style.clone(),
            lat,
            lng,
            zoom: config.map_zoom,
        });
        Ok(Self { tx })
    }
}

impl MapSurface for WireMapSurface {
    fn add_marker(&mut self, marker: MarkerSpec) {
        let _ = self.tx.send(ServerMessage::MarkerAdded { marker });
    }

    fn remove_marker(&mut self, poi_id: PoiId) {
        let _ = self.tx.send(ServerMessage::MarkerRemoved { poi_id });
    }

    fn remove(&mut self) {
        let _ = self.tx.send(ServerMessage::MapRemoved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;
    use tokio::sync::mpsc;
    use tracing::Level;

    fn config(token: Option<&str>) -> Config {
        Config {
            bind_address: "0.0.0.0:3000".parse::<SocketAddr>().unwrap(),
            database_url: "postgres://localhost/surfnomad".to_string(),
            log_level: Level::INFO,
            mapbox_access_token: token.map(str::to_string),
            map_style: "mapbox://styles/mapbox/light-v11".to_string(),
            map_zoom: 11.0,
            marine_api_url: "https://marine-api.open-meteo.com/v1/marine".to_string(),
            weather_api_url: "https://api.open-meteo.com/v1/forecast".to_string(),
        }
    }

    #[test]
    fn creation_emits_map_created_with_the_first_poi_center() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let surface = WireMapSurface::create(&config(Some("pk.test")), tx, -8.65, 115.13);
        assert!(surface.is_ok());

        match rx.try_recv().unwrap() {
            ServerMessage::MapCreated { lat, lng, zoom, .. } => {
                assert_eq!(lat, -8.65);
                assert_eq!(lng, 115.13);
                assert_eq!(zoom, 11.0);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn missing_token_is_a_configuration_error_and_creates_nothing() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let surface = WireMapSurface::create(&config(None), tx, -8.65, 115.13);
        assert!(surface.is_err());
        assert!(rx.try_recv().is_err());
    }
}
