//! crates/surfnomad_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases, the
//! environmental data APIs, or the map rendering surface.

use crate::domain::{
    Location, MarineConditions, MarkerIcon, PoiId, Review, Spot, WeatherConditions,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Point-of-Interest Source ---
    async fn get_spots(&self) -> PortResult<Vec<Spot>>;

    async fn get_locations(&self) -> PortResult<Vec<Location>>;

    // --- Review Repository ---
    /// Returns the reviews for a spot, most recent first.
    async fn get_reviews_for_spot(&self, spot_id: Uuid) -> PortResult<Vec<Review>>;

    /// Returns the reviews for a location, most recent first.
    async fn get_reviews_for_location(&self, location_id: Uuid) -> PortResult<Vec<Review>>;
}

#[async_trait]
pub trait MarineDataService: Send + Sync {
    /// Fetches the current wave and swell conditions for a coordinate.
    async fn current_conditions(&self, lat: f64, lng: f64) -> PortResult<MarineConditions>;
}

#[async_trait]
pub trait WeatherDataService: Send + Sync {
    /// Fetches the current atmospheric conditions for a coordinate.
    async fn current_conditions(&self, lat: f64, lng: f64) -> PortResult<WeatherConditions>;
}

//=========================================================================================
// Map Surface Port
//=========================================================================================

/// Everything the map surface needs to draw one marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerSpec {
    pub poi_id: PoiId,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub icon: MarkerIcon,
}

/// Handle to the single map rendering surface of one mounted map view.
///
/// A surface is created at most once per view and torn down with `remove`.
/// Marker clicks travel back out of band (the concrete implementation decides
/// how); the surface itself only draws.
pub trait MapSurface: Send {
    fn add_marker(&mut self, marker: MarkerSpec);

    fn remove_marker(&mut self, poi_id: PoiId);

    /// Tears down the surface itself. The handle is unusable afterwards.
    fn remove(&mut self);
}
