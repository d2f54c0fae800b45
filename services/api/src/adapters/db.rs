//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use surfnomad_core::domain::{Location, LocationKind, Review, Spot};
use surfnomad_core::ports::{DatabaseService, PortError, PortResult};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct SpotRecord {
    id: Uuid,
    name: String,
    lat: f64,
    lng: f64,
}
impl SpotRecord {
    fn to_domain(self) -> Spot {
        Spot {
            id: self.id,
            name: self.name,
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[derive(FromRow)]
struct LocationRecord {
    id: Uuid,
    spot_id: Uuid,
    #[sqlx(rename = "type")]
    kind: String,
    name: String,
    description: Option<String>,
    lat: f64,
    lng: f64,
    url: Option<String>,
}
impl LocationRecord {
    fn to_domain(self) -> PortResult<Location> {
        let kind = LocationKind::from_str(&self.kind).map_err(PortError::Unexpected)?;
        Ok(Location {
            id: self.id,
            spot_id: self.spot_id,
            kind,
            name: self.name,
            description: self.description.unwrap_or_default(),
            lat: self.lat,
            lng: self.lng,
            url: self.url,
        })
    }
}

#[derive(FromRow)]
struct ReviewRecord {
    id: Uuid,
    rating: i32,
    comment: String,
    created_at: DateTime<Utc>,
}
impl ReviewRecord {
    fn to_domain(self) -> Review {
        Review {
            id: self.id,
            rating: self.rating as u8,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn get_spots(&self) -> PortResult<Vec<Spot>> {
        let records =
            sqlx::query_as::<_, SpotRecord>("SELECT id, name, lat, lng FROM surf_spots")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_locations(&self) -> PortResult<Vec<Location>> {
        let records = sqlx::query_as::<_, LocationRecord>(
            "SELECT id, spot_id, type, name, description, lat, lng, url FROM locations",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn get_reviews_for_spot(&self, spot_id: Uuid) -> PortResult<Vec<Review>> {
        let records = sqlx::query_as::<_, ReviewRecord>(
            "SELECT id, rating, comment, created_at FROM reviews WHERE spot_id = $1 ORDER BY created_at DESC",
        )
        .bind(spot_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_reviews_for_location(&self, location_id: Uuid) -> PortResult<Vec<Review>> {
        let records = sqlx::query_as::<_, ReviewRecord>(
            "SELECT id, rating, comment, created_at FROM reviews WHERE location_id = $1 ORDER BY created_at DESC",
        )
        .bind(location_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }
}
