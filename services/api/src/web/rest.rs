//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification. These are the read-only
//! data-fetch contracts; everything interactive goes through the WebSocket.

use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use surfnomad_core::domain::{Location, Review, Spot};
use tracing::error;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_spots_handler,
        list_locations_handler,
        spot_reviews_handler,
        location_reviews_handler,
    ),
    components(
        schemas(SpotResponse, LocationResponse, ReviewResponse)
    ),
    tags(
        (name = "Surfnomad API", description = "Read-only data contracts for the surf & work spot map.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// A surf spot as returned by the REST API.
#[derive(Serialize, ToSchema)]
pub struct SpotResponse {
    id: Uuid,
    name: String,
    lat: f64,
    lng: f64,
}

impl From<Spot> for SpotResponse {
    fn from(spot: Spot) -> Self {
        Self {
            id: spot.id,
            name: spot.name,
            lat: spot.lat,
            lng: spot.lng,
        }
    }
}

/// An auxiliary location as returned by the REST API.
#[derive(Serialize, ToSchema)]
pub struct LocationResponse {
    id: Uuid,
    spot_id: Uuid,
    kind: String,
    name: String,
    description: String,
    lat: f64,
    lng: f64,
    url: Option<String>,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            spot_id: location.spot_id,
            kind: location.kind.label().to_string(),
            name: location.name,
            description: location.description,
            lat: location.lat,
            lng: location.lng,
            url: location.url,
        }
    }
}

/// A review as returned by the REST API, most recent first.
#[derive(Serialize, ToSchema)]
pub struct ReviewResponse {
    id: Uuid,
    rating: u8,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List all surf spots.
#[utoipa::path(
    get,
    path = "/spots",
    responses(
        (status = 200, description = "All surf spots", body = [SpotResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_spots_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.db.get_spots().await {
        Ok(spots) => Ok(Json(
            spots.into_iter().map(SpotResponse::from).collect::<Vec<_>>(),
        )),
        Err(e) => {
            error!("Failed to list spots: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list spots".to_string(),
            ))
        }
    }
}

/// List all auxiliary locations.
#[utoipa::path(
    get,
    path = "/locations",
    responses(
        (status = 200, description = "All auxiliary locations", body = [LocationResponse]),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_locations_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.db.get_locations().await {
        Ok(locations) => Ok(Json(
            locations
                .into_iter()
                .map(LocationResponse::from)
                .collect::<Vec<_>>(),
        )),
        Err(e) => {
            error!("Failed to list locations: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to list locations".to_string(),
            ))
        }
    }
}

/// List the reviews for a surf spot, most recent first.
#[utoipa::path(
    get,
    path = "/spots/{id}/reviews",
    responses(
        (status = 200, description = "Reviews for the spot", body = [ReviewResponse]),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The spot id.")
    )
)]
pub async fn spot_reviews_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.db.get_reviews_for_spot(id).await {
        Ok(reviews) => Ok(Json(
            reviews
                .into_iter()
                .map(ReviewResponse::from)
                .collect::<Vec<_>>(),
        )),
        Err(e) => {
            error!("Failed to fetch reviews for spot {}: {:?}", id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch reviews".to_string(),
            ))
        }
    }
}

/// List the reviews for an auxiliary location, most recent first.
#[utoipa::path(
    get,
    path = "/locations/{id}/reviews",
    responses(
        (status = 200, description = "Reviews for the location", body = [ReviewResponse]),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = Uuid, Path, description = "The location id.")
    )
)]
pub async fn location_reviews_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match app_state.db.get_reviews_for_location(id).await {
        Ok(reviews) => Ok(Json(
            reviews
                .into_iter()
                .map(ReviewResponse::from)
                .collect::<Vec<_>>(),
        )),
        Err(e) => {
            error!("Failed to fetch reviews for location {}: {:?}", id, e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch reviews".to_string(),
            ))
        }
    }
}
