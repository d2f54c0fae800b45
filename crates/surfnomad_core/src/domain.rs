//! crates/surfnomad_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or map-surface implementation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A surf spot: the primary point-of-interest kind on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: Uuid,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

/// The category of an auxiliary location tied to a spot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Coworking,
    Cafe,
    Hostel,
    SurfShop,
}

impl LocationKind {
    /// Human-readable label shown on the summary card.
    pub fn label(&self) -> &'static str {
        match self {
            LocationKind::Coworking => "Coworking",
            LocationKind::Cafe => "Cafe",
            LocationKind::Hostel => "Hostel",
            LocationKind::SurfShop => "Surf shop",
        }
    }
}

impl std::str::FromStr for LocationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coworking" => Ok(LocationKind::Coworking),
            "cafe" => Ok(LocationKind::Cafe),
            "hostel" => Ok(LocationKind::Hostel),
            "surf_shop" => Ok(LocationKind::SurfShop),
            other => Err(format!("unknown location type '{}'", other)),
        }
    }
}

/// An auxiliary location near a spot (coworking space, cafe, hostel, surf shop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub spot_id: Uuid,
    pub kind: LocationKind,
    pub name: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub url: Option<String>,
}

/// Identity of a point of interest: the entity kind plus its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PoiId {
    Spot(Uuid),
    Location(Uuid),
}

/// A selectable point of interest on the map.
///
/// POIs are immutable once loaded; the map view only reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Poi {
    Spot(Spot),
    Location(Location),
}

impl Poi {
    pub fn id(&self) -> PoiId {
        match self {
            Poi::Spot(spot) => PoiId::Spot(spot.id),
            Poi::Location(location) => PoiId::Location(location.id),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Poi::Spot(spot) => &spot.name,
            Poi::Location(location) => &location.name,
        }
    }

    pub fn lat(&self) -> f64 {
        match self {
            Poi::Spot(spot) => spot.lat,
            Poi::Location(location) => location.lat,
        }
    }

    pub fn lng(&self) -> f64 {
        match self {
            Poi::Spot(spot) => spot.lng,
            Poi::Location(location) => location.lng,
        }
    }

    /// The icon class drawn for this POI's marker.
    pub fn icon(&self) -> MarkerIcon {
        match self {
            Poi::Spot(_) => MarkerIcon::Spot,
            Poi::Location(location) => match location.kind {
                LocationKind::Coworking => MarkerIcon::Coworking,
                LocationKind::Cafe => MarkerIcon::Cafe,
                LocationKind::Hostel => MarkerIcon::Hostel,
                LocationKind::SurfShop => MarkerIcon::SurfShop,
            },
        }
    }
}

/// The five marker icon classes the map surface can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerIcon {
    Spot,
    Coworking,
    Cafe,
    Hostel,
    SurfShop,
}

/// A single user review of a spot or location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Current wave and swell conditions at a coordinate.
///
/// Taken from index 0 of the marine API's hourly series (the current hour).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarineConditions {
    pub wave_height: f64,
    pub swell_height: f64,
    pub swell_direction: f64,
    pub swell_period: f64,
}

/// Current atmospheric conditions at a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherConditions {
    pub temperature: f64,
    pub wind_speed: f64,
    pub weather_code: u8,
    pub precipitation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn location_kind_round_trips_through_db_strings() {
        for raw in ["coworking", "cafe", "hostel", "surf_shop"] {
            assert!(LocationKind::from_str(raw).is_ok(), "failed to parse {raw}");
        }
        assert!(LocationKind::from_str("bakery").is_err());
    }

    #[test]
    fn every_poi_kind_has_a_distinct_icon() {
        let spot = Poi::Spot(Spot {
            id: Uuid::new_v4(),
            name: "Canggu".to_string(),
            lat: -8.65,
            lng: 115.13,
        });
        let mut icons = vec![spot.icon()];
        for kind in [
            LocationKind::Coworking,
            LocationKind::Cafe,
            LocationKind::Hostel,
            LocationKind::SurfShop,
        ] {
            icons.push(
                Poi::Location(Location {
                    id: Uuid::new_v4(),
                    spot_id: Uuid::new_v4(),
                    kind,
                    name: "somewhere".to_string(),
                    description: String::new(),
                    lat: 0.0,
                    lng: 0.0,
                    url: None,
                })
                .icon(),
            );
        }
        for (i, a) in icons.iter().enumerate() {
            for b in icons.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn poi_identity_distinguishes_kinds_with_equal_ids() {
        let id = Uuid::new_v4();
        assert_ne!(PoiId::Spot(id), PoiId::Location(id));
    }
}
