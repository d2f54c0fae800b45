//! services/api/src/web/card.rs
//!
//! Builds the summary-card view model for the current selection. This is a pure
//! function of the session state and degrades gracefully: either environmental
//! block may be absent without blocking the rest of the card.

use crate::web::state::MapSession;
use serde::{Deserialize, Serialize};
use surfnomad_core::domain::{MarineConditions, Poi, Review, WeatherConditions};

/// How many reviews fit on the card.
const REVIEW_DISPLAY_LIMIT: usize = 3;

/// The rendered summary card for the selected point of interest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub title: String,
    pub kind_label: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub surf: Option<SurfReport>,
    pub weather: Option<WeatherReport>,
    pub reviews: Vec<ReviewEntry>,
}

/// The wave and swell block of the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfReport {
    pub wave_height: String,
    pub swell_height: String,
    pub swell_direction: String,
    pub swell_period: String,
}

/// The atmospheric block of the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub conditions: String,
    pub temperature: String,
    pub wind_speed: String,
    pub precipitation: String,
}

/// One review line on the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub stars: String,
    pub comment: String,
    pub posted_on: String,
}

/// Builds the card for the session's current selection.
///
/// Returns `None` when nothing is selected or the user closed the card.
pub fn build_card(session: &MapSession) -> Option<SummaryCard> {
    if !session.card_visible() {
        return None;
    }
    let poi = session.selected()?;

    let (kind_label, description, url) = match poi {
        Poi::Spot(_) => ("Surf spot".to_string(), None, None),
        Poi::Location(location) => (
            location.kind.label().to_string(),
            if location.description.is_empty() {
                None
            } else {
                Some(location.description.clone())
            },
            location.url.clone(),
        ),
    };

    let reviews = session
        .reviews
        .get(&poi.id())
        .map(|set| review_entries(set))
        .unwrap_or_default();

    Some(SummaryCard {
        title: poi.name().to_string(),
        kind_label,
        description,
        url,
        surf: session.marine().map(surf_report),
        weather: session.weather().map(weather_report),
        reviews,
    })
}

fn surf_report(conditions: &MarineConditions) -> SurfReport {
    SurfReport {
        wave_height: format_height(conditions.wave_height),
        swell_height: format_height(conditions.swell_height),
        swell_direction: format!("{}°", conditions.swell_direction.round() as i64),
        swell_period: format!("{:.1}s", conditions.swell_period),
    }
}

fn weather_report(conditions: &WeatherConditions) -> WeatherReport {
    WeatherReport {
        conditions: describe_weather_code(conditions.weather_code),
        temperature: format!("{:.1}°C", conditions.temperature),
        wind_speed: format!("{:.1} km/h", conditions.wind_speed),
        precipitation: format!("{:.1}mm", conditions.precipitation),
    }
}

/// Wave and swell heights are shown to one decimal place.
fn format_height(meters: f64) -> String {
    format!("{:.1}m", meters)
}

/// Renders the newest reviews, one filled star glyph per rating point.
fn review_entries(set: &[Review]) -> Vec<ReviewEntry> {
    let mut ordered: Vec<&Review> = set.iter().collect();
    ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ordered
        .into_iter()
        .take(REVIEW_DISPLAY_LIMIT)
        .map(|review| ReviewEntry {
            stars: "★".repeat(review.rating as usize),
            comment: review.comment.clone(),
            posted_on: review.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect()
}

/// Maps a WMO weather code to a human-readable label.
fn describe_weather_code(code: u8) -> String {
    let label = match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snowfall",
        77 => "Snow grains",
        80 | 81 | 82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        other => return format!("Unknown weather code ({})", other),
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use surfnomad_core::domain::{Location, LocationKind, Spot};
    use uuid::Uuid;

    fn spot_named(name: &str) -> Poi {
        Poi::Spot(Spot {
            id: Uuid::new_v4(),
            name: name.to_string(),
            lat: -8.65,
            lng: 115.13,
        })
    }

    fn review(rating: u8, comment: &str, days_ago: i64) -> Review {
        Review {
            id: Uuid::new_v4(),
            rating,
            comment: comment.to_string(),
            created_at: Utc::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn heights_are_rendered_to_one_decimal_place() {
        assert_eq!(format_height(3.14), "3.1m");
        assert_eq!(format_height(0.96), "1.0m");
    }

    #[test]
    fn unmapped_weather_codes_fall_back_to_a_labelled_unknown() {
        assert_eq!(describe_weather_code(12), "Unknown weather code (12)");
        assert_eq!(describe_weather_code(0), "Clear sky");
        assert_eq!(describe_weather_code(95), "Thunderstorm");
    }

    #[test]
    fn reviews_are_newest_first_capped_at_three_with_filled_stars() {
        let set = vec![
            review(4, "oldest", 9),
            review(5, "newest", 0),
            review(3, "second", 1),
            review(1, "third", 2),
        ];
        let entries = review_entries(&set);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].comment, "newest");
        assert_eq!(entries[0].stars, "★★★★★");
        assert_eq!(entries[1].comment, "second");
        assert_eq!(entries[2].comment, "third");
        assert_eq!(entries[2].stars, "★");
    }

    #[test]
    fn no_card_without_a_selection_or_after_closing() {
        let mut session = MapSession::new(vec![], HashMap::new());
        assert!(build_card(&session).is_none());

        session.select(Some(spot_named("Uluwatu")));
        assert!(build_card(&session).is_some());

        session.close_card();
        assert!(build_card(&session).is_none());
    }

    #[test]
    fn partial_enrichment_renders_only_the_available_block() {
        let mut session = MapSession::new(vec![], HashMap::new());
        let generation = session.select(Some(spot_named("Uluwatu")));
        session.apply_marine(
            generation,
            MarineConditions {
                wave_height: 3.14,
                swell_height: 1.26,
                swell_direction: 212.6,
                swell_period: 8.31,
            },
        );

        let card = build_card(&session).unwrap();
        assert_eq!(card.kind_label, "Surf spot");
        let surf = card.surf.unwrap();
        assert_eq!(surf.wave_height, "3.1m");
        assert_eq!(surf.swell_height, "1.3m");
        assert_eq!(surf.swell_direction, "213°");
        assert!(card.weather.is_none());
    }

    #[test]
    fn location_cards_carry_the_kind_label_and_link() {
        let location = Location {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            kind: LocationKind::Cafe,
            name: "Shady Shack".to_string(),
            description: "Smoothie bowls near the beach".to_string(),
            lat: -8.66,
            lng: 115.14,
            url: Some("https://example.com/shady-shack".to_string()),
        };
        let poi = Poi::Location(location);
        let poi_id = poi.id();

        let mut reviews = HashMap::new();
        reviews.insert(poi_id, vec![review(4, "great flat white", 1)]);

        let mut session = MapSession::new(vec![poi.clone()], reviews);
        session.select(Some(poi));

        let card = build_card(&session).unwrap();
        assert_eq!(card.title, "Shady Shack");
        assert_eq!(card.kind_label, "Cafe");
        assert_eq!(
            card.description.as_deref(),
            Some("Smoothie bowls near the beach")
        );
        assert_eq!(card.reviews.len(), 1);
        assert_eq!(card.reviews[0].stars, "★★★★");
    }

    #[test]
    fn reviews_for_an_unknown_poi_render_as_an_empty_list() {
        let mut session = MapSession::new(vec![], HashMap::new());
        session.select(Some(spot_named("Sellac")));
        let card = build_card(&session).unwrap();
        assert!(card.reviews.is_empty());
    }
}
