//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-connection map session.
//! `MapSession` is the selection coordinator and the stale-result guard for the
//! enrichment fetches.

use crate::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use surfnomad_core::domain::{
    Location, MarineConditions, Poi, PoiId, Review, Spot, WeatherConditions,
};
use surfnomad_core::ports::{DatabaseService, MarineDataService, PortResult, WeatherDataService};
use tracing::debug;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub marine: Arc<dyn MarineDataService>,
    pub weather: Arc<dyn WeatherDataService>,
    pub config: Arc<Config>,
}

//=========================================================================================
// MapSession (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active map view connection.
///
/// At most one POI is selected at a time; the sum type makes the
/// spot-XOR-location exclusion structural. Every call to `select` starts a new
/// generation, and environmental results are only applied while their
/// generation tag still matches.
pub struct MapSession {
    /// All points of interest currently on the map, spots before locations.
    pub pois: Vec<Poi>,
    /// Reviews bulk-loaded per POI id, most recent first.
    pub reviews: HashMap<PoiId, Vec<Review>>,
    selected: Option<Poi>,
    generation: u64,
    card_visible: bool,
    marine: Option<MarineConditions>,
    weather: Option<WeatherConditions>,
}

impl MapSession {
    pub fn new(pois: Vec<Poi>, reviews: HashMap<PoiId, Vec<Review>>) -> Self {
        Self {
            pois,
            reviews,
            selected: None,
            generation: 0,
            card_visible: true,
            marine: None,
            weather: None,
        }
    }

    /// Creates a new `MapSession` by fetching the POI list and bulk-loading
    /// the reviews for every POI.
    pub async fn load(app_state: &AppState) -> PortResult<Self> {
        let (pois, reviews) = fetch_pois(app_state).await?;
        Ok(Self::new(pois, reviews))
    }

    /// Re-fetches the POI list and review map. The selection is left as-is,
    /// even if the selected POI is no longer in the list.
    pub async fn refresh(&mut self, app_state: &AppState) -> PortResult<()> {
        let (pois, reviews) = fetch_pois(app_state).await?;
        self.pois = pois;
        self.reviews = reviews;
        Ok(())
    }

    // --- Selection Coordinator ---

    /// Moves the selection and starts a new generation.
    ///
    /// Card visibility resets to visible only when the new id differs from the
    /// previous selection's id, so re-selecting a POI whose card was closed
    /// keeps it closed. The stored environmental conditions belong to the
    /// generation that fetched them and are always discarded here. Returns the
    /// new generation number.
    pub fn select(&mut self, poi: Option<Poi>) -> u64 {
        let previous_id = self.selected.as_ref().map(Poi::id);
        let next_id = poi.as_ref().map(Poi::id);
        if next_id != previous_id {
            self.card_visible = true;
        }
        self.selected = poi;
        self.generation += 1;
        self.marine = None;
        self.weather = None;
        self.generation
    }

    /// Hides the summary card for the current selection.
    pub fn close_card(&mut self) {
        self.card_visible = false;
    }

    pub fn selected(&self) -> Option<&Poi> {
        self.selected.as_ref()
    }

    pub fn selected_spot(&self) -> Option<&Spot> {
        match &self.selected {
            Some(Poi::Spot(spot)) => Some(spot),
            _ => None,
        }
    }

    pub fn selected_location(&self) -> Option<&Location> {
        match &self.selected {
            Some(Poi::Location(location)) => Some(location),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn card_visible(&self) -> bool {
        self.card_visible
    }

    pub fn marine(&self) -> Option<&MarineConditions> {
        self.marine.as_ref()
    }

    pub fn weather(&self) -> Option<&WeatherConditions> {
        self.weather.as_ref()
    }

    // --- Enrichment Guard ---

    /// Applies a marine result iff its generation tag still matches the
    /// current generation. Returns whether the result was applied.
    pub fn apply_marine(&mut self, generation: u64, conditions: MarineConditions) -> bool {
        if generation != self.generation {
            debug!(
                "Dropping stale marine result tagged generation {} (current is {}).",
                generation, self.generation
            );
            return false;
        }
        self.marine = Some(conditions);
        true
    }

    /// Applies a weather result iff its generation tag still matches the
    /// current generation. Returns whether the result was applied.
    pub fn apply_weather(&mut self, generation: u64, conditions: WeatherConditions) -> bool {
        if generation != self.generation {
            debug!(
                "Dropping stale weather result tagged generation {} (current is {}).",
                generation, self.generation
            );
            return false;
        }
        self.weather = Some(conditions);
        true
    }
}

/// Fetches the POI list (spots before locations) and the review map.
async fn fetch_pois(app_state: &AppState) -> PortResult<(Vec<Poi>, HashMap<PoiId, Vec<Review>>)> {
    let spots = app_state.db.get_spots().await?;
    let locations = app_state.db.get_locations().await?;

    let mut pois: Vec<Poi> = spots.into_iter().map(Poi::Spot).collect();
    pois.extend(locations.into_iter().map(Poi::Location));

    let mut reviews = HashMap::new();
    for poi in &pois {
        let set = match poi {
            Poi::Spot(spot) => app_state.db.get_reviews_for_spot(spot.id).await?,
            Poi::Location(location) => {
                app_state.db.get_reviews_for_location(location.id).await?
            }
        };
        reviews.insert(poi.id(), set);
    }

    Ok((pois, reviews))
}

#[cfg(test)]
mod tests {
    use super::*;
    use surfnomad_core::domain::LocationKind;
    use uuid::Uuid;

    fn spot(name: &str) -> Poi {
        Poi::Spot(Spot {
            id: Uuid::new_v4(),
            name: name.to_string(),
            lat: -8.65,
            lng: 115.13,
        })
    }

    fn cafe(name: &str) -> Poi {
        Poi::Location(Location {
            id: Uuid::new_v4(),
            spot_id: Uuid::new_v4(),
            kind: LocationKind::Cafe,
            name: name.to_string(),
            description: String::new(),
            lat: -8.66,
            lng: 115.14,
            url: None,
        })
    }

    fn marine() -> MarineConditions {
        MarineConditions {
            wave_height: 2.0,
            swell_height: 1.1,
            swell_direction: 210.0,
            swell_period: 8.0,
        }
    }

    fn weather() -> WeatherConditions {
        WeatherConditions {
            temperature: 24.0,
            wind_speed: 10.0,
            weather_code: 0,
            precipitation: 0.0,
        }
    }

    #[test]
    fn at_most_one_selection_kind_is_set() {
        let mut session = MapSession::new(vec![], HashMap::new());
        assert!(session.selected_spot().is_none() && session.selected_location().is_none());

        session.select(Some(spot("Uluwatu")));
        assert!(session.selected_spot().is_some());
        assert!(session.selected_location().is_none());

        session.select(Some(cafe("Shady Shack")));
        assert!(session.selected_spot().is_none());
        assert!(session.selected_location().is_some());

        session.select(None);
        assert!(session.selected_spot().is_none() && session.selected_location().is_none());
    }

    #[test]
    fn selecting_a_different_poi_increments_generation_and_reshows_card() {
        let mut session = MapSession::new(vec![], HashMap::new());
        session.select(Some(spot("A")));
        let before = session.generation();
        session.close_card();

        session.select(Some(spot("B")));
        assert_eq!(session.generation(), before + 1);
        assert!(session.card_visible());
    }

    #[test]
    fn reselecting_the_same_poi_keeps_a_closed_card_closed() {
        let mut session = MapSession::new(vec![], HashMap::new());
        let poi = spot("A");
        session.select(Some(poi.clone()));
        session.close_card();

        let before = session.generation();
        session.select(Some(poi));
        // The generation still advances; only visibility is exempt.
        assert_eq!(session.generation(), before + 1);
        assert!(!session.card_visible());
    }

    #[test]
    fn selection_change_discards_previous_conditions() {
        let mut session = MapSession::new(vec![], HashMap::new());
        let generation = session.select(Some(spot("A")));
        assert!(session.apply_marine(generation, marine()));
        assert!(session.apply_weather(generation, weather()));

        session.select(Some(spot("B")));
        assert!(session.marine().is_none());
        assert!(session.weather().is_none());
    }

    #[test]
    fn stale_result_is_dropped_after_selection_moves_on() {
        let mut session = MapSession::new(vec![], HashMap::new());
        let stale = session.select(Some(spot("A")));
        let current = session.select(Some(spot("B")));

        assert!(!session.apply_marine(stale, marine()));
        assert!(session.marine().is_none());

        assert!(session.apply_marine(current, marine()));
        assert!(session.marine().is_some());
    }

    #[test]
    fn stale_drop_holds_when_newer_result_lands_first() {
        let mut session = MapSession::new(vec![], HashMap::new());
        let older = session.select(Some(spot("A")));
        let newer = session.select(Some(spot("B")));

        let fresh = MarineConditions {
            wave_height: 1.0,
            ..marine()
        };
        assert!(session.apply_marine(newer, fresh));

        // The slow generation-1 response resolves afterwards and must not win.
        let late = MarineConditions {
            wave_height: 2.0,
            ..marine()
        };
        assert!(!session.apply_marine(older, late));
        assert_eq!(session.marine().unwrap().wave_height, 1.0);
    }

    #[test]
    fn partial_enrichment_is_kept() {
        let mut session = MapSession::new(vec![], HashMap::new());
        let generation = session.select(Some(spot("A")));
        assert!(session.apply_weather(generation, weather()));
        assert!(session.marine().is_none());
        assert!(session.weather().is_some());
    }

    #[test]
    fn clearing_the_selection_invalidates_pending_fetches() {
        let mut session = MapSession::new(vec![], HashMap::new());
        let generation = session.select(Some(spot("A")));
        session.select(None);

        assert!(!session.apply_marine(generation, marine()));
        assert!(session.marine().is_none());
    }
}
