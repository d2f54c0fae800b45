//! services/api/src/web/markers.rs
//!
//! Owns the map surface and keeps its marker set in sync with the POI list.

use surfnomad_core::domain::{Poi, PoiId};
use surfnomad_core::ports::{MapSurface, MarkerSpec};

/// Renders one marker per POI on the owned map surface.
///
/// The surface is created once before the renderer and removed when the
/// renderer is dropped; POI list changes only rebuild markers. Every
/// `add_marker` is paired with a `remove_marker` on the next sync or on drop,
/// so no surface marker object leaks.
pub struct MarkerRenderer {
    surface: Box<dyn MapSurface>,
    markers: Vec<PoiId>,
}

impl MarkerRenderer {
    pub fn new(surface: Box<dyn MapSurface>) -> Self {
        Self {
            surface,
            markers: Vec::new(),
        }
    }

    /// Replaces the marker set with one marker per POI.
    pub fn sync_pois(&mut self, pois: &[Poi]) {
        for poi_id in self.markers.drain(..) {
            self.surface.remove_marker(poi_id);
        }
        for poi in pois {
            self.surface.add_marker(marker_spec(poi));
            self.markers.push(poi.id());
        }
    }
}

impl Drop for MarkerRenderer {
    fn drop(&mut self) {
        for poi_id in self.markers.drain(..) {
            self.surface.remove_marker(poi_id);
        }
        self.surface.remove();
    }
}

fn marker_spec(poi: &Poi) -> MarkerSpec {
    MarkerSpec {
        poi_id: poi.id(),
        name: poi.name().to_string(),
        lat: poi.lat(),
        lng: poi.lng(),
        icon: poi.icon(),
    }
}
