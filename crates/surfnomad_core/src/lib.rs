pub mod domain;
pub mod ports;

pub use domain::{
    Location, LocationKind, MarineConditions, MarkerIcon, Poi, PoiId, Review, Spot,
    WeatherConditions,
};
pub use ports::{
    DatabaseService, MapSurface, MarineDataService, MarkerSpec, PortError, PortResult,
    WeatherDataService,
};
