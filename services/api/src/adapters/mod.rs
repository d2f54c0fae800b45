pub mod db;
pub mod open_meteo;

pub use db::DbAdapter;
pub use open_meteo::{OpenMeteoMarineAdapter, OpenMeteoWeatherAdapter};
