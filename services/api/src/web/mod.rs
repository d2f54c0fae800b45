pub mod card;
pub mod enrichment_task;
pub mod markers;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod surface;
pub mod ws_handler;

// Re-export the main WebSocket handler to make it easily accessible
// to the binary that will build the web server router.
pub use ws_handler::ws_handler;
pub use rest::{
    list_locations_handler, list_spots_handler, location_reviews_handler, spot_reviews_handler,
};
