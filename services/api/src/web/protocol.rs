//! services/api/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the API server
//! for the interactive map view. The browser is a thin terminal: it draws whatever the
//! surface messages tell it to and echoes marker clicks back.

use crate::web::card::SummaryCard;
use serde::{Deserialize, Serialize};
use surfnomad_core::domain::PoiId;
use surfnomad_core::ports::MarkerSpec;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Opens the map view. This must be the first message sent on the connection.
    Init,

    /// The user clicked a marker on the map surface.
    MarkerClicked { poi_id: PoiId },

    /// The user clicked away from any marker, deselecting the current POI.
    ClearSelection,

    /// The user dismissed the summary card for the current selection.
    CloseCard,

    /// Asks the server to re-fetch the point-of-interest list. Markers are
    /// rebuilt; the map surface itself is untouched.
    RefreshPois,
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The map surface was created. Sent at most once per connection.
    MapCreated {
        access_token: String,
        style: String,
        lat: f64,
        lng: f64,
        zoom: f64,
    },

    /// A marker was added to the surface.
    MarkerAdded { marker: MarkerSpec },

    /// A marker was removed from the surface.
    MarkerRemoved { poi_id: PoiId },

    /// The map surface was torn down.
    MapRemoved,

    /// The active selection changed. `poi_id` is `None` after a deselect.
    SelectionChanged {
        poi_id: Option<PoiId>,
        generation: u64,
    },

    /// The summary card for the current selection changed. `card` is `None`
    /// when nothing should be shown.
    CardUpdated { card: Option<SummaryCard> },

    /// Reports a fatal error to the client, which should display an error message.
    Error { message: String },
}
