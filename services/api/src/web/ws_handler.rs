//! services/api/src/web/ws_handler.rs
//!
//! This is the main entry point and control loop for a WebSocket connection.
//! Each connection is one mounted map view: it owns the session state, the
//! marker renderer, and delegates enrichment work to background tasks.

use crate::web::{
    enrichment_task::{push_card, spawn_enrichment},
    markers::MarkerRenderer,
    protocol::{ClientMessage, ServerMessage},
    state::{AppState, MapSession},
    surface::WireMapSurface,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New map view connection established.");

    let (mut sender, mut receiver) = socket.split();

    // All server traffic funnels through one channel drained by a single
    // forwarder task, so the surface, the session loop, and the enrichment
    // workers never interleave mid-message.
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let forward_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    // --- 1. Initialization Phase ---
    if let Some(Ok(Message::Text(init_json))) = receiver.next().await {
        match serde_json::from_str::<ClientMessage>(&init_json) {
            Ok(ClientMessage::Init) => {
                info!("Initializing map view.");
            }
            _ => {
                error!("First message was not a valid Init message.");
                return;
            }
        }
    } else {
        error!("Client disconnected before sending Init message.");
        return;
    }

    let session = match MapSession::load(&app_state).await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to load map data: {:?}", e);
            let _ = tx.send(ServerMessage::Error {
                message: "Failed to load map data.".to_string(),
            });
            return;
        }
    };

    // --- 2. Mount the Map View ---
    // The surface is created once per connection, centered on the first POI.
    // A missing map credential is fatal to the map only; selection and the
    // summary card keep working without one.
    let first_poi = session.pois.first().cloned();
    let session_lock = Arc::new(Mutex::new(session));

    let mut renderer = match &first_poi {
        Some(first) => {
            match WireMapSurface::create(&app_state.config, tx.clone(), first.lat(), first.lng()) {
                Ok(surface) => Some(MarkerRenderer::new(Box::new(surface))),
                Err(e) => {
                    error!("Map surface not created: {}", e);
                    None
                }
            }
        }
        None => {
            info!("POI list is empty; no map surface to center.");
            None
        }
    };

    if let Some(renderer) = renderer.as_mut() {
        let session = session_lock.lock().await;
        renderer.sync_pois(&session.pois);
    }

    // Auto-select the first POI in list order.
    if let Some(first) = first_poi {
        let mut session = session_lock.lock().await;
        let generation = session.select(Some(first.clone()));
        let _ = tx.send(ServerMessage::SelectionChanged {
            poi_id: Some(first.id()),
            generation,
        });
        push_card(&session, &tx);
        drop(session);
        spawn_enrichment(
            app_state.clone(),
            session_lock.clone(),
            tx.clone(),
            generation,
            first.lat(),
            first.lng(),
        );
    }

    // --- 3. Main Message Loop ---
    loop {
        if let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => {
                    handle_text_message(
                        text.to_string(),
                        &app_state,
                        &session_lock,
                        &tx,
                        &mut renderer,
                    )
                    .await;
                }
                Message::Close(_) => {
                    info!("Client sent close message.");
                    break;
                }
                _ => {}
            }
        } else {
            info!("Client disconnected.");
            break;
        }
    }

    // --- 4. Cleanup ---
    // Dropping the renderer tears down its markers and the surface; dropping
    // our channel half lets the forwarder flush and finish.
    drop(renderer);
    drop(tx);
    let _ = forward_task.await;
    info!("Map view connection closed.");
}

/// Helper function to handle the logic for different `ClientMessage` variants.
async fn handle_text_message(
    text: String,
    app_state: &Arc<AppState>,
    session_lock: &Arc<Mutex<MapSession>>,
    tx: &mpsc::UnboundedSender<ServerMessage>,
    renderer: &mut Option<MarkerRenderer>,
) {
    match serde_json::from_str::<ClientMessage>(&text) {
        Ok(client_msg) => match client_msg {
            ClientMessage::MarkerClicked { poi_id } => {
                let mut session = session_lock.lock().await;
                let poi = match session.pois.iter().find(|poi| poi.id() == poi_id) {
                    Some(poi) => poi.clone(),
                    None => {
                        // A click can race a refresh; there is nothing to
                        // enrich without coordinates.
                        warn!("Click on unknown marker {:?} ignored.", poi_id);
                        return;
                    }
                };
                let (lat, lng) = (poi.lat(), poi.lng());
                let generation = session.select(Some(poi));
                let _ = tx.send(ServerMessage::SelectionChanged {
                    poi_id: Some(poi_id),
                    generation,
                });
                push_card(&session, tx);
                drop(session);
                spawn_enrichment(
                    app_state.clone(),
                    session_lock.clone(),
                    tx.clone(),
                    generation,
                    lat,
                    lng,
                );
            }
            ClientMessage::ClearSelection => {
                let mut session = session_lock.lock().await;
                let generation = session.select(None);
                let _ = tx.send(ServerMessage::SelectionChanged {
                    poi_id: None,
                    generation,
                });
                push_card(&session, tx);
            }
            ClientMessage::CloseCard => {
                let mut session = session_lock.lock().await;
                session.close_card();
                push_card(&session, tx);
            }
            ClientMessage::RefreshPois => {
                let mut session = session_lock.lock().await;
                match session.refresh(app_state).await {
                    Ok(()) => {
                        if let Some(renderer) = renderer.as_mut() {
                            renderer.sync_pois(&session.pois);
                        }
                    }
                    Err(e) => {
                        warn!("Failed to refresh the POI list: {:?}", e);
                    }
                }
            }
            ClientMessage::Init => {
                warn!("Received subsequent Init message, which is ignored.");
            }
        },
        Err(e) => {
            warn!("Failed to deserialize client message: {}", e);
        }
    }
}
