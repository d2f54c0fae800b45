//! services/api/src/web/enrichment_task.rs
//!
//! The asynchronous workers that enrich a fresh selection with wave/swell and
//! weather conditions.

use crate::web::{
    card,
    protocol::ServerMessage,
    state::{AppState, MapSession},
};
use std::sync::Arc;
use tokio::sync::{mpsc::UnboundedSender, Mutex};
use tracing::warn;

/// Issues the two independent enrichment fetches for the selection that
/// started `generation`.
///
/// Each fetch carries the generation number as a plain value; by the time a
/// result lands the selection may have moved on, in which case the guard in
/// `MapSession` drops it. A failed fetch leaves its block empty for this
/// generation and is not retried.
pub fn spawn_enrichment(
    app_state: Arc<AppState>,
    session_lock: Arc<Mutex<MapSession>>,
    tx: UnboundedSender<ServerMessage>,
    generation: u64,
    lat: f64,
    lng: f64,
) {
    {
        let app_state = app_state.clone();
        let session_lock = session_lock.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            match app_state.marine.current_conditions(lat, lng).await {
                Ok(conditions) => {
                    let mut session = session_lock.lock().await;
                    if session.apply_marine(generation, conditions) {
                        push_card(&session, &tx);
                    }
                }
                Err(e) => {
                    warn!("Marine fetch for generation {} failed: {}", generation, e);
                }
            }
        });
    }

    tokio::spawn(async move {
        match app_state.weather.current_conditions(lat, lng).await {
            Ok(conditions) => {
                let mut session = session_lock.lock().await;
                if session.apply_weather(generation, conditions) {
                    push_card(&session, &tx);
                }
            }
            Err(e) => {
                warn!("Weather fetch for generation {} failed: {}", generation, e);
            }
        }
    });
}

/// Sends the freshly built card for the current selection to the client.
pub fn push_card(session: &MapSession, tx: &UnboundedSender<ServerMessage>) {
    let _ = tx.send(ServerMessage::CardUpdated {
        card: card::build_card(session),
    });
}
