//! WebSocket handler — binary frame relay.
//!
//! DESIGN
//! ======
//! On upgrade the connection takes a seat in the hub and enters a
//! `select!` loop:
//! - Inbound client frames → decode, stamp the seat's id, record + fan out
//! - Frames queued by peers → forward down this socket
//!
//! The hub decides who gets what; this layer owns the socket. A malformed
//! inbound frame is logged and skipped rather than killing the connection.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use tokio::sync::mpsc;
use tracing::{info, warn};
use wire::{ClientMessage, PlayerId};

use crate::state::AppState;

pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| run_ws(socket, state))
}

async fn run_ws(mut socket: WebSocket, state: AppState) {
    // Per-connection channel the hub queues outbound frames on.
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let id = state.hub.lock().await.join(tx);
    info!(id, "ws: snail connected");

    loop {
        tokio::select! {
            msg = socket.recv() => {
                let Some(Ok(msg)) = msg else { break };
                match msg {
                    Message::Binary(bytes) => handle_frame(&state, id, &bytes).await,
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            frame = rx.recv() => {
                let Some(frame) = frame else { break };
                if socket.send(Message::Binary(frame.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    state.hub.lock().await.leave(id);
    info!(id, "ws: snail disconnected");
}

/// Decode one inbound frame and hand it to the hub.
async fn handle_frame(state: &AppState, id: PlayerId, bytes: &[u8]) {
    match ClientMessage::decode(bytes) {
        Ok(ClientMessage::PointPlaced { x, y, ang, color, code }) => {
            state.hub.lock().await.point_placed(id, x, y, ang, color, code);
        }
        Ok(ClientMessage::SnailMoved { x, y, ang }) => {
            state.hub.lock().await.snail_moved(id, x, y, ang);
        }
        Err(error) => warn!(id, %error, "ws: unusable frame"),
    }
}
