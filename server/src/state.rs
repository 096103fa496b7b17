//! Shared relay state: connected snails and the trail history.
//!
//! DESIGN
//! ======
//! One `Hub` guarded by a mutex holds every connected seat and the full
//! point history. Connection tasks lock it briefly to mutate and to queue
//! the frames their peers are owed; actual socket writes happen outside
//! the lock through each seat's unbounded sender.
//!
//! Joining and catching up happen under the same lock that point appends
//! take, so a newcomer can neither miss a point nor receive one twice.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::sync::Arc;

use rand::Rng;
use tokio::sync::{Mutex, mpsc};
use tracing::info;
use wire::{Color, PlayerId, SELF_ID, ServerMessage};

/// A connected snail: its live pose plus the channel its frames go out on.
pub struct Seat {
    pub id: PlayerId,
    pub x: u16,
    pub y: u16,
    /// Heading in whole wire degrees.
    pub ang: u16,
    pub color: Color,
    tx: mpsc::UnboundedSender<Vec<u8>>,
}

/// A placed point, kept for replay to late joiners.
#[derive(Debug, Clone, Copy)]
pub struct PointRecord {
    pub id: PlayerId,
    pub x: u16,
    pub y: u16,
    pub ang: u16,
    pub color: Color,
    pub code: u16,
}

impl PointRecord {
    fn broadcast(&self) -> ServerMessage {
        ServerMessage::PointPlaced {
            id: self.id,
            x: self.x,
            y: self.y,
            ang: self.ang,
            color: self.color,
            code: self.code,
        }
    }
}

/// Live relay state. The history grows without bound, like the trails do.
pub struct Hub {
    seats: Vec<Seat>,
    history: Vec<PointRecord>,
    next_id: PlayerId,
}

impl Hub {
    #[must_use]
    pub fn new() -> Self {
        Self { seats: Vec::new(), history: Vec::new(), next_id: 1 }
    }

    /// Seat a new connection: assign the next id and a spawn, announce it
    /// to the room, and send it everything it missed — every live seat
    /// (its own reported as [`SELF_ID`]) followed by the full history.
    pub fn join(&mut self, tx: mpsc::UnboundedSender<Vec<u8>>) -> PlayerId {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id == SELF_ID {
            self.next_id = 1;
        }

        let mut rng = rand::rng();
        let seat = Seat { id, x: 0, y: 0, ang: rng.random_range(0..360), color: spawn_color(&mut rng), tx };

        let announce =
            ServerMessage::SnailJoined { id, x: seat.x, y: seat.y, ang: seat.ang, color: seat.color };
        self.broadcast(&announce.encode(), id);

        for peer in &self.seats {
            let joined = ServerMessage::SnailJoined {
                id: peer.id,
                x: peer.x,
                y: peer.y,
                ang: peer.ang,
                color: peer.color,
            };
            let _ = seat.tx.send(joined.encode());
        }
        let own = ServerMessage::SnailJoined {
            id: SELF_ID,
            x: seat.x,
            y: seat.y,
            ang: seat.ang,
            color: seat.color,
        };
        let _ = seat.tx.send(own.encode());
        for point in &self.history {
            let _ = seat.tx.send(point.broadcast().encode());
        }

        self.seats.push(seat);
        info!(id, seats = self.seats.len(), "snail seated");
        id
    }

    /// Drop a seat and tell the room.
    pub fn leave(&mut self, id: PlayerId) {
        self.seats.retain(|s| s.id != id);
        self.broadcast(&ServerMessage::SnailLeft { id }.encode(), id);
        info!(id, seats = self.seats.len(), "snail unseated");
    }

    /// A seat placed a point: record it and fan it out to everyone else.
    pub fn point_placed(&mut self, id: PlayerId, x: u16, y: u16, ang: u16, color: Color, code: u16) {
        let record = PointRecord { id, x, y, ang, color, code };
        self.history.push(record);
        self.broadcast(&record.broadcast().encode(), id);
    }

    /// A seat moved: update its pose and fan the move out to everyone else.
    pub fn snail_moved(&mut self, id: PlayerId, x: u16, y: u16, ang: u16) {
        if let Some(seat) = self.seats.iter_mut().find(|s| s.id == id) {
            seat.x = x;
            seat.y = y;
            seat.ang = ang;
        }
        self.broadcast(&ServerMessage::SnailMoved { id, x, y, ang }.encode(), id);
    }

    /// Send a frame to every seat except `exclude`. A seat whose channel
    /// has closed is skipped; its own task is already tearing it down.
    fn broadcast(&self, frame: &[u8], exclude: PlayerId) {
        for seat in &self.seats {
            if seat.id != exclude {
                let _ = seat.tx.send(frame.to_vec());
            }
        }
    }

    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    #[must_use]
    pub fn history(&self) -> &[PointRecord] {
        &self.history
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}

/// Random spawn color with the top of each channel clear, so the white
/// glyph outline stays readable on top of it.
fn spawn_color(rng: &mut impl Rng) -> Color {
    let r = rng.random_range(0..0x10_u16);
    let g = rng.random_range(0..0x20_u16);
    let b = rng.random_range(0..0x10_u16);
    Color((r << 11) | (g << 5) | b)
}

/// Shared application state, injected into handlers via the State extractor.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<Mutex<Hub>>,
}

impl AppState {
    #[must_use]
    pub fn new() -> Self {
        Self { hub: Arc::new(Mutex::new(Hub::new())) }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
