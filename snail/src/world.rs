//! World model: live snails and the trail of placed glyphs.
//!
//! `World` is the single owner of every [`Player`] and [`Glyph`] for the
//! lifetime of a session. The sync layer writes remote state into it, the
//! engine writes the local snail, and the render pass reads it. Every
//! mutation normalizes coordinates into the wrapping range, canonicalizes
//! headings, and marks the render dirty flag.

#[cfg(test)]
#[path = "world_test.rs"]
mod world_test;

use tracing::debug;
use wire::{Color, PlayerId, SELF_ID};

use crate::camera::{Pose, normalize_angle, wrap};

/// One snail in the world. The player holding [`SELF_ID`] is the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub x: f64,
    pub y: f64,
    /// Heading in radians, canonically in `(-PI, PI]`.
    pub ang: f64,
    pub color: Color,
}

impl Player {
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.ang)
    }
}

/// One placed trail character. Immutable once created: position, heading,
/// and color are a snapshot of the placing snail at commit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub x: f64,
    pub y: f64,
    pub ang: f64,
    pub color: Color,
}

impl Glyph {
    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.y, self.ang)
    }
}

/// Owner of all live players and glyphs, and of the render dirty flag.
///
/// Players are a plain vector scanned by id — counts stay small, and glyph
/// order (which doubles as paint order) lives in its own append-only list.
pub struct World {
    players: Vec<Player>,
    glyphs: Vec<Glyph>,
    dirty: bool,
}

impl World {
    /// An empty world, owing its first draw.
    #[must_use]
    pub fn new() -> Self {
        Self { players: Vec::new(), glyphs: Vec::new(), dirty: true }
    }

    /// Add a snail, or overwrite the one already holding this id.
    pub fn add_player(&mut self, id: PlayerId, x: f64, y: f64, ang: f64, color: Color) {
        let player = Player { id, x: wrap(x), y: wrap(y), ang: normalize_angle(ang), color };
        match self.players.iter_mut().find(|p| p.id == id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
        self.dirty = true;
        debug!(id, x = player.x, y = player.y, "snail joined");
    }

    /// Reposition a snail. Unknown ids are ignored: a move can legitimately
    /// arrive before its join or after its leave.
    pub fn move_player(&mut self, id: PlayerId, x: f64, y: f64, ang: f64) {
        if let Some(p) = self.players.iter_mut().find(|p| p.id == id) {
            p.x = wrap(x);
            p.y = wrap(y);
            p.ang = normalize_angle(ang);
            self.dirty = true;
        }
    }

    /// Drop a snail. Unknown ids are ignored.
    pub fn remove_player(&mut self, id: PlayerId) {
        let before = self.players.len();
        self.players.retain(|p| p.id != id);
        if self.players.len() != before {
            self.dirty = true;
            debug!(id, "snail left");
        }
    }

    /// Append a trail glyph at its placement pose.
    pub fn add_glyph(&mut self, ch: char, x: f64, y: f64, ang: f64, color: Color) {
        self.glyphs.push(Glyph { ch, x: wrap(x), y: wrap(y), ang: normalize_angle(ang), color });
        self.dirty = true;
    }

    /// The local snail, once the join that names it has arrived.
    #[must_use]
    pub fn local(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.id == SELF_ID)
    }

    pub(crate) fn local_mut(&mut self) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == SELF_ID)
    }

    /// Snails in join order, local included.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Glyphs in placement order. Later glyphs paint over earlier ones.
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Flag the rendered state as stale.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// True when a redraw is owed.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear and return the dirty flag. The render pass runs only when this
    /// returns true.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
