//! Session facade: one object owning the world, the motion state, and the
//! outbound port.
//!
//! The host — terminal client, browser shell, test — owns exactly one
//! `Engine` per connection and drives it from a single-threaded loop:
//! `update(dt)` then `draw` each tick, with key events and inbound frames
//! applied between ticks. Every entry point runs synchronously to
//! completion, so readers never observe a half-applied mutation.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use wire::CodecError;

use crate::camera::{Pose, wrap};
use crate::motion::{Motion, Turn, is_printable};
use crate::render::{self, Surface};
use crate::sync::{self, Outbound};
use crate::world::World;

/// The client engine for one session.
pub struct Engine {
    world: World,
    motion: Motion,
    outbound: Option<Box<dyn Outbound>>,
}

impl Engine {
    /// An engine with OS-seeded wander and no transport attached.
    #[must_use]
    pub fn new() -> Self {
        Self::with_motion(Motion::new())
    }

    /// An engine with a fixed wander seed, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_motion(Motion::seeded(seed))
    }

    fn with_motion(motion: Motion) -> Self {
        Self { world: World::new(), motion, outbound: None }
    }

    /// Attach the outbound port. Until this is called the engine is in its
    /// not-connected state and refuses character commits — there is nowhere
    /// to announce them.
    pub fn connect(&mut self, port: Box<dyn Outbound>) {
        self.outbound = Some(port);
    }

    /// True once an outbound port is attached.
    #[must_use]
    pub fn connected(&self) -> bool {
        self.outbound.is_some()
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current steering target, in radians.
    #[must_use]
    pub fn heading_target(&self) -> f64 {
        self.motion.heading_target()
    }

    /// Update the sustained turn intent from the held arrow keys.
    pub fn set_turn(&mut self, turn: Turn) {
        self.motion.set_turn(turn);
    }

    /// Per-tick update: integrate the held turn into the steering target.
    pub fn update(&mut self, dt_ms: f64) {
        if self.motion.update(dt_ms) {
            self.world.mark_dirty();
        }
    }

    /// Note a viewport size change. The next draw re-derives its center
    /// offsets from the surface, so this only owes a repaint.
    pub fn resize(&mut self) {
        self.world.mark_dirty();
    }

    /// Apply one inbound server frame to the world.
    ///
    /// # Errors
    ///
    /// Propagates decode failures. The host must surface them as fatal to
    /// the session rather than dropping the frame quietly.
    pub fn apply_frame(&mut self, frame: &[u8]) -> Result<(), CodecError> {
        sync::apply(&mut self.world, &mut self.motion, frame)
    }

    /// Commit one typed character: lay the glyph, turn, and advance.
    ///
    /// The snail moves exactly the character's advance width under the
    /// surface's font, so motion is driven by what gets typed, not by the
    /// clock. Returns false — changing nothing — when the local snail has
    /// not joined yet, no outbound port is attached, the character does not
    /// fit one wire code unit, it is unprintable, or it is a space past the
    /// consecutive-space budget.
    pub fn insert_character<S: Surface>(&mut self, ch: char, surface: &S) -> bool {
        let Some(user) = self.world.local().copied() else {
            return false;
        };
        if self.outbound.is_none() {
            return false;
        }
        if u32::from(ch) > 0xffff || !is_printable(ch) {
            return false;
        }
        if !self.motion.charge_space_budget(ch) {
            return false;
        }

        // Spaces advance the snail but leave no mark.
        if ch != ' ' {
            self.world.add_glyph(ch, user.x, user.y, user.ang, user.color);
            if let Some(port) = self.outbound.as_mut() {
                port.point_placed(ch, user.pose(), user.color);
            }
        }

        let heading = self.motion.rotate_step(user.ang);
        let advance = surface.char_width(ch);
        let x = wrap(user.x + advance * heading.cos());
        let y = wrap(user.y + advance * heading.sin());

        if let Some(local) = self.world.local_mut() {
            local.x = x;
            local.y = y;
            local.ang = heading;
        }
        self.world.mark_dirty();

        if let Some(port) = self.outbound.as_mut() {
            port.snail_moved(Pose::new(x, y, heading));
        }
        true
    }

    /// Dirty-gated scene pass: draws only when something changed since the
    /// last pass.
    pub fn draw<S: Surface>(&mut self, surface: &mut S) {
        if !self.world.take_dirty() {
            return;
        }
        render::draw(surface, &self.world, self.motion.heading_target());
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
