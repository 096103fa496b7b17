//! Keystroke-driven motion: turn intent, heading smoothing, and wander.
//!
//! The snail never snaps to where the user points it. Held arrow keys move
//! a *steering target*; each committed character then turns the snail a
//! fraction of the way toward that target and nudges it with a bounded
//! random walk, so the trail curves like something alive rather than a
//! plotter. Forward motion itself lives in the engine — it is driven by
//! character widths, not by time.

#[cfg(test)]
#[path = "motion_test.rs"]
mod motion_test;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::camera::normalize_angle;
use crate::consts::{MAX_CONSECUTIVE_SPACES, SMOOTHING, TURN_RATE, WANDER_MAX, WANDER_RATE};

/// Sustained turning intent from the held arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Turn {
    Left,
    #[default]
    None,
    Right,
}

impl Turn {
    fn sign(self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::None => 0.0,
            Self::Right => 1.0,
        }
    }
}

/// Motion state for the local snail.
pub struct Motion {
    heading_target: f64,
    turn: Turn,
    wander_pos: f64,
    consecutive_spaces: u32,
    rng: SmallRng,
}

impl Motion {
    /// Motion state with operating-system-seeded wander.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(SmallRng::from_os_rng())
    }

    /// Motion state with a fixed wander seed, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(SmallRng::seed_from_u64(seed))
    }

    fn from_rng(rng: SmallRng) -> Self {
        Self { heading_target: 0.0, turn: Turn::None, wander_pos: 0.0, consecutive_spaces: 0, rng }
    }

    /// Where the snail is being steered toward, in radians.
    #[must_use]
    pub fn heading_target(&self) -> f64 {
        self.heading_target
    }

    /// Point the steering somewhere, e.g. at the spawn heading on join.
    pub fn set_heading_target(&mut self, ang: f64) {
        self.heading_target = normalize_angle(ang);
    }

    /// Update the sustained turn intent from key state.
    pub fn set_turn(&mut self, turn: Turn) {
        self.turn = turn;
    }

    #[must_use]
    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Advance the steering target by the held turn intent over `dt_ms`
    /// elapsed milliseconds. Returns true when the target moved.
    pub fn update(&mut self, dt_ms: f64) -> bool {
        if self.turn == Turn::None {
            return false;
        }
        self.heading_target =
            normalize_angle(self.heading_target + dt_ms * TURN_RATE * self.turn.sign());
        true
    }

    /// One smoothing step from `heading` toward the steering target, plus
    /// wander. Runs once per committed character, not per frame: the turn
    /// follows the trail, not the clock. Returns the new heading,
    /// canonicalized.
    pub(crate) fn rotate_step(&mut self, heading: f64) -> f64 {
        let delta = normalize_angle(self.heading_target - heading);
        normalize_angle(heading + delta * SMOOTHING + self.wander_step())
    }

    /// Advance the wander walk and return the heading nudge it contributes.
    ///
    /// Each step adds a random increment up to [`WANDER_RATE`], flipped
    /// negative with probability growing as the walk position climbs, so
    /// the position oscillates around zero instead of drifting off.
    fn wander_step(&mut self) -> f64 {
        let go_less = self.wander_pos >= self.rng.random::<f64>() * 2.0 - 1.0;
        let mut amt = self.rng.random::<f64>() * WANDER_RATE;
        if go_less {
            amt = -amt;
        }
        self.wander_pos += amt;
        self.wander_pos * WANDER_MAX
    }

    /// Charge one character against the consecutive-space budget.
    ///
    /// A space past [`MAX_CONSECUTIVE_SPACES`] in a row returns false and
    /// changes nothing; any non-space resets the run.
    pub(crate) fn charge_space_budget(&mut self, ch: char) -> bool {
        if ch == ' ' {
            if self.consecutive_spaces >= MAX_CONSECUTIVE_SPACES {
                return false;
            }
            self.consecutive_spaces += 1;
        } else {
            self.consecutive_spaces = 0;
        }
        true
    }
}

impl Default for Motion {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a character may be committed into the world.
///
/// Excludes control codes, Unicode format characters (soft hyphen, the
/// zero-width and directional marks, and their relatives), and the
/// noncharacter code points. Everything else — letters, punctuation,
/// symbols, combining marks, the space itself — is fair game.
#[must_use]
pub fn is_printable(ch: char) -> bool {
    !(ch.is_control() || is_format(ch) || is_noncharacter(ch))
}

fn is_format(ch: char) -> bool {
    matches!(
        ch,
        '\u{00ad}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061c}'
            | '\u{06dd}'
            | '\u{070f}'
            | '\u{08e2}'
            | '\u{180e}'
            | '\u{200b}'..='\u{200f}'
            | '\u{202a}'..='\u{202e}'
            | '\u{2060}'..='\u{206f}'
            | '\u{feff}'
            | '\u{fff9}'..='\u{fffb}'
            | '\u{110bd}'
            | '\u{1d173}'..='\u{1d17a}'
            | '\u{e0001}'
            | '\u{e0020}'..='\u{e007f}'
    )
}

fn is_noncharacter(ch: char) -> bool {
    let v = u32::from(ch);
    (0xfdd0..=0xfdef).contains(&v) || (v & 0xfffe) == 0xfffe
}
