//! Shared tuning constants for the trail engine.

// ── Steering ────────────────────────────────────────────────────

/// Radians per millisecond of held arrow-key turn.
pub const TURN_RATE: f64 = 0.006;

/// Fraction of the remaining heading error applied per committed character.
pub const SMOOTHING: f64 = 0.075;

// ── Wander ──────────────────────────────────────────────────────

/// Largest random-walk increment per wander step.
pub const WANDER_RATE: f64 = 0.3;

/// Radians of heading nudge per unit of wander position.
pub const WANDER_MAX: f64 = 0.06;

// ── Input ───────────────────────────────────────────────────────

/// Longest run of spaces a snail may lay down in a row.
pub const MAX_CONSECUTIVE_SPACES: u32 = 3;
