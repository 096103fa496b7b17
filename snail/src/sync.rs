//! Bridge between world mutations and the wire.
//!
//! Outbound: the engine raises domain-level notifications through the
//! [`Outbound`] port; [`FrameSender`] is the stock implementation that
//! encodes each notification and hands the frame to a transport sink.
//! Inbound: [`apply`] decodes one server frame and dispatches it into the
//! world. Decode failures are returned to the caller, which must treat
//! them as fatal to the session — an unknown tag means the two ends no
//! longer agree on the protocol.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use wire::{ClientMessage, CodecError, Color, SELF_ID, ServerMessage};

use crate::camera::Pose;
use crate::motion::Motion;
use crate::world::World;

/// Observer port for the local snail's outbound notifications.
///
/// Injected into the engine once the transport is up; until then the
/// engine is in its not-connected state and refuses character commits.
pub trait Outbound {
    /// The local snail committed `ch` into the world at `pose`.
    fn point_placed(&mut self, ch: char, pose: Pose, color: Color);
    /// The local snail moved to `pose`.
    fn snail_moved(&mut self, pose: Pose);
}

/// [`Outbound`] implementation that encodes wire frames into a sink.
///
/// The sink is any `FnMut(Vec<u8>)` — typically the sending half of a
/// channel drained by the websocket writer task.
pub struct FrameSender<F: FnMut(Vec<u8>)> {
    sink: F,
}

impl<F: FnMut(Vec<u8>)> FrameSender<F> {
    #[must_use]
    pub fn new(sink: F) -> Self {
        Self { sink }
    }
}

impl<F: FnMut(Vec<u8>)> Outbound for FrameSender<F> {
    fn point_placed(&mut self, ch: char, pose: Pose, color: Color) {
        let msg = ClientMessage::PointPlaced {
            x: quantize(pose.x),
            y: quantize(pose.y),
            ang: wire::encode_angle(pose.ang),
            color,
            code: char_code(ch),
        };
        (self.sink)(msg.encode());
    }

    fn snail_moved(&mut self, pose: Pose) {
        let msg = ClientMessage::SnailMoved {
            x: quantize(pose.x),
            y: quantize(pose.y),
            ang: wire::encode_angle(pose.ang),
        };
        (self.sink)(msg.encode());
    }
}

/// Decode one server frame and apply it to the world.
///
/// A join naming [`SELF_ID`] also seeds the steering target with the spawn
/// heading, so the indicator starts out pointing the way the snail faces.
///
/// # Errors
///
/// Propagates [`CodecError`] from the decode untouched; nothing is applied
/// from a frame that fails to decode.
pub fn apply(world: &mut World, motion: &mut Motion, frame: &[u8]) -> Result<(), CodecError> {
    match ServerMessage::decode(frame)? {
        ServerMessage::PointPlaced { x, y, ang, color, code, .. } => {
            world.add_glyph(
                glyph_char(code),
                f64::from(x),
                f64::from(y),
                wire::decode_angle(ang),
                color,
            );
        }
        ServerMessage::SnailMoved { id, x, y, ang } => {
            world.move_player(id, f64::from(x), f64::from(y), wire::decode_angle(ang));
        }
        ServerMessage::SnailJoined { id, x, y, ang, color } => {
            let heading = wire::decode_angle(ang);
            world.add_player(id, f64::from(x), f64::from(y), heading, color);
            if id == SELF_ID {
                motion.set_heading_target(heading);
            }
        }
        ServerMessage::SnailLeft { id } => world.remove_player(id),
    }
    Ok(())
}

/// Truncate a wrapped world coordinate to its wire representation.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantize(v: f64) -> u16 {
    crate::camera::wrap(v) as u16
}

/// UTF-16 code unit for a committed character. Commit-time validation only
/// lets single-unit characters through, so this cannot lose information.
fn char_code(ch: char) -> u16 {
    u16::try_from(u32::from(ch)).unwrap_or(0xfffd)
}

/// Glyph to draw for a wire char code. A lone surrogate half cannot become
/// a `char`; it renders as the replacement character.
fn glyph_char(code: u16) -> char {
    char::from_u32(u32::from(code)).unwrap_or(char::REPLACEMENT_CHARACTER)
}
