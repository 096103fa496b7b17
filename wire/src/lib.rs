//! Shared wire model and binary codec for the realtime snail transport.
//!
//! This crate owns the wire representation used by both `server` and the
//! client engine. Messages are fixed-layout, little-endian, tag-prefixed
//! binary records: a single tag byte followed by unsigned 16-bit fields,
//! which keeps a full trail update under a dozen bytes.
//!
//! The two directions are asymmetric. A client never names itself — the
//! server stamps the id of the connection a frame arrived on — so the
//! client-side records ([`ClientMessage`]) are two bytes shorter than their
//! broadcast counterparts ([`ServerMessage`]).

/// Unique per-session snail identifier, assigned by the server.
pub type PlayerId = u16;

/// Reserved id meaning "this snail is you" in a join record.
pub const SELF_ID: PlayerId = 0;

const TAG_POINT: u8 = 0;
const TAG_MOVE: u8 = 1;
const TAG_JOIN: u8 = 2;
const TAG_LEAVE: u8 = 3;

// Frame lengths including the tag byte (and, on the broadcast side, the id).
const POINT_LEN: usize = 11;
const MOVE_LEN: usize = 7;
const POINT_BCAST_LEN: usize = 13;
const MOVE_BCAST_LEN: usize = 9;
const JOIN_LEN: usize = 11;
const LEAVE_LEN: usize = 3;

/// Error returned by the decode functions.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The tag byte does not name any known message kind.
    #[error("unknown message tag: {0}")]
    UnknownTag(u8),
    /// The tag names a message this peer is not allowed to receive.
    #[error("unexpected message tag: {0}")]
    UnexpectedTag(u8),
    /// The buffer ends before the fixed layout does.
    #[error("message truncated: got {got} bytes, need {need}")]
    Truncated { got: usize, need: usize },
}

/// A 16-bit packed color: 5 bits red, 6 bits green, 5 bits blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u16);

impl Color {
    /// Pack 8-bit channels down to 5-6-5, truncating the low bits.
    #[must_use]
    pub fn pack(r: u8, g: u8, b: u8) -> Self {
        Self((u16::from(r >> 3) << 11) | (u16::from(g >> 2) << 5) | u16::from(b >> 3))
    }

    /// Expand back to 8-bit channels. Bits lost at pack time come back zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn channels(self) -> (u8, u8, u8) {
        let r = ((self.0 >> 11) & 0x1f) as u8;
        let g = ((self.0 >> 5) & 0x3f) as u8;
        let b = (self.0 & 0x1f) as u8;
        (r << 3, g << 2, b << 3)
    }

    /// Parse a `#rrggbb` CSS hex color, truncating to the packed width.
    ///
    /// Returns `None` for anything that is not exactly `#` plus six hex digits.
    #[must_use]
    pub fn from_css(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::pack(r, g, b))
    }

    /// Render as a `#rrggbb` CSS hex color.
    #[must_use]
    pub fn to_css(self) -> String {
        let (r, g, b) = self.channels();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

/// Quantize a heading in radians to the whole degree 0..=359 used on the wire.
///
/// This is a deliberate lossy step: one degree of resolution is far below
/// what a snail turn is worth, and it fits the angle in the same 16 bits as
/// every other field.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn encode_angle(rad: f64) -> u16 {
    rad.to_degrees().round().rem_euclid(360.0) as u16
}

/// Expand a wire angle in whole degrees back to radians.
#[must_use]
pub fn decode_angle(deg: u16) -> f64 {
    f64::from(deg).to_radians()
}

/// Client → server notification. Carries no id; the server stamps the
/// connection's id before fanning the record out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    /// A character was committed into the world at the sender's pose.
    PointPlaced {
        x: u16,
        y: u16,
        /// Heading in whole degrees, 0..=359.
        ang: u16,
        color: Color,
        /// UTF-16 code unit of the committed character.
        code: u16,
    },
    /// The sender's snail advanced or turned.
    SnailMoved {
        x: u16,
        y: u16,
        /// Heading in whole degrees, 0..=359.
        ang: u16,
    },
}

impl ClientMessage {
    /// Encode into a wire frame.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            Self::PointPlaced { x, y, ang, color, code } => {
                let mut out = Vec::with_capacity(POINT_LEN);
                out.push(TAG_POINT);
                push_u16(&mut out, x);
                push_u16(&mut out, y);
                push_u16(&mut out, ang);
                push_u16(&mut out, color.0);
                push_u16(&mut out, code);
                out
            }
            Self::SnailMoved { x, y, ang } => {
                let mut out = Vec::with_capacity(MOVE_LEN);
                out.push(TAG_MOVE);
                push_u16(&mut out, x);
                push_u16(&mut out, y);
                push_u16(&mut out, ang);
                out
            }
        }
    }

    /// Decode a frame received from a client connection.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnexpectedTag`] for join/leave tags (only the server
    /// originates those), [`CodecError::UnknownTag`] for anything else
    /// unrecognized, and [`CodecError::Truncated`] for short buffers.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        check_len(buf, 1)?;
        match buf[0] {
            TAG_POINT => {
                check_len(buf, POINT_LEN)?;
                Ok(Self::PointPlaced {
                    x: u16_at(buf, 1),
                    y: u16_at(buf, 3),
                    ang: u16_at(buf, 5),
                    color: Color(u16_at(buf, 7)),
                    code: u16_at(buf, 9),
                })
            }
            TAG_MOVE => {
                check_len(buf, MOVE_LEN)?;
                Ok(Self::SnailMoved {
                    x: u16_at(buf, 1),
                    y: u16_at(buf, 3),
                    ang: u16_at(buf, 5),
                })
            }
            tag @ (TAG_JOIN | TAG_LEAVE) => Err(CodecError::UnexpectedTag(tag)),
            tag => Err(CodecError::UnknownTag(tag)),
        }
    }
}

/// Server → client broadcast. `id` names the subject snail; a joining
/// client sees its own seat with [`SELF_ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerMessage {
    /// A snail committed a character into the world.
    PointPlaced {
        id: PlayerId,
        x: u16,
        y: u16,
        /// Heading in whole degrees, 0..=359.
        ang: u16,
        color: Color,
        /// UTF-16 code unit of the committed character.
        code: u16,
    },
    /// A snail advanced or turned.
    SnailMoved {
        id: PlayerId,
        x: u16,
        y: u16,
        /// Heading in whole degrees, 0..=359.
        ang: u16,
    },
    /// A snail entered the world.
    SnailJoined {
        id: PlayerId,
        x: u16,
        y: u16,
        /// Heading in whole degrees, 0..=359.
        ang: u16,
        color: Color,
    },
    /// A snail left the world.
    SnailLeft { id: PlayerId },
}

impl ServerMessage {
    /// Encode into a wire frame.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            Self::PointPlaced { id, x, y, ang, color, code } => {
                let mut out = Vec::with_capacity(POINT_BCAST_LEN);
                out.push(TAG_POINT);
                push_u16(&mut out, id);
                push_u16(&mut out, x);
                push_u16(&mut out, y);
                push_u16(&mut out, ang);
                push_u16(&mut out, color.0);
                push_u16(&mut out, code);
                out
            }
            Self::SnailMoved { id, x, y, ang } => {
                let mut out = Vec::with_capacity(MOVE_BCAST_LEN);
                out.push(TAG_MOVE);
                push_u16(&mut out, id);
                push_u16(&mut out, x);
                push_u16(&mut out, y);
                push_u16(&mut out, ang);
                out
            }
            Self::SnailJoined { id, x, y, ang, color } => {
                let mut out = Vec::with_capacity(JOIN_LEN);
                out.push(TAG_JOIN);
                push_u16(&mut out, id);
                push_u16(&mut out, x);
                push_u16(&mut out, y);
                push_u16(&mut out, ang);
                push_u16(&mut out, color.0);
                out
            }
            Self::SnailLeft { id } => {
                let mut out = Vec::with_capacity(LEAVE_LEN);
                out.push(TAG_LEAVE);
                push_u16(&mut out, id);
                out
            }
        }
    }

    /// Decode a frame received from the server.
    ///
    /// # Errors
    ///
    /// [`CodecError::UnknownTag`] for an unrecognized tag byte and
    /// [`CodecError::Truncated`] for short buffers.
    pub fn decode(buf: &[u8]) -> Result<Self, CodecError> {
        check_len(buf, 1)?;
        match buf[0] {
            TAG_POINT => {
                check_len(buf, POINT_BCAST_LEN)?;
                Ok(Self::PointPlaced {
                    id: u16_at(buf, 1),
                    x: u16_at(buf, 3),
                    y: u16_at(buf, 5),
                    ang: u16_at(buf, 7),
                    color: Color(u16_at(buf, 9)),
                    code: u16_at(buf, 11),
                })
            }
            TAG_MOVE => {
                check_len(buf, MOVE_BCAST_LEN)?;
                Ok(Self::SnailMoved {
                    id: u16_at(buf, 1),
                    x: u16_at(buf, 3),
                    y: u16_at(buf, 5),
                    ang: u16_at(buf, 7),
                })
            }
            TAG_JOIN => {
                check_len(buf, JOIN_LEN)?;
                Ok(Self::SnailJoined {
                    id: u16_at(buf, 1),
                    x: u16_at(buf, 3),
                    y: u16_at(buf, 5),
                    ang: u16_at(buf, 7),
                    color: Color(u16_at(buf, 9)),
                })
            }
            TAG_LEAVE => {
                check_len(buf, LEAVE_LEN)?;
                Ok(Self::SnailLeft { id: u16_at(buf, 1) })
            }
            tag => Err(CodecError::UnknownTag(tag)),
        }
    }
}

fn check_len(buf: &[u8], need: usize) -> Result<(), CodecError> {
    if buf.len() < need {
        return Err(CodecError::Truncated { got: buf.len(), need });
    }
    Ok(())
}

fn u16_at(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
