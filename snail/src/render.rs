//! Scene pass: draws the world onto a [`Surface`].
//!
//! The pass holds no state of its own. The world's dirty flag — checked by
//! the engine before calling in here — decides whether a pass runs at all.
//! Everything is drawn in the local snail's frame: trail glyphs first in
//! placement order, then the heading indicator, then every snail sprite on
//! top.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use wire::Color;

use crate::camera::{Pose, Transform, view_transform};
use crate::world::World;

/// Where the heading indicator leaves the snail, in its local frame.
const HEADING_ANCHOR: (f64, f64) = (10.0, -5.0);

/// Length of the heading indicator line.
const HEADING_LEN: f64 = 54.0;

/// A 2-D drawing target plus the font metrics that go with it.
///
/// One surface instance serves both measurement and drawing, so a committed
/// character advances the snail by exactly the width it paints.
pub trait Surface {
    /// Viewport size in pixels.
    fn size(&self) -> (f64, f64);
    /// Advance width of one character under the surface's font.
    fn char_width(&self, ch: char) -> f64;
    /// Reset the transform and clear the viewport.
    fn begin_frame(&mut self);
    /// Set the transform applied to subsequent drawing.
    fn set_transform(&mut self, t: Transform);
    /// Draw the contrasting outline pass behind a glyph at the origin.
    fn outline_char(&mut self, ch: char);
    /// Fill a glyph at the origin in its own color.
    fn fill_char(&mut self, ch: char, color: Color);
    /// Draw a thin indicator line between two points in the current frame.
    fn line(&mut self, from: (f64, f64), to: (f64, f64));
    /// Draw a snail sprite at the origin.
    fn snail(&mut self, color: Color);
}

/// Draw the whole scene.
///
/// The viewer is the local snail when present, or a fixed observer at the
/// world origin until the join arrives. `heading_target` orients the
/// indicator line relative to the snail's current heading.
pub fn draw<S: Surface>(surface: &mut S, world: &World, heading_target: f64) {
    let (w, h) = surface.size();
    let center = (w / 2.0, h / 2.0);
    let viewer = world.local().map_or_else(Pose::default, |p| p.pose());

    surface.begin_frame();

    for glyph in world.glyphs() {
        surface.set_transform(view_transform(viewer, glyph.pose(), center));
        surface.outline_char(glyph.ch);
        surface.fill_char(glyph.ch, glyph.color);
    }

    if let Some(user) = world.local() {
        surface.set_transform(view_transform(viewer, user.pose(), center));
        let rel = heading_target - user.ang;
        let to = (
            rel.cos() * HEADING_LEN + HEADING_ANCHOR.0,
            rel.sin() * HEADING_LEN + HEADING_ANCHOR.1,
        );
        surface.line(HEADING_ANCHOR, to);
    }

    for player in world.players() {
        surface.set_transform(view_transform(viewer, player.pose(), center));
        surface.snail(player.color);
    }
}
