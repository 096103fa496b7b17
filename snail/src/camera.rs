//! Viewer-centered coordinate math on the wrapping plane.
//!
//! The world is a torus [`WORLD_SIZE`] units on a side: coordinates live in
//! `[0, WORLD_SIZE)` and wrap at the edges, so every position has equivalent
//! representations offset by whole multiples of the world size. The render
//! pass asks this module for an affine transform that places a target entity
//! in the local snail's frame — viewer fixed at screen center, facing its
//! own heading — using whichever wrapped representation of the target is
//! nearest.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use std::f64::consts::PI;

/// Width and height of the wrapping plane. Matches the u16 wire coordinates.
pub const WORLD_SIZE: f64 = 65536.0;

/// Normalize a coordinate into `[0, WORLD_SIZE)`.
#[must_use]
pub fn wrap(v: f64) -> f64 {
    v.rem_euclid(WORLD_SIZE)
}

/// Among a coordinate's wrapped representations, the one nearest `reference`.
///
/// The result may be negative or beyond the world edge; it is a rendering
/// offset, not a stored coordinate.
#[must_use]
pub fn nearest_wrap(reference: f64, v: f64) -> f64 {
    let mut best = wrap(v);
    for candidate in [best - WORLD_SIZE, best + WORLD_SIZE] {
        if (reference - candidate).abs() < (reference - best).abs() {
            best = candidate;
        }
    }
    best
}

/// Canonicalize a heading into `(-PI, PI]`.
#[must_use]
pub fn normalize_angle(mut a: f64) -> f64 {
    while a > PI {
        a -= 2.0 * PI;
    }
    while a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// A position and heading in world space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Heading in radians, canonically in `(-PI, PI]`.
    pub ang: f64,
}

impl Pose {
    #[must_use]
    pub fn new(x: f64, y: f64, ang: f64) -> Self {
        Self { x, y, ang }
    }
}

/// A 2-D affine transform in drawing-context order:
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Transform {
    pub const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// Map a point through the transform.
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }
}

/// Build the transform that draws `target` in the viewer's frame.
///
/// The viewer sits at `center` with its heading pointing up the screen; the
/// target appears rotated by the heading difference and offset by the
/// nearest-wrap relative position. Rebuilt per entity per frame — every
/// entity has a different offset from the viewer, so there is nothing to
/// cache.
#[must_use]
pub fn view_transform(viewer: Pose, target: Pose, center: (f64, f64)) -> Transform {
    let dx = nearest_wrap(viewer.x, target.x) - viewer.x;
    let dy = nearest_wrap(viewer.y, target.y) - viewer.y;
    let rel = normalize_angle(target.ang - viewer.ang);

    let (usin, ucos) = (-viewer.ang).sin_cos();
    let rx = dx * ucos - dy * usin;
    let ry = dx * usin + dy * ucos;

    let (sin, cos) = rel.sin_cos();
    Transform { a: cos, b: sin, c: -sin, d: cos, e: rx + center.0, f: ry + center.1 }
}
