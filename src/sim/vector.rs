//! 2D vector helpers on top of `glam::Vec2`
//!
//! glam covers add/scale/distance directly; this module adds the pieces the
//! simulation needs with its own conventions (quarter-turn heading offset,
//! zero-safe normalize, one-axis-per-frame toroidal wrap).

use glam::Vec2;

/// Add two vectors
#[inline]
pub fn add(a: Vec2, b: Vec2) -> Vec2 {
    a + b
}

/// Scale a vector by a scalar
#[inline]
pub fn scale(v: Vec2, s: f32) -> Vec2 {
    v * s
}

/// Rotate a vector about the origin by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector in the direction of `v`, or zero for a degenerate input.
///
/// A stationary ship dying hands a zero velocity in here; NaN must never
/// reach a position.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Unit vector at `angle` radians
#[inline]
pub fn unit(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Direction the ship's nose points for a given rotation.
///
/// The outline is drawn pointing along +Y, so the heading is a quarter turn
/// ahead of the raw rotation.
#[inline]
pub fn heading(rot: f32) -> Vec2 {
    unit(rot + std::f32::consts::FRAC_PI_2)
}

/// Snap a position that left the arena to the opposite edge.
///
/// Only the first out-of-range axis is corrected per call; a corner exit
/// takes two frames to settle.
pub fn wrap(mut pos: Vec2, size: Vec2) -> Vec2 {
    if pos.x < 0.0 {
        pos.x = size.x;
    } else if pos.x > size.x {
        pos.x = 0.0;
    } else if pos.y < 0.0 {
        pos.y = size.y;
    } else if pos.y > size.y {
        pos.y = 0.0;
    }
    pos
}
