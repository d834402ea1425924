//! Vector-line outlines for every entity
//!
//! Shapes are unit-sized point lists; a `Transform` places them in the arena.
//! A renderer only has to stroke the resulting segments and fill the dots.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::f32::consts::{PI, TAU};

use crate::consts::SCALE;
use crate::sim::snapshot::Snapshot;
use crate::sim::state::{AlienSize, ParticleShape};
use crate::sim::vector::rotate;

/// One stroke of the vector display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub center: Vec2,
    pub radius: f32,
}

/// Rotate, then scale, then translate
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    pub origin: Vec2,
    pub scale: f32,
    pub rot: f32,
}

impl Transform {
    pub fn new(origin: Vec2, scale: f32, rot: f32) -> Self {
        Self { origin, scale, rot }
    }

    #[inline]
    pub fn apply(&self, point: Vec2) -> Vec2 {
        rotate(point, self.rot) * self.scale + self.origin
    }
}

/// Ship hull, nose along +Y
pub const SHIP_HULL: [Vec2; 5] = [
    Vec2::new(-0.4, -0.5),
    Vec2::new(0.0, 0.5),
    Vec2::new(0.4, -0.5),
    Vec2::new(0.3, -0.4),
    Vec2::new(-0.3, -0.4),
];

/// Exhaust flame behind the hull
pub const SHIP_FLAME: [Vec2; 3] = [
    Vec2::new(-0.3, -0.4),
    Vec2::new(0.0, -0.73),
    Vec2::new(0.3, -0.4),
];

/// Saucer body (open strip)
pub const ALIEN_BODY: [Vec2; 8] = [
    Vec2::new(-0.5, 0.0),
    Vec2::new(-0.3, 0.3),
    Vec2::new(0.3, 0.3),
    Vec2::new(0.5, 0.0),
    Vec2::new(0.3, -0.3),
    Vec2::new(-0.3, -0.3),
    Vec2::new(-0.5, 0.0),
    Vec2::new(0.5, 0.0),
];

/// Saucer dome (open strip)
pub const ALIEN_DOME: [Vec2; 4] = [
    Vec2::new(-0.2, -0.3),
    Vec2::new(-0.1, -0.5),
    Vec2::new(0.1, -0.5),
    Vec2::new(0.2, -0.3),
];

/// Particle line, centered on the particle
const DEBRIS_LINE: [Vec2; 2] = [Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0)];

/// Jagged unit outline for an asteroid. Same seed, same rock.
pub fn asteroid_outline(seed: u64) -> Vec<Vec2> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let num_points = rng.random_range(8..16);

    (0..num_points)
        .map(|i| {
            let mut radius = 0.3 + 0.2 * rng.random::<f32>();
            if rng.random::<f32>() < 0.2 {
                radius -= 0.2;
            }
            let angle = (TAU / num_points as f32) * i as f32 + PI * 0.125 * rng.random::<f32>();
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Outline scale for a saucer
pub fn alien_scale(size: AlienSize) -> f32 {
    match size {
        AlienSize::Tiny => SCALE * 0.8,
        AlienSize::Huge => SCALE * 1.4,
    }
}

/// Push segments joining consecutive points; `closed` joins last to first
pub fn stroke(points: &[Vec2], transform: &Transform, closed: bool, out: &mut Vec<Segment>) {
    if points.len() < 2 {
        return;
    }
    let placed: Vec<Vec2> = points.iter().map(|&p| transform.apply(p)).collect();
    for pair in placed.windows(2) {
        out.push(Segment {
            a: pair[0],
            b: pair[1],
        });
    }
    if closed && placed.len() > 2 {
        out.push(Segment {
            a: placed[placed.len() - 1],
            b: placed[0],
        });
    }
}

/// Strokes and dots for one frame
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    pub lines: Vec<Segment>,
    pub dots: Vec<Dot>,
}

impl DisplayList {
    /// Build the full vector display for a snapshot
    pub fn from_snapshot(snap: &Snapshot) -> Self {
        let mut list = Self::default();

        if snap.ship.alive {
            let t = Transform::new(snap.ship.pos, SCALE, snap.ship.rot);
            stroke(&SHIP_HULL, &t, true, &mut list.lines);
            if snap.ship.flame {
                stroke(&SHIP_FLAME, &t, true, &mut list.lines);
            }
        }

        for asteroid in &snap.asteroids {
            let t = Transform::new(asteroid.pos, asteroid.size.radius(), 0.0);
            stroke(&asteroid_outline(asteroid.seed), &t, true, &mut list.lines);
        }

        for alien in &snap.aliens {
            let t = Transform::new(alien.pos, alien_scale(alien.size), 0.0);
            stroke(&ALIEN_BODY, &t, false, &mut list.lines);
            stroke(&ALIEN_DOME, &t, false, &mut list.lines);
        }

        for &pos in &snap.bullets {
            list.dots.push(Dot {
                center: pos,
                radius: (SCALE * 0.05).max(1.0),
            });
        }

        for particle in &snap.particles {
            match particle.shape {
                ParticleShape::Line { rot, len } => {
                    let t = Transform::new(particle.pos, len, rot);
                    stroke(&DEBRIS_LINE, &t, false, &mut list.lines);
                }
                ParticleShape::Dot { radius } => list.dots.push(Dot {
                    center: particle.pos,
                    radius,
                }),
            }
        }

        list
    }
}
