//! Collision detection and hit resolution
//!
//! Every test is a circle check. Passes run in a fixed order and only flag
//! entities; removal and the entities hits produce (fragments, particles) are
//! applied after all passes, so nothing spawned this frame collides this
//! frame and pool order stays stable.

use glam::Vec2;

use super::state::{
    ASTEROID_DUST_COUNT, Asteroid, GameEvent, GameState, Particle, SHIP_DEBRIS_COUNT, Ship, SimRng,
};
use super::vector::{distance, normalize};
use crate::consts::SHIP_RADIUS;
use rand::Rng;

/// Entities produced by hits, appended once removals are compacted
#[derive(Debug, Default)]
pub struct Spawns {
    pub asteroids: Vec<Asteroid>,
    pub particles: Vec<Particle>,
}

/// True if `b` lies strictly within `radius` of `a`
#[inline]
pub fn within(a: Vec2, b: Vec2, radius: f32) -> bool {
    distance(a, b) < radius
}

/// Score, dust and fragments for one destroyed asteroid.
///
/// Returns the points earned. Fragments take a random share of the parent's
/// heading plus a fixed push along `impact`.
pub fn hit_asteroid(
    asteroid: &Asteroid,
    impact: Vec2,
    rng: &mut SimRng,
    spawns: &mut Spawns,
    events: &mut Vec<GameEvent>,
) -> u64 {
    for _ in 0..ASTEROID_DUST_COUNT {
        spawns.particles.push(Particle::asteroid_dust(rng, asteroid.pos));
    }
    events.push(GameEvent::AsteroidDestroyed {
        size: asteroid.size,
        pos: asteroid.pos,
    });

    if let Some(smaller) = asteroid.size.smaller() {
        let heading = normalize(asteroid.vel);
        let push = asteroid.size.velocity_factor() * 3.0;
        for _ in 0..2 {
            let vel = heading * push * rng.random::<f32>() + impact * 1.5;
            spawns
                .asteroids
                .push(Asteroid::new(asteroid.pos, vel, smaller, rng.random()));
        }
    }

    asteroid.size.score()
}

/// Kill the ship and throw its hull apart
fn destroy_ship(
    ship: &mut Ship,
    now: f32,
    rng: &mut SimRng,
    spawns: &mut Spawns,
    events: &mut Vec<GameEvent>,
) {
    if !ship.kill(now) {
        return;
    }
    for _ in 0..SHIP_DEBRIS_COUNT {
        spawns.particles.push(Particle::ship_debris(rng, ship.pos));
    }
    log::debug!("Ship destroyed at {:?}", ship.pos);
    events.push(GameEvent::ShipDestroyed { pos: ship.pos });
}

/// Run all collision passes for the current frame, then compact
pub fn resolve_collisions(state: &mut GameState) {
    let GameState {
        rng,
        score,
        now,
        ship,
        asteroids,
        aliens,
        bullets,
        particles,
        events,
        ..
    } = state;
    let now = *now;
    let mut spawns = Spawns::default();

    // Pass 1: the ship against everything that can kill it
    if ship.is_alive() {
        if let Some(bullet) = bullets
            .iter_mut()
            .filter(|b| !b.remove && b.is_armed(now))
            .find(|b| within(ship.pos, b.pos, SHIP_RADIUS))
        {
            bullet.remove = true;
            destroy_ship(ship, now, rng, &mut spawns, events);
        }
    }
    if ship.is_alive() {
        if let Some(asteroid) = asteroids
            .iter_mut()
            .filter(|a| !a.remove)
            .find(|a| within(a.pos, ship.pos, a.size.collision_radius()))
        {
            asteroid.remove = true;
            destroy_ship(ship, now, rng, &mut spawns, events);
            *score += hit_asteroid(asteroid, normalize(ship.vel), rng, &mut spawns, events);
        }
    }
    if ship.is_alive() {
        if let Some(alien) = aliens
            .iter_mut()
            .filter(|a| !a.remove)
            .find(|a| within(a.pos, ship.pos, a.size.collision_radius()))
        {
            alien.remove = true;
            events.push(GameEvent::AlienDestroyed {
                size: alien.size,
                pos: alien.pos,
            });
            destroy_ship(ship, now, rng, &mut spawns, events);
        }
    }

    // Pass 2: asteroids against aliens, then bullets
    for asteroid in asteroids.iter_mut().filter(|a| !a.remove) {
        let radius = asteroid.size.collision_radius();
        let mut impact = None;

        if let Some(alien) = aliens
            .iter_mut()
            .filter(|a| !a.remove)
            .find(|a| within(asteroid.pos, a.pos, radius))
        {
            alien.remove = true;
            events.push(GameEvent::AlienDestroyed {
                size: alien.size,
                pos: alien.pos,
            });
            impact = Some(normalize(asteroid.pos - alien.pos));
        }

        if impact.is_none() {
            if let Some(bullet) = bullets
                .iter_mut()
                .filter(|b| !b.remove)
                .find(|b| within(asteroid.pos, b.pos, radius))
            {
                bullet.remove = true;
                impact = Some(normalize(bullet.vel));
            }
        }

        if let Some(impact) = impact {
            asteroid.remove = true;
            *score += hit_asteroid(asteroid, impact, rng, &mut spawns, events);
        }
    }

    // Pass 3: aliens against bullets
    for alien in aliens.iter_mut().filter(|a| !a.remove) {
        if let Some(bullet) = bullets
            .iter_mut()
            .filter(|b| !b.remove && b.is_armed(now))
            .find(|b| within(alien.pos, b.pos, alien.size.collision_radius()))
        {
            bullet.remove = true;
            alien.remove = true;
            log::debug!("Alien {:?} shot down", alien.size);
            events.push(GameEvent::AlienDestroyed {
                size: alien.size,
                pos: alien.pos,
            });
        }
    }

    // Compaction, then this frame's spawns
    asteroids.retain(|a| !a.remove);
    aliens.retain(|a| !a.remove);
    bullets.retain(|b| !b.remove);
    asteroids.extend(spawns.asteroids);
    particles.extend(spawns.particles);
}
