//! Read-only view of a frame for the presentation layer

use glam::Vec2;
use serde::Serialize;

use super::state::{AlienSize, AsteroidSize, GamePhase, GameState, ParticleShape};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub rot: f32,
    pub alive: bool,
    /// Draw the flame outline this frame
    pub flame: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsteroidView {
    pub pos: Vec2,
    pub size: AsteroidSize,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlienView {
    pub pos: Vec2,
    pub size: AlienSize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleView {
    pub pos: Vec2,
    pub shape: ParticleShape,
}

/// Everything a renderer needs for one frame, in pool order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub now: f32,
    pub score: u64,
    pub lives: u8,
    pub phase: GamePhase,
    pub ship: ShipView,
    pub asteroids: Vec<AsteroidView>,
    pub aliens: Vec<AlienView>,
    pub bullets: Vec<Vec2>,
    pub particles: Vec<ParticleView>,
}

/// Thrust flame flickers: lit on even 1/20 s slots
pub fn flame_visible(now: f32) -> bool {
    ((now * 20.0) as i64) % 2 == 0
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let ship = &state.ship;
        Self {
            now: state.now,
            score: state.score,
            lives: state.lives,
            phase: state.phase,
            ship: ShipView {
                pos: ship.pos,
                rot: ship.rot,
                alive: ship.is_alive(),
                flame: ship.is_alive() && ship.thrusting && flame_visible(state.now),
            },
            asteroids: state
                .asteroids
                .iter()
                .map(|a| AsteroidView {
                    pos: a.pos,
                    size: a.size,
                    seed: a.seed,
                })
                .collect(),
            aliens: state
                .aliens
                .iter()
                .map(|a| AlienView {
                    pos: a.pos,
                    size: a.size,
                })
                .collect(),
            bullets: state.bullets.iter().map(|b| b.pos).collect(),
            particles: state
                .particles
                .iter()
                .map(|p| ParticleView {
                    pos: p.pos,
                    shape: p.shape,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{TickInput, tick};

    #[test]
    fn test_capture_mirrors_pools() {
        let mut state = GameState::new(21);
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &input, 1.0 / 60.0);

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.asteroids.len(), state.asteroids.len());
        assert_eq!(snap.bullets.len(), state.bullets.len());
        assert_eq!(snap.asteroids[0].seed, state.asteroids[0].seed);
        assert!(snap.ship.alive);
        assert_eq!(snap.lives, 3);
    }

    #[test]
    fn test_flame_flicker() {
        assert!(flame_visible(0.0));
        assert!(!flame_visible(0.06));
        assert!(flame_visible(0.11));
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(1);
        let json = serde_json::to_string(&Snapshot::capture(&state)).unwrap();
        assert!(json.contains("\"asteroids\""));
        assert!(json.contains("\"Playing\""));
    }
}
