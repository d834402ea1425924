//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by the game state
//! - Stable pool order (insertion order, order-preserving compaction)
//! - No rendering or platform dependencies

pub mod collision;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod vector;

pub use collision::{Spawns, hit_asteroid, resolve_collisions};
pub use snapshot::Snapshot;
pub use state::{
    Alien, AlienSize, Asteroid, AsteroidSize, Bullet, GameEvent, GamePhase, GameState, Particle,
    ParticleShape, Ship, ShipStatus, SimRng,
};
pub use tick::{TickInput, tick};
