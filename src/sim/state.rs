//! Game state and core simulation types
//!
//! Every entity pool lives in `GameState`, together with the RNG that drives
//! all spawning. Nothing outside this struct influences a tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::vector::unit;
use crate::consts::*;
use crate::{Tuning, TuningError};

/// Random source for the whole simulation
pub type SimRng = Pcg32;

/// Rerolls per asteroid before the clearance is given up on
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ship alive and taking input
    Playing,
    /// Wreck frozen in place, waiting out the respawn delay
    ShipDead,
    /// Out of ships; full reset happens at the start of the next tick
    GameOver,
}

/// Whether the ship is flying
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShipStatus {
    Alive,
    Dead { since: f32 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians; the nose points a quarter turn ahead of this
    pub rot: f32,
    pub status: ShipStatus,
    /// Thrust was held on the last tick (drives the flame outline)
    pub thrusting: bool,
}

impl Ship {
    /// A fresh ship at rest
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rot: 0.0,
            status: ShipStatus::Alive,
            thrusting: false,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self.status, ShipStatus::Alive)
    }

    /// Time of death, if dead
    pub fn died_at(&self) -> Option<f32> {
        match self.status {
            ShipStatus::Alive => None,
            ShipStatus::Dead { since } => Some(since),
        }
    }

    /// Mark the ship destroyed. Returns false if it already was.
    pub fn kill(&mut self, now: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.status = ShipStatus::Dead { since: now };
        self.thrusting = false;
        true
    }
}

/// Asteroid size classes, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidSize {
    Small,
    Medium,
    Big,
}

impl AsteroidSize {
    pub const ALL: [AsteroidSize; 3] = [Self::Small, Self::Medium, Self::Big];

    /// Visual radius
    pub fn radius(self) -> f32 {
        match self {
            Self::Small => SCALE * 0.9,
            Self::Medium => SCALE * 1.5,
            Self::Big => SCALE * 3.0,
        }
    }

    /// Hitbox shrink relative to the outline; big rocks are mostly empty space
    pub fn collision_scale(self) -> f32 {
        match self {
            Self::Small => 1.0,
            Self::Medium => 0.8,
            Self::Big => 0.5,
        }
    }

    pub fn collision_radius(self) -> f32 {
        self.radius() * self.collision_scale()
    }

    /// Speed multiplier for spawned and split asteroids
    pub fn velocity_factor(self) -> f32 {
        match self {
            Self::Small => 1.8,
            Self::Medium => 1.4,
            Self::Big => 0.8,
        }
    }

    /// Points for destroying one
    pub fn score(self) -> u64 {
        match self {
            Self::Small => 100,
            Self::Medium => 50,
            Self::Big => 20,
        }
    }

    /// Size of the fragments this one splits into
    pub fn smaller(self) -> Option<Self> {
        match self {
            Self::Small => None,
            Self::Medium => Some(Self::Small),
            Self::Big => Some(Self::Medium),
        }
    }
}

/// A drifting rock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: AsteroidSize,
    /// Outline seed; fixed for the asteroid's lifetime
    pub seed: u64,
    #[serde(skip)]
    pub remove: bool,
}

impl Asteroid {
    pub fn new(pos: Vec2, vel: Vec2, size: AsteroidSize, seed: u64) -> Self {
        Self {
            pos,
            vel,
            size,
            seed,
            remove: false,
        }
    }

    /// Random asteroid for a fresh field
    pub fn random(rng: &mut SimRng, pos: Vec2) -> Self {
        let angle = FULL_TURN * rng.random::<f32>();
        let size = AsteroidSize::ALL[rng.random_range(0..AsteroidSize::ALL.len())];
        let speed = size.velocity_factor() * 3.0 * rng.random::<f32>();
        Self::new(pos, unit(angle) * speed, size, rng.random())
    }
}

/// Alien ship size classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlienSize {
    Tiny,
    Huge,
}

impl AlienSize {
    /// Seconds between heading changes
    pub fn dir_change_interval(self) -> f32 {
        match self {
            Self::Tiny => 0.35,
            Self::Huge => 0.85,
        }
    }

    /// Seconds between shots
    pub fn shot_interval(self) -> f32 {
        match self {
            Self::Tiny => 0.75,
            Self::Huge => 1.25,
        }
    }

    /// Distance per frame
    pub fn speed(self) -> f32 {
        match self {
            Self::Tiny => 6.0,
            Self::Huge => 3.0,
        }
    }

    pub fn collision_radius(self) -> f32 {
        match self {
            Self::Tiny => SCALE * 0.5,
            Self::Huge => SCALE * 0.8,
        }
    }
}

/// An enemy saucer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alien {
    pub pos: Vec2,
    pub dir: Vec2,
    pub size: AlienSize,
    pub last_dir_change: f32,
    pub last_shot: f32,
    #[serde(skip)]
    pub remove: bool,
}

impl Alien {
    /// Spawn on the left or right edge at a random height, heading anywhere
    pub fn at_random_edge(rng: &mut SimRng, size: AlienSize, arena: Vec2, now: f32) -> Self {
        let x = if rng.random_bool(0.5) { 0.0 } else { arena.x };
        let y = rng.random::<f32>() * arena.y;
        Self {
            pos: Vec2::new(x, y),
            dir: unit(FULL_TURN * rng.random::<f32>()),
            size,
            last_dir_change: now,
            last_shot: now,
            remove: false,
        }
    }
}

/// A projectile fired by the ship or an alien
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub ttl: f32,
    /// Sim time the bullet was fired
    pub spawn: f32,
    #[serde(skip)]
    pub remove: bool,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2, ttl: f32, spawn: f32) -> Self {
        Self {
            pos,
            vel,
            ttl,
            spawn,
            remove: false,
        }
    }

    /// Past the muzzle grace window and able to hit a shooter
    #[inline]
    pub fn is_armed(&self, now: f32) -> bool {
        now - self.spawn > BULLET_GRACE
    }
}

/// Particle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleShape {
    Line { rot: f32, len: f32 },
    Dot { radius: f32 },
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub ttl: f32,
    pub shape: ParticleShape,
}

/// Line particles in a ship explosion
pub const SHIP_DEBRIS_COUNT: usize = 5;
/// Dot particles in an asteroid explosion
pub const ASTEROID_DUST_COUNT: usize = 10;

impl Particle {
    /// Spinning hull segment thrown off a destroyed ship
    pub fn ship_debris(rng: &mut SimRng, origin: Vec2) -> Self {
        let angle = FULL_TURN * rng.random::<f32>();
        let jitter = Vec2::new(rng.random::<f32>() * 3.0, rng.random::<f32>() * 3.0);
        Self {
            pos: origin + jitter,
            vel: unit(angle) * 2.0 * rng.random::<f32>(),
            ttl: 3.0 + rng.random::<f32>(),
            shape: ParticleShape::Line {
                rot: angle,
                len: SCALE * (0.6 + 0.4 * rng.random::<f32>()),
            },
        }
    }

    /// Dust puff from a destroyed asteroid
    pub fn asteroid_dust(rng: &mut SimRng, origin: Vec2) -> Self {
        let angle = FULL_TURN * rng.random::<f32>();
        Self {
            pos: origin,
            vel: unit(angle) * rng.random_range(2.0f32..6.0),
            ttl: rng.random_range(0.6f32..1.0),
            shape: ParticleShape::Dot {
                radius: THICKNESS * rng.random_range(1.0f32..2.0),
            },
        }
    }
}

/// Something that happened during the last tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ShipFired,
    AlienFired { size: AlienSize },
    ShipDestroyed { pos: Vec2 },
    AsteroidDestroyed { size: AsteroidSize, pos: Vec2 },
    AlienDestroyed { size: AlienSize, pos: Vec2 },
    AlienSpawned { size: AlienSize },
    ShipRespawned { lives: u8 },
    GameOver { score: u64 },
    GameReset,
    FieldSpawned { count: usize },
}

/// Complete game state (deterministic given its RNG)
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub rng: SimRng,
    pub score: u64,
    /// Ships left, including the one in play
    pub lives: u8,
    /// Sim clock (seconds since start)
    pub now: f32,
    /// Length of the last tick
    pub delta: f32,
    pub phase: GamePhase,
    /// Full reset queued for the start of the next tick
    pub reset_pending: bool,
    pub ship: Ship,
    pub asteroids: Vec<Asteroid>,
    pub aliens: Vec<Alien>,
    pub bullets: Vec<Bullet>,
    pub particles: Vec<Particle>,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with default tuning and the given seed
    pub fn new(seed: u64) -> Self {
        Self::build(Tuning::default(), SimRng::seed_from_u64(seed))
    }

    /// Create a new game with custom tuning, rejecting values the
    /// simulation cannot run with
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        Self::with_rng(tuning, SimRng::seed_from_u64(seed))
    }

    /// Create a new game drawing all randomness from `rng`
    pub fn with_rng(tuning: Tuning, rng: SimRng) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(tuning, rng))
    }

    fn build(tuning: Tuning, rng: SimRng) -> Self {
        let mut state = Self {
            ship: Ship::spawn(tuning.arena_center()),
            lives: tuning.starting_lives,
            tuning,
            rng,
            score: 0,
            now: 0.0,
            delta: 0.0,
            phase: GamePhase::Playing,
            reset_pending: false,
            asteroids: Vec::new(),
            aliens: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
        };
        state.reset_asteroids();
        state.events.clear();
        state
    }

    /// Put a fresh ship at the arena center
    pub fn reset_ship(&mut self) {
        self.ship = Ship::spawn(self.tuning.arena_center());
        self.phase = GamePhase::Playing;
    }

    /// Replace the asteroid pool with a fresh field sized for the current score
    pub fn reset_asteroids(&mut self) {
        let count = self.tuning.field_size(self.score);
        let arena = self.tuning.arena();
        let center = self.tuning.arena_center();
        let clearance = self.tuning.spawn_clearance;

        self.asteroids.clear();
        for _ in 0..count {
            let mut pos = Vec2::ZERO;
            for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                pos = Vec2::new(
                    self.rng.random::<f32>() * arena.x,
                    self.rng.random::<f32>() * arena.y,
                );
                if pos.distance(center) >= clearance {
                    break;
                }
            }
            let asteroid = Asteroid::random(&mut self.rng, pos);
            self.asteroids.push(asteroid);
        }

        log::info!("Asteroid field: {} rocks at score {}", count, self.score);
        self.events.push(GameEvent::FieldSpawned { count });
    }

    /// New game: score, lives and every pool start over
    pub fn reset_game(&mut self) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.reset_pending = false;
        self.aliens.clear();
        self.bullets.clear();
        self.particles.clear();
        self.reset_ship();
        self.reset_asteroids();
        log::info!("Game reset");
        self.events.push(GameEvent::GameReset);
    }

    /// Bring in an alien at a random arena edge
    pub fn spawn_alien(&mut self, size: AlienSize) {
        let alien = Alien::at_random_edge(&mut self.rng, size, self.tuning.arena(), self.now);
        log::debug!("Alien {:?} spawned at {:?}", size, alien.pos);
        self.aliens.push(alien);
        self.events.push(GameEvent::AlienSpawned { size });
    }
}
