//! Game balance and arena configuration
//!
//! Consumed once when a `GameState` is created. Loaded from JSON by the
//! driver; any field left out of the file keeps its default.

use std::fmt;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Ship ===
    /// Turns per second while a rotate input is held
    pub rot_speed: f32,
    /// Thrust acceleration
    pub ship_speed: f32,
    /// Fraction of velocity lost per second
    pub drag: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_recoil: f32,
    pub bullet_ttl: f32,
    pub alien_bullet_speed: f32,

    // === Stage flow ===
    /// Seconds the wreck stays on screen before respawn/game over
    pub respawn_delay: f32,
    /// Ships per game, including the first
    pub starting_lives: u8,
    pub huge_alien_score_step: u64,
    pub tiny_alien_score_step: u64,
    pub base_asteroid_count: usize,
    pub score_per_extra_asteroid: u64,
    /// Radius around the arena center kept clear when a field spawns
    pub spawn_clearance: f32,

    /// Scale displacement by `delta * REFERENCE_FPS` instead of moving by raw
    /// per-frame velocity. Off by default: trajectories then match the
    /// 60 fps original frame for frame.
    pub frame_rate_independent: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            rot_speed: ROT_SPEED,
            ship_speed: SHIP_SPEED,
            drag: DRAG,

            bullet_speed: BULLET_SPEED,
            bullet_recoil: BULLET_RECOIL,
            bullet_ttl: BULLET_TTL,
            alien_bullet_speed: ALIEN_BULLET_SPEED,

            respawn_delay: RESPAWN_DELAY,
            starting_lives: STARTING_LIVES,
            huge_alien_score_step: HUGE_ALIEN_SCORE_STEP,
            tiny_alien_score_step: TINY_ALIEN_SCORE_STEP,
            base_asteroid_count: BASE_ASTEROID_COUNT,
            score_per_extra_asteroid: SCORE_PER_EXTRA_ASTEROID,
            spawn_clearance: SPAWN_CLEARANCE,

            frame_rate_independent: false,
        }
    }
}

impl Tuning {
    /// Arena size as a vector
    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Arena center (ship spawn point)
    pub fn arena_center(&self) -> Vec2 {
        self.arena() * 0.5
    }

    /// How far a velocity moves an entity in one tick
    pub fn displacement_scale(&self, delta: f32) -> f32 {
        if self.frame_rate_independent {
            delta * REFERENCE_FPS
        } else {
            1.0
        }
    }

    /// Asteroid count for a fresh field at the given score
    pub fn field_size(&self, score: u64) -> usize {
        // A zero step never passes validate; treat it as "no growth"
        let extra = score.checked_div(self.score_per_extra_asteroid).unwrap_or(0);
        self.base_asteroid_count + extra as usize
    }

    /// Parse from JSON and validate
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json).map_err(TuningError::Parse)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("bullet_ttl", self.bullet_ttl),
            ("respawn_delay", self.respawn_delay),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }

        let non_negative = [
            ("rot_speed", self.rot_speed),
            ("ship_speed", self.ship_speed),
            ("bullet_speed", self.bullet_speed),
            ("bullet_recoil", self.bullet_recoil),
            ("alien_bullet_speed", self.alien_bullet_speed),
            ("spawn_clearance", self.spawn_clearance),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be zero or positive",
                });
            }
        }

        // Drag above 1/s would flip velocity sign on a slow one-second frame
        if !(0.0..=1.0).contains(&self.drag) {
            return Err(TuningError::Invalid {
                field: "drag",
                reason: "must be within 0.0..=1.0",
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }
        let steps = [
            ("huge_alien_score_step", self.huge_alien_score_step),
            ("tiny_alien_score_step", self.tiny_alien_score_step),
            ("score_per_extra_asteroid", self.score_per_extra_asteroid),
        ];
        for (field, value) in steps {
            if value == 0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be non-zero",
                });
            }
        }
        let half_diagonal = self.arena().length() * 0.5;
        if self.spawn_clearance >= half_diagonal {
            return Err(TuningError::Invalid {
                field: "spawn_clearance",
                reason: "leaves no room in the arena",
            });
        }
        Ok(())
    }
}

/// Failure to obtain a usable tuning
#[derive(Debug)]
pub enum TuningError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read tuning file {path}: {source}"),
            Self::Parse(err) => write!(f, "malformed tuning JSON: {err}"),
            Self::Invalid { field, reason } => write!(f, "invalid tuning `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid { .. } => None,
        }
    }
}
