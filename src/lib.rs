//! Asteroid Field - A wrap-around arena space shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, stage state machine)
//! - `renderer`: Vector-line outline geometry for the presentation layer
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for inputs just below a multiple
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}

/// Game configuration constants
pub mod consts {
    use std::f32::consts::TAU;

    /// Reference frame rate the per-frame velocities were balanced for
    pub const REFERENCE_FPS: f32 = 60.0;
    /// Frame step used by the headless driver
    pub const SIM_DT: f32 = 1.0 / REFERENCE_FPS;

    /// Arena dimensions (640x480 scaled by 1.2)
    pub const ARENA_WIDTH: f32 = 640.0 * 1.2;
    pub const ARENA_HEIGHT: f32 = 480.0 * 1.2;

    /// Base shape unit; every outline and radius is a multiple of this
    pub const SCALE: f32 = 30.0;
    /// Line thickness of the vector outlines
    pub const THICKNESS: f32 = 2.0;

    /// Ship handling
    pub const ROT_SPEED: f32 = 1.3; // turns per second
    pub const SHIP_SPEED: f32 = 25.0;
    pub const DRAG: f32 = 0.3;
    pub const SHIP_RADIUS: f32 = SCALE * 0.7;

    /// Bullets
    pub const BULLET_SPEED: f32 = 8.0;
    pub const BULLET_RECOIL: f32 = 0.7;
    pub const BULLET_TTL: f32 = 2.0;
    pub const ALIEN_BULLET_SPEED: f32 = 6.0;
    /// Bullets younger than this cannot hit anything that can shoot
    pub const BULLET_GRACE: f32 = 0.05;

    /// Stage flow
    pub const RESPAWN_DELAY: f32 = 2.0;
    pub const STARTING_LIVES: u8 = 3;
    pub const HUGE_ALIEN_SCORE_STEP: u64 = 5000;
    pub const TINY_ALIEN_SCORE_STEP: u64 = 8000;
    pub const BASE_ASTEROID_COUNT: usize = 20;
    pub const SCORE_PER_EXTRA_ASTEROID: u64 = 2000;
    /// New asteroid fields keep this far away from the respawn point
    pub const SPAWN_CLEARANCE: f32 = SCALE * 4.0;

    /// Full turn in radians
    pub const FULL_TURN: f32 = TAU;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_small_unchanged() {
        for angle in [0.0, 1.0, -1.0, 3.0, -3.0] {
            assert!((normalize_angle(angle) - angle).abs() < 1e-5);
        }
        assert!((normalize_angle(-PI) + PI).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_angle_wraps_large_turns() {
        let a = normalize_angle(1000.0);
        assert!((-PI..PI).contains(&a));
        // 1000 rad is 159 full turns plus about 0.97
        assert!((a - (1000.0 - 159.0 * std::f32::consts::TAU)).abs() < 1e-3);

        let b = normalize_angle(-1.0e6);
        assert!((-PI..PI).contains(&b));
        assert!((normalize_angle(PI + 0.5) - (0.5 - PI)).abs() < 1e-5);
    }

    proptest! {
        #[test]
        fn prop_normalize_angle_in_range(angle in -1.0e5f32..1.0e5) {
            let a = normalize_angle(angle);
            prop_assert!((-PI..PI).contains(&a));
            prop_assert!((a - angle).rem_euclid(std::f32::consts::TAU) < 1e-1
                || (a - angle).rem_euclid(std::f32::consts::TAU) > std::f32::consts::TAU - 1e-1);
        }
    }
}
