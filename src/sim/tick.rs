//! Per-frame simulation tick
//!
//! Advances the game by one rendered frame of `delta` seconds: entity
//! updates, collisions, then the stage state machine.

use rand::Rng;

use super::collision::resolve_collisions;
use super::state::{AlienSize, Bullet, GameEvent, GamePhase, GameState};
use super::vector::{heading, normalize, unit, wrap};
use crate::consts::{FULL_TURN, SCALE};

/// Input signals for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held
    pub rotate_left: bool,
    /// Held; wins over `rotate_left` when both are down
    pub rotate_right: bool,
    /// Held
    pub thrust: bool,
    /// Edge: true only on the frame the key went down
    pub fire: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, delta: f32) {
    state.events.clear();

    // A game over from last frame is applied before anything reads the state
    if state.reset_pending {
        state.reset_game();
    }

    state.delta = delta;
    state.now += delta;
    let score_before = state.score;

    update_ship(state, input);
    update_asteroids(state);
    // Aliens first so their fresh shots advance this frame like the ship's
    update_aliens(state);
    update_bullets(state);
    update_particles(state);

    resolve_collisions(state);

    if state.score != score_before {
        spawn_score_aliens(state);
    }
    update_stage(state);

    if state.asteroids.is_empty() && state.aliens.is_empty() {
        state.reset_asteroids();
    }

    debug_assert!(state.ship.pos.is_finite(), "ship position went non-finite");
    debug_assert!(state.lives <= state.tuning.starting_lives);
}

/// Ship handling, only while it is flying
fn update_ship(state: &mut GameState, input: &TickInput) {
    if !state.ship.is_alive() {
        return;
    }
    let tuning = &state.tuning;
    let delta = state.delta;
    let ship = &mut state.ship;

    let turn = delta * tuning.rot_speed * FULL_TURN;
    if input.rotate_right {
        ship.rot += turn;
    } else if input.rotate_left {
        ship.rot -= turn;
    }

    let dir = heading(ship.rot);
    ship.thrusting = input.thrust;
    if input.thrust {
        ship.vel += dir * tuning.ship_speed * delta;
    }
    ship.vel *= 1.0 - tuning.drag * delta;

    ship.pos = wrap(
        ship.pos + ship.vel * tuning.displacement_scale(delta),
        tuning.arena(),
    );

    if input.fire {
        state.bullets.push(Bullet::new(
            ship.pos + dir * 0.5 * SCALE,
            dir * tuning.bullet_speed,
            tuning.bullet_ttl,
            state.now,
        ));
        ship.vel += dir * -tuning.bullet_recoil;
        state.events.push(GameEvent::ShipFired);
    }
}

fn update_asteroids(state: &mut GameState) {
    let step = state.tuning.displacement_scale(state.delta);
    let arena = state.tuning.arena();
    for asteroid in &mut state.asteroids {
        asteroid.pos = wrap(asteroid.pos + asteroid.vel * step, arena);
    }
}

/// Move bullets and expire the ones whose time is up
fn update_bullets(state: &mut GameState) {
    let delta = state.delta;
    let step = state.tuning.displacement_scale(delta);
    let arena = state.tuning.arena();
    for bullet in state.bullets.iter_mut().filter(|b| !b.remove) {
        bullet.pos = wrap(bullet.pos + bullet.vel * step, arena);
        if bullet.ttl > delta {
            bullet.ttl -= delta;
        } else {
            bullet.remove = true;
        }
    }
}

/// Wander and shoot at the ship
fn update_aliens(state: &mut GameState) {
    let now = state.now;
    let step = state.tuning.displacement_scale(state.delta);
    let arena = state.tuning.arena();
    let target = state.ship.pos;

    for alien in &mut state.aliens {
        let size = alien.size;

        if now - alien.last_dir_change > size.dir_change_interval() {
            alien.last_dir_change = now;
            alien.dir = unit(FULL_TURN * state.rng.random::<f32>());
        }

        alien.pos = wrap(alien.pos + alien.dir * size.speed() * step, arena);

        if now - alien.last_shot > size.shot_interval() {
            alien.last_shot = now;
            let aim = normalize(target - alien.pos);
            state.bullets.push(Bullet::new(
                alien.pos,
                aim * state.tuning.alien_bullet_speed,
                state.tuning.bullet_ttl,
                now,
            ));
            state.events.push(GameEvent::AlienFired { size });
        }
    }
}

fn update_particles(state: &mut GameState) {
    let delta = state.delta;
    let step = state.tuning.displacement_scale(delta);
    state.particles.retain_mut(|particle| {
        particle.pos += particle.vel * step;
        if particle.ttl > delta {
            particle.ttl -= delta;
            true
        } else {
            false
        }
    });
}

/// Alien reinforcements on exact score multiples
fn spawn_score_aliens(state: &mut GameState) {
    let score = state.score;
    if score == 0 {
        return;
    }
    // checked_rem: a zero step spawns nothing instead of panicking
    if score.checked_rem(state.tuning.huge_alien_score_step) == Some(0) {
        log::info!("Score {}: huge alien incoming", score);
        state.spawn_alien(AlienSize::Huge);
    }
    if score.checked_rem(state.tuning.tiny_alien_score_step) == Some(0) {
        log::info!("Score {}: tiny alien incoming", score);
        state.spawn_alien(AlienSize::Tiny);
    }
}

/// Respawn or game over once the wreck has been on screen long enough
fn update_stage(state: &mut GameState) {
    let Some(since) = state.ship.died_at() else {
        state.phase = GamePhase::Playing;
        return;
    };
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::ShipDead;

    if state.now - since <= state.tuning.respawn_delay {
        return;
    }

    state.lives = state.lives.saturating_sub(1);
    if state.lives > 0 {
        state.reset_ship();
        state.spawn_alien(AlienSize::Huge);
        log::info!("Ship respawned, {} left", state.lives);
        state.events.push(GameEvent::ShipRespawned { lives: state.lives });
    } else {
        state.phase = GamePhase::GameOver;
        state.reset_pending = true;
        log::info!("Game over with score {}", state.score);
        state.events.push(GameEvent::GameOver { score: state.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::snapshot::Snapshot;
    use crate::sim::state::{Alien, Asteroid, AsteroidSize};
    use glam::Vec2;
    use proptest::prelude::*;

    /// Ship plus one far-away rock so the field does not respawn
    fn quiet_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.asteroids.clear();
        state.asteroids.push(Asteroid::new(
            Vec2::new(10.0, 10.0),
            Vec2::ZERO,
            AsteroidSize::Small,
            1,
        ));
        state
    }

    fn hold(rotate_left: bool, rotate_right: bool, thrust: bool, fire: bool) -> TickInput {
        TickInput {
            rotate_left,
            rotate_right,
            thrust,
            fire,
        }
    }

    #[test]
    fn test_rotation_right_wins() {
        let mut state = quiet_state(1);
        tick(&mut state, &hold(true, true, false, false), 0.1);
        let expected = 0.1 * 1.3 * FULL_TURN;
        assert!((state.ship.rot - expected).abs() < 1e-5);

        tick(&mut state, &hold(true, false, false, false), 0.1);
        assert!(state.ship.rot.abs() < 1e-5);
    }

    #[test]
    fn test_thrust_and_drag() {
        let mut state = quiet_state(2);
        tick(&mut state, &hold(false, false, true, false), 0.1);
        // Heading at rot 0 is +Y: 25 * 0.1, then drag (1 - 0.03)
        let expected = 25.0 * 0.1 * (1.0 - 0.3 * 0.1);
        assert!(state.ship.vel.x.abs() < 1e-4);
        assert!((state.ship.vel.y - expected).abs() < 1e-4);
        assert!(state.ship.thrusting);

        let before = state.ship.vel.length();
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.ship.vel.length() < before);
        assert!(!state.ship.thrusting);
    }

    #[test]
    fn test_fire_spawns_bullet_and_recoils() {
        let mut state = quiet_state(3);
        let center = state.ship.pos;
        tick(&mut state, &hold(false, false, false, true), SIM_DT);

        assert_eq!(state.bullets.len(), 1);
        let bullet = &state.bullets[0];
        // Muzzle offset plus this frame's travel
        assert!((bullet.pos - (center + Vec2::new(0.0, 15.0 + 8.0))).length() < 1e-3);
        assert!((bullet.vel - Vec2::new(0.0, 8.0)).length() < 1e-5);
        assert!((bullet.ttl - (2.0 - SIM_DT)).abs() < 1e-5);
        assert_eq!(bullet.spawn, state.now);
        assert!((state.ship.vel.y + 0.7).abs() < 1e-5);
        assert!(state.events.contains(&GameEvent::ShipFired));
        // Own muzzle does not kill
        assert!(state.ship.is_alive());
    }

    #[test]
    fn test_screen_wrap_every_edge() {
        let arena = Vec2::new(768.0, 576.0);
        let cases = [
            (Vec2::new(-0.5, 100.0), Vec2::new(arena.x, 100.0)),
            (Vec2::new(arena.x + 0.5, 100.0), Vec2::new(0.0, 100.0)),
            (Vec2::new(100.0, -0.5), Vec2::new(100.0, arena.y)),
            (Vec2::new(100.0, arena.y + 0.5), Vec2::new(100.0, 0.0)),
        ];
        for (start, expected) in cases {
            let mut state = quiet_state(4);
            state.asteroids[0].pos = start;
            tick(&mut state, &TickInput::default(), SIM_DT);
            assert_eq!(state.asteroids[0].pos, expected);
        }
    }

    #[test]
    fn test_ship_wraps() {
        let mut state = quiet_state(5);
        state.ship.pos = Vec2::new(-1.0, 300.0);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.ship.pos.x, state.tuning.arena_width);
    }

    #[test]
    fn test_bullet_wraps_and_expires() {
        let mut state = quiet_state(6);
        state
            .bullets
            .push(Bullet::new(Vec2::new(1.0, 200.0), Vec2::new(-4.0, 0.0), 0.25, 0.0));

        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].pos.x, state.tuning.arena_width);

        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.bullets.len(), 1);
        tick(&mut state, &TickInput::default(), 0.1);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_particles_expire() {
        let mut state = quiet_state(7);
        // Second rock keeps the field from respawning
        state.asteroids.push(Asteroid::new(
            Vec2::new(700.0, 500.0),
            Vec2::ZERO,
            AsteroidSize::Small,
            2,
        ));
        state.bullets.push(Bullet::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, -1.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.particles.len(), 10);

        for _ in 0..70 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_alien_fires_at_ship() {
        let mut state = quiet_state(8);
        let alien_pos = Vec2::new(100.0, state.ship.pos.y);
        state.aliens.push(Alien {
            pos: alien_pos,
            dir: Vec2::ZERO,
            size: AlienSize::Huge,
            last_dir_change: 0.0,
            last_shot: 0.0,
            remove: false,
        });

        // Not yet: shot interval is 1.25s
        tick(&mut state, &TickInput::default(), 1.0);
        assert!(state.bullets.is_empty());
        assert!(state.aliens[0].dir.length() > 0.99);

        state.aliens[0].pos = alien_pos;
        state.aliens[0].dir = Vec2::ZERO;
        state.aliens[0].last_dir_change = state.now;
        tick(&mut state, &TickInput::default(), 0.5);
        assert_eq!(state.bullets.len(), 1);
        let bullet = &state.bullets[0];
        assert!(bullet.vel.x > 5.99 && bullet.vel.y.abs() < 1e-4);
        // Moved one step on its spawn frame, same as a ship bullet
        assert!(bullet.pos.distance(state.aliens[0].pos + bullet.vel) < 1e-4);
        assert!((bullet.ttl - (state.tuning.bullet_ttl - 0.5)).abs() < 1e-5);
        assert_eq!(state.aliens[0].last_shot, state.now);
        assert!(state.events.contains(&GameEvent::AlienFired { size: AlienSize::Huge }));
    }

    #[test]
    fn test_dead_ship_frozen() {
        let mut state = quiet_state(9);
        state.ship.vel = Vec2::new(3.0, 0.0);
        state.ship.kill(0.0);
        let pos = state.ship.pos;
        tick(&mut state, &hold(false, true, true, true), SIM_DT);
        assert_eq!(state.ship.pos, pos);
        assert!(state.bullets.is_empty());
        assert_eq!(state.phase, GamePhase::ShipDead);
    }

    #[test]
    fn test_respawn_after_delay() {
        let mut state = quiet_state(10);
        state.ship.kill(0.0);

        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::ShipDead);
        assert_eq!(state.lives, 3);

        tick(&mut state, &TickInput::default(), 1.5);
        assert!(state.ship.is_alive());
        assert_eq!(state.ship.pos, state.tuning.arena_center());
        assert_eq!(state.ship.vel, Vec2::ZERO);
        assert_eq!(state.lives, 2);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.aliens.len(), 1);
        assert_eq!(state.aliens[0].size, AlienSize::Huge);
        assert!(state.events.contains(&GameEvent::ShipRespawned { lives: 2 }));
    }

    #[test]
    fn test_last_life_resets_next_tick() {
        let mut state = quiet_state(11);
        state.lives = 1;
        state.score = 1234;
        state.ship.kill(0.0);

        tick(&mut state, &TickInput::default(), 2.5);
        assert!(state.reset_pending);
        assert_eq!(state.phase, GamePhase::GameOver);
        // Nothing reset yet
        assert_eq!(state.score, 1234);
        assert!(!state.ship.is_alive());
        assert!(state.events.contains(&GameEvent::GameOver { score: 1234 }));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(!state.reset_pending);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3);
        assert_eq!(state.asteroids.len(), 20);
        assert!(state.ship.is_alive());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::GameReset));
    }

    #[test]
    fn test_score_threshold_spawns() {
        let mut state = quiet_state(12);
        state.score = 4900;
        // Small rock worth 100 lands exactly on 5000
        state.bullets.push(Bullet::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, -1.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 5000);
        assert_eq!(state.aliens.len(), 1);
        assert_eq!(state.aliens[0].size, AlienSize::Huge);

        // Score unchanged: no more spawns
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.aliens.len(), 1);
    }

    #[test]
    fn test_zero_score_step_spawns_nothing() {
        let mut state = quiet_state(12);
        state.tuning.huge_alien_score_step = 0;
        state.tuning.tiny_alien_score_step = 0;
        state.score = 4900;
        state.bullets.push(Bullet::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, -1.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 5000);
        assert!(state.aliens.is_empty());
    }

    #[test]
    fn test_forty_thousand_spawns_both() {
        let mut state = quiet_state(13);
        state.score = 39_900;
        state.bullets.push(Bullet::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, -1.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 40_000);
        let sizes: Vec<AlienSize> = state.aliens.iter().map(|a| a.size).collect();
        assert_eq!(sizes, vec![AlienSize::Huge, AlienSize::Tiny]);
    }

    #[test]
    fn test_jumping_over_threshold_does_not_spawn() {
        let mut state = quiet_state(14);
        state.score = 4980;
        // Big rock worth 20 and small worth 100 in the same frame: 4980 -> 5100
        state.asteroids.push(Asteroid::new(
            Vec2::new(400.0, 40.0),
            Vec2::ZERO,
            AsteroidSize::Big,
            2,
        ));
        state.bullets.push(Bullet::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, -1.0));
        state.bullets.push(Bullet::new(Vec2::new(400.0, 40.0), Vec2::ZERO, 2.0, -1.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 5100);
        assert!(state.aliens.is_empty());
    }

    #[test]
    fn test_empty_field_respawns() {
        let mut state = quiet_state(15);
        state.score = 4100;
        state.bullets.push(Bullet::new(Vec2::new(10.0, 10.0), Vec2::ZERO, 2.0, -1.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 4200);
        assert_eq!(state.asteroids.len(), 22);
        assert!(state.events.contains(&GameEvent::FieldSpawned { count: 22 }));
    }

    #[test]
    fn test_field_waits_for_aliens() {
        let mut state = quiet_state(16);
        state.asteroids.clear();
        state.spawn_alien(AlienSize::Tiny);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.asteroids.is_empty());
    }

    #[test]
    fn test_frame_rate_independent_movement() {
        let mut state = quiet_state(17);
        state.tuning.frame_rate_independent = true;
        state.asteroids[0].pos = Vec2::new(100.0, 100.0);
        state.asteroids[0].vel = Vec2::new(2.0, 0.0);
        tick(&mut state, &TickInput::default(), 1.0 / 30.0);
        assert!((state.asteroids[0].pos.x - 104.0).abs() < 1e-3);
    }

    /// Snapshot after every frame of a scripted run
    fn record(seed: u64, inputs: &[TickInput]) -> Vec<Snapshot> {
        let mut state = GameState::new(seed);
        inputs
            .iter()
            .map(|input| {
                tick(&mut state, input, SIM_DT);
                Snapshot::capture(&state)
            })
            .collect()
    }

    #[test]
    fn test_determinism() {
        let script: Vec<TickInput> = (0..600)
            .map(|i| hold(i % 90 < 30, i % 50 < 10, i % 7 < 4, i % 15 == 0))
            .collect();

        let a = record(99999, &script);
        let b = record(99999, &script);

        assert_eq!(a.len(), script.len());
        for (frame, (x, y)) in a.iter().zip(&b).enumerate() {
            assert_eq!(x, y, "runs diverged at frame {frame}");
        }

        // A different seed must actually change something
        let c = record(12345, &script);
        assert_ne!(a.last(), c.last());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_score_never_drops_within_a_life(seed in any::<u64>(), fire_every in 3usize..20) {
            let mut state = GameState::new(seed);
            let mut last = state.score;
            for i in 0..400 {
                let input = hold(false, i % 40 < 20, i % 11 == 0, i % fire_every == 0);
                tick(&mut state, &input, SIM_DT);
                if state.events.contains(&GameEvent::GameReset) {
                    last = state.score;
                    continue;
                }
                prop_assert!(state.score >= last);
                last = state.score;
                prop_assert!(state.ship.pos.is_finite());
            }
        }
    }
}
