//! Variable-timestep runner simulation
//!
//! One `update(dt)` per display frame, with `dt` in engine units
//! (1.0 = one 60 Hz frame). Commands mutate state synchronously; renderers
//! only ever see `Snapshot` copies.

use glam::Vec2;

use super::config::{EngineConfig, ForwardControl, GameOverHook, Tuning};
use super::state::{Combo, Obstacle, Player, RunPhase, Snapshot};
use super::DeviceProfile;
use crate::consts::*;
use crate::horizon_for_height;

/// Authoritative game state for one runner
pub struct Engine {
    profile: DeviceProfile,
    tuning: Tuning,
    field: Vec2,
    /// Resting y of the player's top edge
    ground_line: f32,
    /// Visual floor; the obstacle's bottom edge
    horizon_y: f32,
    player: Player,
    obstacle: Obstacle,
    /// Obstacle x kept in f64 so long runs of small steps recycle on time
    obstacle_x: f64,
    score: u32,
    phase: RunPhase,
    combo: Combo,
    debug_mode: bool,
    /// Accumulated simulation time in ms (combo window time base)
    clock_ms: f32,
    on_game_over: Option<GameOverHook>,
}

impl Engine {
    /// Build an engine with a fresh running run
    pub fn new(config: EngineConfig) -> Self {
        let field = Vec2::new(config.canvas_width, config.canvas_height);
        let horizon_y = horizon_for_height(field.y);
        let mut engine = Self {
            profile: config.profile,
            tuning: config.tuning,
            field,
            ground_line: horizon_y - config.tuning.ground_offset,
            horizon_y,
            player: Player {
                pos: Vec2::ZERO,
                vel_y: 0.0,
                size: Vec2::splat(config.tuning.player_size),
                gravity: config.tuning.gravity,
                jump_impulse: config.tuning.jump_impulse,
                is_jumping: false,
            },
            obstacle: Obstacle {
                pos: Vec2::ZERO,
                size: Vec2::splat(config.tuning.obstacle_size),
                speed: config.tuning.obstacle_speed,
            },
            obstacle_x: 0.0,
            score: 0,
            phase: RunPhase::Running,
            combo: Combo::default(),
            debug_mode: false,
            clock_ms: 0.0,
            on_game_over: config.on_game_over,
        };
        engine.reset_run();

        log::info!(
            "Engine created ({}, {}x{}, ground line {})",
            engine.profile.as_str(),
            field.x,
            field.y,
            engine.ground_line
        );
        engine
    }

    pub fn profile(&self) -> DeviceProfile {
        self.profile
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn ground_line(&self) -> f32 {
        self.ground_line
    }

    pub fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Advance the run by `dt` engine units. No-op once the run is over.
    pub fn update(&mut self, dt: f32) {
        if self.phase != RunPhase::Running {
            return;
        }
        // Also maps NaN to zero
        let dt = dt.max(0.0);
        self.clock_ms += dt * FRAME_MS;

        if self.combo.lapse_if_expired(self.clock_ms) {
            log::debug!("Combo lapsed, speed back to normal");
        }

        self.player.integrate(dt, self.ground_line);

        let multiplier = self.combo.tier().multiplier();
        self.obstacle_x -= f64::from(self.obstacle.speed * multiplier * dt);
        self.obstacle.pos.x = self.obstacle_x as f32;
        if self.obstacle_x + f64::from(self.obstacle.size.x) <= RECYCLE_EPSILON {
            self.recycle_obstacle();
            if self.phase != RunPhase::Over {
                self.score += 1;
            }
        }

        if let ForwardControl::AutoDrift { rate } = self.tuning.forward {
            self.player.pos.x = (self.player.pos.x + rate * dt).min(self.forward_limit());
        }

        self.check_collision();
    }

    /// Start a jump if standing and the run is live
    pub fn jump(&mut self) {
        if self.player.is_jumping || self.phase == RunPhase::Over {
            log::trace!("Jump ignored");
            return;
        }
        self.player.vel_y = self.player.jump_impulse;
        self.player.is_jumping = true;
    }

    /// Step forward and feed the combo (keyboard devices only)
    pub fn advance(&mut self) {
        if self.phase == RunPhase::Over {
            return;
        }
        match self.tuning.forward {
            ForwardControl::Discrete { step } => {
                let before = self.combo.tier();
                self.combo.register(self.clock_ms);
                // Same cap as the touch drift, so dashing cannot reach the spawn point
                self.player.pos.x = (self.player.pos.x + step).min(self.forward_limit());

                let after = self.combo.tier();
                if after != before {
                    log::debug!(
                        "Combo {} -> speed x{:.1}",
                        self.combo.count,
                        after.multiplier()
                    );
                }
            }
            ForwardControl::AutoDrift { .. } => {
                log::trace!("Advance ignored: forward motion is automatic");
            }
        }
    }

    /// Fresh run with the same geometry; debug mode is kept
    pub fn restart(&mut self) {
        self.reset_run();
        log::info!("Run restarted");
    }

    /// Adopt new play-field dimensions. Callers reject non-positive sizes.
    pub fn resize(&mut self, width: f32, height: f32) {
        let old_height = self.field.y;
        let height_above_ground = self.ground_line - self.player.pos.y;

        self.field = Vec2::new(width, height);
        self.horizon_y = horizon_for_height(height);
        self.ground_line = self.horizon_y - self.tuning.ground_offset;

        let scale = if old_height > 0.0 { height / old_height } else { 1.0 };
        self.player.pos.y = self.ground_line - height_above_ground * scale;
        if self.player.pos.y > self.ground_line {
            self.player.land(self.ground_line);
        }
        self.player.pos.x = self.player.pos.x.min(self.forward_limit());

        self.obstacle.pos.y = self.horizon_y - self.obstacle.size.y;

        log::debug!(
            "Resized to {}x{} (ground line {})",
            width,
            height,
            self.ground_line
        );
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_mode = enabled;
    }

    /// Flip debug mode, returning the new value
    pub fn toggle_debug_mode(&mut self) -> bool {
        self.debug_mode = !self.debug_mode;
        self.debug_mode
    }

    pub fn snapshot(&self) -> Snapshot {
        let speed_tier = self.combo.tier();
        Snapshot {
            player: self.player,
            player_hitbox: self.player.hitbox(),
            obstacle: self.obstacle,
            score: self.score,
            phase: self.phase,
            combo_count: self.combo.count,
            speed_tier,
            speed_multiplier: speed_tier.multiplier(),
            debug_mode: self.debug_mode,
            ground_line: self.ground_line,
            horizon_y: self.horizon_y,
            field_size: self.field,
        }
    }

    /// Rightmost x forward motion may reach
    fn forward_limit(&self) -> f32 {
        (self.field.x * FORWARD_LIMIT_FRACTION).max(self.tuning.player_start_x)
    }

    fn reset_run(&mut self) {
        self.player.pos = Vec2::new(self.tuning.player_start_x, self.ground_line);
        self.player.vel_y = 0.0;
        self.player.is_jumping = false;
        self.recycle_obstacle();
        self.score = 0;
        self.phase = RunPhase::Running;
        self.combo = Combo::default();
        self.clock_ms = 0.0;
    }

    fn recycle_obstacle(&mut self) {
        self.obstacle.pos = Vec2::new(self.field.x, self.horizon_y - self.obstacle.size.y);
        self.obstacle_x = f64::from(self.field.x);
    }

    fn check_collision(&mut self) {
        if self.phase == RunPhase::Over {
            return;
        }
        let hitbox = self.player.hitbox();
        let obstacle = self.obstacle.bounds();
        if !hitbox.intersects(&obstacle) {
            return;
        }

        if self.debug_mode {
            log::info!("Collision: player {:?} obstacle {:?}", hitbox, obstacle);
        }
        self.phase = RunPhase::Over;
        log::info!("Game over, final score {}", self.score);
        if let Some(hook) = self.on_game_over.as_mut() {
            hook(self.score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SpeedTier;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn desktop() -> Engine {
        Engine::new(EngineConfig::desktop())
    }

    fn counting_engine() -> (Engine, Rc<Cell<u32>>, Rc<Cell<Option<u32>>>) {
        let calls = Rc::new(Cell::new(0));
        let last = Rc::new(Cell::new(None));
        let (c, l) = (calls.clone(), last.clone());
        let engine = Engine::new(EngineConfig::desktop().on_game_over(move |score| {
            c.set(c.get() + 1);
            l.set(Some(score));
        }));
        (engine, calls, last)
    }

    fn place_obstacle(engine: &mut Engine, x: f32) {
        engine.obstacle.pos.x = x;
        engine.obstacle_x = f64::from(x);
    }

    /// Lift the player far above the obstacle and switch off gravity
    fn park_player_out_of_reach(engine: &mut Engine) {
        engine.player.gravity = 0.0;
        engine.player.vel_y = 0.0;
        engine.player.pos.y = -1000.0;
        engine.player.is_jumping = true;
    }

    fn run_until_over(engine: &mut Engine) -> usize {
        for step in 0..2000 {
            if engine.phase() == RunPhase::Over {
                return step;
            }
            engine.update(1.0);
        }
        panic!("runner never hit the obstacle");
    }

    #[test]
    fn test_initial_state() {
        let engine = desktop();
        let snap = engine.snapshot();

        assert!(snap.is_running());
        assert!(!snap.is_over());
        assert_eq!(snap.score, 0);
        assert_eq!(snap.horizon_y, 255.0);
        assert_eq!(snap.ground_line, 190.0);
        assert_eq!(snap.player.pos, Vec2::new(50.0, 190.0));
        assert_eq!(snap.obstacle.pos, Vec2::new(600.0, 230.0));
        assert_eq!(snap.speed_multiplier, 1.0);
    }

    #[test]
    fn test_game_over_fires_once() {
        let (mut engine, calls, last) = counting_engine();
        run_until_over(&mut engine);

        let snap = engine.snapshot();
        assert!(snap.is_over());
        assert!(!snap.is_running());
        assert_eq!(calls.get(), 1);
        assert_eq!(last.get(), Some(0));

        let score = snap.score;
        let obstacle_x = snap.obstacle.pos.x;
        for _ in 0..10 {
            engine.update(1.0);
        }
        assert_eq!(engine.score(), score);
        assert_eq!(engine.snapshot().obstacle.pos.x, obstacle_x);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_restart_round_trip() {
        let (mut engine, calls, _) = counting_engine();
        engine.set_debug_mode(true);
        for _ in 0..12 {
            engine.advance();
        }
        engine.jump();
        run_until_over(&mut engine);

        engine.restart();
        let snap = engine.snapshot();
        assert!(snap.is_running());
        assert!(!snap.is_over());
        assert_eq!(snap.score, 0);
        assert_eq!(snap.combo_count, 0);
        assert_eq!(snap.speed_multiplier, 1.0);
        assert_eq!(snap.player.pos, Vec2::new(50.0, snap.ground_line));
        assert_eq!(snap.player.vel_y, 0.0);
        assert!(!snap.player.is_jumping);
        assert_eq!(snap.obstacle.pos.x, 600.0);
        assert!(snap.debug_mode, "debug mode survives restart");

        // A new run gets its own notification
        run_until_over(&mut engine);
        assert_eq!(calls.get(), 2);
    }

    fn assert_recycles_after_expected_steps(mut engine: Engine, delta_step: f32) {
        park_player_out_of_reach(&mut engine);

        let snap = engine.snapshot();
        let width = snap.field_size.x;
        let obstacle = snap.obstacle;
        let steps = ((width + obstacle.size.x) / (obstacle.speed * delta_step)).ceil() as usize;

        for _ in 0..steps - 1 {
            engine.update(delta_step);
        }
        assert_eq!(engine.score(), 0, "width {width}, step {delta_step}");

        engine.update(delta_step);
        let snap = engine.snapshot();
        assert_eq!(snap.score, 1, "width {width}, step {delta_step}");
        assert_eq!(snap.obstacle.pos.x, width);
        assert_eq!(snap.obstacle.pos.y, snap.horizon_y - snap.obstacle.size.y);
    }

    #[test]
    fn test_obstacle_recycles_after_expected_steps() {
        for delta_step in [1.0f32, 0.5, 1.3, 0.25, 0.1] {
            assert_recycles_after_expected_steps(desktop(), delta_step);
        }
    }

    #[test]
    fn test_obstacle_recycles_on_time_with_fine_steps_on_a_small_field() {
        let tuning = Tuning {
            obstacle_size: 20.0,
            obstacle_speed: 3.0,
            ..DeviceProfile::Desktop.tuning(400.0)
        };
        for delta_step in [1.0f32, 0.25, 0.1] {
            let config = EngineConfig::new(400.0, 200.0, DeviceProfile::Desktop).with_tuning(tuning);
            assert_recycles_after_expected_steps(Engine::new(config), delta_step);
        }
    }

    #[test]
    fn test_combo_thresholds_and_lapse() {
        let mut engine = desktop();
        park_player_out_of_reach(&mut engine);

        for _ in 0..11 {
            engine.advance();
        }
        assert_eq!(engine.snapshot().speed_multiplier, 1.5);

        for _ in 0..10 {
            engine.advance();
        }
        let snap = engine.snapshot();
        assert_eq!(snap.combo_count, 21);
        assert_eq!(snap.speed_multiplier, 2.0);
        assert_eq!(snap.speed_tier, SpeedTier::Super);

        // Just inside the window nothing changes
        for _ in 0..59 {
            engine.update(1.0);
        }
        assert_eq!(engine.snapshot().combo_count, 21);

        engine.update(1.0);
        let snap = engine.snapshot();
        assert_eq!(snap.combo_count, 0);
        assert_eq!(snap.speed_multiplier, 1.0);
    }

    #[test]
    fn test_boost_speeds_up_obstacle() {
        let mut engine = desktop();
        park_player_out_of_reach(&mut engine);
        for _ in 0..11 {
            engine.advance();
        }
        engine.update(1.0);
        assert!((engine.snapshot().obstacle.pos.x - (600.0 - 3.5 * 1.5)).abs() < 1e-4);
    }

    #[test]
    fn test_advance_moves_forward_until_limit() {
        let mut engine = desktop();
        engine.advance();
        assert_eq!(engine.snapshot().player.pos.x, 65.0);
        for _ in 0..30 {
            engine.advance();
        }
        assert_eq!(engine.snapshot().player.pos.x, 200.0);
    }

    #[test]
    fn test_commands_ignored_when_over() {
        let mut engine = desktop();
        run_until_over(&mut engine);
        let before = engine.snapshot();

        engine.jump();
        engine.advance();
        let after = engine.snapshot();
        assert_eq!(after.player, before.player);
        assert_eq!(after.combo_count, before.combo_count);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut engine = desktop();
        engine.jump();
        let snap = engine.snapshot();
        assert_eq!(snap.player.vel_y, -20.0);
        assert!(snap.player.is_jumping);

        engine.update(1.0);
        let vel = engine.snapshot().player.vel_y;
        engine.jump();
        assert_eq!(engine.snapshot().player.vel_y, vel);
    }

    #[test]
    fn test_jump_clears_the_obstacle() {
        let mut engine = desktop();
        // Obstacle overlaps the hitbox horizontally during frames 140..=160
        for _ in 0..137 {
            engine.update(1.0);
        }
        engine.jump();
        for _ in 0..60 {
            engine.update(1.0);
        }
        let snap = engine.snapshot();
        assert!(snap.is_running());
        assert_eq!(snap.score, 1);
    }

    #[test]
    fn test_collision_boundary_is_open() {
        let mut engine = desktop();
        let hitbox = engine.snapshot().player_hitbox;

        place_obstacle(&mut engine, hitbox.right());
        engine.update(0.0);
        assert!(engine.snapshot().is_running(), "touching edges must not collide");

        place_obstacle(&mut engine, hitbox.right() - 1.0);
        engine.update(0.0);
        assert!(engine.snapshot().is_over());
    }

    #[test]
    fn test_resize_keeps_relative_height_mid_air() {
        let mut engine = desktop();
        engine.jump();
        for _ in 0..5 {
            engine.update(1.0);
        }
        let before = engine.snapshot();
        assert!(before.player.is_jumping);
        let ratio_before = (before.ground_line - before.player.pos.y) / before.field_size.y;

        engine.resize(800.0, 450.0);
        let after = engine.snapshot();
        let ratio_after = (after.ground_line - after.player.pos.y) / after.field_size.y;

        assert!((ratio_before - ratio_after).abs() < 1e-3);
        assert!(after.player.pos.y <= after.ground_line);
        assert!(after.player.is_jumping);
        assert_eq!(after.obstacle.pos.y, after.horizon_y - after.obstacle.size.y);
    }

    #[test]
    fn test_resize_on_ground_stays_on_ground() {
        let mut engine = desktop();
        engine.resize(600.0, 200.0);
        let snap = engine.snapshot();
        assert_eq!(snap.ground_line, 170.0 - 65.0);
        assert_eq!(snap.player.pos.y, snap.ground_line);
        assert!(!snap.player.is_jumping);
    }

    #[test]
    fn test_resize_lands_player_pushed_below_ground() {
        let mut engine = desktop();
        engine.jump();
        engine.update(1.0);
        let ground_line = engine.ground_line();
        engine.player.pos.y = ground_line + 5.0;
        assert!(engine.player.is_jumping);
        assert_ne!(engine.player.vel_y, 0.0);

        engine.resize(800.0, 400.0);
        let snap = engine.snapshot();
        assert_eq!(snap.player.pos.y, snap.ground_line);
        assert!(!snap.player.is_jumping);
        assert_eq!(snap.player.vel_y, 0.0);
    }

    #[test]
    fn test_overridden_tuning_drives_the_run() {
        let custom = Tuning {
            player_size: 40.0,
            gravity: 2.0,
            jump_impulse: -10.0,
            obstacle_size: 30.0,
            obstacle_speed: 5.0,
            ..DeviceProfile::Desktop.tuning(600.0)
        };
        let mut engine = Engine::new(EngineConfig::desktop().with_tuning(custom));
        assert_eq!(engine.tuning(), &custom);

        let snap = engine.snapshot();
        assert_eq!(snap.player.size, Vec2::splat(40.0));
        assert_eq!(snap.obstacle.size, Vec2::splat(30.0));
        assert_eq!(snap.obstacle.pos.y, snap.horizon_y - 30.0);
        assert_eq!(engine.ground_line(), snap.ground_line);
        assert_eq!(snap.player.pos.y, engine.ground_line());

        engine.jump();
        assert_eq!(engine.snapshot().player.vel_y, -10.0);
        engine.update(1.0);
        let snap = engine.snapshot();
        assert!(snap.player.pos.y < engine.ground_line());
        assert_eq!(snap.obstacle.pos.x, 595.0);

        assert!(!engine.debug_mode());
        engine.set_debug_mode(true);
        assert!(engine.debug_mode());
        engine.set_debug_mode(false);
        assert!(!engine.snapshot().debug_mode);
    }

    #[test]
    fn test_mobile_drifts_forward_and_ignores_advance() {
        let mut engine = Engine::new(EngineConfig::new(360.0, 540.0, DeviceProfile::Mobile));
        park_player_out_of_reach(&mut engine);
        let start_x = engine.snapshot().player.pos.x;
        assert_eq!(start_x, 60.0);

        engine.advance();
        assert_eq!(engine.snapshot().combo_count, 0);
        assert_eq!(engine.snapshot().player.pos.x, start_x);

        engine.update(2.0);
        assert!((engine.snapshot().player.pos.x - (start_x + 1.0)).abs() < 1e-4);

        for _ in 0..500 {
            engine.update(1.0);
        }
        assert_eq!(engine.snapshot().player.pos.x, 120.0);
    }

    #[test]
    fn test_debug_toggle_has_no_sim_effect() {
        let mut a = desktop();
        let mut b = desktop();
        assert!(b.toggle_debug_mode());
        for _ in 0..50 {
            a.update(1.0);
            b.update(1.0);
        }
        let (sa, sb) = (a.snapshot(), b.snapshot());
        assert_eq!(sa.player, sb.player);
        assert_eq!(sa.obstacle, sb.obstacle);
        assert!(!sa.debug_mode);
        assert!(sb.debug_mode);
    }

    proptest! {
        #[test]
        fn prop_player_never_below_ground(
            steps in prop::collection::vec((0.0f32..5.0, any::<bool>()), 1..300)
        ) {
            let mut engine = desktop();
            for (dt, jump) in steps {
                if jump {
                    engine.jump();
                }
                engine.update(dt);
                let snap = engine.snapshot();
                prop_assert!(snap.player.pos.y <= snap.ground_line);
                if !snap.player.is_jumping {
                    prop_assert_eq!(snap.player.vel_y, 0.0);
                }
            }
        }

        #[test]
        fn prop_resize_never_below_ground(
            airtime in 0usize..40,
            width in 100.0f32..2000.0,
            height in 100.0f32..2000.0,
        ) {
            let mut engine = desktop();
            engine.jump();
            for _ in 0..airtime {
                engine.update(1.0);
            }
            engine.resize(width, height);
            let snap = engine.snapshot();
            prop_assert!(snap.player.pos.y <= snap.ground_line);
        }

        #[test]
        fn prop_restart_resets_everything(
            ops in prop::collection::vec(0u8..4, 0..200)
        ) {
            let mut engine = desktop();
            for op in ops {
                match op {
                    0 => engine.jump(),
                    1 => engine.advance(),
                    2 => engine.update(1.5),
                    _ => engine.resize(640.0, 320.0),
                }
            }
            engine.restart();
            let snap = engine.snapshot();
            prop_assert_eq!(snap.score, 0);
            prop_assert!(snap.is_running() && !snap.is_over());
            prop_assert_eq!(snap.player.pos, Vec2::new(50.0, snap.ground_line));
            prop_assert_eq!(snap.obstacle.pos.x, snap.field_size.x);
        }
    }
}
