//! Echo Runner - the endless-runner mini-game behind the portfolio centerpiece
//!
//! Core modules:
//! - `sim`: Simulation engine (physics, obstacle recycling, combo, collisions)
//! - `renderer`: WebGPU rendering of engine snapshots
//! - `platform`: Device adapters (frame clock, input mapping, sizing, assets)
//! - `settings`: Persisted player preferences

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{DeviceProfile, Engine, EngineConfig, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Milliseconds represented by one engine time unit (one 60 Hz frame)
    pub const FRAME_MS: f32 = 16.67;
    /// Largest frame gap the adapter forwards, in engine units (~100 ms)
    pub const MAX_FRAME_DELTA: f32 = 6.0;

    /// Horizon sits this far down the play field
    pub const GROUND_FRACTION: f32 = 0.85;

    /// Combo lapses after this much simulation time without an advance
    pub const COMBO_WINDOW_MS: f32 = 1000.0;
    /// Combo counts strictly above these thresholds unlock speed tiers
    pub const COMBO_BOOST_THRESHOLD: u32 = 10;
    pub const COMBO_SUPER_THRESHOLD: u32 = 20;

    /// Player hitbox inset (fraction of sprite bounds kept)
    pub const HITBOX_WIDTH_FRACTION: f32 = 0.7;
    pub const HITBOX_HEIGHT_FRACTION: f32 = 0.8;

    /// Forward movement never carries the player past this fraction of the field
    pub const FORWARD_LIMIT_FRACTION: f32 = 1.0 / 3.0;

    /// Desktop tuning
    pub const DESKTOP_PLAYER_SIZE: f32 = 72.0;
    pub const DESKTOP_PLAYER_X: f32 = 50.0;
    pub const DESKTOP_GRAVITY: f32 = 1.5;
    pub const DESKTOP_JUMP_IMPULSE: f32 = -20.0;
    pub const DESKTOP_GROUND_OFFSET: f32 = 65.0;
    pub const DESKTOP_OBSTACLE_SIZE: f32 = 25.0;
    pub const DESKTOP_OBSTACLE_SPEED: f32 = 3.5;
    pub const DESKTOP_ADVANCE_STEP: f32 = 15.0;

    /// Mobile tuning
    pub const MOBILE_MAX_PLAYER_SIZE: f32 = 60.0;
    pub const MOBILE_GRAVITY: f32 = 0.7;
    pub const MOBILE_JUMP_IMPULSE: f32 = -12.0;
    pub const MOBILE_GROUND_OFFSET: f32 = 60.0;
    pub const MOBILE_MAX_OBSTACLE_SIZE: f32 = 25.0;
    pub const MOBILE_OBSTACLE_SPEED: f32 = 3.0;
    pub const MOBILE_DRIFT_RATE: f32 = 0.5;

    /// Desktop canvas is fixed; touch canvas follows the viewport minus chrome
    pub const DESKTOP_CANVAS_WIDTH: u32 = 600;
    pub const DESKTOP_CANVAS_HEIGHT: u32 = 300;
    pub const TOUCH_CHROME_HEIGHT: u32 = 100;

    /// Obstacle counts as gone once its right edge is this close to x = 0
    pub const RECYCLE_EPSILON: f64 = 1e-3;

    /// Give up waiting for the sprite after this long and play with the placeholder
    pub const ASSET_TIMEOUT_MS: f64 = 2000.0;
}

/// Horizon y-coordinate for a play field of the given height
#[inline]
pub fn horizon_for_height(height: f32) -> f32 {
    (height * consts::GROUND_FRACTION).floor()
}
