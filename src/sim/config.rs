//! Engine construction parameters
//!
//! The desktop/mobile split is decided once, here. The engine itself only
//! sees a `Tuning` and a `ForwardControl` strategy.

use crate::consts::*;

/// Which device the game was opened on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceProfile {
    /// Keyboard-driven, fixed canvas
    #[default]
    Desktop,
    /// Tap-driven, canvas follows the viewport
    Mobile,
}

impl DeviceProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceProfile::Desktop => "desktop",
            DeviceProfile::Mobile => "mobile",
        }
    }

    /// Default tuning for this device at the given canvas width
    pub fn tuning(&self, canvas_width: f32) -> Tuning {
        match self {
            DeviceProfile::Desktop => Tuning {
                player_size: DESKTOP_PLAYER_SIZE,
                player_start_x: DESKTOP_PLAYER_X,
                gravity: DESKTOP_GRAVITY,
                jump_impulse: DESKTOP_JUMP_IMPULSE,
                ground_offset: DESKTOP_GROUND_OFFSET,
                obstacle_size: DESKTOP_OBSTACLE_SIZE,
                obstacle_speed: DESKTOP_OBSTACLE_SPEED,
                forward: ForwardControl::Discrete {
                    step: DESKTOP_ADVANCE_STEP,
                },
            },
            DeviceProfile::Mobile => Tuning {
                player_size: MOBILE_MAX_PLAYER_SIZE.min(canvas_width / 8.0),
                player_start_x: canvas_width / 6.0,
                gravity: MOBILE_GRAVITY,
                jump_impulse: MOBILE_JUMP_IMPULSE,
                ground_offset: MOBILE_GROUND_OFFSET,
                obstacle_size: MOBILE_MAX_OBSTACLE_SIZE.min(canvas_width / 20.0),
                obstacle_speed: MOBILE_OBSTACLE_SPEED,
                forward: ForwardControl::AutoDrift {
                    rate: MOBILE_DRIFT_RATE,
                },
            },
        }
    }
}

/// How the player moves forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForwardControl {
    /// Each `advance()` steps forward and feeds the combo
    Discrete { step: f32 },
    /// Constant drift applied by `update()`; `advance()` is ignored
    AutoDrift { rate: f32 },
}

/// Device-derived geometry and physics constants
///
/// Fixed for the lifetime of an engine; `restart()` keeps them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Player sprite is square
    pub player_size: f32,
    pub player_start_x: f32,
    /// Downward acceleration per engine unit
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative = up)
    pub jump_impulse: f32,
    /// Ground line sits this far above the horizon
    pub ground_offset: f32,
    /// Obstacle is square
    pub obstacle_size: f32,
    /// Leftward obstacle speed per engine unit, before the combo multiplier
    pub obstacle_speed: f32,
    pub forward: ForwardControl,
}

/// Callback fired once per run with the final score
pub type GameOverHook = Box<dyn FnMut(u32)>;

/// Everything needed to build an `Engine`
pub struct EngineConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub profile: DeviceProfile,
    pub tuning: Tuning,
    pub on_game_over: Option<GameOverHook>,
}

impl EngineConfig {
    pub fn new(canvas_width: f32, canvas_height: f32, profile: DeviceProfile) -> Self {
        Self {
            canvas_width,
            canvas_height,
            profile,
            tuning: profile.tuning(canvas_width),
            on_game_over: None,
        }
    }

    pub fn desktop() -> Self {
        Self::new(
            DESKTOP_CANVAS_WIDTH as f32,
            DESKTOP_CANVAS_HEIGHT as f32,
            DeviceProfile::Desktop,
        )
    }

    /// Replace the profile defaults
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn on_game_over(mut self, hook: impl FnMut(u32) + 'static) -> Self {
        self.on_game_over = Some(Box::new(hook));
        self
    }
}
