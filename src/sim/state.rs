//! Run state and entity types
//!
//! Everything the engine mutates lives here; `Snapshot` is the read-only view
//! handed to renderers and input adapters.

use glam::Vec2;

use super::geometry::Aabb;
use crate::consts::*;

/// Engine-level run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    /// Simulation advancing
    #[default]
    Running,
    /// Collision happened; waiting for restart
    Over,
}

/// Obstacle speed boost earned through the combo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedTier {
    #[default]
    Normal,
    Boost,
    Super,
}

impl SpeedTier {
    /// Tier for a given consecutive-advance count
    pub fn for_combo(count: u32) -> Self {
        if count > COMBO_SUPER_THRESHOLD {
            SpeedTier::Super
        } else if count > COMBO_BOOST_THRESHOLD {
            SpeedTier::Boost
        } else {
            SpeedTier::Normal
        }
    }

    pub fn multiplier(&self) -> f32 {
        match self {
            SpeedTier::Normal => 1.0,
            SpeedTier::Boost => 1.5,
            SpeedTier::Super => 2.0,
        }
    }

    /// HUD label, if any
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SpeedTier::Normal => None,
            SpeedTier::Boost => Some("Speed Boost!"),
            SpeedTier::Super => Some("SUPER SPEED!"),
        }
    }
}

/// Consecutive forward inputs inside a trailing window of simulation time
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Combo {
    pub count: u32,
    /// Simulation clock (ms) of the latest advance
    pub last_advance_ms: Option<f32>,
}

impl Combo {
    /// Count one advance at `now_ms`, restarting the window
    pub fn register(&mut self, now_ms: f32) {
        self.count += 1;
        self.last_advance_ms = Some(now_ms);
    }

    /// Reset if the window has run out; returns true when it lapsed
    pub fn lapse_if_expired(&mut self, now_ms: f32) -> bool {
        match self.last_advance_ms {
            Some(last) if now_ms - last >= COMBO_WINDOW_MS => {
                *self = Combo::default();
                true
            }
            _ => false,
        }
    }

    pub fn tier(&self) -> SpeedTier {
        SpeedTier::for_combo(self.count)
    }
}

/// The runner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    pub gravity: f32,
    pub jump_impulse: f32,
    pub is_jumping: bool,
}

impl Player {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Collision box, shrunk past the sprite's transparent margins
    pub fn hitbox(&self) -> Aabb {
        self.bounds()
            .inset(HITBOX_WIDTH_FRACTION, HITBOX_HEIGHT_FRACTION)
    }

    /// Integrate one step and rest on `ground_line`
    pub fn integrate(&mut self, dt: f32, ground_line: f32) {
        self.vel_y += self.gravity * dt;
        self.pos.y += self.vel_y * dt;
        if self.pos.y > ground_line {
            self.land(ground_line);
        }
    }

    pub fn land(&mut self, ground_line: f32) {
        self.pos.y = ground_line;
        self.vel_y = 0.0;
        self.is_jumping = false;
    }
}

/// The "404" block running at the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Immutable point-in-time copy of everything a renderer needs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub player: Player,
    pub player_hitbox: Aabb,
    pub obstacle: Obstacle,
    pub score: u32,
    pub phase: RunPhase,
    pub combo_count: u32,
    pub speed_tier: SpeedTier,
    pub speed_multiplier: f32,
    pub debug_mode: bool,
    /// Resting y of the player's top edge
    pub ground_line: f32,
    /// Visual floor where the obstacle sits
    pub horizon_y: f32,
    pub field_size: Vec2,
}

impl Snapshot {
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == RunPhase::Over
    }
}
