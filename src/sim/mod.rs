//! Runner simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Time arrives as `dt` in engine units, never from a wall clock
//! - Device differences are fixed at construction (`DeviceProfile`)
//! - No rendering or browser dependencies

pub mod config;
pub mod engine;
pub mod geometry;
pub mod state;

pub use config::{DeviceProfile, EngineConfig, ForwardControl, GameOverHook, Tuning};
pub use engine::Engine;
pub use geometry::Aabb;
pub use state::{Combo, Obstacle, Player, RunPhase, Snapshot, SpeedTier};
