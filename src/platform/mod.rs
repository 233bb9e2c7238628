//! Platform abstraction layer
//!
//! Browser-independent half of the presentation adapter:
//! - Frame timing and loop lifetime
//! - Keyboard/tap mapping to engine commands
//! - Canvas sizing per device
//! - Sprite loading state

pub mod adapter;
pub mod assets;
pub mod frame;
pub mod input;
pub mod viewport;

pub use adapter::{Adapter, AdapterEvent, Variant};
pub use assets::{SpriteLoad, SpriteStatus};
pub use frame::{FrameClock, LoopControl};
pub use input::Command;
pub use viewport::SizingPolicy;
