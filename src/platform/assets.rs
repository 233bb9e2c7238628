//! Sprite loading state
//!
//! The sprite never blocks play: a failed or slow load falls back to the
//! placeholder rectangle.

use crate::consts::ASSET_TIMEOUT_MS;

/// Where the player sprite is at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteStatus {
    Loading,
    Ready,
    Failed,
    /// Still loading, but we stopped waiting
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct SpriteLoad {
    status: SpriteStatus,
    started_ms: f64,
}

impl SpriteLoad {
    pub fn new(started_ms: f64) -> Self {
        Self {
            status: SpriteStatus::Loading,
            started_ms,
        }
    }

    pub fn status(&self) -> SpriteStatus {
        self.status
    }

    /// A sprite arriving late still replaces the placeholder
    pub fn on_loaded(&mut self) {
        if self.status != SpriteStatus::Ready {
            log::info!("Player sprite loaded");
        }
        self.status = SpriteStatus::Ready;
    }

    pub fn on_error(&mut self) {
        if self.status != SpriteStatus::Ready {
            log::error!("Failed to load player sprite, using placeholder");
            self.status = SpriteStatus::Failed;
        }
    }

    /// Apply the loading timeout
    pub fn poll(&mut self, now_ms: f64) -> SpriteStatus {
        if self.status == SpriteStatus::Loading && now_ms - self.started_ms >= ASSET_TIMEOUT_MS {
            log::warn!("Asset loading timeout reached, proceeding with placeholder");
            self.status = SpriteStatus::TimedOut;
        }
        self.status
    }

    /// True once the game may start
    pub fn is_settled(&self) -> bool {
        self.status != SpriteStatus::Loading
    }

    pub fn has_sprite(&self) -> bool {
        self.status == SpriteStatus::Ready
    }

    /// Text for the loading screen
    pub fn message(&self) -> &'static str {
        match self.status {
            SpriteStatus::Loading => "Loading assets...",
            SpriteStatus::Failed => "Error loading dog sprite. Using fallback.",
            SpriteStatus::TimedOut => "Assets are slow to arrive. Using fallback.",
            SpriteStatus::Ready => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_success() {
        let mut load = SpriteLoad::new(0.0);
        assert!(!load.is_settled());
        assert_eq!(load.message(), "Loading assets...");

        load.on_loaded();
        assert!(load.is_settled());
        assert!(load.has_sprite());
        assert_eq!(load.poll(10_000.0), SpriteStatus::Ready);
    }

    #[test]
    fn test_failure_falls_back() {
        let mut load = SpriteLoad::new(0.0);
        load.on_error();
        assert!(load.is_settled());
        assert!(!load.has_sprite());
        assert_eq!(load.status(), SpriteStatus::Failed);
    }

    #[test]
    fn test_timeout_unblocks_then_late_sprite_wins() {
        let mut load = SpriteLoad::new(500.0);
        assert_eq!(load.poll(2499.0), SpriteStatus::Loading);
        assert_eq!(load.poll(2500.0), SpriteStatus::TimedOut);
        assert!(load.is_settled());
        assert!(!load.has_sprite());

        load.on_loaded();
        assert!(load.has_sprite());
    }

    #[test]
    fn test_error_after_success_is_ignored() {
        let mut load = SpriteLoad::new(0.0);
        load.on_loaded();
        load.on_error();
        assert!(load.has_sprite());
    }
}
