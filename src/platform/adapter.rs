//! Presentation adapter
//!
//! Owns one engine and bridges device clocks, keys, taps and viewport
//! changes into engine calls. Browser-free so it can be driven headlessly.

use super::frame::{FrameClock, LoopControl};
use super::input::{self, Command};
use super::viewport::SizingPolicy;
use crate::sim::{DeviceProfile, Engine, EngineConfig, GameOverHook, Snapshot};

/// Which overlay is hosting the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Keyboard controls, fixed 600x300 canvas
    Desktop,
    /// Tap controls, canvas follows the viewport
    Touch,
}

impl Variant {
    pub fn profile(&self) -> DeviceProfile {
        match self {
            Variant::Desktop => DeviceProfile::Desktop,
            Variant::Touch => DeviceProfile::Mobile,
        }
    }

    pub fn sizing(&self) -> SizingPolicy {
        match self {
            Variant::Desktop => SizingPolicy::desktop(),
            Variant::Touch => SizingPolicy::touch(),
        }
    }

    /// Restart hint shown on the game-over panel
    pub fn restart_hint(&self) -> &'static str {
        match self {
            Variant::Desktop => "Press ENTER to restart",
            Variant::Touch => "Tap to restart",
        }
    }
}

/// Things the host has to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterEvent {
    CloseRequested,
    DebugToggled(bool),
}

pub struct Adapter {
    variant: Variant,
    engine: Engine,
    canvas: (u32, u32),
    clock: FrameClock,
    control: LoopControl,
}

impl Adapter {
    /// Build for the current viewport; None if the canvas would be degenerate
    pub fn new(
        variant: Variant,
        viewport_width: f64,
        viewport_height: f64,
        on_game_over: Option<GameOverHook>,
    ) -> Option<Self> {
        let canvas = variant
            .sizing()
            .canvas_size(viewport_width, viewport_height)?;
        let mut config = EngineConfig::new(canvas.0 as f32, canvas.1 as f32, variant.profile());
        config.on_game_over = on_game_over;

        Some(Self {
            variant,
            engine: Engine::new(config),
            canvas,
            clock: FrameClock::new(),
            control: LoopControl::default(),
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        self.canvas
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.engine.set_debug_mode(enabled);
    }

    /// One display refresh: advance the engine and return what to draw
    pub fn frame(&mut self, now_ms: f64) -> Option<Snapshot> {
        if self.control.is_torn_down() {
            return None;
        }
        let dt = self.clock.tick(now_ms);
        self.engine.update(dt);
        Some(self.engine.snapshot())
    }

    /// Whether the host should request another frame
    pub fn should_schedule(&self) -> bool {
        self.control.should_schedule(&self.engine.snapshot())
    }

    /// Keyboard input (desktop overlay only)
    pub fn key(&mut self, key: &str) -> Option<AdapterEvent> {
        if self.variant != Variant::Desktop || self.is_torn_down() {
            return None;
        }
        let command = input::desktop_key(key, &self.engine.snapshot())?;
        self.dispatch(command)
    }

    /// Tap/click on the canvas (touch overlay only)
    pub fn tap(&mut self) -> Option<AdapterEvent> {
        if self.variant != Variant::Touch || self.is_torn_down() {
            return None;
        }
        let command = input::touch_tap(&self.engine.snapshot());
        self.dispatch(command)
    }

    /// Apply one command
    pub fn dispatch(&mut self, command: Command) -> Option<AdapterEvent> {
        if self.is_torn_down() {
            log::trace!("Ignoring {:?} after teardown", command);
            return None;
        }
        match command {
            Command::Jump => self.engine.jump(),
            Command::Advance => self.engine.advance(),
            Command::Restart => {
                if self.engine.snapshot().is_over() {
                    self.engine.restart();
                    self.clock.reset();
                }
            }
            Command::ToggleDebug => {
                let enabled = self.engine.toggle_debug_mode();
                log::info!("Debug hitboxes {}", if enabled { "on" } else { "off" });
                return Some(AdapterEvent::DebugToggled(enabled));
            }
            Command::Close => return Some(AdapterEvent::CloseRequested),
        }
        None
    }

    /// Viewport changed; returns true if the engine saw new dimensions
    pub fn resize(&mut self, viewport_width: f64, viewport_height: f64) -> bool {
        if self.is_torn_down() {
            return false;
        }
        let Some(canvas) = self
            .variant
            .sizing()
            .canvas_size(viewport_width, viewport_height)
        else {
            log::warn!(
                "Ignoring degenerate viewport {}x{}",
                viewport_width,
                viewport_height
            );
            return false;
        };
        if canvas == self.canvas {
            return false;
        }
        self.canvas = canvas;
        self.engine.resize(canvas.0 as f32, canvas.1 as f32);
        true
    }

    /// Stop the frame loop for good; later input is ignored
    pub fn tear_down(&mut self) {
        self.control.tear_down();
        log::info!("Game adapter torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.control.is_torn_down()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_ignores_viewport_size() {
        let mut adapter = Adapter::new(Variant::Desktop, 1920.0, 1080.0, None).unwrap();
        assert_eq!(adapter.canvas_size(), (600, 300));
        assert!(!adapter.resize(800.0, 600.0));
    }

    #[test]
    fn test_touch_rejects_degenerate_resize() {
        let mut adapter = Adapter::new(Variant::Touch, 390.0, 844.0, None).unwrap();
        assert_eq!(adapter.canvas_size(), (390, 744));

        assert!(!adapter.resize(390.0, 80.0));
        assert_eq!(adapter.canvas_size(), (390, 744));

        assert!(adapter.resize(844.0, 390.0));
        assert_eq!(adapter.snapshot().field_size.x, 844.0);
    }

    #[test]
    fn test_no_adapter_for_degenerate_viewport() {
        assert!(Adapter::new(Variant::Touch, 390.0, 50.0, None).is_none());
    }

    #[test]
    fn test_keys_only_on_desktop() {
        let mut touch = Adapter::new(Variant::Touch, 390.0, 844.0, None).unwrap();
        assert_eq!(touch.key("Escape"), None);

        let mut desktop = Adapter::new(Variant::Desktop, 0.0, 0.0, None).unwrap();
        assert_eq!(desktop.tap(), None);
        assert_eq!(desktop.key("Escape"), Some(AdapterEvent::CloseRequested));
        assert_eq!(desktop.key("d"), Some(AdapterEvent::DebugToggled(true)));
        assert!(desktop.snapshot().debug_mode);
    }

    #[test]
    fn test_torn_down_adapter_stops() {
        let mut adapter = Adapter::new(Variant::Desktop, 0.0, 0.0, None).unwrap();
        assert!(adapter.frame(0.0).is_some());
        adapter.tear_down();
        assert!(adapter.is_torn_down());
        assert!(adapter.frame(16.67).is_none());
        assert!(!adapter.should_schedule());
    }

    #[test]
    fn test_dispatch_after_teardown_is_ignored() {
        let mut adapter = Adapter::new(Variant::Touch, 390.0, 844.0, None).unwrap();
        adapter.tear_down();
        let before = adapter.snapshot();

        assert_eq!(adapter.dispatch(Command::ToggleDebug), None);
        assert_eq!(adapter.dispatch(Command::Jump), None);
        assert_eq!(adapter.tap(), None);
        assert!(!adapter.resize(844.0, 390.0));
        assert_eq!(adapter.snapshot(), before);
        assert_eq!(adapter.canvas_size(), (390, 744));
    }
}
