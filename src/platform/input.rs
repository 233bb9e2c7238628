//! Raw device input to engine commands

use crate::sim::Snapshot;

/// Everything an input can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Advance,
    Restart,
    ToggleDebug,
    /// Leave the game; handled by the host, not the engine
    Close,
}

/// Map a `KeyboardEvent.key` value on desktop
pub fn desktop_key(key: &str, snap: &Snapshot) -> Option<Command> {
    match key {
        " " | "ArrowUp" if snap.is_running() => Some(Command::Jump),
        "ArrowRight" if snap.is_running() => Some(Command::Advance),
        "Enter" if snap.is_over() => Some(Command::Restart),
        "Escape" => Some(Command::Close),
        "d" | "D" => Some(Command::ToggleDebug),
        _ => None,
    }
}

/// Map a tap on touch devices
pub fn touch_tap(snap: &Snapshot) -> Command {
    if snap.is_over() {
        Command::Restart
    } else {
        Command::Jump
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Engine, EngineConfig};

    fn running() -> Snapshot {
        Engine::new(EngineConfig::desktop()).snapshot()
    }

    fn over() -> Snapshot {
        let mut engine = Engine::new(EngineConfig::desktop());
        while engine.snapshot().is_running() {
            engine.update(1.0);
        }
        engine.snapshot()
    }

    #[test]
    fn test_desktop_keys_while_running() {
        let snap = running();
        assert_eq!(desktop_key(" ", &snap), Some(Command::Jump));
        assert_eq!(desktop_key("ArrowUp", &snap), Some(Command::Jump));
        assert_eq!(desktop_key("ArrowRight", &snap), Some(Command::Advance));
        assert_eq!(desktop_key("Enter", &snap), None);
        assert_eq!(desktop_key("Escape", &snap), Some(Command::Close));
        assert_eq!(desktop_key("d", &snap), Some(Command::ToggleDebug));
        assert_eq!(desktop_key("x", &snap), None);
    }

    #[test]
    fn test_desktop_keys_when_over() {
        let snap = over();
        assert_eq!(desktop_key("Enter", &snap), Some(Command::Restart));
        assert_eq!(desktop_key(" ", &snap), None);
        assert_eq!(desktop_key("ArrowRight", &snap), None);
        assert_eq!(desktop_key("Escape", &snap), Some(Command::Close));
    }

    #[test]
    fn test_tap_jumps_or_restarts() {
        assert_eq!(touch_tap(&running()), Command::Jump);
        assert_eq!(touch_tap(&over()), Command::Restart);
    }
}
