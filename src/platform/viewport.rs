//! Canvas sizing policies for the two adapter variants

use crate::consts::*;

/// How the canvas follows the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingPolicy {
    /// Canvas never changes size
    Fixed { width: u32, height: u32 },
    /// Canvas tracks the viewport, minus room for chrome below it
    Viewport { chrome_height: u32 },
}

impl SizingPolicy {
    pub fn desktop() -> Self {
        SizingPolicy::Fixed {
            width: DESKTOP_CANVAS_WIDTH,
            height: DESKTOP_CANVAS_HEIGHT,
        }
    }

    pub fn touch() -> Self {
        SizingPolicy::Viewport {
            chrome_height: TOUCH_CHROME_HEIGHT,
        }
    }

    /// Canvas size for a viewport, or None if it would be degenerate
    pub fn canvas_size(&self, viewport_width: f64, viewport_height: f64) -> Option<(u32, u32)> {
        let (width, height) = match *self {
            SizingPolicy::Fixed { width, height } => (width as f64, height as f64),
            SizingPolicy::Viewport { chrome_height } => {
                (viewport_width, viewport_height - chrome_height as f64)
            }
        };
        validate_size(width, height)
    }
}

/// Reject zero, negative and non-finite dimensions
pub fn validate_size(width: f64, height: f64) -> Option<(u32, u32)> {
    if !width.is_finite() || !height.is_finite() {
        return None;
    }
    let (w, h) = (width.floor(), height.floor());
    if w < 1.0 || h < 1.0 {
        return None;
    }
    Some((w as u32, h as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_ignores_viewport() {
        let policy = SizingPolicy::desktop();
        assert_eq!(policy.canvas_size(1920.0, 1080.0), Some((600, 300)));
        assert_eq!(policy.canvas_size(0.0, 0.0), Some((600, 300)));
    }

    #[test]
    fn test_viewport_reserves_chrome() {
        let policy = SizingPolicy::touch();
        assert_eq!(policy.canvas_size(390.0, 844.0), Some((390, 744)));
    }

    #[test]
    fn test_degenerate_sizes_rejected() {
        let policy = SizingPolicy::touch();
        assert_eq!(policy.canvas_size(390.0, 100.0), None);
        assert_eq!(policy.canvas_size(0.0, 800.0), None);
        assert_eq!(policy.canvas_size(-5.0, 800.0), None);
        assert_eq!(validate_size(f64::NAN, 10.0), None);
        assert_eq!(validate_size(10.5, 20.9), Some((10, 20)));
    }
}
